//! Poll a gate and give up on Ctrl-C

use gatepoll::{DeviceModel, Gate, GateConfig};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> gatepoll::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let ip = std::env::var("GATE_IP").unwrap_or_else(|_| "10.0.0.127".to_string());

    let config = GateConfig::new(DeviceModel::FeigLr2500, ip).with_debug(true);
    let mut gate = Gate::from_config(&config)?;

    info!("Polling {} (budget {:?}), Ctrl-C to cancel", gate.endpoint(), gate.time_budget());

    let counts = gate
        .poll_until(async {
            let _ = signal::ctrl_c().await;
        })
        .await;

    println!("{}", counts);

    Ok(())
}
