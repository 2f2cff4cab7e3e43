//! Poll one gate and print `in|out|`
//!
//! ```bash
//! GATE_IP=10.2.19.113 GATE_MODEL=feigx2 cargo run --example poll_gate
//! ```

use std::time::Duration;

use gatepoll::DeviceModel;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> gatepoll::Result<()> {
    // Diagnostics go to stderr; stdout only carries the result line
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Change to your gate IP
    let ip = std::env::var("GATE_IP").unwrap_or_else(|_| "10.0.0.127".to_string());

    let model = match std::env::var("GATE_MODEL") {
        Ok(name) => name.parse::<DeviceModel>()?,
        Err(_) => DeviceModel::default(),
    };

    let dwell = std::env::var("GATE_DWELL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs);

    let debug = std::env::var("GATE_DEBUG").is_ok();

    let line = gatepoll::poll_gate(model, &ip, None, dwell, debug).await?;
    println!("{}", line);

    Ok(())
}
