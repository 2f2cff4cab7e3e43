//! # gatepoll
//!
//! Poll library people-counter gates for patron in/out counts.
//!
//! ## Features
//!
//! - 3M 9100 and FEIG ID ISC.LR2500-B (single and dual aisle) gates
//! - Async/await API using Tokio
//! - Every failure degrades to the `-1|-1|` sentinel, with a diagnostic
//!   logged through `tracing`
//! - Bounded connect, dwell and read, with cooperative cancellation
//!
//! ## Quick Start
//!
//! ```no_run
//! use gatepoll::DeviceModel;
//!
//! #[tokio::main]
//! async fn main() -> gatepoll::Result<()> {
//!     let line = gatepoll::poll_gate(DeviceModel::ThreeM9100, "10.0.0.127", None, None, false).await?;
//!
//!     // "<in>|<out>|" or "-1|-1|"
//!     println!("{}", line);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gate;

use std::time::Duration;

// Re-exports
pub use config::GateConfig;
pub use error::{Error, Result};
pub use gate::Gate;

// Re-export types
pub use gatepoll_core::{Decoder, DeviceModel, PollState, QueryKind};
pub use gatepoll_types::{CountResult, Endpoint};

/// Poll one gate and format the result line
///
/// `port` and `dwell` fall back to the model's defaults when `None`.
///
/// # Errors
///
/// Only configuration errors (invalid IPv4 host, port 0) are returned. Network
/// and protocol failures produce `"-1|-1|"`.
pub async fn poll_gate(
    model: DeviceModel,
    host: &str,
    port: Option<u16>,
    dwell: Option<Duration>,
    debug: bool,
) -> Result<String> {
    let mut config = GateConfig::new(model, host).with_debug(debug);

    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(dwell) = dwell {
        config = config.with_dwell(dwell);
    }

    let mut gate = Gate::from_config(&config)?;

    Ok(gate.poll().await.to_string())
}
