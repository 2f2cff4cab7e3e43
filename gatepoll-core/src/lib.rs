//! # gatepoll-core
//!
//! Protocol core for people-counter gates.
//!
//! This crate provides the device-independent pieces of a poll:
//! - Hex text / byte conversion
//! - Device model table (ports, dwell times, query commands)
//! - Fixed-offset response decoders
//! - Poll cycle state tracking
//! - Protocol constants

pub mod codec;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod model;
pub mod query;
pub mod state;

pub use decoder::Decoder;
pub use error::{Error, Result};
pub use model::{DeviceModel, ModelProfile};
pub use query::QueryKind;
pub use state::{PollCycle, PollState};

/// Maximum number of bytes taken from a single read
pub const MAX_RESPONSE_SIZE: usize = 500;
