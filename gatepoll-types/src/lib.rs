//! Type definitions for gatepoll

pub mod counts;
pub mod endpoint;
pub mod error;

pub use counts::CountResult;
pub use endpoint::Endpoint;
pub use error::{Error, Result};
