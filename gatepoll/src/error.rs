//! High-level error types

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] gatepoll_core::Error),

    #[error("Type error: {0}")]
    Types(#[from] gatepoll_types::Error),

    #[error("Connection failed: {0}")]
    Connect(#[source] gatepoll_transport::Error),

    #[error("Transfer failed: {0}")]
    Transfer(#[source] gatepoll_transport::Error),

    #[error("Poll cancelled")]
    Cancelled,

    #[error("Poll did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl Error {
    /// Check if error is a caller mistake (bad address, unsupported model or query)
    ///
    /// These are reported before any network activity. Everything else is a
    /// runtime failure of one poll.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Types(_) => true,
            Self::Core(e) => e.is_configuration(),
            _ => false,
        }
    }

    /// Check if error is a malformed gate reply
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_malformed_response())
    }
}
