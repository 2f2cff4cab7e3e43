//! Transport errors

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Host '{addr}' is not responding within {} milliseconds", .timeout.as_millis())]
    ConnectionTimeout {
        addr: String,
        timeout: Duration,
    },

    #[error("Unknown host '{0}'")]
    UnknownHost(String),

    #[error("Host '{0}' refusing connection")]
    ConnectionRefused(String),

    #[error("Read timeout after {} milliseconds", .0.as_millis())]
    ReadTimeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if error was raised while establishing the connection
    pub fn is_connect_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::UnknownHost(_) | Self::ConnectionRefused(_)
        )
    }

    /// Check if error is any kind of timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ConnectionTimeout { .. } | Self::ReadTimeout(_) => true,
            Self::Io(e) => e.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}
