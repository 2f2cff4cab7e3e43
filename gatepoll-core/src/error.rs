//! Error types for gatepoll-core

/// Result type alias for gatepoll-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stored query command is not valid hex
    #[error("Invalid command '{command}': {reason}")]
    InvalidCommand {
        command: String,
        reason: String,
    },

    /// Response is shorter than the decoder's field layout
    #[error("Malformed response: expected at least {expected} hex characters, got {actual}")]
    ResponseTooShort {
        expected: usize,
        actual: usize,
    },

    /// Response field contains characters that are not hex digits
    #[error("Malformed response: field at offset {offset} is not hex: '{field}'")]
    InvalidField {
        offset: usize,
        field: String,
    },

    /// Model name not recognized
    #[error("Unknown gate model: '{0}'")]
    UnknownModel(String),

    /// Query not implemented for this model
    #[error("Query '{query}' is not supported by {model}")]
    UnsupportedQuery {
        model: &'static str,
        query: crate::query::QueryKind,
    },

    /// Poll cycle moved out of order
    #[error("Invalid poll state transition: {from:?} -> {to:?}")]
    InvalidState {
        from: crate::state::PollState,
        to: crate::state::PollState,
    },
}

impl Error {
    /// Check if error is a malformed device response
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::ResponseTooShort { .. } | Self::InvalidField { .. })
    }

    /// Check if error comes from caller configuration rather than the device
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidCommand { .. } | Self::UnknownModel(_) | Self::UnsupportedQuery { .. }
        )
    }
}
