pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
