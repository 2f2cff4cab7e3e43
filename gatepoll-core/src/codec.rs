//! Hex text / raw byte conversion
//!
//! Query commands are kept as hex text and turned into bytes just before
//! they go on the wire. Replies travel the other way: raw bytes become
//! lowercase hex text so that every decoder works on the same
//! representation.

use bytes::Bytes;
use tracing::trace;

use crate::error::{Error, Result};

/// Convert hex text to bytes
///
/// Two hex digits per byte, either case. Odd-length input and non-hex
/// characters are rejected.
///
/// # Examples
///
/// ```
/// use gatepoll_core::codec;
///
/// let bytes = codec::decode_command("63000406000D59").unwrap();
/// assert_eq!(bytes.as_ref(), &[0x63, 0x00, 0x04, 0x06, 0x00, 0x0D, 0x59]);
///
/// assert!(codec::decode_command("630").is_err());
/// ```
pub fn decode_command(command: &str) -> Result<Bytes> {
    let bytes = hex::decode(command).map_err(|e| Error::InvalidCommand {
        command: command.to_string(),
        reason: e.to_string(),
    })?;

    trace!(command, len = bytes.len(), "Decoded command");

    Ok(Bytes::from(bytes))
}

/// Convert raw bytes to lowercase hex text
///
/// # Examples
///
/// ```
/// use gatepoll_core::codec;
///
/// assert_eq!(codec::encode_response(&[0x0D, 0xFF]), "0dff");
/// assert_eq!(codec::encode_response(&[]), "");
/// ```
pub fn encode_response(data: &[u8]) -> String {
    hex::encode(data)
}
