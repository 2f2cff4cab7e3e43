//! Transport layer for gate polling
//!
//! Provides raw TCP communication with gates. A transport carries exactly
//! the bytes it is given; framing, if any, belongs to the gate protocol.

pub mod tcp;
pub mod error;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from device
    ///
    /// Safe to call when not connected.
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive at most `max_bytes` in a single read, waiting up to `timeout`
    ///
    /// An empty buffer means the peer sent nothing before closing.
    async fn receive(&mut self, max_bytes: usize, timeout: Duration) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
