//! TCP transport

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use gatepoll_core::constants::DEFAULT_CONNECT_TIMEOUT;
use gatepoll_types::Endpoint;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// TCP transport for gates
///
/// Gates expose a plain TCP socket (usually a serial-to-ethernet bridge).
/// No framing is added to outgoing data and every receive is a single read.
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Create a transport for a validated endpoint
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        let mut transport = Self::new(endpoint.host().to_string(), endpoint.port());
        transport.socket_addr = Some(endpoint.socket_addr());
        transport
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addr = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| {
                debug!("Lookup of {} failed: {}", addr_str, e);
                Error::UnknownHost(self.addr.clone())
            })?
            .next()
            .ok_or_else(|| Error::UnknownHost(self.addr.clone()))?;

        self.socket_addr = Some(addr);
        Ok(addr)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let addr = self.resolve_addr().await?;

        debug!("Connecting to {}...", addr);

        let stream = match timeout(self.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                return Err(Error::ConnectionRefused(self.addr.clone()));
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(Error::ConnectionTimeout {
                    addr: self.addr.clone(),
                    timeout: self.connect_timeout,
                });
            }
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => {
                return Err(Error::ConnectionTimeout {
                    addr: self.addr.clone(),
                    timeout: self.connect_timeout,
                });
            }
        };

        // Commands are tiny; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown
            let _ = stream.shutdown().await;
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(32)]);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, max_bytes: usize, timeout_duration: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::zeroed(max_bytes);

        // One read only: anything the gate sends later is not collected
        let n = timeout(timeout_duration, stream.read(&mut buf[..]))
            .await
            .map_err(|_| {
                warn!("Read timeout after {:?}", timeout_duration);
                Error::ReadTimeout(timeout_duration)
            })?
            .map_err(Error::Io)?;

        buf.truncate(n);

        if n == 0 {
            debug!("Peer closed the connection without sending data");
        } else {
            trace!("Received {} bytes: {:02X?}", n, &buf[..n.min(32)]);
        }

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("TCP transport dropped while still connected");
        }
    }
}
