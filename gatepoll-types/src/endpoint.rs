//! Gate network endpoint

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::error::{Error, Result};

/// IPv4 address and TCP port of a gate
///
/// The host is validated once, when the endpoint is built from user input.
/// Only dotted-quad IPv4 is accepted; hostnames and IPv6 are rejected.
///
/// # Examples
///
/// ```
/// use gatepoll_types::Endpoint;
///
/// let endpoint = Endpoint::parse("10.2.19.113", 10001).unwrap();
/// assert_eq!(endpoint.to_string(), "10.2.19.113:10001");
///
/// assert!(Endpoint::parse("10.2.19", 10001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: Ipv4Addr,
    port: u16,
}

impl Endpoint {
    /// Build an endpoint from an already parsed address
    pub fn new(host: Ipv4Addr, port: u16) -> Result<Self> {
        if port == 0 {
            return Err(Error::Validation(format!("port 0 is not usable for {}", host)));
        }
        Ok(Self { host, port })
    }

    /// Parse a dotted-quad host string
    pub fn parse(host: &str, port: u16) -> Result<Self> {
        let addr = host
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|_| Error::InvalidAddress(host.to_string()))?;
        Self::new(addr, port)
    }

    pub fn host(&self) -> Ipv4Addr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Same host, different port
    pub fn with_port(self, port: u16) -> Result<Self> {
        Self::new(self.host, port)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
