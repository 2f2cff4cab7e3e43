//! Gate poll configuration

use std::time::Duration;

use gatepoll_core::constants::DEFAULT_CONNECT_TIMEOUT;
use gatepoll_core::{DeviceModel, MAX_RESPONSE_SIZE, QueryKind};

/// Settings for one gate poll
///
/// Only the model and host are required. Port and dwell default to the
/// model's profile; the read timeout defaults to the connect timeout.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gatepoll::{DeviceModel, GateConfig};
///
/// let config = GateConfig::new(DeviceModel::FeigLr2500, "10.2.19.113")
///     .with_dwell(Duration::from_secs(2))
///     .with_debug(true);
///
/// assert_eq!(config.port(), 10001);
/// assert_eq!(config.dwell(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub model: DeviceModel,
    pub host: String,
    pub port: Option<u16>,
    pub dwell: Option<Duration>,
    pub query: QueryKind,
    pub connect_timeout: Duration,
    pub read_timeout: Option<Duration>,
    pub max_response_bytes: usize,
    pub debug: bool,
}

impl GateConfig {
    pub fn new(model: DeviceModel, host: impl Into<String>) -> Self {
        Self {
            model,
            host: host.into(),
            port: None,
            dwell: None,
            query: QueryKind::CustomerCounts,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
            max_response_bytes: MAX_RESPONSE_SIZE,
            debug: false,
        }
    }

    /// Override the model's canonical port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Override the model's dwell time
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = Some(dwell);
        self
    }

    pub fn with_query(mut self, query: QueryKind) -> Self {
        self.query = query;
        self
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set read timeout (defaults to the connect timeout)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }

    /// Log received data at info level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Effective port
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.model.default_port())
    }

    /// Effective dwell time
    pub fn dwell(&self) -> Duration {
        self.dwell.unwrap_or_else(|| self.model.default_dwell())
    }

    /// Effective read timeout
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout.unwrap_or(self.connect_timeout)
    }
}
