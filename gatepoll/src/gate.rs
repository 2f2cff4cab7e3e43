//! Gate driver
//!
//! A [`Gate`] runs one request/response exchange with a people counter:
//! connect, send the model's query, dwell while the hardware prepares its
//! answer, read once, decode, close.

use std::future::{Future, pending};
use std::time::Duration;

use bytes::Bytes;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, trace, warn};

use gatepoll_core::{Decoder, DeviceModel, PollCycle, PollState, QueryKind, codec};
use gatepoll_transport::{TcpTransport, Transport};
use gatepoll_types::{CountResult, Endpoint};

use crate::config::GateConfig;
use crate::error::{Error, Result};

/// People-counter gate
///
/// # Examples
///
/// ```no_run
/// use gatepoll::{DeviceModel, Endpoint, Gate};
///
/// #[tokio::main]
/// async fn main() -> gatepoll::Result<()> {
///     let endpoint = Endpoint::parse("10.2.19.113", 10001)?;
///     let mut gate = Gate::create(DeviceModel::FeigLr2500, &endpoint, false)?;
///
///     // Never fails: errors are logged and become "-1|-1|"
///     let counts = gate.poll().await;
///     println!("{}", counts);
///
///     Ok(())
/// }
/// ```
pub struct Gate {
    model: DeviceModel,
    endpoint: Endpoint,
    query: QueryKind,
    command: Bytes,
    decoder: Option<Decoder>,
    dwell: Duration,
    connect_timeout: Duration,
    read_timeout: Duration,
    max_response_bytes: usize,
    debug: bool,
    transport: Box<dyn Transport>,
    cycle: PollCycle,
}

impl Gate {
    /// Create a gate for the endpoint's host on the model's canonical port
    ///
    /// The endpoint's port is replaced by the model's; use
    /// [`GateConfig::with_port`] to poll a different one.
    pub fn create(model: DeviceModel, endpoint: &Endpoint, debug: bool) -> Result<Self> {
        Self::from_config(&GateConfig::new(model, endpoint.host().to_string()).with_debug(debug))
    }

    /// Create a gate from explicit settings
    ///
    /// Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The host is not a valid IPv4 address, or the port is 0
    /// - The model does not implement the requested query
    /// - The response buffer size is 0
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let endpoint = Endpoint::parse(&config.host, config.port())?;
        let model = config.model;

        let command = if model.is_offline() && config.query == QueryKind::CustomerCounts {
            Bytes::new()
        } else {
            codec::decode_command(model.command(config.query)?)?
        };

        if config.max_response_bytes == 0 {
            return Err(gatepoll_types::Error::Validation(
                "response buffer size must be greater than 0".into(),
            )
            .into());
        }

        let transport =
            TcpTransport::from_endpoint(&endpoint).with_connect_timeout(config.connect_timeout);

        debug!(
            "Configured {} at {} (query={}, dwell={:?})",
            model,
            endpoint,
            config.query,
            config.dwell()
        );

        Ok(Self {
            model,
            endpoint,
            query: config.query,
            command,
            decoder: model.profile().decoder,
            dwell: config.dwell(),
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout(),
            max_response_bytes: config.max_response_bytes,
            debug: config.debug,
            transport: Box::new(transport),
            cycle: PollCycle::new(),
        })
    }

    /// Replace the transport (e.g. for a gate behind a different link)
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    pub fn model(&self) -> DeviceModel {
        self.model
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn query(&self) -> QueryKind {
        self.query
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// State reached by the last poll
    pub fn state(&self) -> PollState {
        self.cycle.state()
    }

    /// Upper bound on the duration of one poll
    ///
    /// Saturates at `Duration::MAX` for very long dwell overrides.
    pub fn time_budget(&self) -> Duration {
        self.connect_timeout
            .saturating_add(self.dwell)
            .saturating_add(self.read_timeout)
    }

    /// Poll the gate
    ///
    /// Always returns a result; on any failure the diagnostic is logged and
    /// the sentinel is returned.
    pub async fn poll(&mut self) -> CountResult {
        self.poll_until(pending()).await
    }

    /// Poll the gate, giving up when `cancelled` completes
    pub async fn poll_until<F>(&mut self, cancelled: F) -> CountResult
    where
        F: Future<Output = ()>,
    {
        match self.try_poll_until(cancelled).await {
            Ok(counts) => counts,
            Err(e) => {
                warn!("Poll of {} at {} failed: {}", self.model, self.endpoint, e);
                CountResult::Unavailable
            }
        }
    }

    /// Poll the gate, reporting failures
    pub async fn try_poll(&mut self) -> Result<CountResult> {
        self.try_poll_until(pending()).await
    }

    /// Poll the gate, reporting failures, giving up when `cancelled` completes
    ///
    /// The connection is closed on every path, including cancellation and
    /// deadline expiry.
    pub async fn try_poll_until<F>(&mut self, cancelled: F) -> Result<CountResult>
    where
        F: Future<Output = ()>,
    {
        self.cycle = PollCycle::new();

        let Some(decoder) = self.decoder else {
            debug!("{} is offline, not polling {}", self.model, self.endpoint);
            self.cycle.close();
            return Ok(CountResult::Unavailable);
        };

        let budget = self.time_budget();

        let outcome = tokio::select! {
            result = timeout(budget, self.run_cycle(decoder)) => {
                result.unwrap_or(Err(Error::DeadlineExceeded(budget)))
            }
            () = cancelled => Err(Error::Cancelled),
        };

        if outcome.is_err() {
            self.cycle.fail();
        }

        self.close().await;

        outcome
    }

    async fn run_cycle(&mut self, decoder: Decoder) -> Result<CountResult> {
        debug!("Polling {} at {}...", self.model, self.transport.remote_addr());

        self.transport.connect().await.map_err(Error::Connect)?;
        self.cycle.advance(PollState::Connected)?;

        self.transport.send(&self.command).await.map_err(Error::Transfer)?;
        self.cycle.advance(PollState::Sent)?;

        // The gate needs time to build its answer; this is not a timeout
        self.cycle.advance(PollState::Waiting)?;
        sleep(self.dwell).await;

        let raw = self
            .transport
            .receive(self.max_response_bytes, self.read_timeout)
            .await
            .map_err(Error::Transfer)?;

        let response = codec::encode_response(&raw);

        if response.is_empty() {
            warn!(
                "Can't read socket. Host: {}, port: {}. Is another application connected?",
                self.endpoint.host(),
                self.endpoint.port()
            );
        } else if self.debug {
            info!(response = %response, "count data received");
        } else {
            trace!(response = %response, "count data received");
        }

        let counts = decoder.decode(&response)?;
        self.cycle.advance(PollState::Completed)?;

        debug!("{} reported {}", self.model, counts);

        Ok(counts)
    }

    async fn close(&mut self) {
        if let Err(e) = self.transport.disconnect().await {
            warn!("Failed to close connection to {}: {}", self.endpoint, e);
        }
        self.cycle.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::BytesMut;
    use gatepoll_transport::MockTransport;
    use pretty_assertions::assert_eq;

    const THREE_M_COMMAND: [u8; 7] = [0x63, 0x00, 0x04, 0x06, 0x00, 0x0D, 0x59];

    fn three_m_reply() -> Vec<u8> {
        // out count 5 at [11..18), in count 3 at [19..26)
        let text = format!("{}{}{}{}", "0".repeat(11), "0000005", "0", "0000003");
        codec::decode_command(&text).unwrap().to_vec()
    }

    fn gate(model: DeviceModel) -> Gate {
        let endpoint = Endpoint::parse("10.0.0.127", 1).unwrap();
        Gate::create(model, &endpoint, false).unwrap()
    }

    fn mock() -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_remote_addr()
            .return_const("10.0.0.127:2101".to_string());
        transport
    }

    #[test]
    fn test_create_binds_model_defaults() {
        let gate = gate(DeviceModel::ThreeM9100);
        assert_eq!(gate.endpoint().port(), 2101);
        assert_eq!(gate.dwell(), Duration::from_secs(3));
        assert_eq!(gate.command.as_ref(), &THREE_M_COMMAND);
        assert_eq!(gate.state(), PollState::Idle);

        let gate = self::gate(DeviceModel::FeigLr2500DualAisle);
        assert_eq!(gate.endpoint().port(), 10001);
        assert_eq!(gate.dwell(), Duration::from_secs(1));
        assert_eq!(gate.command.len(), 18);
    }

    #[test]
    fn test_create_keeps_host_and_uses_model_port() {
        let endpoint = Endpoint::parse("10.2.19.113", 2101).unwrap();
        let gate = Gate::create(DeviceModel::FeigLr2500, &endpoint, true).unwrap();
        assert_eq!(gate.endpoint().host(), endpoint.host());
        assert_eq!(gate.endpoint().port(), 10001);
    }

    #[test]
    fn test_config_rejects_bad_address() {
        let result = Gate::from_config(&GateConfig::new(DeviceModel::FeigLr2500, "10.0.0"));
        let err = result.err().unwrap();
        assert!(matches!(err, Error::Types(gatepoll_types::Error::InvalidAddress(_))));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_reset_counts_rejected_before_connect() {
        let config = GateConfig::new(DeviceModel::FeigLr2500, "10.0.0.127")
            .with_query(QueryKind::ResetCounts);
        let err = Gate::from_config(&config).err().unwrap();
        assert!(matches!(
            err,
            Error::Core(gatepoll_core::Error::UnsupportedQuery { .. })
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_zero_response_buffer_rejected() {
        let config = GateConfig::new(DeviceModel::FeigLr2500, "10.0.0.127").with_max_response_bytes(0);
        assert!(Gate::from_config(&config).is_err());
    }

    #[test]
    fn test_time_budget() {
        let config = GateConfig::new(DeviceModel::ThreeM9100, "10.0.0.127")
            .with_connect_timeout(Duration::from_secs(5))
            .with_read_timeout(Duration::from_secs(2));
        let gate = Gate::from_config(&config).unwrap();
        assert_eq!(gate.time_budget(), Duration::from_secs(10));
    }

    #[test]
    fn test_time_budget_saturates() {
        let config = GateConfig::new(DeviceModel::FeigLr2500, "10.0.0.127").with_dwell(Duration::MAX);
        let gate = Gate::from_config(&config).unwrap();
        assert_eq!(gate.time_budget(), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_with_max_dwell_does_not_panic() {
        let mut transport = mock();
        transport.expect_connect().times(1).returning(|| Ok(()));
        transport.expect_send().times(1).returning(|_| Ok(()));
        transport.expect_receive().never();
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let config = GateConfig::new(DeviceModel::FeigLr2500, "10.0.0.127").with_dwell(Duration::MAX);
        let mut gate = Gate::from_config(&config).unwrap().with_transport(transport);

        let counts = gate.poll_until(sleep(Duration::from_secs(60))).await;
        assert!(counts.is_unavailable());
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_success() {
        let mut transport = mock();
        transport.expect_connect().times(1).returning(|| Ok(()));
        transport
            .expect_send()
            .withf(|data| data == &THREE_M_COMMAND[..])
            .times(1)
            .returning(|_| Ok(()));
        transport
            .expect_receive()
            .withf(|max, timeout| *max == 500 && *timeout == Duration::from_millis(5000))
            .times(1)
            .returning(|_, _| Ok(BytesMut::from(three_m_reply().as_slice())));
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::ThreeM9100).with_transport(transport);

        let counts = gate.poll().await;
        assert_eq!(counts.to_string(), "3|5|");
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_waits_for_dwell() {
        let mut transport = mock();
        transport.expect_connect().returning(|| Ok(()));
        transport.expect_send().returning(|_| Ok(()));
        transport.expect_receive().returning(|_, _| Ok(BytesMut::new()));
        transport.expect_disconnect().returning(|| Ok(()));

        let mut gate = gate(DeviceModel::ThreeM9100).with_transport(transport);

        let start = tokio::time::Instant::now();
        gate.poll().await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reply_is_sentinel() {
        let mut transport = mock();
        transport.expect_connect().returning(|| Ok(()));
        transport.expect_send().returning(|_| Ok(()));
        transport.expect_receive().returning(|_, _| Ok(BytesMut::new()));
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::FeigLr2500).with_transport(transport);

        // Empty is not an error
        let counts = gate.try_poll().await.unwrap();
        assert_eq!(counts.to_string(), "-1|-1|");
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_refused_is_sentinel() {
        let mut transport = mock();
        transport
            .expect_connect()
            .times(1)
            .returning(|| Err(gatepoll_transport::Error::ConnectionRefused("10.0.0.127".into())));
        transport.expect_send().never();
        transport.expect_receive().never();
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::FeigLr2500).with_transport(transport);

        assert_eq!(gate.poll().await.to_string(), "-1|-1|");
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_timeout_reported() {
        let mut transport = mock();
        transport.expect_connect().returning(|| {
            Err(gatepoll_transport::Error::ConnectionTimeout {
                addr: "10.0.0.127".into(),
                timeout: Duration::from_millis(5000),
            })
        });
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::ThreeM9100).with_transport(transport);

        let err = gate.try_poll().await.unwrap_err();
        assert!(matches!(err, Error::Connect(ref e) if e.is_timeout()));
        assert!(!err.is_configuration());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_still_closes() {
        let mut transport = mock();
        transport.expect_connect().returning(|| Ok(()));
        transport.expect_send().times(1).returning(|_| {
            Err(gatepoll_transport::Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "broken pipe",
            )))
        });
        transport.expect_receive().never();
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::FeigLr2500).with_transport(transport);

        let err = gate.try_poll().await.unwrap_err();
        assert!(matches!(err, Error::Transfer(_)));
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_timeout_is_sentinel() {
        let mut transport = mock();
        transport.expect_connect().returning(|| Ok(()));
        transport.expect_send().returning(|_| Ok(()));
        transport
            .expect_receive()
            .returning(|_, timeout| Err(gatepoll_transport::Error::ReadTimeout(timeout)));
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::FeigLr2500).with_transport(transport);

        assert!(gate.poll().await.is_unavailable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_reply_is_sentinel() {
        let mut transport = mock();
        transport.expect_connect().returning(|| Ok(()));
        transport.expect_send().returning(|_| Ok(()));
        // 10 hex characters, far short of the 40 the decoder needs
        transport
            .expect_receive()
            .returning(|_, _| Ok(BytesMut::from(&[0x01, 0x23, 0x45, 0x67, 0x89][..])));
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::FeigLr2500).with_transport(transport);

        let err = gate.try_poll().await.unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_dwell() {
        let mut transport = mock();
        transport.expect_connect().returning(|| Ok(()));
        transport.expect_send().returning(|_| Ok(()));
        transport.expect_receive().never();
        transport.expect_disconnect().times(1).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::ThreeM9100).with_transport(transport);

        let result = gate
            .try_poll_until(sleep(Duration::from_millis(500)))
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_never_touches_network() {
        let mut transport = mock();
        transport.expect_connect().never();
        transport.expect_send().never();
        transport.expect_receive().never();
        transport.expect_disconnect().never();

        let mut gate = gate(DeviceModel::Offline).with_transport(transport);

        assert_eq!(gate.poll().await.to_string(), "-1|-1|");
        assert_eq!(gate.state(), PollState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_can_poll_again() {
        let mut transport = mock();
        transport.expect_connect().times(2).returning(|| Ok(()));
        transport.expect_send().times(2).returning(|_| Ok(()));
        transport
            .expect_receive()
            .times(2)
            .returning(|_, _| Ok(BytesMut::from(three_m_reply().as_slice())));
        transport.expect_disconnect().times(2).returning(|| Ok(()));

        let mut gate = gate(DeviceModel::ThreeM9100).with_transport(transport);

        assert_eq!(gate.poll().await.to_string(), "3|5|");
        assert_eq!(gate.poll().await.to_string(), "3|5|");
    }

    /// Transport whose reads never complete
    struct StalledTransport {
        connected: bool,
        disconnects: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for StalledTransport {
        async fn connect(&mut self) -> gatepoll_transport::Result<()> {
            self.connected = true;
            Ok(())
        }

        async fn disconnect(&mut self) -> gatepoll_transport::Result<()> {
            self.connected = false;
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn send(&mut self, _data: &[u8]) -> gatepoll_transport::Result<()> {
            Ok(())
        }

        async fn receive(
            &mut self,
            _max_bytes: usize,
            _timeout: Duration,
        ) -> gatepoll_transport::Result<BytesMut> {
            pending().await
        }

        fn remote_addr(&self) -> String {
            "10.0.0.127:10001".to_string()
        }
    }

    fn stalled_gate(disconnects: &Arc<AtomicUsize>) -> Gate {
        gate(DeviceModel::FeigLr2500).with_transport(StalledTransport {
            connected: false,
            disconnects: Arc::clone(disconnects),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_when_read_stalls() {
        let disconnects = Arc::new(AtomicUsize::new(0));
        let mut gate = stalled_gate(&disconnects);
        let budget = gate.time_budget();

        let start = tokio::time::Instant::now();
        let err = gate.try_poll().await.unwrap_err();

        assert!(matches!(err, Error::DeadlineExceeded(d) if d == budget));
        assert!(start.elapsed() >= budget);
        assert_eq!(gate.state(), PollState::Closed);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_is_sentinel() {
        let disconnects = Arc::new(AtomicUsize::new(0));
        let mut gate = stalled_gate(&disconnects);

        assert_eq!(gate.poll().await.to_string(), "-1|-1|");
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }
}
