//! Protocol Engine: the orchestration layer binding the Sequence Manager,
//! a [`Transport`], and the frame/response codecs into one request/reply
//! operation.
//!
//! Every public operation on [`ProtocolEngine`] runs the same pipeline:
//!
//! 1. **Admission control** - reject with [`FinsError::QueueFull`] if the
//!    Sequence Manager is already at capacity.
//! 2. **Validation** - command construction (address encoding, count
//!    bounds, bit/word mismatches) surfaces as [`FinsError::InvalidParameter`]
//!    or [`FinsError::InvalidAddressing`] before anything is sent.
//! 3. **Header mint + frame assembly** - a fresh SID is minted by the
//!    Sequence Manager and stamped into the command header.
//! 4. **Sequence registration** - the SID is registered with a timeout
//!    before the frame is handed to the transport, so a reply racing the
//!    registration can never find the slot unoccupied.
//! 5. **Send** - the transport performs the blocking round trip.
//! 6. **Completion** - success marks the sequence `done`; any failure
//!    (transport, timeout, protocol) marks it `error`/`timeout`; either way
//!    the outcome is delivered through the Sequence Manager's statistics
//!    and completion channel.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};

use crate::error::{FinsError, Result};
use crate::response::FinsResponse;
use crate::sequence::{Completion, SequenceManager};
use crate::transport::Transport;

/// Configuration for a [`ProtocolEngine`].
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Maximum number of concurrent in-flight requests.
    pub max_queue: usize,
    /// Default per-request timeout.
    pub default_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_queue: 32,
            default_timeout: Duration::from_secs(2),
        }
    }
}

/// An observable engine lifecycle/error event, mirroring the manager-level
/// notifications a caller without a per-call callback would want.
#[derive(Debug)]
pub enum EngineEvent {
    /// The engine opened its transport successfully.
    Open,
    /// The engine's transport was closed.
    Close,
    /// A request's sequence timed out.
    Timeout {
        /// Service ID of the timed-out request.
        sid: u8,
    },
    /// A transport or protocol error occurred outside of any specific
    /// per-call callback.
    Error(String),
    /// Admission control rejected a request because the queue is full.
    Full,
}

/// Binds a [`Transport`] to a [`SequenceManager`] and runs FINS request/reply
/// transactions over it.
///
/// Generic over the transport implementation so the same engine code works
/// over UDP or TCP.
pub struct ProtocolEngine<T: Transport> {
    transport: Mutex<T>,
    sequences: Arc<SequenceManager>,
    config: EngineConfig,
    events: Mutex<Option<mpsc::Sender<EngineEvent>>>,
}

impl<T: Transport> ProtocolEngine<T> {
    /// Creates a new engine over `transport` with `config`.
    pub fn new(transport: T, config: EngineConfig) -> Self {
        Self {
            transport: Mutex::new(transport),
            sequences: Arc::new(SequenceManager::new(config.max_queue)),
            config,
            events: Mutex::new(None),
        }
    }

    /// Registers a channel to receive engine-level events (timeouts,
    /// errors, admission rejections) that aren't delivered to a specific
    /// per-call callback.
    pub fn subscribe(&self) -> mpsc::Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel();
        *self.events.lock().unwrap() = Some(tx);
        rx
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    /// Allocates the next Service ID.
    pub fn next_sid(&self) -> u8 {
        self.sequences.next_sid()
    }

    /// Number of requests currently in flight.
    pub fn active_count(&self) -> usize {
        self.sequences.active_count()
    }

    /// Snapshot of round-trip/throughput statistics.
    pub fn statistics(&self) -> crate::sequence::Statistics {
        self.sequences.statistics()
    }

    /// Routing node numbers assigned by the transport's handshake, if any
    /// (only meaningful for TCP).
    pub fn assigned_nodes(&self) -> Option<(u8, u8)> {
        self.transport.lock().unwrap().assigned_nodes()
    }

    /// Runs one request/reply transaction for an already-serialized FINS
    /// frame whose header carries `sid`.
    ///
    /// This is the single pipeline every typed command (`read`, `write`,
    /// `run`, ...) funnels through: admission control, sequence
    /// registration with a timeout, blocking transport round trip, and
    /// completion delivery.
    ///
    /// # Errors
    ///
    /// Returns [`FinsError::QueueFull`] if the engine is at capacity,
    /// [`FinsError::SidInUse`] if `sid` names a non-terminal sequence,
    /// [`FinsError::Timeout`] if no reply arrives in time, or a transport
    /// error if the underlying I/O fails.
    pub fn execute(&self, sid: u8, frame: Vec<u8>) -> Result<FinsResponse> {
        self.execute_with_timeout(sid, frame, self.config.default_timeout)
    }

    /// Like [`Self::execute`] but with an explicit per-call timeout.
    pub fn execute_with_timeout(
        &self,
        sid: u8,
        frame: Vec<u8>,
        timeout: Duration,
    ) -> Result<FinsResponse> {
        if self.sequences.free_space() == 0 {
            self.emit(EngineEvent::Full);
            return Err(FinsError::QueueFull);
        }

        let (tx, rx) = mpsc::channel();
        self.sequences
            .add(sid, timeout, None, Completion::Broadcast(tx))?;

        debug!("sending FINS frame, sid={sid}");
        let send_result = self.transport.lock().unwrap().send_receive(&frame);

        match send_result {
            Ok(bytes) => {
                self.sequences.confirm_sent(sid);
                match FinsResponse::from_bytes(&bytes).and_then(|r| {
                    r.check_sid(sid)?;
                    Ok(r)
                }) {
                    Ok(response) => self.sequences.done(sid, response),
                    Err(err) => self.sequences.set_error(sid, err),
                }
            }
            Err(err) => {
                warn!("transport error on sid={sid}: {err}");
                self.sequences.set_error(sid, err);
            }
        }

        let outcome = rx
            .recv()
            .map_err(|_| FinsError::TransportError("sequence dropped without outcome".into()))?;

        if let Some(response) = outcome.response {
            return Ok(response);
        }
        let error = outcome.error.unwrap_or(FinsError::Timeout);
        if matches!(error, FinsError::Timeout) {
            self.emit(EngineEvent::Timeout { sid });
        } else {
            self.emit(EngineEvent::Error(error.to_string()));
        }
        Err(error)
    }

    /// Closes the engine: drops every pending sequence without delivering
    /// completions. The underlying transport is left connected; callers
    /// that want to reconnect should construct a fresh engine.
    pub fn close(&self) {
        self.sequences.close();
        self.emit(EngineEvent::Close);
    }
}

impl<T: Transport> std::fmt::Debug for ProtocolEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolEngine")
            .field("config", &self.config)
            .field("active_count", &self.active_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{FinsHeader, NodeAddress};

    #[derive(Debug)]
    struct LoopbackTransport {
        sid_echo: Option<u8>,
    }

    impl Transport for LoopbackTransport {
        fn send_receive(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
            let header = FinsHeader::from_bytes(&frame[..10])?;
            self.sid_echo = Some(header.sid);
            let mut response = header.with_routing(header.source(), header.destination());
            response.icf = 0xC0;
            let mut bytes = response.to_bytes().to_vec();
            bytes.push(frame[10]); // MRC
            bytes.push(frame[11]); // SRC
            bytes.push(0x00); // MRES
            bytes.push(0x00); // SRES
            Ok(bytes)
        }
    }

    #[derive(Debug)]
    struct TimeoutTransport;

    impl Transport for TimeoutTransport {
        fn send_receive(&mut self, _frame: &[u8]) -> Result<Vec<u8>> {
            Err(FinsError::Timeout)
        }
    }

    fn sample_frame(sid: u8) -> Vec<u8> {
        let header = FinsHeader::new_command(NodeAddress::new(0, 10, 0), NodeAddress::new(0, 1, 0), sid);
        let mut bytes = header.to_bytes().to_vec();
        bytes.push(0x01);
        bytes.push(0x01);
        bytes
    }

    #[test]
    fn test_execute_success_round_trip() {
        let engine = ProtocolEngine::new(
            LoopbackTransport { sid_echo: None },
            EngineConfig::default(),
        );
        let sid = engine.next_sid();
        let response = engine.execute(sid, sample_frame(sid)).unwrap();
        assert!(response.is_success());
        assert_eq!(response.header.sid, sid);
    }

    #[test]
    fn test_execute_propagates_transport_timeout() {
        let engine = ProtocolEngine::new(TimeoutTransport, EngineConfig::default());
        let sid = engine.next_sid();
        let result = engine.execute(sid, sample_frame(sid));
        assert!(matches!(result, Err(FinsError::Timeout)));
    }

    #[test]
    fn test_queue_full_rejected_before_send() {
        let mut config = EngineConfig::default();
        config.max_queue = 0;
        let engine = ProtocolEngine::new(LoopbackTransport { sid_echo: None }, config);
        let result = engine.execute(1, sample_frame(1));
        assert!(matches!(result, Err(FinsError::QueueFull)));
    }

    #[test]
    fn test_statistics_after_successful_call() {
        let engine = ProtocolEngine::new(
            LoopbackTransport { sid_echo: None },
            EngineConfig::default(),
        );
        let sid = engine.next_sid();
        engine.execute(sid, sample_frame(sid)).unwrap();
        assert_eq!(engine.statistics().reply_count, 1);
    }
}
