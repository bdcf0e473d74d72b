//! Transaction multiplexing: Service ID allocation, in-flight request
//! tracking, timeout enforcement, and round-trip statistics.
//!
//! Every outbound FINS request is tagged with a 1-byte Service ID (SID) so
//! that replies — which can arrive out of order, or not at all — can be
//! correlated back to their request. [`SequenceManager`] owns that
//! correlation table. A background thread polls for expired deadlines so a
//! request with a dropped reply still terminates via [`FinsError::Timeout`]
//! instead of leaking forever.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::FinsError;
use crate::response::FinsResponse;

/// Lowest valid Service ID.
pub const MIN_SID: u8 = 1;
/// Highest valid Service ID.
pub const MAX_SID: u8 = 254;

/// Window size for round-trip time statistics.
const STATS_WINDOW: usize = 50;
/// Cadence at which messages-per-second is resampled.
const MPS_SAMPLE_INTERVAL: Duration = Duration::from_millis(1000);
/// How often the reaper thread checks for expired sequences.
const REAPER_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Outcome delivered to a sequence's completion channel.
#[derive(Debug)]
pub struct SequenceOutcome {
    /// The SID this outcome is for.
    pub sid: u8,
    /// Caller-supplied tag, echoed back unchanged.
    pub tag: Option<String>,
    /// Round-trip time, if the sequence completed (successfully or not).
    pub round_trip: Option<Duration>,
    /// The parsed response, present only on successful completion.
    pub response: Option<FinsResponse>,
    /// The error, present on timeout/transport/protocol failure.
    pub error: Option<FinsError>,
}

/// Where a sequence's outcome is delivered.
pub enum Completion {
    /// A one-shot callback supplied by the caller of a specific operation.
    Callback(Box<dyn FnOnce(SequenceOutcome) + Send>),
    /// Broadcast to the engine's shared event channel.
    Broadcast(std::sync::mpsc::Sender<SequenceOutcome>),
}

impl Completion {
    fn deliver(self, outcome: SequenceOutcome) {
        match self {
            Completion::Callback(f) => f(outcome),
            Completion::Broadcast(tx) => {
                let _ = tx.send(outcome);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Complete,
    TimedOut,
    Error,
}

struct Entry {
    tag: Option<String>,
    created_at: Instant,
    sent_at: Option<Instant>,
    deadline: Instant,
    state: State,
    completion: Option<Completion>,
}

/// Rolling statistics over completed sequences.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Total number of successful completions.
    pub reply_count: u64,
    /// Total number of PLC-level or protocol errors.
    pub error_count: u64,
    /// Total number of timeouts.
    pub timeout_count: u64,
    window: VecDeque<u64>,
    msg_counter: u64,
    msg_per_sec: f64,
    last_sample: Instant,
    started_at: Instant,
}

impl Statistics {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            reply_count: 0,
            error_count: 0,
            timeout_count: 0,
            window: VecDeque::with_capacity(STATS_WINDOW),
            msg_counter: 0,
            msg_per_sec: 0.0,
            last_sample: now,
            started_at: now,
        }
    }

    fn record_round_trip(&mut self, ms: u64) {
        if self.window.len() == STATS_WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(ms);
        self.msg_counter += 1;
        self.maybe_resample();
    }

    fn maybe_resample(&mut self) {
        let elapsed = self.last_sample.elapsed();
        if elapsed >= MPS_SAMPLE_INTERVAL {
            self.msg_per_sec = self.msg_counter as f64 / elapsed.as_secs_f64();
            self.msg_counter = 0;
            self.last_sample = Instant::now();
        }
    }

    /// Average reply time in milliseconds over the rolling window.
    pub fn average_reply_ms(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<u64>() as f64 / self.window.len() as f64
    }

    /// Minimum reply time in the rolling window.
    pub fn min_reply_ms(&self) -> Option<u64> {
        self.window.iter().min().copied()
    }

    /// Maximum reply time in the rolling window.
    pub fn max_reply_ms(&self) -> Option<u64> {
        self.window.iter().max().copied()
    }

    /// Messages per second, resampled every 1000ms.
    pub fn messages_per_second(&self) -> f64 {
        self.msg_per_sec
    }

    /// Time since the manager (and its statistics) was created.
    pub fn runtime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

struct Inner {
    capacity: usize,
    sequences: Mutex<HashMap<u8, Entry>>,
    stats: Mutex<Statistics>,
    stop: AtomicBool,
}

/// Allocates Service IDs and tracks the lifecycle of in-flight FINS
/// transactions.
pub struct SequenceManager {
    inner: Arc<Inner>,
    next_sid: AtomicU8,
    reaper: Option<thread::JoinHandle<()>>,
}

impl SequenceManager {
    /// Creates a new manager with the given maximum number of concurrent
    /// in-flight sequences, and starts its background timeout reaper.
    pub fn new(capacity: usize) -> Self {
        let inner = Arc::new(Inner {
            capacity,
            sequences: Mutex::new(HashMap::new()),
            stats: Mutex::new(Statistics::new()),
            stop: AtomicBool::new(false),
        });

        let reaper_inner = Arc::clone(&inner);
        let reaper = thread::spawn(move || {
            while !reaper_inner.stop.load(Ordering::Relaxed) {
                thread::sleep(REAPER_POLL_INTERVAL);
                reap_expired(&reaper_inner);
            }
        });

        Self {
            inner,
            next_sid: AtomicU8::new(0),
            reaper: Some(reaper),
        }
    }

    /// Allocates the next Service ID in the range `1..=254`, wrapping
    /// around. Does not itself check for collisions with in-flight
    /// sequences — [`Self::add`] rejects those with [`FinsError::SidInUse`].
    pub fn next_sid(&self) -> u8 {
        loop {
            let current = self.next_sid.load(Ordering::Relaxed);
            let next = (current % MAX_SID) + 1;
            if self
                .next_sid
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return next;
            }
        }
    }

    /// Number of sequences that are neither complete, timed out, nor errored.
    pub fn active_count(&self) -> usize {
        self.inner
            .sequences
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.state == State::Pending)
            .count()
    }

    /// Remaining admission capacity.
    pub fn free_space(&self) -> usize {
        self.inner.capacity.saturating_sub(self.active_count())
    }

    /// Registers a new in-flight sequence.
    ///
    /// # Errors
    ///
    /// Returns [`FinsError::QueueFull`] if at capacity, or
    /// [`FinsError::SidInUse`] if `sid` already names a non-terminal
    /// sequence.
    pub fn add(
        &self,
        sid: u8,
        timeout: Duration,
        tag: Option<String>,
        completion: Completion,
    ) -> Result<(), FinsError> {
        let mut sequences = self.inner.sequences.lock().unwrap();
        if self.active_count_locked(&sequences) >= self.inner.capacity {
            return Err(FinsError::QueueFull);
        }
        if let Some(existing) = sequences.get(&sid) {
            if existing.state == State::Pending {
                return Err(FinsError::SidInUse(sid));
            }
        }
        let now = Instant::now();
        sequences.insert(
            sid,
            Entry {
                tag,
                created_at: now,
                sent_at: None,
                deadline: now + timeout,
                state: State::Pending,
                completion: Some(completion),
            },
        );
        Ok(())
    }

    fn active_count_locked(&self, sequences: &HashMap<u8, Entry>) -> usize {
        sequences.values().filter(|e| e.state == State::Pending).count()
    }

    /// Records that the transport accepted the write for `sid`.
    pub fn confirm_sent(&self, sid: u8) {
        if let Some(entry) = self.inner.sequences.lock().unwrap().get_mut(&sid) {
            entry.sent_at = Some(Instant::now());
        }
    }

    /// Marks `sid` complete and delivers `response` via its completion
    /// channel.
    pub fn done(&self, sid: u8, response: FinsResponse) {
        self.finish(sid, State::Complete, Some(response), None);
    }

    /// Marks `sid` errored and delivers `err` via its completion channel.
    pub fn set_error(&self, sid: u8, err: FinsError) {
        self.finish(sid, State::Error, None, Some(err));
    }

    fn finish(
        &self,
        sid: u8,
        state: State,
        response: Option<FinsResponse>,
        error: Option<FinsError>,
    ) {
        let entry = {
            let mut sequences = self.inner.sequences.lock().unwrap();
            sequences.get_mut(&sid).map(|e| {
                e.state = state;
                Entry {
                    tag: e.tag.clone(),
                    created_at: e.created_at,
                    sent_at: e.sent_at,
                    deadline: e.deadline,
                    state,
                    completion: e.completion.take(),
                }
            })
        };

        let Some(entry) = entry else { return };
        let round_trip = Some(entry.created_at.elapsed());

        {
            let mut stats = self.inner.stats.lock().unwrap();
            match state {
                State::Complete => {
                    stats.reply_count += 1;
                    stats.record_round_trip(round_trip.unwrap().as_millis() as u64);
                }
                State::Error => stats.error_count += 1,
                State::TimedOut => stats.timeout_count += 1,
                State::Pending => {}
            }
        }

        if let Some(completion) = entry.completion {
            completion.deliver(SequenceOutcome {
                sid,
                tag: entry.tag,
                round_trip,
                response,
                error,
            });
        }

        self.remove(sid);
    }

    /// Removes `sid`'s bookkeeping entry, freeing the slot for reuse.
    pub fn remove(&self, sid: u8) {
        self.inner.sequences.lock().unwrap().remove(&sid);
    }

    /// Snapshot of current statistics.
    pub fn statistics(&self) -> Statistics {
        self.inner.stats.lock().unwrap().clone()
    }

    /// Cancels every pending sequence without delivering completions, and
    /// stops the background reaper.
    pub fn close(&self) {
        self.inner.sequences.lock().unwrap().clear();
    }
}

fn reap_expired(inner: &Arc<Inner>) {
    let expired: Vec<u8> = {
        let sequences = inner.sequences.lock().unwrap();
        let now = Instant::now();
        sequences
            .iter()
            .filter(|(_, e)| e.state == State::Pending && now >= e.deadline)
            .map(|(sid, _)| *sid)
            .collect()
    };

    for sid in expired {
        let entry = {
            let mut sequences = inner.sequences.lock().unwrap();
            sequences.get_mut(&sid).map(|e| {
                e.state = State::TimedOut;
                Entry {
                    tag: e.tag.clone(),
                    created_at: e.created_at,
                    sent_at: e.sent_at,
                    deadline: e.deadline,
                    state: State::TimedOut,
                    completion: e.completion.take(),
                }
            })
        };
        let Some(entry) = entry else { continue };

        {
            let mut stats = inner.stats.lock().unwrap();
            stats.timeout_count += 1;
        }

        if let Some(completion) = entry.completion {
            completion.deliver(SequenceOutcome {
                sid,
                tag: entry.tag,
                round_trip: Some(entry.created_at.elapsed()),
                response: None,
                error: Some(FinsError::Timeout),
            });
        }

        inner.sequences.lock().unwrap().remove(&sid);
    }
}

impl Drop for SequenceManager {
    fn drop(&mut self) {
        self.inner.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.reaper.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_sid_allocation_wraps() {
        let mgr = SequenceManager::new(10);
        assert_eq!(mgr.next_sid(), 1);
        for _ in 0..(MAX_SID as usize - 1) {
            mgr.next_sid();
        }
        assert_eq!(mgr.next_sid(), MAX_SID);
        assert_eq!(mgr.next_sid(), 1);
    }

    #[test]
    fn test_add_and_done_delivers_callback() {
        let mgr = SequenceManager::new(10);
        let (tx, rx) = mpsc::channel();
        mgr.add(
            1,
            Duration::from_secs(5),
            Some("tag".into()),
            Completion::Callback(Box::new(move |outcome| {
                tx.send(outcome).unwrap();
            })),
        )
        .unwrap();
        assert_eq!(mgr.active_count(), 1);

        let response_bytes = [
            0xC0, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x0A, 0x00, 0x01, 0x01, 0x01, 0x00, 0x00,
        ];
        let response = crate::response::FinsResponse::from_bytes(&response_bytes).unwrap();
        mgr.done(1, response);

        let outcome = rx.recv().unwrap();
        assert_eq!(outcome.sid, 1);
        assert_eq!(outcome.tag.as_deref(), Some("tag"));
        assert!(outcome.response.is_some());
        assert_eq!(mgr.active_count(), 0);
    }

    #[test]
    fn test_sid_in_use_rejected() {
        let mgr = SequenceManager::new(10);
        mgr.add(1, Duration::from_secs(5), None, Completion::Callback(Box::new(|_| {})))
            .unwrap();
        let result = mgr.add(1, Duration::from_secs(5), None, Completion::Callback(Box::new(|_| {})));
        assert!(matches!(result, Err(FinsError::SidInUse(1))));
    }

    #[test]
    fn test_queue_full_rejected() {
        let mgr = SequenceManager::new(1);
        mgr.add(1, Duration::from_secs(5), None, Completion::Callback(Box::new(|_| {})))
            .unwrap();
        let result = mgr.add(2, Duration::from_secs(5), None, Completion::Callback(Box::new(|_| {})));
        assert!(matches!(result, Err(FinsError::QueueFull)));
    }

    #[test]
    fn test_timeout_delivers_via_reaper() {
        let mgr = SequenceManager::new(10);
        let (tx, rx) = mpsc::channel();
        mgr.add(
            1,
            Duration::from_millis(10),
            None,
            Completion::Callback(Box::new(move |outcome| {
                tx.send(outcome).unwrap();
            })),
        )
        .unwrap();

        let outcome = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(outcome.error, Some(FinsError::Timeout)));
        assert_eq!(mgr.active_count(), 0);
    }

    #[test]
    fn test_statistics_track_reply_count() {
        let mgr = SequenceManager::new(10);
        mgr.add(1, Duration::from_secs(5), None, Completion::Callback(Box::new(|_| {})))
            .unwrap();
        let response_bytes = [
            0xC0, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x0A, 0x00, 0x01, 0x01, 0x01, 0x00, 0x00,
        ];
        let response = crate::response::FinsResponse::from_bytes(&response_bytes).unwrap();
        mgr.done(1, response);
        let stats = mgr.statistics();
        assert_eq!(stats.reply_count, 1);
        assert!(stats.average_reply_ms() >= 0.0);
    }
}
