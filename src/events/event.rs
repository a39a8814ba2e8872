//! # Progress events emitted by the scheduler and the strategy runner.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Task events**: one work item's life (submitted, starting, gate acquired, finished)
//! - **Store events**: the shared poster was written or read back for display
//! - **Group events**: join-group entries, leaves and the notify firing
//! - **Runtime events**: strategy switches, scenario completion, subscribers, shutdown
//!
//! The [`Event`] struct carries the metadata: run id, task number, execution
//! context, poster, latency, reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) taken when the event
//! is created, i.e. at the progress point itself. Sort by `seq` to recover the
//! order in which things happened across lanes.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use posterswap::{Event, EventKind, ExecContext, Poster};
//!
//! let ev = Event::new(EventKind::PosterChanged)
//!     .with_run(3)
//!     .with_task(1)
//!     .with_context(ExecContext::Serial)
//!     .with_poster(Poster::Nemo)
//!     .with_latency(Duration::from_millis(5));
//!
//! assert_eq!(ev.kind, EventKind::PosterChanged);
//! assert_eq!(ev.poster, Some(Poster::Nemo));
//! assert_eq!(ev.latency_ms, Some(5));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::ExecContext;
use crate::posters::Poster;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of harness events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task events ===
    /// A work item was handed to a lane (or is about to run inline).
    ///
    /// Sets: `run`, `task`, `context` (target lane), `poster` (target), `latency_ms`
    TaskSubmitted,

    /// A work item began executing.
    ///
    /// Sets: `run`, `task`, `context`
    TaskStarting,

    /// A work item was admitted by the counting gate and holds a permit.
    ///
    /// Sets: `run`, `task`, `context`
    GateAcquired,

    /// A work item finished executing (for gated items: before releasing the permit).
    ///
    /// Sets: `run`, `task`, `context`
    TaskFinished,

    // === Store events ===
    /// The item wrote its target into the store (title refresh).
    ///
    /// Sets: `run`, `task`, `context`, `poster` (written value)
    PosterWritten,

    /// The item read the store back after its latency (display refresh).
    ///
    /// Sets: `run`, `task`, `context`, `poster` (value read, may differ from target)
    PosterChanged,

    // === Group events ===
    /// An item entered the join group (at submission time).
    ///
    /// Sets: `run`, `task`
    GroupEntered,

    /// An item left the join group.
    ///
    /// Sets: `run`, `task`, `context`
    GroupLeft,

    /// The join group emptied and the notify handler ran on the follow-up context.
    ///
    /// Sets: `run`, `context`
    GroupNotified,

    // === Runtime events ===
    /// The selected strategy changed.
    ///
    /// Sets: `reason` (new strategy label)
    StrategyChanged,

    /// Every item of a run finished and its completion callback ran.
    ///
    /// Sets: `run`, `context`, `poster` (store value at completion)
    ScenarioCompleted,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `reason` (subscriber name and panic message)
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason` (subscriber name and "full"/"closed")
    SubscriberOverflow,

    /// Shutdown requested; lanes stop accepting work.
    ShutdownRequested,

    /// All lanes drained within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some tasks did not finish in time.
    GraceExceeded,
}

/// Harness event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Scheduler run the event belongs to.
    pub run: Option<u64>,
    /// Task number within the run (starting from 1).
    pub task: Option<u32>,
    /// Execution context the event was produced on.
    pub context: Option<ExecContext>,
    /// Poster written, read, or targeted.
    pub poster: Option<Poster>,
    /// Simulated latency in milliseconds (compact).
    pub latency_ms: Option<u32>,
    /// Human-readable reason (strategy labels, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            task: None,
            context: None,
            poster: None,
            latency_ms: None,
            reason: None,
        }
    }

    /// Attaches a run id.
    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    /// Attaches a task number.
    #[inline]
    pub fn with_task(mut self, task: u32) -> Self {
        self.task = Some(task);
        self
    }

    /// Attaches the execution context.
    #[inline]
    pub fn with_context(mut self, ctx: ExecContext) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Attaches a poster.
    #[inline]
    pub fn with_poster(mut self, poster: Poster) -> Self {
        self.poster = Some(poster);
        self
    }

    /// Attaches a latency (stored as milliseconds).
    #[inline]
    pub fn with_latency(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.latency_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    /// True if the event belongs to `run`.
    #[inline]
    pub fn is_run(&self, run: u64) -> bool {
        self.run == Some(run)
    }
}
