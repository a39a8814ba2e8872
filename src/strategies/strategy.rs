//! # Concurrency strategies.
//!
//! [`ConcurrencyStrategy`] selects how the scheduler dispatches a run. The nine
//! variants form a ring: [`ConcurrencyStrategy::next`] walks it in a fixed order
//! and wraps from the last back to the first.
//!
//! ```text
//! NoQueue ─► MainThreadOnly ─► SingleBackgroundWorker ─► SerialQueue ─► ConcurrentQueue
//!    ▲                                                                        │
//!    │                                                                        ▼
//! TaskGroupJoinOverCollection ◄─ TaskGroupJoin ◄─ ConcurrentQueueWithSemaphore ◄─ ConcurrentQueueWithBarrier
//! ```

use std::fmt;

use crate::config::DEFAULT_GATE_PERMITS;

/// Discipline applied by the scheduler to one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ConcurrencyStrategy {
    /// Run inline on the caller; the caller waits out the full latency.
    #[default]
    NoQueue,
    /// Queue on the interactive context; completion runs there too.
    MainThreadOnly,
    /// Queue on the dedicated background worker (FIFO, one at a time).
    SingleBackgroundWorker,
    /// Queue every item, in call order, on the single-lane executor.
    SerialQueue,
    /// Queue every item on the multi-lane executor; no ordering, no exclusion.
    ConcurrentQueue,
    /// First item runs as a barrier on the multi-lane executor, the rest concurrently.
    ConcurrentQueueWithBarrier,
    /// Every critical section passes an admission gate of `permits` capacity.
    ConcurrentQueueWithSemaphore {
        /// Maximum number of critical sections in flight.
        permits: usize,
    },
    /// Items enter/leave the join group; the notify handler fires once all have left.
    TaskGroupJoin,
    /// Same join discipline, over a collection of any length.
    TaskGroupJoinOverCollection,
}

impl ConcurrencyStrategy {
    /// Number of strategies in the ring.
    pub const COUNT: usize = 9;

    /// Returns the successor in the ring, wrapping around after the last variant.
    ///
    /// The semaphore variant is entered with the default gate capacity.
    ///
    /// # Example
    /// ```
    /// use posterswap::ConcurrencyStrategy;
    ///
    /// let mut s = ConcurrencyStrategy::default();
    /// for _ in 0..ConcurrencyStrategy::COUNT {
    ///     s = s.next();
    /// }
    /// assert_eq!(s, ConcurrencyStrategy::NoQueue);
    /// ```
    pub fn next(self) -> Self {
        use ConcurrencyStrategy::*;
        match self {
            NoQueue => MainThreadOnly,
            MainThreadOnly => SingleBackgroundWorker,
            SingleBackgroundWorker => SerialQueue,
            SerialQueue => ConcurrentQueue,
            ConcurrentQueue => ConcurrentQueueWithBarrier,
            ConcurrentQueueWithBarrier => ConcurrentQueueWithSemaphore {
                permits: DEFAULT_GATE_PERMITS,
            },
            ConcurrentQueueWithSemaphore { .. } => TaskGroupJoin,
            TaskGroupJoin => TaskGroupJoinOverCollection,
            TaskGroupJoinOverCollection => NoQueue,
        }
    }

    /// Replaces the gate capacity of the semaphore variant; other variants are returned as is.
    pub fn with_permits(self, permits: usize) -> Self {
        match self {
            ConcurrencyStrategy::ConcurrentQueueWithSemaphore { .. } => {
                ConcurrencyStrategy::ConcurrentQueueWithSemaphore {
                    permits: permits.max(1),
                }
            }
            other => other,
        }
    }

    /// Returns the human-readable label shown next to the strategy button.
    pub fn as_label(self) -> &'static str {
        use ConcurrencyStrategy::*;
        match self {
            NoQueue => "no queue",
            MainThreadOnly => "main thread queue",
            SingleBackgroundWorker => "background thread queue",
            SerialQueue => "serial queue",
            ConcurrentQueue => "concurrent queue",
            ConcurrentQueueWithBarrier => "concurrent queue with barrier",
            ConcurrentQueueWithSemaphore { .. } => "concurrent queue with semaphore",
            TaskGroupJoin => "task group",
            TaskGroupJoinOverCollection => "task group over collection",
        }
    }
}

impl fmt::Display for ConcurrencyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_closes_after_count_steps() {
        let mut s = ConcurrencyStrategy::default();
        let mut seen = Vec::new();
        for _ in 0..ConcurrencyStrategy::COUNT {
            seen.push(s);
            s = s.next();
        }
        assert_eq!(s, ConcurrencyStrategy::NoQueue);

        // every step lands on a distinct strategy
        for (i, a) in seen.iter().enumerate() {
            for b in &seen[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_ring_closes_from_any_start() {
        let mut start = ConcurrencyStrategy::default();
        for _ in 0..ConcurrencyStrategy::COUNT {
            let mut s = start;
            for _ in 0..ConcurrencyStrategy::COUNT {
                s = s.next();
            }
            assert_eq!(s, start, "ring broken starting at {start}");
            start = start.next();
        }
    }

    #[test]
    fn test_semaphore_carries_default_permits() {
        let s = ConcurrencyStrategy::ConcurrentQueueWithBarrier.next();
        assert_eq!(
            s,
            ConcurrencyStrategy::ConcurrentQueueWithSemaphore { permits: 2 }
        );
        assert_eq!(
            s.with_permits(4),
            ConcurrencyStrategy::ConcurrentQueueWithSemaphore { permits: 4 }
        );
        assert_eq!(
            ConcurrencyStrategy::SerialQueue.with_permits(4),
            ConcurrencyStrategy::SerialQueue
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(ConcurrencyStrategy::NoQueue.as_label(), "no queue");
        assert_eq!(
            ConcurrencyStrategy::TaskGroupJoinOverCollection.to_string(),
            "task group over collection"
        );
    }
}
