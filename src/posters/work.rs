//! # Unit of work for the poster store.
//!
//! A [`WorkItem`] writes its target into the shared store, waits out its
//! simulated latency, then reads the store back for display. Any write issued
//! by another task during the wait shows up in that read: the classic
//! read-after-delayed-write race.
//!
//! Execution lives in the scheduler (`core::runner`), which brackets each item
//! with progress events; the item itself is plain data.

use std::time::Duration;

use super::Poster;

/// Immutable `(target, latency)` pair, consumed once by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    target: Poster,
    latency: Duration,
}

impl WorkItem {
    /// Creates a work item.
    pub fn new(target: Poster, latency: Duration) -> Self {
        Self { target, latency }
    }

    /// Creates a work item whose latency is given in milliseconds.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use posterswap::{Poster, WorkItem};
    ///
    /// let item = WorkItem::millis(Poster::Nemo, 5);
    /// assert_eq!(item.latency(), Duration::from_millis(5));
    /// ```
    pub fn millis(target: Poster, ms: u64) -> Self {
        Self::new(target, Duration::from_millis(ms))
    }

    /// Poster written into the store.
    #[inline]
    pub fn target(&self) -> Poster {
        self.target
    }

    /// Time between the write and the read-back.
    #[inline]
    pub fn latency(&self) -> Duration {
        self.latency
    }
}
