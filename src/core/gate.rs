//! # Counting admission gate.
//!
//! [`AdmissionGate`] wraps a [`tokio::sync::Semaphore`] and limits how many
//! critical sections run at once. It is instrumented: `in_use()` reports the
//! current holders and `peak()` the highest count ever observed.
//!
//! ## Rules
//! - at most `permits()` holders at any instant
//! - waiters are admitted in the semaphore's FIFO order
//! - a [`GatePermit`] releases its slot when dropped
//! - the gate is never closed; gates live as long as the scheduler

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Instrumented counting semaphore.
#[derive(Debug)]
pub struct AdmissionGate {
    permits: usize,
    sem: Arc<Semaphore>,
    in_use: Arc<AtomicUsize>,
    peak: AtomicUsize,
}

/// A held slot of an [`AdmissionGate`].
#[derive(Debug)]
pub struct GatePermit {
    in_use: Arc<AtomicUsize>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl AdmissionGate {
    /// Creates a gate with `permits` slots (clamped to at least 1).
    pub fn new(permits: usize) -> Self {
        let permits = permits.max(1);
        Self {
            permits,
            sem: Arc::new(Semaphore::new(permits)),
            in_use: Arc::new(AtomicUsize::new(0)),
            peak: AtomicUsize::new(0),
        }
    }

    /// Waits for a free slot.
    pub async fn acquire(&self) -> GatePermit {
        let permit = Arc::clone(&self.sem).acquire_owned().await.ok();
        let now = self.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        GatePermit {
            in_use: Arc::clone(&self.in_use),
            _permit: permit,
        }
    }

    /// Capacity of the gate.
    #[inline]
    pub fn permits(&self) -> usize {
        self.permits
    }

    /// Number of slots currently held.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::SeqCst)
    }

    /// Highest number of slots ever held at once.
    #[inline]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        // counter drops before the semaphore slot is returned
        self.in_use.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peak_never_exceeds_permits() {
        let gate = Arc::new(AdmissionGate::new(2));
        let mut set = tokio::task::JoinSet::new();
        for _ in 0..5 {
            let gate = gate.clone();
            set.spawn(async move {
                let _p = gate.acquire().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
        while set.join_next().await.is_some() {}

        assert_eq!(gate.peak(), 2);
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn test_zero_permits_clamped() {
        assert_eq!(AdmissionGate::new(0).permits(), 1);
    }
}
