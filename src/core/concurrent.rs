//! # Multi-lane executor with barrier support.
//!
//! [`ConcurrentLane`] runs submitted jobs side by side. A single dispatcher
//! task pulls submissions in FIFO order and hands each one a guard on a
//! reader/writer lock before spawning it:
//!
//! ```text
//! submit(job)          ──► [mpsc] ──► dispatcher ──► read guard  ──► spawn(job)
//! submit_barrier(job)  ──►             (FIFO)     ──► write guard ──► spawn(job)
//! ```
//!
//! ## Rules
//! - Ordinary jobs share the lock: no ordering, no mutual exclusion.
//! - A barrier job waits for every earlier job to finish (drain), then runs
//!   alone; jobs submitted after it are not dispatched until it has finished.
//! - Optional lane width: at most `width` ordinary jobs execute at once.
//! - After the closing token fires, queued jobs still dispatch and the worker
//!   exits once every spawned job has finished.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{
    sync::{RwLock, Semaphore, mpsc},
    task::{JoinHandle, JoinSet},
};
use tokio_util::sync::CancellationToken;

use crate::core::ExecContext;
use crate::core::lane::Job;
use crate::error::SchedulerError;

enum Submission {
    Task(Job),
    Barrier(Job),
}

/// Handle to the multi-lane executor. Cheap to clone.
#[derive(Clone)]
pub(crate) struct ConcurrentLane {
    tx: mpsc::UnboundedSender<Submission>,
    closing: CancellationToken,
}

impl ConcurrentLane {
    /// Spawns the dispatcher and returns the lane handle plus the dispatcher's join handle.
    ///
    /// `width = None` leaves the number of simultaneous jobs to the tokio runtime.
    pub(crate) fn spawn(width: Option<usize>, closing: CancellationToken) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Submission>();
        let token = closing.clone();
        let exclusive = Arc::new(RwLock::new(()));
        let width = width.map(|n| Arc::new(Semaphore::new(n.max(1))));

        let dispatcher = tokio::spawn(async move {
            let mut running: JoinSet<()> = JoinSet::new();
            let mut closed = false;

            loop {
                let submission = tokio::select! {
                    biased;
                    sub = rx.recv() => match sub {
                        Some(sub) => sub,
                        None => break,
                    },
                    Some(_) = running.join_next(), if !running.is_empty() => continue,
                    _ = token.cancelled(), if !closed => {
                        rx.close();
                        closed = true;
                        continue;
                    }
                };

                match submission {
                    Submission::Task(job) => {
                        let guard = Arc::clone(&exclusive).read_owned().await;
                        let width = width.clone();
                        running.spawn(async move {
                            let _slot = match width {
                                Some(sem) => sem.acquire_owned().await.ok(),
                                None => None,
                            };
                            let _ = std::panic::AssertUnwindSafe(job).catch_unwind().await;
                            drop(guard);
                        });
                    }
                    Submission::Barrier(job) => {
                        let guard = Arc::clone(&exclusive).write_owned().await;
                        running.spawn(async move {
                            let _ = std::panic::AssertUnwindSafe(job).catch_unwind().await;
                            drop(guard);
                        });
                    }
                }
            }

            while running.join_next().await.is_some() {}
        });

        (Self { tx, closing }, dispatcher)
    }

    /// Enqueues an ordinary job (non-blocking).
    pub(crate) fn submit(&self, job: Job) -> Result<(), SchedulerError> {
        self.send(Submission::Task(job))
    }

    /// Enqueues a barrier job (non-blocking).
    pub(crate) fn submit_barrier(&self, job: Job) -> Result<(), SchedulerError> {
        self.send(Submission::Barrier(job))
    }

    fn send(&self, sub: Submission) -> Result<(), SchedulerError> {
        let closed = SchedulerError::LaneClosed {
            lane: ExecContext::Concurrent.as_label(),
        };
        if self.closing.is_cancelled() {
            return Err(closed);
        }
        self.tx.send(sub).map_err(|_| closed)
    }
}
