//! # Single-lane executor.
//!
//! A [`SerialLane`] is one tokio task draining an unbounded FIFO queue, one job at
//! a time. The harness runs two of them: the interactive context and the serial
//! executor (background worker, serial queue, join follow-up).
//!
//! ```text
//! submit(job) ──► [unbounded mpsc] ──► worker: job.await; next job.await; ...
//! ```
//!
//! ## Rules
//! - `submit()` never blocks
//! - jobs run strictly in submission order, never two at once
//! - after the closing token fires, queued jobs still drain, new ones are rejected

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::core::ExecContext;
use crate::error::SchedulerError;

/// A unit submitted to a lane.
pub(crate) type Job = BoxFuture<'static, ()>;

/// Handle to a single-lane executor. Cheap to clone.
#[derive(Clone)]
pub(crate) struct SerialLane {
    ctx: ExecContext,
    tx: mpsc::UnboundedSender<Job>,
    closing: CancellationToken,
}

impl SerialLane {
    /// Spawns the lane worker and returns its handle plus the worker's join handle.
    pub(crate) fn spawn(ctx: ExecContext, closing: CancellationToken) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let token = closing.clone();

        let worker = tokio::spawn(async move {
            let mut closed = false;
            loop {
                tokio::select! {
                    biased;
                    job = rx.recv() => match job {
                        // a panicking job never takes the lane down with it
                        Some(job) => { let _ = std::panic::AssertUnwindSafe(job).catch_unwind().await; }
                        None => break,
                    },
                    _ = token.cancelled(), if !closed => {
                        rx.close();
                        closed = true;
                    }
                }
            }
        });
        (Self { ctx, tx, closing }, worker)
    }

    /// Execution context tag of this lane.
    #[inline]
    pub(crate) fn context(&self) -> ExecContext {
        self.ctx
    }

    /// Enqueues a job (non-blocking).
    pub(crate) fn submit(&self, job: Job) -> Result<(), SchedulerError> {
        if self.closing.is_cancelled() {
            return Err(self.closed());
        }
        self.tx.send(job).map_err(|_| self.closed())
    }

    fn closed(&self) -> SchedulerError {
        SchedulerError::LaneClosed {
            lane: self.ctx.as_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_jobs_run_in_submission_order() {
        let (lane, worker) = SerialLane::spawn(ExecContext::Serial, CancellationToken::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        for (i, ms) in [(1, 20u64), (2, 1), (3, 5)] {
            let order = order.clone();
            lane.submit(Box::pin(async move {
                order.lock().unwrap().push(format!("start {i}"));
                tokio::time::sleep(Duration::from_millis(ms)).await;
                order.lock().unwrap().push(format!("end {i}"));
            }))
            .unwrap();
        }
        let (tx, rx) = oneshot::channel();
        lane.submit(Box::pin(async move {
            let _ = tx.send(());
        }))
        .unwrap();
        rx.await.unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec!["start 1", "end 1", "start 2", "end 2", "start 3", "end 3"]
        );
        drop(lane);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_lane_drains_then_rejects() {
        let token = CancellationToken::new();
        let (lane, worker) = SerialLane::spawn(ExecContext::Interactive, token.clone());
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        lane.submit(Box::pin(async move {
            *flag.lock().unwrap() = true;
        }))
        .unwrap();

        token.cancel();
        let err = lane.submit(Box::pin(async {})).unwrap_err();
        assert_eq!(err, SchedulerError::LaneClosed { lane: "interactive" });

        worker.await.unwrap();
        assert!(*ran.lock().unwrap(), "queued job must drain before the worker exits");
    }

    #[tokio::test]
    async fn test_panicking_job_keeps_lane_alive() {
        let (lane, _worker) = SerialLane::spawn(ExecContext::Serial, CancellationToken::new());
        lane.submit(Box::pin(async {
            if true {
                panic!("job blew up");
            }
        }))
        .unwrap();

        let (tx, rx) = oneshot::channel();
        lane.submit(Box::pin(async move {
            let _ = tx.send(7);
        }))
        .unwrap();
        assert_eq!(rx.await.unwrap(), 7);
    }
}
