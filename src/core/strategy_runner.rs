//! # StrategyRunner: the command surface the presentation layer talks to.
//!
//! The [`StrategyRunner`] owns the selected [`ConcurrencyStrategy`], the
//! [`Scheduler`], the event bus and the subscriber fan-out.
//!
//! ## Key responsibilities
//! - keep exactly one active strategy and cycle through the ring on request
//! - build the canned work items for the active strategy and hand them to the scheduler
//! - publish `ScenarioCompleted` when a run's completion callback fires
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - drain the lanes on shutdown within [`Config::grace`]
//!
//! ## High-level architecture
//! ```text
//! UI command ──► advance_strategy()   ──► current = current.next()  ──► StrategyChanged
//!            └─► run_fixed_scenario() ──► scenario(current)
//!                                           └─► Scheduler::run(current, items, on_complete)
//!                                                  └─► lanes ─► PosterStore (write, sleep, read)
//!                                                  └─► on_complete ─► ScenarioCompleted
//!
//! Event flow:
//!   lanes ── publish(Event) ──► Bus ──► listener ──► InFlightTracker::update
//!                                              └──► SubscriberSet::emit ──► UI / LogWriter
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use posterswap::{Config, Poster, StrategyRunner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { latency_unit: Duration::ZERO, ..Config::default() };
//!     let runner = StrategyRunner::builder(cfg).build();
//!
//!     assert_eq!(runner.current_strategy().as_label(), "no queue");
//!     runner.run_fixed_scenario().await?;
//!     assert_eq!(runner.store().read(), Poster::Nemo);
//!
//!     assert_eq!(runner.advance_strategy(), "main thread queue");
//!     runner.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time;

use crate::{
    config::Config,
    core::{Scheduler, builder::RunnerBuilder},
    error::{RuntimeError, SchedulerError},
    events::{Bus, Event, EventKind},
    posters::{Poster, PosterStore, WorkItem},
    strategies::ConcurrencyStrategy,
    subscribers::{InFlightTracker, SubscriberSet},
};

/// Orchestrates scheduler runs for the currently selected strategy.
pub struct StrategyRunner {
    cfg: Config,
    bus: Bus,
    scheduler: Scheduler,
    current: Mutex<ConcurrencyStrategy>,
    tracker: Arc<InFlightTracker>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl StrategyRunner {
    /// Creates a builder with the given configuration.
    pub fn builder(cfg: Config) -> RunnerBuilder {
        RunnerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        scheduler: Scheduler,
        tracker: Arc<InFlightTracker>,
    ) -> Self {
        Self {
            cfg,
            bus,
            scheduler,
            current: Mutex::new(ConcurrencyStrategy::default()),
            tracker,
            listener: Mutex::new(None),
        }
    }

    /// Returns the active strategy.
    pub fn current_strategy(&self) -> ConcurrencyStrategy {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves to the next strategy in the ring and returns its display label.
    ///
    /// Work already submitted keeps running under the strategy it was submitted with.
    pub fn advance_strategy(&self) -> &'static str {
        let next = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            *current = current.next().with_permits(self.cfg.gate_permits_clamped());
            *current
        };
        self.bus
            .publish(Event::new(EventKind::StrategyChanged).with_reason(next.as_label()));
        next.as_label()
    }

    /// Canned work items for `strategy`.
    ///
    /// Latencies are in units of [`Config::latency_unit`]; the single-item
    /// scenarios target the poster that differs from the current one.
    pub fn scenario(&self, strategy: ConcurrencyStrategy) -> Vec<WorkItem> {
        let at = |poster: Poster, units: u32| WorkItem::new(poster, self.cfg.latency(units));
        match strategy {
            ConcurrencyStrategy::NoQueue
            | ConcurrencyStrategy::MainThreadOnly
            | ConcurrencyStrategy::SingleBackgroundWorker => {
                vec![at(self.scheduler.store().other(), 3)]
            }
            ConcurrencyStrategy::SerialQueue => {
                vec![at(Poster::Madagascar, 10), at(Poster::Nemo, 5)]
            }
            ConcurrencyStrategy::ConcurrentQueue => {
                vec![at(Poster::Shrek, 10), at(Poster::Nemo, 15)]
            }
            ConcurrencyStrategy::ConcurrentQueueWithBarrier => {
                vec![at(Poster::Shrek, 10), at(Poster::Nemo, 5)]
            }
            ConcurrencyStrategy::ConcurrentQueueWithSemaphore { .. }
            | ConcurrencyStrategy::TaskGroupJoin => {
                vec![at(Poster::Madagascar, 10), at(Poster::Nemo, 5)]
            }
            ConcurrencyStrategy::TaskGroupJoinOverCollection => Poster::ALL
                .iter()
                .zip(0..)
                .map(|(poster, units)| at(*poster, units))
                .collect(),
        }
    }

    /// Runs the canned scenario of the active strategy.
    ///
    /// With [`ConcurrencyStrategy::NoQueue`] the work is done (and the store
    /// updated) when this returns; otherwise the outcome arrives later as
    /// `PosterChanged` / `ScenarioCompleted` events.
    pub async fn run_fixed_scenario(&self) -> Result<u64, SchedulerError> {
        let strategy = self.current_strategy();
        let items = self.scenario(strategy);
        self.dispatch(strategy, items).await
    }

    /// Runs caller-supplied items under the active strategy.
    pub async fn run_with(&self, items: Vec<WorkItem>) -> Result<u64, SchedulerError> {
        self.dispatch(self.current_strategy(), items).await
    }

    async fn dispatch(
        &self,
        strategy: ConcurrencyStrategy,
        items: Vec<WorkItem>,
    ) -> Result<u64, SchedulerError> {
        let bus = self.bus.clone();
        let store = Arc::clone(self.scheduler.store());
        self.scheduler
            .run(strategy, items, move |done| {
                bus.publish(
                    Event::new(EventKind::ScenarioCompleted)
                        .with_run(done.run)
                        .with_context(done.context)
                        .with_poster(store.read()),
                );
            })
            .await
    }

    /// Shared store the scenarios mutate.
    pub fn store(&self) -> &Arc<PosterStore> {
        self.scheduler.store()
    }

    /// Event bus; subscribe to observe progress.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Underlying scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Closes every lane and waits up to [`Config::grace`] for queued work to drain.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`] with the tasks still running.
    ///
    /// Subscribers see the final event before this returns; afterwards the
    /// listener and the subscriber workers have exited.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.scheduler.close();

        let grace = self.cfg.grace;
        let res = match time::timeout(grace, self.scheduler.join()).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                let stuck = self.tracker.snapshot().await;
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        };
        self.stop_listener().await;
        res
    }

    /// Waits (up to the grace period) for the listener to flush subscribers and exit.
    async fn stop_listener(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut handle) = handle {
            if time::timeout(self.cfg.grace, &mut handle).await.is_err() {
                handle.abort();
            }
        }
    }

    /// Subscribes to the bus and forwards events to the tracker and subscribers.
    ///
    /// The listener owns the subscriber set and shuts it down after forwarding
    /// the terminal shutdown event.
    pub(crate) fn subscriber_listener(&self, set: SubscriberSet) {
        let mut rx = self.bus.subscribe();
        let tracker = Arc::clone(&self.tracker);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        tracker.update(&ev).await;
                        set.emit(&ev);
                        if matches!(
                            ev.kind,
                            EventKind::AllStoppedWithin | EventKind::GraceExceeded
                        ) {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        });
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }
}
