//! # posterswap
//!
//! **Posterswap** is a small concurrency harness: one shared value (the poster
//! currently shown) and nine interchangeable ways of scheduling the tasks that
//! mutate it.
//!
//! Every task does the same thing: write a poster into the [`PosterStore`],
//! wait out its latency, read the store back and report what it saw. Only the
//! scheduling discipline changes, so the outcome of a run shows how each
//! strategy orders (or fails to order) access to shared state.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   UI / caller
//!        │ advance_strategy() / run_fixed_scenario() / run_with(items)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  StrategyRunner                                                   │
//! │  - active ConcurrencyStrategy (ring of nine)                      │
//! │  - canned scenarios                                               │
//! │  - InFlightTracker + SubscriberSet (via bus listener)             │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  interactive lane │ serial lane │ concurrent lane │ gates │ group │
//! └──────┬────────────────────┬───────────────┬───────────────────────┘
//!        ▼                    ▼               ▼
//!   write ─► sleep(latency) ─► read       PosterStore (shared, unlocked)
//!        │
//!        │ TaskStarting / PosterWritten / PosterChanged / TaskFinished
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                       Bus (broadcast channel)                     │
//! │                   (capacity: Config::bus_capacity)                │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                     ┌──────────────────────┐
//!                     │ subscriber_listener  │
//!                     └───┬──────────────┬───┘
//!                         ▼              ▼
//!                 InFlightTracker   SubscriberSet ─► worker per subscriber
//! ```
//!
//! ### Strategies
//! | Strategy                        | Where items run                | Completion                       |
//! |---------------------------------|--------------------------------|----------------------------------|
//! | no queue                        | inline, caller waits           | inline                           |
//! | main thread queue               | interactive lane               | interactive lane, after items    |
//! | background thread queue         | serial lane                    | serial lane, after items         |
//! | serial queue                    | serial lane, FIFO              | serial lane, after items         |
//! | concurrent queue                | concurrent lane, racing        | last finisher                    |
//! | concurrent queue with barrier   | first item runs alone          | last finisher                    |
//! | concurrent queue with semaphore | critical sections behind gate  | last finisher                    |
//! | task group                      | concurrent lane, gated bodies  | serial lane once group is empty  |
//! | task group over collection      | one member per item            | serial lane once group is empty  |
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Orchestration** | Select a strategy and run scenarios under it.            | [`StrategyRunner`], [`ConcurrencyStrategy`] |
//! | **Primitives**    | Counting gate and join coordinator.                      | [`AdmissionGate`], [`JoinGroup`]           |
//! | **Subscriber API**| Observe poster changes and task lifecycle.               | [`Subscribe`], [`Event`]                   |
//! | **Errors**        | Typed errors for submission and shutdown.                | [`SchedulerError`], [`RuntimeError`]       |
//! | **Configuration** | Latency unit, gate width, lane width, grace period.      | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use posterswap::{Config, ConcurrencyStrategy, EventKind, StrategyRunner};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { latency_unit: Duration::from_millis(1), ..Config::default() };
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn posterswap::Subscribe>> = vec![Arc::new(posterswap::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn posterswap::Subscribe>> = Vec::new();
//!
//!     let runner = StrategyRunner::builder(cfg).with_subscribers(subs).build();
//!     while runner.current_strategy() != ConcurrencyStrategy::SerialQueue {
//!         runner.advance_strategy();
//!     }
//!
//!     let mut rx = runner.bus().subscribe();
//!     let run = runner.run_fixed_scenario().await?;
//!     loop {
//!         let ev = rx.recv().await?;
//!         if ev.kind == EventKind::ScenarioCompleted && ev.is_run(run) {
//!             println!("run {run} ended showing {:?}", ev.poster);
//!             break;
//!         }
//!     }
//!
//!     runner.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod posters;
mod strategies;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_GATE_PERMITS};
pub use core::{
    AdmissionGate, Completion, ExecContext, GatePermit, JoinGroup, RunnerBuilder, Scheduler,
    StrategyRunner, shutdown_signal,
};
pub use error::{RuntimeError, SchedulerError};
pub use events::{Bus, Event, EventKind};
pub use posters::{Poster, PosterStore, WorkItem};
pub use strategies::ConcurrencyStrategy;
pub use subscribers::{InFlightTracker, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
