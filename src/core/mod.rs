//! Runtime core: execution resources and orchestration.
//!
//! The public surface is [`StrategyRunner`] (built through [`RunnerBuilder`])
//! plus the coordination primitives it is made of.
//!
//! Internal modules:
//! - [`lane`]: serial FIFO lane (one job at a time);
//! - [`concurrent`]: multi-lane pool with barrier jobs and optional width cap;
//! - [`runner`]: executes one work item and publishes its progress;
//! - [`scheduler`]: maps a strategy onto lanes, gates and the join group;
//! - [`strategy_runner`]: active strategy, canned scenarios, shutdown;
//! - [`shutdown`]: OS termination signals.

mod builder;
mod concurrent;
mod context;
mod gate;
mod group;
mod lane;
mod runner;
mod scheduler;
mod shutdown;
mod strategy_runner;

pub use builder::RunnerBuilder;
pub use context::ExecContext;
pub use gate::{AdmissionGate, GatePermit};
pub use group::JoinGroup;
pub use scheduler::{Completion, Scheduler};
pub use shutdown::shutdown_signal;
pub use strategy_runner::StrategyRunner;
