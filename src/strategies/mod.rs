//! Scheduling strategies.
//!
//! ## Contents
//! - [`ConcurrencyStrategy`] which discipline the scheduler applies to a run
//!
//! ## Quick wiring
//! ```text
//! StrategyRunner { current: ConcurrencyStrategy }
//!      ├─► advance_strategy()  → current = current.next()
//!      └─► run_fixed_scenario() → Scheduler::run(current, items, on_complete)
//!                                    └─► match strategy { ... }
//! ```

mod strategy;

pub use strategy::ConcurrencyStrategy;
