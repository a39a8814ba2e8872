//! Progress events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to the events emitted by the scheduler lanes and the
//! strategy runner.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `core::runner` (task brackets, store events), `Scheduler`
//!   (submissions, group events), `StrategyRunner` (strategy switches, completion,
//!   shutdown), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the runner listener (fans out to `SubscriberSet` and updates
//!   `InFlightTracker`), plus anyone holding a `Bus::subscribe()` receiver.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
