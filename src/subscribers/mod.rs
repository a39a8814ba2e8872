//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and built-in subscribers for events broadcast through the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! lanes ── publish(Event) ──► Bus ──► runner listener
//!                                        │
//!                                        ├──► SubscriberSet::emit(&Event)
//!                                        │         │
//!                                        │    ┌────┴─────┬──────────┐
//!                                        │    ▼          ▼          ▼
//!                                        │  LogWriter  PosterView  Custom
//!                                        │
//!                                        └──► InFlightTracker (stuck-task detection)
//! ```

mod in_flight;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use in_flight::InFlightTracker;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
