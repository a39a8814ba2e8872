//! Error types used by the scheduler and the strategy runner.
//!
//! This module defines two error enums:
//!
//! - [`SchedulerError`]: a submission could not be accepted by an execution lane.
//! - [`RuntimeError`]: errors raised while shutting the harness down.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Work items themselves are infallible: writing and reading a poster cannot fail.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced when submitting work.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The lane was closed by a shutdown and no longer accepts tasks.
    #[error("lane '{lane}' is closed")]
    LaneClosed {
        /// Label of the execution context that rejected the task.
        lane: &'static str,
    },
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use posterswap::SchedulerError;
    ///
    /// let err = SchedulerError::LaneClosed { lane: "serial" };
    /// assert_eq!(err.as_label(), "scheduler_lane_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::LaneClosed { .. } => "scheduler_lane_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SchedulerError::LaneClosed { lane } => format!("lane closed: {lane}"),
        }
    }
}

/// # Errors produced by the harness runtime.
///
/// These represent failures of the orchestration itself,
/// such as a shutdown sequence exceeding its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some tasks were still running.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Tasks (`run/task`) that had started but not finished in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use posterswap::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck tasks={stuck:?}")
            }
        }
    }
}
