//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for the demo or when debugging a strategy.
//!
//! ## Example output
//! ```text
//! [strategy] now=serial queue
//! [submitted] run=4 task=1 on=serial target=madagascar latency=10000ms
//! [starting] run=4 task=1 on=serial
//! [written] run=4 task=1 on=serial poster=madagascar
//! [changed] run=4 task=1 on=serial poster=madagascar
//! [finished] run=4 task=1 on=serial
//! [group-notified] run=8 on=serial
//! [completed] run=4 on=serial poster=nemo
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// `run=.. task=.. on=..` prefix shared by task-scoped lines.
fn scope(e: &Event) -> String {
    let mut out = String::new();
    if let Some(run) = e.run {
        out.push_str(&format!(" run={run}"));
    }
    if let Some(task) = e.task {
        out.push_str(&format!(" task={task}"));
    }
    if let Some(ctx) = e.context {
        out.push_str(&format!(" on={ctx}"));
    }
    out
}

fn poster(e: &Event) -> &'static str {
    e.poster.map(|p| p.as_label()).unwrap_or("?")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskSubmitted => {
                println!(
                    "[submitted]{} target={} latency={}ms",
                    scope(e),
                    poster(e),
                    e.latency_ms.unwrap_or(0)
                );
            }
            EventKind::TaskStarting => println!("[starting]{}", scope(e)),
            EventKind::GateAcquired => println!("[gate-acquired]{}", scope(e)),
            EventKind::TaskFinished => println!("[finished]{}", scope(e)),
            EventKind::PosterWritten => println!("[written]{} poster={}", scope(e), poster(e)),
            EventKind::PosterChanged => println!("[changed]{} poster={}", scope(e), poster(e)),
            EventKind::GroupEntered => println!("[group-entered]{}", scope(e)),
            EventKind::GroupLeft => println!("[group-left]{}", scope(e)),
            EventKind::GroupNotified => println!("[group-notified]{}", scope(e)),
            EventKind::ScenarioCompleted => {
                println!("[completed]{} poster={}", scope(e), poster(e));
            }
            EventKind::StrategyChanged => {
                println!("[strategy] now={}", e.reason.as_deref().unwrap_or("unknown"));
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] {}",
                    e.reason.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] {}",
                    e.reason.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::ShutdownRequested => println!("[shutdown-requested]"),
            EventKind::AllStoppedWithin => println!("[all-stopped-within-grace]"),
            EventKind::GraceExceeded => println!("[grace-exceeded]"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
