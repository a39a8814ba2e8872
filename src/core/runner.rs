//! # Execute one work item, publishing progress events to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! plain:   TaskStarting → PosterWritten → [sleep latency] → PosterChanged → TaskFinished
//! gated:   TaskStarting → (gate) GateAcquired → PosterWritten → ... → TaskFinished → (release)
//! grouped: (gate) GateAcquired → TaskStarting → PosterWritten → ... → TaskFinished → (release) → GroupLeft
//! ```
//!
//! ## Rules
//! - right after the write the store is read and published as `PosterWritten`
//!   (title refresh); another task may already have overwritten it
//! - the read happens after the latency and is published as `PosterChanged`;
//!   it reflects whatever the store holds at that moment, not the item's target
//! - gated items publish `TaskFinished` while still holding their permit

use std::sync::Arc;

use tokio::time;

use crate::{
    core::{AdmissionGate, ExecContext},
    events::{Bus, Event, EventKind},
    posters::{Poster, PosterStore, WorkItem},
};

/// Identity and collaborators of one task of one run.
#[derive(Clone)]
pub(crate) struct TaskScope {
    pub bus: Bus,
    pub store: Arc<PosterStore>,
    pub run: u64,
    pub task: u32,
    pub ctx: ExecContext,
}

impl TaskScope {
    /// Builds an event tagged with this task's run, number and context.
    pub(crate) fn event(&self, kind: EventKind) -> Event {
        Event::new(kind)
            .with_run(self.run)
            .with_task(self.task)
            .with_context(self.ctx)
    }

    #[inline]
    pub(crate) fn publish(&self, kind: EventKind) {
        self.bus.publish(self.event(kind));
    }
}

/// Write the target, wait out the latency, read the store back.
async fn swap_poster(scope: &TaskScope, item: WorkItem) -> Poster {
    scope.store.write(item.target());
    let title = scope.store.read();
    scope
        .bus
        .publish(scope.event(EventKind::PosterWritten).with_poster(title));

    if !item.latency().is_zero() {
        time::sleep(item.latency()).await;
    }

    let shown = scope.store.read();
    scope
        .bus
        .publish(scope.event(EventKind::PosterChanged).with_poster(shown));
    shown
}

/// Runs an item with no admission control.
pub(crate) async fn run_item(scope: &TaskScope, item: WorkItem) -> Poster {
    scope.publish(EventKind::TaskStarting);
    let shown = swap_poster(scope, item).await;
    scope.publish(EventKind::TaskFinished);
    shown
}

/// Runs an item whose critical section (write + delayed read) passes `gate`.
///
/// The task is announced before it queues at the gate, so starts may interleave
/// freely; only the critical sections are bounded.
pub(crate) async fn run_gated(scope: &TaskScope, item: WorkItem, gate: &AdmissionGate) -> Poster {
    scope.publish(EventKind::TaskStarting);
    let permit = gate.acquire().await;
    scope.publish(EventKind::GateAcquired);
    let shown = swap_poster(scope, item).await;
    scope.publish(EventKind::TaskFinished);
    drop(permit);
    shown
}

/// Runs a join-group member: the whole task body sits behind `gate`.
///
/// The caller publishes `GroupLeft` and leaves the group afterwards.
pub(crate) async fn run_grouped(scope: &TaskScope, item: WorkItem, gate: &AdmissionGate) -> Poster {
    let permit = gate.acquire().await;
    scope.publish(EventKind::GateAcquired);
    let shown = run_item(scope, item).await;
    drop(permit);
    shown
}
