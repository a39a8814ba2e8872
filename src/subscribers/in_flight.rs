//! # In-flight task tracker with sequence-based ordering.
//!
//! Maintains which tasks have started and not yet finished, using event
//! sequence numbers to handle out-of-order delivery.
//!
//! ## Architecture
//! ```text
//! lanes ──► Bus ──► runner listener ──► InFlightTracker::update()
//!                                              │
//!                                              ▼
//!                        running: HashMap<(run, task), seq>
//!                        finished: last FINISHED_RETAINED (run, task, seq)
//! ```
//!
//! ## Rules
//! - Only `TaskStarting` / `TaskFinished` change the running state
//! - A finished task leaves the running map; its id stays in a bounded
//!   ring so a late `TaskStarting` is still recognized as stale
//! - Events with `seq <= last_seq` for the same task are **rejected** (stale)
//! - Read operations (`snapshot`, `is_running`) are **eventually consistent**

use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;

use crate::events::{Event, EventKind};

/// How many finished task ids are remembered for stale-event rejection.
pub(crate) const FINISHED_RETAINED: usize = 256;

#[derive(Default)]
struct TrackerState {
    running: HashMap<(u64, u32), u64>,
    finished: VecDeque<((u64, u32), u64)>,
}

impl TrackerState {
    fn last_seq(&self, key: (u64, u32)) -> Option<u64> {
        self.running.get(&key).copied().or_else(|| {
            self.finished
                .iter()
                .rev()
                .find(|(k, _)| *k == key)
                .map(|(_, seq)| *seq)
        })
    }
}

/// Thread-safe tracker of running tasks, keyed by `(run, task)`.
#[derive(Default)]
pub struct InFlightTracker {
    state: RwLock<TrackerState>,
}

impl InFlightTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates task state if the event is newer than the last one seen for that task.
    ///
    /// ```text
    /// update(TaskFinished, seq=100) → not running, remembered as finished at 100
    /// update(TaskStarting, seq=99)  → rejected (stale)
    /// ```
    ///
    /// Returns `true` if the running state changed.
    pub async fn update(&self, ev: &Event) -> bool {
        let (Some(run), Some(task)) = (ev.run, ev.task) else {
            return false;
        };
        let key = (run, task);
        let starting = match ev.kind {
            EventKind::TaskStarting => true,
            EventKind::TaskFinished => false,
            _ => return false,
        };

        let mut state = self.state.write().await;
        if state.last_seq(key).is_some_and(|last| ev.seq <= last) {
            return false;
        }
        if starting {
            state.running.insert(key, ev.seq);
        } else {
            state.running.remove(&key);
            state.finished.retain(|(k, _)| *k != key);
            if state.finished.len() == FINISHED_RETAINED {
                state.finished.pop_front();
            }
            state.finished.push_back((key, ev.seq));
        }
        true
    }

    /// Returns the sorted list of running tasks as `run/task` strings.
    ///
    /// Used by the runner to name stuck tasks when shutdown exceeds its grace period.
    pub async fn snapshot(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut keys: Vec<(u64, u32)> = state.running.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter()
            .map(|(run, task)| format!("{run}/{task}"))
            .collect()
    }

    /// Returns true if the task has started and not finished.
    pub async fn is_running(&self, run: u64, task: u32) -> bool {
        self.state.read().await.running.contains_key(&(run, task))
    }

    /// Number of task ids currently held (running plus remembered finished).
    pub(crate) async fn retained(&self) -> usize {
        let state = self.state.read().await;
        state.running.len() + state.finished.len()
    }
}
