//! # Join coordinator.
//!
//! [`JoinGroup`] counts outstanding entries and fires registered handlers once
//! the count drops back to zero.
//!
//! ```text
//! enter() ─► outstanding += 1
//! leave() ─► outstanding -= 1 ─► 0? ─► take waiters ─► call each (outside the lock)
//! notify(h) ─► outstanding == 0 ? call h now : park h in waiters
//! ```
//!
//! ## Rules
//! - every handler fires exactly once
//! - a handler parked by `notify` fires only after every entered item has left
//! - handlers run on the thread that performed the last `leave` (or the
//!   `notify` caller when nothing is outstanding); callers that need a specific
//!   context submit to a lane from inside the handler
//! - a `leave` without a matching `enter` is ignored

use std::sync::{Mutex, PoisonError};

type Handler = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct GroupState {
    outstanding: usize,
    waiters: Vec<Handler>,
}

/// Counter plus completion-waiters list guarded by a single lock.
#[derive(Default)]
pub struct JoinGroup {
    state: Mutex<GroupState>,
}

impl JoinGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one outstanding item.
    pub fn enter(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .outstanding += 1;
    }

    /// Marks one item as done; fires the parked handlers if it was the last one.
    pub fn leave(&self) {
        let ready = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.outstanding == 0 {
                return;
            }
            state.outstanding -= 1;
            if state.outstanding == 0 {
                std::mem::take(&mut state.waiters)
            } else {
                Vec::new()
            }
        };
        for handler in ready {
            handler();
        }
    }

    /// Registers a handler for the moment the group is empty.
    ///
    /// Fires immediately when nothing is outstanding.
    pub fn notify(&self, handler: impl FnOnce() + Send + 'static) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.outstanding == 0 {
            drop(state);
            handler();
        } else {
            state.waiters.push(Box::new(handler));
        }
    }

    /// Number of items that entered and have not left yet.
    pub fn outstanding(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .outstanding
    }
}
