//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the
//! harness: the presentation layer refreshing its poster, a logger, a recorder in
//! tests. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they do **not** block the lanes nor other subscribers.
//! - Each subscriber declares its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** and `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use posterswap::{Event, EventKind, Subscribe};
//!
//! struct PosterView;
//!
//! #[async_trait]
//! impl Subscribe for PosterView {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::PosterChanged {
//!             // load the image asset for ev.poster ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "poster-view" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
