//! # The shared resource and the work that mutates it.
//!
//! - [`Poster`] - closed set of poster identifiers with a cyclic successor
//! - [`PosterStore`] - the single "current poster" cell shared by every task
//! - [`WorkItem`] - one delayed write-then-read against the store

mod poster;
mod store;
mod work;

pub use poster::Poster;
pub use store::PosterStore;
pub use work::WorkItem;
