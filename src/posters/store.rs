//! # Shared "current poster" cell.
//!
//! [`PosterStore`] holds exactly one [`Poster`] at any instant. Reads and writes
//! are single atomic assignments (no torn values), but nothing orders them
//! across tasks: relaxed loads may observe any write that raced with them.
//! Only the scheduling strategies impose an order.
//!
//! The store is passed to the scheduler as `Arc<PosterStore>`, so tests can
//! inject their own instance and inspect it after a run.

use std::sync::atomic::{AtomicU8, Ordering};

use super::Poster;

/// Unsynchronized single-value store.
#[derive(Debug)]
pub struct PosterStore {
    current: AtomicU8,
}

impl PosterStore {
    /// Creates a store holding `initial`.
    pub fn new(initial: Poster) -> Self {
        Self {
            current: AtomicU8::new(initial as u8),
        }
    }

    /// Unconditionally overwrites the current poster.
    #[inline]
    pub fn write(&self, poster: Poster) {
        self.current.store(poster as u8, Ordering::Relaxed);
    }

    /// Returns whatever is currently stored.
    #[inline]
    pub fn read(&self) -> Poster {
        Poster::from_repr(self.current.load(Ordering::Relaxed))
    }

    /// Returns a poster different from the current one (its successor).
    #[inline]
    pub fn other(&self) -> Poster {
        self.read().next()
    }
}

impl Default for PosterStore {
    fn default() -> Self {
        Self::new(Poster::Madagascar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_madagascar() {
        let store = PosterStore::default();
        assert_eq!(store.read(), Poster::Madagascar);
        assert_eq!(store.other(), Poster::Nemo);
    }

    #[test]
    fn test_write_overwrites() {
        let store = PosterStore::default();
        store.write(Poster::Shrek);
        assert_eq!(store.read(), Poster::Shrek);
        store.write(Poster::Nemo);
        assert_eq!(store.read(), Poster::Nemo);
    }
}
