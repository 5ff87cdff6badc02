//! Generation counter for city lookups.
//!
//! Every lookup takes a token when it starts; only the result carrying the
//! newest token may update what the user sees. Used by App.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one lookup. Later lookups compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

impl QueryToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Hands out tokens and remembers the newest one.
#[derive(Debug, Default)]
pub struct QueryTracker {
    latest: AtomicU64,
}

impl QueryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new lookup, superseding every earlier token.
    pub fn begin(&self) -> QueryToken {
        QueryToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no lookup was started after `token`.
    pub fn is_current(&self, token: QueryToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Pass `value` through only if `token` is still current.
    pub fn accept<T>(&self, token: QueryToken, value: T) -> Option<T> {
        self.is_current(token).then_some(value)
    }
}
