//! Selection generations.
//!
//! Every user selection takes a [`Ticket`] from a shared [`Generations`]
//! counter. A ticket stays current only until the next one is issued, so an
//! in-flight lookup can tell that its result is stale and must not be shown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic source of selection tickets.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: Arc<AtomicU64>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn begin(&self) -> Ticket {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Id of the most recently issued ticket, 0 before the first.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Tag carried by one selection.
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    /// Ticket that is never superseded, for callers without selections.
    pub fn detached() -> Self {
        Generations::new().begin()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}
