use crate::REQUEST_ID_BASE;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of request identifiers for one client.
///
/// Clones share the same counter, so two clients only draw from a common
/// sequence when one was explicitly handed a clone of the other's.
#[derive(Debug, Clone)]
pub struct RequestIdSequence {
    next: Arc<AtomicU64>,
}

impl RequestIdSequence {
    pub fn starting_at(base: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(base)),
        }
    }

    /// Claim the next identifier. Never hands the same value out twice.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Identifier the next call to [`next_id`](Self::next_id) would return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }

    pub fn reset(&self, base: u64) {
        self.next.store(base, Ordering::SeqCst);
    }
}

impl Default for RequestIdSequence {
    fn default() -> Self {
        Self::starting_at(REQUEST_ID_BASE)
    }
}
