//! Star identifiers and the shared id allocator.
//!
//! Ids are handed out from a single [`StarIdAllocator`] that the host creates
//! at startup and shares (via `Arc`) with every [`StarFactory`](crate::StarFactory).
//! Hydrated stars reserve their id so later fresh stars never collide.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier of a star within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(pub u32);

impl From<u32> for StarId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every `u32` id has been handed out or reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("star id space exhausted")]
pub struct IdsExhausted;

/// Monotonic, thread-safe star id allocator.
///
/// The counter is wider than [`StarId`] so that reserving `u32::MAX` still
/// moves it past every valid id instead of wrapping.
#[derive(Debug, Default)]
pub struct StarIdAllocator {
    next: AtomicU64,
}

impl StarIdAllocator {
    /// Creates an allocator whose first id is 0.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Hands out the next id, or fails once every id is taken.
    pub fn allocate(&self) -> Result<StarId, IdsExhausted> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                (next <= u64::from(u32::MAX)).then_some(next + 1)
            })
            .map(|id| StarId(id as u32))
            .map_err(|_| IdsExhausted)
    }

    /// Advances the counter past `id`. Never moves it backwards, so hydration
    /// order does not matter.
    pub fn reserve(&self, id: StarId) {
        self.next
            .fetch_max(u64::from(id.0) + 1, Ordering::Relaxed);
    }

    /// The id the next call to [`allocate`](Self::allocate) would return,
    /// `None` when the id space is exhausted.
    pub fn peek(&self) -> Option<StarId> {
        u32::try_from(self.next.load(Ordering::Relaxed))
            .ok()
            .map(StarId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allocates_sequentially_from_zero() {
        let ids = StarIdAllocator::new();
        assert_eq!(ids.allocate(), Ok(StarId(0)));
        assert_eq!(ids.allocate(), Ok(StarId(1)));
        assert_eq!(ids.peek(), Some(StarId(2)));
    }

    #[test]
    fn test_reserve_advances_past_hydrated_id() {
        let ids = StarIdAllocator::new();
        ids.reserve(StarId(5));
        assert_eq!(ids.allocate(), Ok(StarId(6)));
    }

    #[test]
    fn test_reserve_never_decreases() {
        let ids = StarIdAllocator::new();
        ids.reserve(StarId(10));
        ids.reserve(StarId(3));
        assert_eq!(ids.peek(), Some(StarId(11)));
    }

    #[test]
    fn test_reserving_max_id_exhausts_instead_of_wrapping() {
        let ids = StarIdAllocator::new();
        ids.reserve(StarId(u32::MAX));

        assert_eq!(ids.peek(), None);
        assert_eq!(ids.allocate(), Err(IdsExhausted));
        assert_eq!(ids.allocate(), Err(IdsExhausted));
    }

    #[test]
    fn test_last_id_is_allocatable_once() {
        let ids = StarIdAllocator::new();
        ids.reserve(StarId(u32::MAX - 1));

        assert_eq!(ids.allocate(), Ok(StarId(u32::MAX)));
        assert_eq!(ids.allocate(), Err(IdsExhausted));
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let ids = StarIdAllocator::new();
        let mut seen = HashSet::new();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| (0..250).map(|_| ids.allocate().unwrap()).collect::<Vec<_>>()))
                .collect();
            for handle in handles {
                for id in handle.join().unwrap() {
                    assert!(seen.insert(id), "duplicate id {id}");
                }
            }
        });

        assert_eq!(seen.len(), 1000);
    }
}
