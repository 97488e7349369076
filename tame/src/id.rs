//! Monotonic identifier source.
//!
//! Identifiers are handed out in strictly increasing order and never reused. A
//! generator is shared between registries through an [`Arc`](std::sync::Arc) so
//! that every registry drawing from it names its nodes uniquely.
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first identifier is `0`.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a generator whose first identifier is `first`.
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate the next identifier.
    #[inline]
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Identifier that the next call to [`Self::next_id`] will return.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Iterator for &IdGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, sync::Arc, thread};

    use super::*;

    #[test]
    fn identifiers_are_monotonic() {
        let ids = IdGenerator::starting_at(5);
        assert_eq!(ids.next_id(), 5);
        assert_eq!(ids.next_id(), 6);
        assert_eq!((&ids).take(3).collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(ids.peek(), 10);
    }

    #[test]
    fn identifiers_are_unique_across_threads() {
        let ids = Arc::new(IdGenerator::new());
        let handles = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..100).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();

        let mut seen = BTreeSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "identifier {id} handed out twice");
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
