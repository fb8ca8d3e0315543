//! Entity lock table
//!
//! A mutating operation names every entity it will read-check-write and holds
//! all of them for the duration. Acquisition is all-or-nothing: a caller never
//! holds one entity while waiting for another, so two concurrent cross-follows
//! (A→B and B→A) cannot deadlock.

use rapport_domain::{AccountId, ContentId};
use std::collections::BTreeSet;
use std::sync::{Condvar, Mutex, PoisonError};

/// An entity that can be locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    /// An account document
    Account(AccountId),
    /// A content item document
    Content(ContentId),
}

/// Table of currently held entity locks
#[derive(Debug, Default)]
pub struct EntityLocks {
    held: Mutex<BTreeSet<EntityKey>>,
    released: Condvar,
}

impl EntityLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every key is free, then hold them all
    ///
    /// Duplicate keys are collapsed. The returned scope releases the keys when
    /// dropped.
    pub fn acquire(&self, keys: &[EntityKey]) -> LockScope<'_> {
        let mut keys = keys.to_vec();
        keys.sort();
        keys.dedup();

        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while keys.iter().any(|key| held.contains(key)) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.extend(keys.iter().copied());

        LockScope { table: self, keys }
    }

    /// Number of keys currently held
    pub fn held_count(&self) -> usize {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Keys held by one operation
#[derive(Debug)]
pub struct LockScope<'a> {
    table: &'a EntityLocks,
    keys: Vec<EntityKey>,
}

impl LockScope<'_> {
    /// Keys held by this scope, ascending
    pub fn keys(&self) -> &[EntityKey] {
        &self.keys
    }
}

impl Drop for LockScope<'_> {
    fn drop(&mut self) {
        let mut held = self.table.held.lock().unwrap_or_else(PoisonError::into_inner);
        for key in &self.keys {
            held.remove(key);
        }
        drop(held);
        self.table.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn account(value: u128) -> EntityKey {
        EntityKey::Account(AccountId::from_value(value))
    }

    #[test]
    fn test_scope_releases_on_drop() {
        let locks = EntityLocks::new();
        {
            let scope = locks.acquire(&[account(2), account(1), account(2)]);
            assert_eq!(scope.keys(), &[account(1), account(2)]);
            assert_eq!(locks.held_count(), 2);
        }
        assert_eq!(locks.held_count(), 0);
    }

    #[test]
    fn test_disjoint_scopes_coexist() {
        let locks = EntityLocks::new();
        let _a = locks.acquire(&[account(1)]);
        let _b = locks.acquire(&[account(2), EntityKey::Content(ContentId::from_value(1))]);
        assert_eq!(locks.held_count(), 3);
    }

    #[test]
    fn test_overlapping_scopes_are_exclusive() {
        let locks = EntityLocks::new();
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for i in 0..8 {
                let locks = &locks;
                let inside = &inside;
                let max_inside = &max_inside;
                s.spawn(move || {
                    // Every pair overlaps on account 0, half of them in reverse order
                    let keys = if i % 2 == 0 {
                        [account(0), account(i + 1)]
                    } else {
                        [account(i + 1), account(0)]
                    };
                    for _ in 0..50 {
                        let _scope = locks.acquire(&keys);
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.held_count(), 0);
    }
}
