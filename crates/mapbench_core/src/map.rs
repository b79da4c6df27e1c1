//! Shared map implementations under test.
//!
//! The load tests operate on any map that can be shared across threads
//! behind an `Arc`. This module defines that seam and provides the two
//! implementations the sweep compares: a sharded `DashMap` and a single
//! `RwLock<HashMap>` baseline.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;

use dashmap::DashMap;
use parking_lot::{RwLock, RwLockReadGuard};

/// Map operations exercised by the load tests.
///
/// All methods take `&self`; implementations are responsible for their own
/// interior synchronization.
pub trait SharedMap<K, V> {
    fn insert(&self, key: K, value: V);
    fn get(&self, key: &K) -> Option<impl Deref<Target = V>>;
    /// Copy every key out of the map.
    fn keys(&self) -> Vec<K>;
}

/// Returns a constructor for `DashMap`s with a fixed shard count.
///
/// The shard count must be a power of two.
pub fn dashmap_factory<K: Eq + Hash, V>(shards: usize) -> impl Fn() -> DashMap<K, V> {
    move || DashMap::with_capacity_and_hasher_and_shard_amount(0, RandomState::default(), shards)
}

/// Returns an empty `RwLock<HashMap>` baseline map.
pub fn rwlock_hashmap<K: Eq + Hash, V>() -> RwLock<HashMap<K, V>> {
    RwLock::new(HashMap::new())
}

impl<K: Eq + Hash + Clone, V> SharedMap<K, V> for DashMap<K, V> {
    fn insert(&self, key: K, value: V) {
        DashMap::insert(self, key, value);
    }

    fn get(&self, key: &K) -> Option<impl Deref<Target = V>> {
        DashMap::get(self, key)
    }

    fn keys(&self) -> Vec<K> {
        self.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<K: Eq + Hash + Clone, V> SharedMap<K, V> for RwLock<HashMap<K, V>> {
    fn insert(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    fn get(&self, key: &K) -> Option<impl Deref<Target = V>> {
        RwLockReadGuard::try_map(self.read(), |inner| inner.get(key)).ok()
    }

    fn keys(&self) -> Vec<K> {
        self.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(map: impl SharedMap<u64, u64>) {
        map.insert(1, 10);
        map.insert(2, 20);
        assert_eq!(map.get(&1).as_deref(), Some(&10));
        assert!(map.get(&3).is_none());

        let mut keys = map.keys();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 2]);
    }

    #[test]
    fn dashmap_implements_shared_map() {
        exercise(dashmap_factory(4)());
    }

    #[test]
    fn rwlock_hashmap_implements_shared_map() {
        exercise(rwlock_hashmap());
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let map = dashmap_factory::<u64, u64>(4)();
        map.insert(7, 1);
        map.insert(7, 2);
        assert_eq!(map.get(&7).as_deref(), Some(&2));
        assert_eq!(map.keys().len(), 1);
    }
}
