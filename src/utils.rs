//! Utility functions and traits shared by the map implementations

use std::hash::{BuildHasher, Hash};

use crate::{ChainingMap, ProbingMap};

/// Extension trait providing convenience views over a map's contents
pub trait MapExtensions<K, V> {
    /// Returns the keys of the map as a `Vec`, in its natural traversal
    /// order
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the map as a `Vec`, in its natural traversal
    /// order
    fn values(&self) -> Vec<V>;

    /// Returns true if the map holds at least one entry for the given key
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}

impl<K, V, S> MapExtensions<K, V> for ProbingMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K, V, S> MapExtensions<K, V> for ChainingMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.search(key).is_some()
    }
}

/// Builds a map of any supported kind from an iterator of key-value pairs
pub fn from_iter<M, K, V, I>(iter: I) -> M
where
    M: Default + Extend<(K, V)>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = M::default();
    map.extend(iter);
    map
}
