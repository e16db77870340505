use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    mem,
};

use crate::hashing;

/// Default number of buckets when none (or a smaller count) is requested
const DEFAULT_CAPACITY: usize = 11;

/// Default ratio of entries to buckets that triggers a resize
const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// A linked-list node holding one entry and owning the rest of its chain
#[derive(Debug)]
struct Node<K, V> {
    /// The key stored in the node
    key: K,
    /// The value associated with the key
    value: V,
    /// Hash of the key, cached at insertion so resizing never re-hashes
    hash: u64,
    /// The next node in the bucket's chain
    next: Option<Box<Node<K, V>>>,
}

/// Error returned by the validating [`ChainingMap`] constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested bucket count was zero
    InvalidCapacity,
    /// The requested load factor was not a positive finite number
    InvalidLoadFactor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity => write!(f, "capacity must be positive"),
            Self::InvalidLoadFactor => write!(f, "load factor must be positive and finite"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A hash map using separate chaining with singly linked buckets.
///
/// Each bucket owns a chain of nodes; a new entry is pushed to the front of
/// its bucket in constant time with no duplicate check, so equal keys
/// coexist as distinct entries and lookups see the most recently inserted
/// one first. The bucket array doubles once the entry count passes
/// `capacity * load_factor`; every node survives a resize, keeping multiset
/// semantics intact.
///
/// [`search`](Self::search) exposes a reference into a bucket; the borrow
/// checker keeps it from outliving the next mutation. [`find`](Self::find)
/// is the value-copying variant preferred for detached use.
///
/// Note: This implementation is not thread-safe. Callers needing shared
/// access must provide external synchronization around the whole map.
pub struct ChainingMap<K, V, S = RandomState> {
    /// Bucket heads; each bucket is an owned singly linked chain
    buckets: Vec<Option<Box<Node<K, V>>>>,
    /// Number of entries across all buckets
    len: usize,
    /// Configured ratio of entries to buckets that triggers doubling
    max_load_factor: f64,
    /// Entry count above which the bucket array doubles
    threshold: usize,
    /// Hasher factory shared by every lookup
    hasher: S,
}

impl<K, V> Default for ChainingMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainingMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> ChainingMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new `ChainingMap` with the default capacity and load factor
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates a new `ChainingMap` with the specified bucket count and the
    /// default load factor.
    ///
    /// The effective capacity never drops below the default of 11 buckets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_capacity_and_load_factor(DEFAULT_LOAD_FACTOR, capacity)
    }

    /// Creates a new `ChainingMap` with the specified load factor and bucket
    /// count.
    ///
    /// The effective capacity never drops below the default of 11 buckets;
    /// the resize threshold is `floor(capacity * load_factor)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] when `capacity` is zero, or
    /// [`ConfigError::InvalidLoadFactor`] when `load_factor` is not a
    /// positive finite number. No partially-built map is produced.
    pub fn with_capacity_and_load_factor(
        load_factor: f64,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if !load_factor.is_finite() || load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor);
        }
        Ok(Self::build(load_factor, capacity, RandomState::new()))
    }
}

impl<K, V, S> ChainingMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates a new `ChainingMap` with the default configuration and the
    /// given hasher factory
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(DEFAULT_LOAD_FACTOR, DEFAULT_CAPACITY, hasher)
    }

    /// Creates a new `ChainingMap` with the specified bucket count, the
    /// default load factor and the given hasher factory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(Self::build(DEFAULT_LOAD_FACTOR, capacity, hasher))
    }

    /// Builds a map from parameters the callers have already validated
    fn build(load_factor: f64, capacity: usize, hasher: S) -> Self {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, || None);
        Self {
            buckets,
            len: 0,
            max_load_factor: load_factor,
            threshold: Self::threshold_for(capacity, load_factor),
            hasher,
        }
    }

    /// Computes the entry count above which a bucket array of the given
    /// capacity doubles
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn threshold_for(capacity: usize, load_factor: f64) -> usize {
        (capacity as f64 * load_factor) as usize
    }

    /// Computes the hash for a key
    fn hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Inserts an entry at the front of its bucket's chain.
    ///
    /// Duplicate keys are permitted and coexist as distinct entries; lookups
    /// return the most recently inserted one. The bucket array doubles once
    /// the entry count passes the threshold, before the new entry's bucket
    /// is chosen, so the entry always lands in the post-resize table.
    pub fn insert(&mut self, key: K, value: V) {
        self.len = self.len.saturating_add(1);
        if self.len > self.threshold {
            self.resize();
        }

        let hash = self.hash(&key);
        let index = hashing::bucket_index(hash, self.buckets.len());
        if let Some(bucket) = self.buckets.get_mut(index) {
            let next = bucket.take();
            *bucket = Some(Box::new(Node { key, value, hash, next }));
        }
    }

    /// Removes the first entry matching `key`, walking its bucket's chain
    /// from the front.
    ///
    /// Only one entry is unlinked per call even when duplicates exist; the
    /// one removed is the most recently inserted. Returns the removed value,
    /// or `None` when the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = hashing::bucket_index(self.hash(key), self.buckets.len());
        let mut cursor = self.buckets.get_mut(index)?;
        loop {
            let matches = match cursor.as_ref() {
                None => return None,
                Some(node) => node.key.borrow() == key,
            };
            if matches {
                let node = cursor.take()?;
                *cursor = node.next;
                self.len = self.len.saturating_sub(1);
                return Some(node.value);
            }
            cursor = match cursor.as_mut() {
                Some(node) => &mut node.next,
                None => return None,
            };
        }
    }

    /// Returns a reference to the value of the first entry matching `key`,
    /// scanning its bucket's chain from the front.
    ///
    /// The reference points into the map's own storage; any following
    /// insert, remove or resize invalidates it, which the borrow checker
    /// enforces. Use [`find`](Self::find) to take a detached copy instead.
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = hashing::bucket_index(self.hash(key), self.buckets.len());
        let mut cursor = self.buckets.get(index)?.as_ref();
        while let Some(node) = cursor {
            if node.key.borrow() == key {
                return Some(&node.value);
            }
            cursor = node.next.as_ref();
        }
        None
    }

    /// Returns a copy of the value of the first entry matching `key`.
    ///
    /// The value-copying counterpart of [`search`](Self::search), safe to
    /// hold across later mutations of the map.
    pub fn find<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.search(key).cloned()
    }

    /// Returns every key in bucket-index order, most recently inserted
    /// first within each bucket
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        let mut all_keys = Vec::with_capacity(self.len);
        for bucket in &self.buckets {
            let mut cursor = bucket.as_ref();
            while let Some(node) = cursor {
                all_keys.push(node.key.clone());
                cursor = node.next.as_ref();
            }
        }
        all_keys
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets in the map
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the entry count above which the bucket array doubles
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the configured load factor the resize threshold derives from
    #[must_use]
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Returns the current ratio of entries to buckets
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Removes every entry, keeping the bucket array and configuration.
    ///
    /// Chains are unlinked iteratively, so arbitrarily long chains cannot
    /// overflow the stack through nested drops.
    pub fn clear(&mut self) {
        self.unlink_all();
        self.len = 0;
    }

    /// Returns an iterator over the entries, bucket by bucket, most
    /// recently inserted first within each bucket
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { buckets: self.buckets.iter(), cursor: None }
    }

    /// Doubles the bucket array and re-links every node by its stored hash.
    ///
    /// Nodes are detached first and re-linked oldest-first, so after the
    /// front-insertion rebuild each key's most recent entry is back in
    /// front of its chain and no entry is lost, duplicates included.
    fn resize(&mut self) {
        let new_capacity = self.buckets.len().saturating_mul(2);
        let mut new_buckets: Vec<Option<Box<Node<K, V>>>> = Vec::with_capacity(new_capacity);
        new_buckets.resize_with(new_capacity, || None);
        let old_buckets = mem::replace(&mut self.buckets, new_buckets);

        let mut detached: Vec<Box<Node<K, V>>> = Vec::with_capacity(self.len);
        for mut head in old_buckets {
            while let Some(mut node) = head {
                head = node.next.take();
                detached.push(node);
            }
        }

        for mut node in detached.into_iter().rev() {
            let index = hashing::bucket_index(node.hash, new_capacity);
            if let Some(bucket) = self.buckets.get_mut(index) {
                node.next = bucket.take();
                *bucket = Some(node);
            }
        }

        self.threshold = Self::threshold_for(new_capacity, self.max_load_factor);
    }
}

impl<K, V, S> ChainingMap<K, V, S> {
    /// Detaches and drops every chain iteratively, one node at a time
    fn unlink_all(&mut self) {
        for bucket in &mut self.buckets {
            let mut head = bucket.take();
            while let Some(mut node) = head {
                head = node.next.take();
            }
        }
    }
}

/// Releases every owned node exactly once, iteratively; the default
/// recursive drop of a boxed chain could overflow the stack on a long
/// bucket
impl<K, V, S> Drop for ChainingMap<K, V, S> {
    fn drop(&mut self) {
        self.unlink_all();
    }
}

/// Deep-copies every bucket and node, so the two maps own disjoint storage;
/// chain order and cached hashes are preserved
impl<K, V, S> Clone for ChainingMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut buckets = Vec::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            let mut copied: Option<Box<Node<K, V>>> = None;
            let mut tail = &mut copied;
            let mut cursor = bucket.as_ref();
            while let Some(node) = cursor {
                *tail = Some(Box::new(Node {
                    key: node.key.clone(),
                    value: node.value.clone(),
                    hash: node.hash,
                    next: None,
                }));
                tail = match tail {
                    Some(copied_node) => &mut copied_node.next,
                    None => break,
                };
                cursor = node.next.as_ref();
            }
            buckets.push(copied);
        }
        Self {
            buckets,
            len: self.len,
            max_load_factor: self.max_load_factor,
            threshold: self.threshold,
            hasher: self.hasher.clone(),
        }
    }
}

/// Renders each non-empty bucket index with its chain, front first
impl<K, V, S> fmt::Debug for ChainingMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (index, bucket) in self.buckets.iter().enumerate() {
            let mut chain = Vec::new();
            let mut cursor = bucket.as_ref();
            while let Some(node) = cursor {
                chain.push((&node.key, &node.value));
                cursor = node.next.as_ref();
            }
            if !chain.is_empty() {
                map.entry(&index, &chain);
            }
        }
        map.finish()
    }
}

/// Iterator over the entries of a [`ChainingMap`], bucket by bucket, most
/// recently inserted first within each bucket
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Buckets not yet visited
    buckets: std::slice::Iter<'a, Option<Box<Node<K, V>>>>,
    /// Position within the current bucket's chain
    cursor: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.cursor {
                self.cursor = node.next.as_deref();
                return Some((&node.key, &node.value));
            }
            match self.buckets.next() {
                Some(bucket) => self.cursor = bucket.as_deref(),
                None => return None,
            }
        }
    }
}
