use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    mem,
};

use crate::hashing;

/// Default number of slots for maps created through `new` (a prime, so the
/// growth sequence stays on primes from the start)
const DEFAULT_CAPACITY: usize = 17;

/// A slot holding one key-value entry together with its tombstone flag
#[derive(Debug, Clone)]
struct Slot<K, V> {
    /// The key stored in the slot
    key: K,
    /// The value associated with the key
    value: V,
    /// Flag marking the slot as a tombstone after removal
    deleted: bool,
}

/// What a probe scan stopped on
enum ProbeSlot {
    /// The scan ended on an empty slot at this index
    Empty(usize),
    /// The scan ended on a live entry holding the probed key
    Active(usize),
    /// The scan ended on a tombstone left by the probed key
    Tombstone(usize),
    /// The scan visited every slot without finding the key or an empty slot
    Exhausted,
}

/// Error returned by [`ProbingMap::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The key is already present; the probing map stores each key once and
    /// never overwrites
    DuplicateKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "key is already present in the map"),
        }
    }
}

impl std::error::Error for InsertError {}

/// A hash map using open addressing with linear probing.
///
/// Collisions are resolved by scanning forward one slot at a time from the
/// key's home index. Removed entries leave a tombstone that keeps the probe
/// sequence intact; tombstones are reclaimed either by re-inserting the same
/// key or by the full rebuild a resize performs. The slot array grows to the
/// next prime at least double the current capacity once more than half the
/// slots hold an entry or a tombstone.
///
/// Unlike [`ChainingMap`](crate::ChainingMap), inserting a key that is
/// already present is rejected rather than tolerated.
///
/// Note: This implementation is not thread-safe. Callers needing shared
/// access must provide external synchronization around the whole map.
#[derive(Clone)]
pub struct ProbingMap<K, V, S = RandomState> {
    /// The slots storing the key-value entries; `None` is an empty slot
    slots: Vec<Option<Slot<K, V>>>,
    /// Number of live entries (tombstones excluded)
    len: usize,
    /// Number of slots holding either a live entry or a tombstone; drives the
    /// resize trigger so tombstone build-up still forces a rebuild
    occupied: usize,
    /// Hasher factory shared by every lookup
    hasher: S,
}

impl<K, V> Default for ProbingMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Later pairs whose key is already present are skipped, matching the
/// duplicate rejection of `insert`
impl<K, V, S> Extend<(K, V)> for ProbingMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<K, V> ProbingMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new `ProbingMap` with the default initial capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new `ProbingMap` with the specified initial capacity.
    ///
    /// A requested capacity of zero is raised to one slot.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> ProbingMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates a new `ProbingMap` using the given hasher factory
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates a new `ProbingMap` with the specified initial capacity and
    /// hasher factory.
    ///
    /// A requested capacity of zero is raised to one slot.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let capacity = capacity.max(1);
        Self { slots: vec![None; capacity], len: 0, occupied: 0, hasher }
    }

    /// Computes the hash for a key
    fn hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Scans the probe sequence for `key`, stopping on the first empty slot
    /// or the first slot (live or tombstone) whose key equals `key`.
    /// Tombstones left by other keys never terminate the scan.
    fn linear_probe<Q>(&self, key: &Q) -> ProbeSlot
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let capacity = self.slots.len();
        let hash = self.hash(key);
        for step in 0..capacity {
            let index = hashing::probe_index(hash, step, capacity);
            let Some(entry) = self.slots.get(index) else {
                return ProbeSlot::Exhausted;
            };
            match entry {
                None => return ProbeSlot::Empty(index),
                Some(slot) if slot.key.borrow() == key => {
                    return if slot.deleted {
                        ProbeSlot::Tombstone(index)
                    } else {
                        ProbeSlot::Active(index)
                    };
                }
                Some(_) => {}
            }
        }
        ProbeSlot::Exhausted
    }

    /// Writes a live entry into the slot at `index`
    fn write_slot(&mut self, index: usize, key: K, value: V) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(Slot { key, value, deleted: false });
        }
    }

    /// Inserts a key-value entry.
    ///
    /// The entry lands on the first empty slot of its probe sequence, or
    /// reclaims the tombstone its own key left behind. After a successful
    /// insert the slot array grows once more than half the slots are
    /// occupied by entries or tombstones.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::DuplicateKey`] when `key` is already present;
    /// the map is left unchanged and the existing value is kept.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), InsertError> {
        loop {
            match self.linear_probe(&key) {
                ProbeSlot::Active(_) => return Err(InsertError::DuplicateKey),
                ProbeSlot::Empty(index) => {
                    self.write_slot(index, key, value);
                    self.occupied = self.occupied.saturating_add(1);
                    break;
                }
                ProbeSlot::Tombstone(index) => {
                    // Same key, so the slot stays on its probe sequence and
                    // the occupied count is unchanged
                    self.write_slot(index, key, value);
                    break;
                }
                ProbeSlot::Exhausted => self.resize(),
            }
        }
        self.len = self.len.saturating_add(1);
        if self.occupied > self.slots.len() / 2 {
            self.resize();
        }
        Ok(())
    }

    /// Retrieves a reference to the value stored for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let ProbeSlot::Active(index) = self.linear_probe(key) {
            if let Some(Some(slot)) = self.slots.get(index) {
                return Some(&slot.value);
            }
        }
        None
    }

    /// Retrieves a mutable reference to the value stored for `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let ProbeSlot::Active(index) = self.linear_probe(key) {
            if let Some(Some(slot)) = self.slots.get_mut(index) {
                return Some(&mut slot.value);
            }
        }
        None
    }

    /// Removes the entry stored for `key`, leaving a tombstone in its slot.
    ///
    /// The tombstone keeps the key in place so later probe scans pass over
    /// it instead of stopping early. Returns the removed value, or `None`
    /// when the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let ProbeSlot::Active(index) = self.linear_probe(key) {
            if let Some(Some(slot)) = self.slots.get_mut(index) {
                slot.deleted = true;
                self.len = self.len.saturating_sub(1);
                return Some(slot.value.clone());
            }
        }
        None
    }

    /// Returns the number of live entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the map
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current ratio of live entries to slots
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Removes every entry and tombstone, keeping the current capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
        self.occupied = 0;
    }

    /// Returns an iterator over the live entries in slot order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { slots: &self.slots, index: 0 }
    }

    /// Rebuilds the slot array at the next prime capacity at least double
    /// the current one, re-inserting every live entry in slot order.
    /// Tombstones are discarded, reclaiming their slots.
    fn resize(&mut self) {
        let new_capacity = hashing::next_prime(self.slots.len().saturating_mul(2));
        let old_slots = mem::replace(&mut self.slots, vec![None; new_capacity]);
        self.len = 0;
        self.occupied = 0;
        for slot in old_slots.into_iter().flatten() {
            if !slot.deleted {
                self.reinsert(slot.key, slot.value);
            }
        }
    }

    /// Probes and writes an entry during a rebuild; the keys re-inserted by
    /// `resize` are unique, so the scan always ends on an empty slot
    fn reinsert(&mut self, key: K, value: V) {
        if let ProbeSlot::Empty(index) = self.linear_probe(&key) {
            self.write_slot(index, key, value);
            self.occupied = self.occupied.saturating_add(1);
            self.len = self.len.saturating_add(1);
        }
    }
}

/// Renders the live entries as a map, in slot order; tombstones and empty
/// slots are omitted
impl<K, V, S> fmt::Debug for ProbingMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .slots
            .iter()
            .flatten()
            .filter(|slot| !slot.deleted)
            .map(|slot| (&slot.key, &slot.value));
        f.debug_map().entries(entries).finish()
    }
}

/// Iterator over the live entries of a [`ProbingMap`] in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// The slot array being walked
    slots: &'a [Option<Slot<K, V>>],
    /// Current position in the walk
    index: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.slots.get(self.index) {
            self.index = self.index.saturating_add(1);
            if let Some(slot) = entry {
                if !slot.deleted {
                    return Some((&slot.key, &slot.value));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::hash::Hasher;

    use super::*;

    /// Build-hasher handing out [`IdentityHasher`]s, for tests that need
    /// deterministic slot placement
    #[derive(Debug, Clone, Default)]
    struct IdentityState;

    /// Hasher echoing back the last integer written to it
    #[derive(Debug, Default)]
    struct IdentityHasher {
        /// The most recently written value
        state: u64,
    }

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.state
        }

        fn write(&mut self, bytes: &[u8]) {
            for &byte in bytes {
                self.state = self.state.wrapping_shl(8) | u64::from(byte);
            }
        }

        fn write_usize(&mut self, value: usize) {
            self.state = value as u64;
        }

        fn write_u64(&mut self, value: u64) {
            self.state = value;
        }
    }

    impl BuildHasher for IdentityState {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> Self::Hasher {
            IdentityHasher::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = ProbingMap::new();
        assert_eq!(map.insert("key1".to_string(), 1), Ok(()));
        assert_eq!(map.insert("key2".to_string(), 2), Ok(()));
        assert_eq!(map.insert("key3".to_string(), 3), Ok(()));

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut map = ProbingMap::new();
        assert_eq!(map.insert("key1".to_string(), 1), Ok(()));
        assert_eq!(map.insert("key1".to_string(), 10), Err(InsertError::DuplicateKey));

        // The original value survives the rejected insert
        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_then_search_misses() {
        let mut map = ProbingMap::new();
        map.insert("key1".to_string(), 1).ok();
        map.insert("key2".to_string(), 2).ok();

        assert_eq!(map.remove("key1"), Some(1));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.remove("key1"), None);
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut map = ProbingMap::new();
        map.insert("key1".to_string(), 1).ok();
        assert_eq!(map.remove("key1"), Some(1));

        assert_eq!(map.insert("key1".to_string(), 11), Ok(()));
        assert_eq!(map.get("key1"), Some(&11));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_probe_scan_passes_over_foreign_tombstones() {
        // Keys 0, 7 and 14 all share home index 0 at capacity 7
        let mut map = ProbingMap::with_capacity_and_hasher(7, IdentityState);
        map.insert(0_usize, "a").ok();
        map.insert(7_usize, "b").ok();
        map.insert(14_usize, "c").ok();
        assert_eq!(map.capacity(), 7);

        // Leaves a tombstone between 0 and 14 on the shared probe path
        assert_eq!(map.remove(&7), Some("b"));
        assert_eq!(map.get(&14), Some(&"c"));
        assert_eq!(map.get(&0), Some(&"a"));
        assert_eq!(map.get(&7), None);
    }

    #[test]
    fn test_own_tombstone_is_reclaimed_in_place() {
        let mut map = ProbingMap::with_capacity_and_hasher(7, IdentityState);
        map.insert(0_usize, "a").ok();
        map.insert(7_usize, "b").ok();
        map.remove(&7);

        // The same key lands back on its tombstone without growing the table
        assert_eq!(map.insert(7_usize, "b2"), Ok(()));
        assert_eq!(map.capacity(), 7);
        assert_eq!(map.get(&7), Some(&"b2"));
    }

    #[test]
    fn test_resize_reaches_next_prime() {
        let mut map = ProbingMap::with_capacity(7);
        for i in 0..4_u32 {
            map.insert(i, i).ok();
        }

        // Four entries exceed half of seven slots; the next prime at or
        // above fourteen is seventeen
        assert_eq!(map.capacity(), 17);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_capacity_growth_stays_prime_and_doubles() {
        let mut map = ProbingMap::with_capacity(7);
        let mut previous = map.capacity();
        for i in 0..500_u32 {
            map.insert(i, i).ok();
            let current = map.capacity();
            if current != previous {
                assert!(crate::hashing::is_prime(current));
                assert!(current >= previous * 2);
                previous = current;
            }
        }
    }

    #[test]
    fn test_resize_preserves_contents() {
        let mut map = ProbingMap::with_capacity(4);
        for i in 0..200_u32 {
            map.insert(i.to_string(), i).ok();
        }

        assert_eq!(map.len(), 200);
        for i in 0..200_u32 {
            assert_eq!(map.get(&i.to_string()), Some(&i));
        }
    }

    #[test]
    fn test_tombstone_buildup_still_triggers_rebuild() {
        let mut map = ProbingMap::with_capacity(101);
        // Cycling inserts and removes keeps the live count at one while
        // tombstones accumulate; the occupancy trigger must keep the scan
        // from ever running out of empty slots
        for i in 0..1000_u32 {
            map.insert(i, i).ok();
            if i > 0 {
                map.remove(&(i - 1));
            }
        }
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&999), Some(&999));
    }

    #[test]
    fn test_len_tracks_inserts_minus_removes() {
        let mut map = ProbingMap::new();
        assert!(map.is_empty());

        map.insert("key1".to_string(), 1).ok();
        map.insert("key2".to_string(), 2).ok();
        assert_eq!(map.len(), 2);

        // A rejected duplicate leaves the count unchanged
        map.insert("key1".to_string(), 9).ok();
        assert_eq!(map.len(), 2);

        map.remove("key1");
        assert_eq!(map.len(), 1);
        map.remove("key1");
        assert_eq!(map.len(), 1);

        map.remove("key2");
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_mut() {
        let mut map = ProbingMap::new();
        map.insert("key1".to_string(), 1).ok();

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
    }

    #[test]
    fn test_clear() {
        let mut map = ProbingMap::new();
        map.insert("key1".to_string(), 1).ok();
        map.insert("key2".to_string(), 2).ok();
        let capacity = map.capacity();

        map.clear();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.insert("key1".to_string(), 1), Ok(()));
    }

    #[test]
    fn test_iter_skips_tombstones() {
        let mut map = ProbingMap::new();
        map.insert("key1".to_string(), 1).ok();
        map.insert("key2".to_string(), 2).ok();
        map.insert("key3".to_string(), 3).ok();
        map.remove("key2");

        let mut values: Vec<u32> = map.iter().map(|(_, &value)| value).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 3]);
    }

    #[test]
    fn test_load_factor() {
        let mut map = ProbingMap::with_capacity(16);
        for i in 0..8_u32 {
            map.insert(i.to_string(), i).ok();
        }
        assert!((map.load_factor() - 8.0 / map.capacity() as f64).abs() < 1e-9);
    }

    mod properties {
        use std::collections::HashMap;

        use proptest::prelude::*;

        use super::super::ProbingMap;

        proptest! {
            #[test]
            fn behaves_like_a_unique_key_model(
                ops in proptest::collection::vec((any::<u8>(), any::<u8>(), any::<bool>()), 0..300)
            ) {
                let mut map = ProbingMap::with_capacity(1);
                let mut model: HashMap<u8, u8> = HashMap::new();

                for (key, value, is_remove) in ops {
                    if is_remove {
                        prop_assert_eq!(map.remove(&key), model.remove(&key));
                    } else {
                        let accepted = map.insert(key, value).is_ok();
                        let expected = !model.contains_key(&key);
                        prop_assert_eq!(accepted, expected);
                        if expected {
                            model.insert(key, value);
                        }
                    }
                    prop_assert_eq!(map.len(), model.len());
                }

                for (key, value) in &model {
                    prop_assert_eq!(map.get(key), Some(value));
                }
            }
        }
    }
}
