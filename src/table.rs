//! # Separate Chaining Hash Table
//!
//! This module implements a **hash table** resolving collisions with
//! **separate chaining**: an array of buckets where each occupied bucket
//! holds an ordered chain of entries. It supports:
//! - **Generic** key-value pairs (`K: Eq + KeyBytes, V`).
//! - **Pluggable index strategies**: one of four [`IndexStrategy`] variants
//!   is selected per table instance, at random by default or pinned through
//!   the builder.
//! - **Automatic growth**: when the load factor crosses the configured
//!   maximum after an insert, the bucket array doubles and every entry is
//!   rehashed, possibly under a freshly selected strategy.
//! - **Insert**, **get**, **remove**, and basic iteration with expected
//!   O(1) average performance.
//!
//! This implementation is **not** thread-safe. For concurrent use, wrap it
//! in a mutex or impose a single-writer discipline externally.
//!
//! ## Example
//! ```rust
//! use chaintable::ChainedHashTable;
//!
//! let mut table = ChainedHashTable::new(8);
//! table.put("key", 42).unwrap();
//! assert_eq!(table.get(&"key"), Some(&42));
//! assert_eq!(table.remove(&"key"), Some(42));
//! ```

use std::mem;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::strategy::{IndexStrategy, KeyBytes};

/// Default number of buckets if none specified.
const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default maximum load factor (stored keys / buckets) before the table
/// grows.
const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// A separate-chaining hash table with a per-instance index strategy.
#[derive(Debug)]
pub struct ChainedHashTable<K, V> {
    buckets: Vec<Option<Chain<K, V>>>,
    /// Length of `buckets`; changes only when the whole array is replaced.
    capacity: usize,
    /// Total number of live keys across all chains.
    count: usize,
    strategy: IndexStrategy,
    /// A pinned strategy survives grows instead of being redrawn.
    pinned: bool,
    max_load_factor: f64,
    rng: StdRng,
}

/// A builder for [`ChainedHashTable`]. Typically you'll chain some
/// `.with_*(...)` calls and finish with `.build()`.
#[derive(Debug)]
pub struct ChainedHashTableBuilder {
    capacity: usize,
    max_load_factor: f64,
    strategy: Option<IndexStrategy>,
    seed: Option<u64>,
}

impl Default for ChainedHashTableBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            strategy: None,
            seed: None,
        }
    }
}

impl ChainedHashTableBuilder {
    /// Creates a builder with default capacity, load factor, and a randomly
    /// selected strategy.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the initial number of buckets (clamped to at least 1).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Sets the maximum load factor. If `len / capacity` exceeds it after an
    /// insert, the table grows.
    ///
    /// # Panics
    /// - if `lf` is not in `(0, 1)`.
    pub fn with_max_load_factor(mut self, lf: f64) -> Self {
        assert!(lf > 0.0 && lf < 1.0, "Load factor must be in (0,1)");
        self.max_load_factor = lf;
        self
    }

    /// Pins one index strategy for the table's whole life, including grows.
    /// Without this, a strategy is drawn at random per instance and redrawn
    /// at each grow.
    pub fn with_strategy(mut self, strategy: IndexStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Seeds the random source used for strategy selection, making the
    /// choice reproducible. Without this, OS entropy is used.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the final [`ChainedHashTable`].
    pub fn build<K: Eq + KeyBytes, V>(self) -> ChainedHashTable<K, V> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let strategy = self
            .strategy
            .unwrap_or_else(|| IndexStrategy::pick(&mut rng));
        let mut buckets = Vec::with_capacity(self.capacity);
        buckets.resize_with(self.capacity, || None);

        ChainedHashTable {
            buckets,
            capacity: self.capacity,
            count: 0,
            strategy,
            pinned: self.strategy.is_some(),
            max_load_factor: self.max_load_factor,
            rng,
        }
    }
}

impl<K: Eq + KeyBytes, V> Default for ChainedHashTable<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY)
    }
}

impl<K: Eq + KeyBytes, V> ChainedHashTable<K, V> {
    /// Creates a table with `initial_capacity` buckets (clamped to at least
    /// 1) and a randomly selected index strategy.
    pub fn new(initial_capacity: usize) -> Self {
        ChainedHashTableBuilder::new()
            .with_capacity(initial_capacity)
            .build()
    }

    /// Number of live keys in the table.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The index strategy currently in effect.
    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    /// Ratio of stored keys to buckets. O(1): both quantities are tracked.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity as f64
    }

    /// Inserts a key-value pair, returning the value previously stored under
    /// the key, if any.
    ///
    /// An existing entry for the key is unlinked before the new one is
    /// appended, so a chain never holds a key twice. If the insert pushes
    /// the load factor past the maximum, the table grows before returning.
    ///
    /// # Errors
    /// - [`Error::AllocationFailed`] if a triggered grow cannot allocate its
    ///   new bucket array. The entry has been stored; only the grow failed.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        let index = self.strategy.index_for(&key, self.capacity);
        let chain = self.buckets[index].get_or_insert_with(Chain::new);
        let replaced = chain.remove(&key);
        chain.append_tail(key, value);
        if replaced.is_none() {
            self.count += 1;
        }
        if self.load_factor() > self.max_load_factor {
            self.grow()?;
        }
        Ok(replaced)
    }

    /// Returns a reference to the value stored under `key`, if present.
    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.strategy.index_for(key, self.capacity);
        let chain = self.buckets[index].as_ref()?;
        chain.find(key).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value stored under `key`, if
    /// present.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.strategy.index_for(key, self.capacity);
        let chain = self.buckets[index].as_mut()?;
        chain.find_mut(key).map(|entry| &mut entry.value)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` and returns its value, if present. An emptied chain is
    /// dropped so its bucket reads as unoccupied again.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.strategy.index_for(key, self.capacity);
        let chain = self.buckets[index].as_mut()?;
        let value = chain.remove(key)?;
        self.count -= 1;
        if chain.is_empty() {
            self.buckets[index] = None;
        }
        Some(value)
    }

    /// Iterates over all key-value pairs, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().flat_map(Chain::iter)
    }

    /// Removes every key while keeping the current bucket array.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = None;
        }
        self.count = 0;
    }

    /// Doubles the bucket array and rehashes every entry under the strategy
    /// selected for the new capacity.
    ///
    /// The new array is allocated and populated fully before anything is
    /// swapped in, and one strategy is used consistently for the entire
    /// pass. Allocation is the only fallible step and happens first, so a
    /// failure leaves the table exactly as it was.
    fn grow(&mut self) -> Result<()> {
        let new_capacity = self.capacity * 2;
        let strategy = if self.pinned {
            self.strategy
        } else {
            IndexStrategy::pick(&mut self.rng)
        };

        let mut buckets: Vec<Option<Chain<K, V>>> = Vec::new();
        buckets
            .try_reserve_exact(new_capacity)
            .map_err(|source| Error::AllocationFailed {
                capacity: new_capacity,
                source,
            })?;
        buckets.resize_with(new_capacity, || None);

        for chain in mem::take(&mut self.buckets).into_iter().flatten() {
            for (key, value) in chain {
                let index = strategy.index_for(&key, new_capacity);
                let dest = buckets[index].get_or_insert_with(Chain::new);
                // Same replace-by-delete discipline as put; table entries
                // are unique already, so nothing should be displaced.
                let stale = dest.remove(&key);
                debug_assert!(stale.is_none(), "duplicate key surfaced during rehash");
                dest.append_tail(key, value);
            }
        }

        debug!(
            "grew table from {} to {} buckets under {:?}",
            self.capacity, new_capacity, strategy
        );

        self.buckets = buckets;
        self.capacity = new_capacity;
        self.strategy = strategy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_put_get_remove() {
        let mut table = ChainedHashTable::new(4);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());

        assert_eq!(table.put("foo", 123).unwrap(), None);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());

        assert_eq!(table.put("bar", 999).unwrap(), None);
        assert_eq!(table.len(), 2);

        assert_eq!(table.get(&"foo"), Some(&123));
        assert_eq!(table.get(&"bar"), Some(&999));
        assert_eq!(table.get(&"baz"), None);

        assert_eq!(table.remove(&"bar"), Some(999));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"bar"), None);
        assert_eq!(table.remove(&"bar"), None);
    }

    #[test]
    fn overwrite_replaces_without_growing_len() {
        let mut table = ChainedHashTable::new(8);
        assert_eq!(table.put("key", 1).unwrap(), None);
        assert_eq!(table.put("key", 2).unwrap(), Some(1));
        assert_eq!(table.get(&"key"), Some(&2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut table = ChainedHashTable::new(8);
        table.put("key", 1).unwrap();
        *table.get_mut(&"key").unwrap() += 10;
        assert_eq!(table.get(&"key"), Some(&11));
        assert_eq!(table.get_mut(&"missing"), None);
    }

    #[test]
    fn load_factor_stays_below_maximum() {
        for strategy in IndexStrategy::ALL {
            let mut table = ChainedHashTableBuilder::new()
                .with_capacity(4)
                .with_strategy(strategy)
                .build();
            for i in 0..200u64 {
                table.put(i, i).unwrap();
                assert!(
                    table.load_factor() <= DEFAULT_MAX_LOAD_FACTOR,
                    "load factor {} after {} inserts under {strategy:?}",
                    table.load_factor(),
                    i + 1
                );
            }
        }
    }

    #[test]
    fn third_insert_doubles_a_four_bucket_table() {
        let mut table = ChainedHashTable::new(4);
        table.put("A", 1).unwrap();
        table.put("B", 2).unwrap();
        assert_eq!(table.capacity(), 4);

        // 3/4 = 0.75 crosses the 0.7 ceiling, so the third put doubles the
        // array before returning.
        table.put("C", 3).unwrap();
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 3);
        assert_eq!(table.load_factor(), 0.375);
    }

    #[test]
    fn growth_preserves_every_key() {
        let mut table = ChainedHashTable::new(2);
        for i in 0..1000 {
            table.put(format!("key{}", i), i).unwrap();
        }
        assert_eq!(table.len(), 1000);
        assert!(table.capacity() >= 1000);
        for i in 0..1000 {
            assert_eq!(table.get(&format!("key{}", i)), Some(&i));
        }
    }

    #[test]
    fn growth_keeps_last_written_values() {
        let mut table = ChainedHashTable::new(2);
        for i in 0..300 {
            table.put(format!("key{}", i), i).unwrap();
        }
        for i in 0..300 {
            table.put(format!("key{}", i), i * 10).unwrap();
        }
        assert_eq!(table.len(), 300);
        for i in 0..300 {
            assert_eq!(table.get(&format!("key{}", i)), Some(&(i * 10)));
        }
    }

    #[test]
    fn pinned_strategy_survives_growth() {
        let mut table = ChainedHashTableBuilder::new()
            .with_capacity(2)
            .with_strategy(IndexStrategy::DivisionLinear)
            .build();
        for i in 0..100u64 {
            table.put(i, i).unwrap();
        }
        assert_eq!(table.strategy(), IndexStrategy::DivisionLinear);
        for i in 0..100u64 {
            assert_eq!(table.get(&i), Some(&i));
        }
    }

    #[test]
    fn seeded_tables_pick_the_same_strategy() {
        let a: ChainedHashTable<u64, u64> =
            ChainedHashTableBuilder::new().with_seed(42).build();
        let b: ChainedHashTable<u64, u64> =
            ChainedHashTableBuilder::new().with_seed(42).build();
        assert_eq!(a.strategy(), b.strategy());
    }

    #[test]
    fn removal_empties_the_table() {
        let mut table = ChainedHashTable::new(4);
        for i in 0..50u64 {
            table.put(i, i * 2).unwrap();
        }
        for i in 0..50u64 {
            assert_eq!(table.remove(&i), Some(i * 2));
        }
        assert!(table.is_empty());
        assert_eq!(table.load_factor(), 0.0);
    }

    #[test]
    fn iter_visits_every_pair_once() {
        let mut table = ChainedHashTable::new(8);
        for i in 0..40u64 {
            table.put(i, i + 1).unwrap();
        }
        let mut pairs: Vec<(u64, u64)> = table.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs.len(), 40);
        for (i, pair) in pairs.into_iter().enumerate() {
            assert_eq!(pair, (i as u64, i as u64 + 1));
        }
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table = ChainedHashTable::new(4);
        for i in 0..20u64 {
            table.put(i, i).unwrap();
        }
        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.get(&3), None);

        table.put(3, 33).unwrap();
        assert_eq!(table.get(&3), Some(&33));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut table = ChainedHashTable::new(0);
        assert_eq!(table.capacity(), 1);
        table.put("a", 1).unwrap();
        assert_eq!(table.get(&"a"), Some(&1));
    }

    #[test]
    fn string_and_integer_keys() {
        let mut by_name = ChainedHashTable::new(8);
        by_name.put(String::from("one"), 1).unwrap();
        assert_eq!(by_name.get(&String::from("one")), Some(&1));

        let mut by_id: ChainedHashTable<u32, &str> = ChainedHashTable::new(8);
        by_id.put(7, "seven").unwrap();
        assert_eq!(by_id.get(&7), Some(&"seven"));
        assert!(by_id.contains_key(&7));
        assert!(!by_id.contains_key(&8));
    }
}
