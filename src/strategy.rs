//! # Bucket Index Strategies
//!
//! This module provides the family of **index strategies** used to map a key
//! to a bucket position. Each strategy is a pure function of a key's byte sum
//! and the current table capacity, always producing an index in
//! `[0, capacity)`. A table selects one strategy at construction (at random,
//! or pinned through its builder) and may select a fresh one each time it
//! grows, so different table instances spread keys differently while any
//! single instance stays internally consistent.
//!
//! ## Strategies
//! - **Modulus**: plain `byte_sum % capacity`.
//! - **Multiplicative**: Knuth's method, scaling the fractional part of
//!   `byte_sum * A` (A ≈ 0.618, the fractional part of the golden ratio) by
//!   the capacity.
//! - **DivisionPrime**: reduction modulo the largest prime at or below
//!   `capacity / 3`, found by searching downward from that bound.
//! - **DivisionLinear**: the affine form `(2 * byte_sum + 3) % capacity`.
//!
//! ## Example
//! ```rust
//! use chaintable::IndexStrategy;
//!
//! let index = IndexStrategy::Modulus.index_for("key", 16);
//! assert!(index < 16);
//! // Deterministic: the same key and capacity always land in the same bucket.
//! assert_eq!(index, IndexStrategy::Modulus.index_for("key", 16));
//! ```

use num_prime::nt_funcs::is_prime64;
use rand::rngs::StdRng;
use rand::Rng;

/// Knuth's multiplier: the fractional part of the golden ratio.
const KNUTH_MULTIPLIER: f64 = 0.618_033_988_7;

/// Index returned by [`IndexStrategy::DivisionPrime`] when the capacity is
/// too small for a meaningful prime search.
const DEGENERATE_PRIME_INDEX: usize = 0;

/// Keys expose the byte sum that every index strategy reduces.
///
/// Implementations exist for string types, byte slices, the primitive
/// integers (summing their little-endian bytes), and references to any of
/// these.
pub trait KeyBytes {
    /// Sum of the key's raw bytes.
    fn byte_sum(&self) -> u64;
}

impl KeyBytes for str {
    fn byte_sum(&self) -> u64 {
        self.bytes().map(u64::from).sum()
    }
}

impl KeyBytes for String {
    fn byte_sum(&self) -> u64 {
        self.as_str().byte_sum()
    }
}

impl KeyBytes for [u8] {
    fn byte_sum(&self) -> u64 {
        self.iter().copied().map(u64::from).sum()
    }
}

impl KeyBytes for Vec<u8> {
    fn byte_sum(&self) -> u64 {
        self.as_slice().byte_sum()
    }
}

impl<T: KeyBytes + ?Sized> KeyBytes for &T {
    fn byte_sum(&self) -> u64 {
        (**self).byte_sum()
    }
}

macro_rules! impl_key_bytes_for_int {
    ($($int:ty),* $(,)?) => {$(
        impl KeyBytes for $int {
            fn byte_sum(&self) -> u64 {
                self.to_le_bytes().iter().copied().map(u64::from).sum()
            }
        }
    )*};
}

impl_key_bytes_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// The bucket-index computation selected for a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStrategy {
    /// `byte_sum % capacity`.
    Modulus,
    /// Knuth's multiplicative method: `floor(fract(byte_sum * A) * capacity)`.
    Multiplicative,
    /// Reduce modulo the largest prime at or below `capacity / 3`.
    DivisionPrime,
    /// `(2 * byte_sum + 3) % capacity`.
    DivisionLinear,
}

impl IndexStrategy {
    /// Every selectable strategy. Owned by the module, not by any table
    /// instance.
    pub const ALL: [IndexStrategy; 4] = [
        IndexStrategy::Modulus,
        IndexStrategy::Multiplicative,
        IndexStrategy::DivisionPrime,
        IndexStrategy::DivisionLinear,
    ];

    /// Draws a strategy uniformly from [`IndexStrategy::ALL`].
    pub(crate) fn pick(rng: &mut StdRng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Computes the bucket index for `key` in a table of `capacity` buckets.
    ///
    /// Pure and deterministic: the same `(key, capacity)` pair always maps to
    /// the same index, which is what makes lookups after inserts sound
    /// between grows. The result is always in `[0, capacity)`.
    pub fn index_for<K>(&self, key: &K, capacity: usize) -> usize
    where
        K: KeyBytes + ?Sized,
    {
        debug_assert!(capacity > 0, "table capacity must be nonzero");
        let sum = key.byte_sum();
        match self {
            IndexStrategy::Modulus => (sum % capacity as u64) as usize,
            IndexStrategy::Multiplicative => {
                let scaled = (sum as f64 * KNUTH_MULTIPLIER).fract() * capacity as f64;
                // fract() can land exactly on 1.0 after rounding.
                (scaled as usize).min(capacity - 1)
            }
            IndexStrategy::DivisionPrime => match largest_prime_at_most(capacity as u64 / 3) {
                Some(prime) => (sum % prime) as usize,
                None => DEGENERATE_PRIME_INDEX,
            },
            IndexStrategy::DivisionLinear => {
                ((2 * u128::from(sum) + 3) % capacity as u128) as usize
            }
        }
    }
}

/// Largest prime `<= bound`, searching downward. `None` if `bound < 2`.
fn largest_prime_at_most(bound: u64) -> Option<u64> {
    (2..=bound).rev().find(|&n| is_prime64(n))
}
