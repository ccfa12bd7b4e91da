//! # chaintable
//!
//! A **separate-chaining hash table** with pluggable bucket index
//! strategies and load-factor-driven growth.
//!
//! Keys are mapped to buckets by one of four interchangeable
//! [`IndexStrategy`] variants, selected per table instance (at random by
//! default, or pinned through the builder). Each occupied bucket holds a
//! singly-linked chain of entries with O(1) tail appends. When an insert
//! pushes the load factor past the configured maximum, the bucket array
//! doubles and every entry is rehashed.
//!
//! ## Example
//! ```rust
//! use chaintable::ChainedHashTable;
//!
//! let mut table = ChainedHashTable::new(4);
//! table.put("A", 1).unwrap();
//! table.put("B", 2).unwrap();
//! table.put("C", 3).unwrap();
//!
//! // The third insert crossed the 0.7 load ceiling, doubling 4 -> 8.
//! assert_eq!(table.capacity(), 8);
//! assert_eq!(table.load_factor(), 0.375);
//! assert_eq!(table.get(&"B"), Some(&2));
//! ```

pub mod error;
pub mod strategy;
pub mod table;

mod chain;

pub use error::{Error, Result};
pub use strategy::{IndexStrategy, KeyBytes};
pub use table::{ChainedHashTable, ChainedHashTableBuilder};
