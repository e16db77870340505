//! # probechain
//!
//! Two in-memory hash table implementations over a resizable bucket array,
//! one per classic collision-resolution strategy:
//!
//! - `ProbingMap`: open addressing with linear probing. Removed entries
//!   leave tombstones, capacity grows to the next prime at least double the
//!   old size, and inserting an already-present key is rejected.
//! - `ChainingMap`: separate chaining with owned singly linked buckets.
//!   New entries are pushed to the front of their bucket, duplicate keys
//!   coexist, and capacity doubles when the load factor threshold is passed.
//!
//! Both reduce a pluggable 64-bit hash into the current capacity through the
//! shared [`hashing`] module.
//!
//! ## Probing usage
//!
//! ```rust
//! use probechain::{InsertError, ProbingMap};
//!
//! # fn main() -> Result<(), InsertError> {
//! let mut map = ProbingMap::new();
//!
//! // Insert values; duplicate keys are rejected, never overwritten
//! map.insert("apple".to_string(), 1)?;
//! map.insert("banana".to_string(), 2)?;
//! assert!(map.insert("apple".to_string(), 10).is_err());
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Remove values; the tombstone left behind keeps later probes intact
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! map.insert("apple".to_string(), 3)?;
//! assert_eq!(map.get("apple"), Some(&3));
//! # Ok(())
//! # }
//! ```
//!
//! ## Chaining usage
//!
//! ```rust
//! use probechain::ChainingMap;
//!
//! let mut map = ChainingMap::new();
//!
//! // Duplicate keys coexist; lookups see the most recent entry first
//! map.insert("apple".to_string(), 1);
//! map.insert("apple".to_string(), 2);
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.find("apple"), Some(2));
//!
//! // One remove unlinks exactly one entry, newest first
//! assert_eq!(map.remove("apple"), Some(2));
//! assert_eq!(map.find("apple"), Some(1));
//! ```

/// Module implementing the separate-chaining map with linked buckets
mod chaining_map;
/// Hash-to-index reduction and primality utilities shared by both maps
pub mod hashing;
/// Module implementing the open-addressing map with linear probing
mod probing_map;
/// Utility functions and traits for the maps
mod utils;

pub use chaining_map::{ChainingMap, ConfigError};
pub use probing_map::{InsertError, ProbingMap};
pub use utils::{MapExtensions, from_iter};
