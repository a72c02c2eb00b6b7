//! A key-indexed binary search tree map ordered by a replaceable comparator.
//!
//! [`IndexedTreeMap`] stores key→value bindings that can be looked up in O(1)
//! by key, while also keeping them in a total order decided by a
//! [`Comparator`] over `(key, value)` [`Pair`]s. The comparator can be swapped
//! at any time, which rebuilds the tree under the new order.
//!
//! # Example
//!
//! ```
//! use indexed_tree::{Comparator, IndexedTreeMap};
//!
//! let mut scores = IndexedTreeMap::by_value();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Lookup by key is a hash lookup.
//! assert_eq!(scores.get("Bob"), Some(&85));
//!
//! // Iteration follows the comparator: lowest score first.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Bob", "Carol", "Alice"]);
//!
//! // Neighbours in that order.
//! assert_eq!(scores.first_key_after("Bob"), Some(&"Carol"));
//!
//! // Switch to highest score first.
//! scores.set_comparator(Comparator::by_value_desc());
//! assert_eq!(scores.first_key(), Some(&"Alice"));
//! ```
//!
//! # Implementation
//!
//! Bindings live in an arena of binary search tree nodes linked by parent,
//! left and right handles, next to a `HashMap` from key to node. The tree is
//! deliberately *not* self-balancing: its height depends on insertion order,
//! and monotonic insertion degrades it to a chain. Ties under the comparator
//! are placed after the bindings they tie with, so equal bindings keep their
//! insertion order.
//!
//! Values may change behind the tree's back (through
//! [`get_mut`](IndexedTreeMap::get_mut) or interior mutability); the order is
//! repaired with [`rebalance_all`](IndexedTreeMap::rebalance_all) or
//! [`rebalance_where`](IndexedTreeMap::rebalance_where).

#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod comparator;
mod error;
mod raw;

pub mod indexed_tree_map;

pub use comparator::{Comparator, Pair};
pub use error::{Error, Result};
pub use indexed_tree_map::IndexedTreeMap;
