//! A classic multiway B-tree sorted map for Rust.
//!
//! This crate provides [`BTree`], an ordered associative container meant as an embeddable
//! building block for storage engines and indexes. Unlike a B+tree, every node stores its
//! own key/value pairs; the branching factor is a runtime parameter.
//!
//! - [`insert`](BTree::insert) - Upsert a key/value pair
//! - [`search`](BTree::search) - Point lookup, failing with [`Error::KeyNotFound`]
//! - [`remove`](BTree::remove) - Delete a key, rebalancing by borrow or merge
//! - [`traverse`](BTree::traverse) - Every entry in ascending key order
//!
//! # Example
//!
//! ```
//! use arbor_btree::{BTree, Error};
//!
//! let mut index = BTree::new(3)?;
//! for (k, v) in (1..=7).zip(["a", "b", "c", "d", "e", "f", "g"]) {
//!     index.insert(k, v);
//! }
//!
//! assert_eq!(index.len(), 7);
//! assert_eq!(index.search(&4), Ok(&"d"));
//!
//! index.remove(&4)?;
//! assert_eq!(index.remove(&4), Err(Error::KeyNotFound));
//!
//! let keys: Vec<i32> = index.traverse().iter().map(|e| *e.key()).collect();
//! assert_eq!(keys, [1, 2, 3, 5, 6, 7]);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Implementation
//!
//! Nodes are stored in an arena and refer to their children by index, so ownership is
//! strictly tree-shaped. Insertion and deletion recurse from the root; each level restores
//! its own invariants before telling its parent whether it overflowed (and must be split)
//! or underflowed (and must borrow from a sibling or merge with one). Only the root may hold
//! fewer than the minimum number of keys; it is replaced by its only child once it empties.
//!
//! Structural changes emit `trace`-level [`tracing`] events under the `arbor_btree::split`,
//! `arbor_btree::merge`, `arbor_btree::borrow` and `arbor_btree::root` targets.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
#[macro_use]
extern crate std;

mod btree;
mod entry;
mod error;
mod raw;

pub use btree::BTree;
pub use entry::Entry;
pub use error::{Error, InvariantViolation, Result};

/// Smallest branching factor accepted by [`BTree::new`].
pub const MIN_ORDER: usize = 3;

/// Branching factor used by [`BTree::default`] and [`BTree::from_iter`](FromIterator::from_iter).
pub const DEFAULT_ORDER: usize = 32;
