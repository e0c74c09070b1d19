//! This crate provides a longest-prefix-match table for IP prefixes, as found in routing tables,
//! geo-IP maps, or access control lists. Given a set of prefixes that are each bound to a value,
//! a lookup returns the value of the most specific prefix that contains an address. This crate
//! supports both IPv4 and IPv6 (from [ipnet](https://docs.rs/ipnet/2.10.0),
//! [ipnetwork](https://crates.io/crates/ipnetwork), or [cidr](https://crates.io/crates/cidr)),
//! and any tuple `(R, u8)`, where `R` is an unsigned primitive integer.
//!
//! ```
//! # use map_trie::MapTrie;
//! # use std::net::IpAddr;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut table: MapTrie<ipnet::IpNet, &str> = MapTrie::new();
//! table.insert("10.1.1.0/24".parse()?, "SMALL");
//! table.insert("10.1.0.0/16".parse()?, "LARGE");
//! let addr: IpAddr = "10.1.1.1".parse()?;
//! assert_eq!(table.lookup(&addr), Some(("10.1.1.0/24".parse()?, &"SMALL")));
//! let addr: IpAddr = "10.1.2.1".parse()?;
//! assert_eq!(table.lookup(&addr), Some(("10.1.0.0/16".parse()?, &"LARGE")));
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each address family has its own [`Tree`], and the [`MapTrie`] dispatches every call to the
//! tree of its argument's family. A tree is an uncompressed binary trie: each node sits at the
//! depth equal to the number of bits walked from the root and consists of a container for a
//! potential value (`Option`) and two optional children. To descend, we look at the next bit of
//! the key. If it is not set, then we take the left branch, and otherwise, we take the right one.
//! All nodes of a tree live in a single `Vec` and refer to their children by index, where the
//! root is always at index `0`.
//!
//! Because the path of a prefix is fully determined by its bits, the shape of a tree and the
//! result of every lookup only depend on the set of stored prefixes, never on the order in which
//! they were inserted.
//!
//! # Operations on the tree
//!
//! Inserts are done with [`MapTrie::insert_or_update`], which takes one closure that creates the
//! value of a new prefix, and one that replaces the value of an existing prefix. This allows both
//! overwriting and merging without requiring a default value. [`MapTrie::insert`] is a shortcut
//! that overwrites. There is no removal: nodes live as long as the table.
//!
//! The following are the computational complexities of the functions, where `W` is the width of
//! the address family (32 or 128 bits).
//!
//! | Operation                                   | Complexity |
//! |---------------------------------------------|------------|
//! | `insert_or_update`, `insert`                | `O(W)`     |
//! | `lookup`, `lookup_mut`, `get`, `get_mut`    | `O(W)`     |
//! | `lookup_traverse`, `cover`                  | `O(W)`     |
//! | `iter`, `keys`, `values`                    | `O(n * W)` |
//! | `len`, `family_len` and `is_empty`          | `O(1)`     |
//!
//! # Concurrency
//!
//! Lookups only need `&self`, and both [`Tree`] and [`MapTrie`] are `Send` and `Sync` whenever
//! the values are. Any number of threads can thus query a shared table. Modifying requires
//! `&mut self`, so writers are serialized by the borrow checker. Read-mostly workloads can build
//! a new table and swap it in (for instance, behind an `Arc`) instead of locking.

#![allow(clippy::collapsible_else_if)]
#![deny(missing_docs)]

mod fmt;
#[cfg(test)]
mod fuzzing;
#[cfg(feature = "serde")]
mod serde;

pub mod family;
pub mod map;
pub mod prefix;
pub mod tree;

pub use family::{AddressFamily, JointAddress, JointPrefix};
pub use map::MapTrie;
pub use prefix::{BitPath, Prefix};
pub use tree::Tree;
