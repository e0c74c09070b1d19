//! Module that defines the [`MapTrie`], the table of both address families.

use either::{Left, Right};
use log::debug;

use crate::family::{AddressFamily, JointAddress, JointPrefix};
use crate::tree::Tree;

mod iter;

pub use iter::*;

/// Dispatch a call to the tree of the family of `$key`, using `$split` to get the family-specific
/// half of `$key`.
macro_rules! fork {
    ($self:ident, $key:ident.$split:ident(), $func:ident $(, $args:expr)*) => {
        match $key.$split() {
            Left(k) => $self.v4.$func(k $(, $args)*),
            Right(k) => $self.v6.$func(k $(, $args)*),
        }
    };
    ($self:ident, $key:ident.$split:ident() as ($P:ty, T), $func:ident $(, $args:expr)*) => {
        match $key.$split() {
            Left(k) => $self.v4.$func(k $(, $args)*).map(|(p, t)| (<$P>::from_v4(p), t)),
            Right(k) => $self.v6.$func(k $(, $args)*).map(|(p, t)| (<$P>::from_v6(p), t)),
        }
    };
}

/// A longest-prefix-match table for both address families, implemented as two separate trees.
///
/// Every call is dispatched on the family of its argument, so an IPv4 prefix can never match an
/// IPv6 address (or vice versa), even if both have the same bit pattern.
///
/// Lookups take `&self` and may run concurrently from any number of threads. Inserting requires
/// `&mut self`.
pub struct MapTrie<P, T>
where
    P: JointPrefix,
{
    v4: Tree<P::V4, T>,
    v6: Tree<P::V6, T>,
}

impl<P, T> Default for MapTrie<P, T>
where
    P: JointPrefix,
{
    fn default() -> Self {
        Self {
            v4: Default::default(),
            v6: Default::default(),
        }
    }
}

impl<P: JointPrefix, T: Clone> Clone for MapTrie<P, T> {
    fn clone(&self) -> Self {
        Self {
            v4: self.v4.clone(),
            v6: self.v6.clone(),
        }
    }
}

impl<P: JointPrefix, T> MapTrie<P, T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table, reserving `capacity` nodes in the tree of each family. A capacity
    /// of `0` reserves nothing, and the tables grow on demand.
    ///
    /// The hint is applied to the IPv4 and the IPv6 tree separately, so the table reserves
    /// `2 * capacity` nodes in total, even if only one family is ever used. It counts trie nodes,
    /// not prefixes: a single prefix of length `L` needs up to `L` new nodes. To pre-size only one
    /// family, build that [`Tree`] directly with [`Tree::with_capacity`].
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// let map: MapTrie<ipnet::IpNet, u32> = MapTrie::with_capacity(4096);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        debug!("creating a table with a capacity hint of {capacity} nodes per family");
        Self {
            v4: Tree::with_capacity(capacity),
            v6: Tree::with_capacity(capacity),
        }
    }

    /// Returns the number of distinct prefixes stored in `self`, of both families.
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, _> = MapTrie::new();
    /// map.insert("192.168.1.0/24".parse()?, 1u32);
    /// map.insert("192.168.1.0/25".parse()?, 2u32);
    /// map.insert("2001::1:0:0/96".parse()?, 3u32);
    /// map.insert("192.168.1.0/24".parse()?, 4u32);
    /// assert_eq!(map.len(), 3);
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// Returns the number of distinct prefixes of the given family.
    ///
    /// ```
    /// # use map_trie::{AddressFamily, MapTrie};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, _> = MapTrie::new();
    /// map.insert("192.168.1.0/24".parse()?, 1u32);
    /// map.insert("2001::1:0:0/96".parse()?, 3u32);
    /// map.insert("2001::/16".parse()?, 3u32);
    /// assert_eq!(map.family_len(AddressFamily::V4), 1);
    /// assert_eq!(map.family_len(AddressFamily::V6), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn family_len(&self, family: AddressFamily) -> usize {
        match family {
            AddressFamily::V4 => self.v4.len(),
            AddressFamily::V6 => self.v6.len(),
        }
    }

    /// Returns `true` if the table contains no prefixes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tree that holds all IPv4 prefixes.
    pub fn v4(&self) -> &Tree<P::V4, T> {
        &self.v4
    }

    /// The tree that holds all IPv6 prefixes.
    pub fn v6(&self) -> &Tree<P::V6, T> {
        &self.v6
    }

    /// Store a value for `prefix`. If `prefix` has no value yet, `on_empty` creates it, and the
    /// length of the table grows by one. Otherwise, `on_update` receives the current value and
    /// returns its replacement. Either way, the stored value is returned.
    ///
    /// Only the first `prefix_len()` bits of `prefix` are read. Callers that want a canonical
    /// prefix must clear the host bits themselves.
    ///
    /// # Panics
    ///
    /// Panics if the prefix length exceeds the width of its family.
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, u32> = MapTrie::new();
    /// let prefix = "192.168.0.0/16".parse()?;
    /// map.insert_or_update(prefix, || 1, |count| count + 1);
    /// map.insert_or_update(prefix, || 1, |count| count + 1);
    /// assert_eq!(map.get(&prefix), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert_or_update<E, U>(&mut self, prefix: P, on_empty: E, on_update: U) -> &mut T
    where
        E: FnOnce() -> T,
        U: FnOnce(T) -> T,
    {
        fork!(
            self,
            prefix.into_either(),
            insert_or_update,
            on_empty,
            on_update
        )
    }

    /// Insert a new item into the table, returning the value previously stored for the same
    /// prefix.
    pub fn insert(&mut self, prefix: P, value: T) -> Option<T> {
        fork!(self, prefix.into_either(), insert, value)
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, _> = MapTrie::new();
    /// map.insert("192.168.1.0/24".parse()?, 1);
    /// map.insert("2001::1:0:0/96".parse()?, 2);
    /// assert_eq!(map.get(&"192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(map.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(map.get(&"2001::1:0:0/96".parse()?), Some(&2));
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: &P) -> Option<&T> {
        fork!(self, prefix.as_either(), get)
    }

    /// Get a mutable reference to the value of an element by matching exactly on the prefix.
    pub fn get_mut(&mut self, prefix: &P) -> Option<&mut T> {
        fork!(self, prefix.as_either(), get_mut)
    }

    /// Check if exactly `prefix` is stored in the table.
    pub fn contains_key(&self, prefix: &P) -> bool {
        fork!(self, prefix.as_either(), contains_key)
    }

    /// Longest-prefix match: get the longest stored prefix of the same family that contains
    /// `addr`, together with its value. The returned prefix has all host bits cleared.
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// # use std::net::IpAddr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, _> = MapTrie::new();
    /// map.insert("0.0.0.0/0".parse()?, 0);
    /// map.insert("192.168.0.0/16".parse()?, 1);
    /// map.insert("a8c0::/16".parse()?, 2);
    /// let addr: IpAddr = "192.168.9.1".parse()?;
    /// assert_eq!(map.lookup(&addr), Some(("192.168.0.0/16".parse()?, &1)));
    /// let addr: IpAddr = "8.8.8.8".parse()?;
    /// assert_eq!(map.lookup(&addr), Some(("0.0.0.0/0".parse()?, &0)));
    /// let addr: IpAddr = "2001::1".parse()?;
    /// assert_eq!(map.lookup(&addr), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup<A>(&self, addr: &A) -> Option<(P, &T)>
    where
        A: JointAddress,
    {
        fork!(self, addr.as_address() as (P, T), lookup)
    }

    /// Longest-prefix match that returns a mutable reference to the value. See
    /// [`MapTrie::lookup`].
    pub fn lookup_mut<A>(&mut self, addr: &A) -> Option<(P, &mut T)>
    where
        A: JointAddress,
    {
        fork!(self, addr.as_address() as (P, T), lookup_mut)
    }

    /// Call `f` for every stored prefix of the same family that contains `addr`, from the least
    /// to the most specific one. The walk stops as soon as `f` returns `false`.
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// # use std::net::IpAddr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, _> = MapTrie::new();
    /// map.insert("192.168.9.32/32".parse()?, "host");
    /// map.insert("192.168.9.0/24".parse()?, "subnet");
    /// map.insert("192.168.0.0/16".parse()?, "site");
    /// let mut first = None;
    /// map.lookup_traverse(&"192.168.9.32".parse::<IpAddr>()?, |_, v| {
    ///     first = Some(*v);
    ///     false
    /// });
    /// assert_eq!(first, Some("site"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup_traverse<A, F>(&self, addr: &A, mut f: F)
    where
        A: JointAddress,
        F: FnMut(P, &T) -> bool,
    {
        for (prefix, value) in self.cover(addr) {
            if !f(prefix, value) {
                break;
            }
        }
    }

    /// Iterate over all stored prefixes of the same family that contain `addr`, from the least
    /// to the most specific one.
    ///
    /// ```
    /// # use map_trie::MapTrie;
    /// # use std::net::IpAddr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut map: MapTrie<ipnet::IpNet, _> = MapTrie::new();
    /// map.insert("10.1.1.0/24".parse()?, 2);
    /// map.insert("10.1.0.0/16".parse()?, 1);
    /// map.insert("::/0".parse()?, 0);
    /// let addr: IpAddr = "10.1.1.1".parse()?;
    /// assert_eq!(map.cover(&addr).map(|(_, v)| *v).collect::<Vec<_>>(), vec![1, 2]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn cover<'a, 'b, A>(&'a self, addr: &'b A) -> Cover<'a, 'b, P, A, T>
    where
        A: JointAddress,
    {
        let inner = match addr.as_address() {
            Left(a) => Left(self.v4.cover(a)),
            Right(a) => Right(self.v6.cover(a)),
        };
        Cover { inner }
    }

    /// An iterator visiting all entries, first all IPv4 prefixes, then all IPv6 prefixes, each in
    /// lexicographic order.
    pub fn iter(&self) -> Iter<'_, P, T> {
        self.into_iter()
    }

    /// An iterator visiting all prefixes in the order of [`MapTrie::iter`].
    pub fn keys(&self) -> Keys<'_, P, T> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in the order of [`MapTrie::iter`].
    pub fn values(&self) -> Values<'_, P, T> {
        Values { inner: self.iter() }
    }
}

impl<P, T> PartialEq for MapTrie<P, T>
where
    P: JointPrefix,
    P::V4: PartialEq,
    P::V6: PartialEq,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.v4 == other.v4 && self.v6 == other.v6
    }
}

impl<P, T> Eq for MapTrie<P, T>
where
    P: JointPrefix,
    P::V4: Eq,
    P::V6: Eq,
    T: Eq,
{
}

impl<P: JointPrefix, T> FromIterator<(P, T)> for MapTrie<P, T> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<P: JointPrefix, T> Extend<(P, T)> for MapTrie<P, T> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (prefix, value) in iter {
            self.insert(prefix, value);
        }
    }
}
