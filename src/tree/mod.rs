//! Implementation of the per-family tree.

use std::marker::PhantomData;

use log::{debug, trace};

use crate::prefix::{mask_from_prefix_len, with_bit, BitPath, Prefix};

mod iter;

pub use iter::*;

/// Binary trie over the bits of a single address family.
///
/// Every node sits at the depth equal to the number of bits walked from the root, and branches on
/// the next bit (`0` to the left, `1` to the right). Nodes live in one table and refer to their
/// children by index. A node is created the first time an insertion needs it and is kept for the
/// lifetime of the tree, whether or not it holds a value.
pub struct Tree<P, T> {
    pub(crate) table: Vec<Node<T>>,
    len: usize,
    marker: PhantomData<fn() -> P>,
}

impl<P, T: Clone> Clone for Tree<P, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            len: self.len,
            marker: PhantomData,
        }
    }
}

impl<P, T> Default for Tree<P, T> {
    fn default() -> Self {
        Self {
            table: vec![Node::default()],
            len: 0,
            marker: PhantomData,
        }
    }
}

impl<P, T> Tree<P, T>
where
    P: Prefix,
{
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with room for `capacity` nodes besides the root. A capacity of `0`
    /// reserves nothing.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// let tree: Tree<(u32, u8), ()> = Tree::with_capacity(1024);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Vec::with_capacity(capacity.saturating_add(1));
        table.push(Node::default());
        debug!(
            "reserved {} trie nodes for {}-bit prefixes",
            table.capacity(),
            P::width()
        );
        Self {
            table,
            len: 0,
            marker: PhantomData,
        }
    }

    /// Returns the number of prefixes stored in `self`.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no prefixes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, including the root and nodes without a value.
    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.table.len()
    }

    /// Store a value for `prefix`. If `prefix` has no value yet, `on_empty` creates it. Otherwise,
    /// `on_update` receives the current value and returns its replacement. Either way, the stored
    /// value is returned.
    ///
    /// Only the first `prefix.prefix_len()` bits of `prefix` are read.
    ///
    /// # Panics
    ///
    /// Panics if the prefix length exceeds the width of the representation.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut tree: Tree<Ipv4Net, Vec<&str>> = Tree::new();
    /// let prefix: Ipv4Net = "10.0.0.0/8".parse()?;
    /// tree.insert_or_update(prefix, || vec!["a"], |mut v| { v.push("b"); v });
    /// tree.insert_or_update(prefix, || vec!["a"], |mut v| { v.push("b"); v });
    /// assert_eq!(tree.get(&prefix), Some(&vec!["a", "b"]));
    /// assert_eq!(tree.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert_or_update<E, U>(&mut self, prefix: P, on_empty: E, on_update: U) -> &mut T
    where
        E: FnOnce() -> T,
        U: FnOnce(T) -> T,
    {
        let idx = self.walk_or_create(&prefix);
        let value = match self.table[idx].value.take() {
            Some(old) => {
                // the slot stays empty if `on_update` unwinds
                self.len -= 1;
                let value = on_update(old);
                self.len += 1;
                value
            }
            None => {
                let value = on_empty();
                self.len += 1;
                trace!(
                    "stored new {}-bit prefix of length {}",
                    P::width(),
                    prefix.prefix_len()
                );
                value
            }
        };
        self.table[idx].value.insert(value)
    }

    /// Insert a new item into the tree, returning the value that was stored for the same prefix
    /// before.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut tree: Tree<Ipv4Net, _> = Tree::new();
    /// assert_eq!(tree.insert("192.168.0.0/23".parse()?, 1), None);
    /// assert_eq!(tree.insert("192.168.1.0/24".parse()?, 2), None);
    /// assert_eq!(tree.insert("192.168.1.0/24".parse()?, 3), Some(2));
    /// assert_eq!(tree.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> Option<T> {
        let idx = self.walk_or_create(&prefix);
        let old = self.table[idx].value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Get the value stored for exactly `prefix`.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut tree: Tree<Ipv4Net, _> = Tree::new();
    /// tree.insert("192.168.1.0/24".parse()?, 1);
    /// assert_eq!(tree.get(&"192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(tree.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(tree.get(&"192.168.1.128/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: &P) -> Option<&T> {
        self.walk(prefix)
            .and_then(|idx| self.table[idx].value.as_ref())
    }

    /// Get a mutable reference to the value stored for exactly `prefix`.
    pub fn get_mut(&mut self, prefix: &P) -> Option<&mut T> {
        let idx = self.walk(prefix)?;
        self.table[idx].value.as_mut()
    }

    /// Check if exactly `prefix` is stored in the tree.
    pub fn contains_key(&self, prefix: &P) -> bool {
        self.get(prefix).is_some()
    }

    /// Longest-prefix match: get the longest stored prefix that contains `addr`, together with its
    /// value. The returned prefix has all host bits cleared.
    ///
    /// A full-width address walks up to all bits of the family. If `addr` is itself a prefix, only
    /// its first `prefix_len()` bits are walked, which yields the longest stored prefix covering
    /// it.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut tree: Tree<Ipv4Net, _> = Tree::new();
    /// tree.insert("192.168.0.0/16".parse()?, 1);
    /// tree.insert("192.168.1.0/24".parse()?, 2);
    /// let addr: Ipv4Addr = "192.168.1.1".parse()?;
    /// assert_eq!(tree.lookup(&addr), Some(("192.168.1.0/24".parse()?, &2)));
    /// let addr: Ipv4Addr = "192.168.2.1".parse()?;
    /// assert_eq!(tree.lookup(&addr), Some(("192.168.0.0/16".parse()?, &1)));
    /// let addr: Ipv4Addr = "10.0.0.1".parse()?;
    /// assert_eq!(tree.lookup(&addr), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup<A>(&self, addr: &A) -> Option<(P, &T)>
    where
        A: BitPath<R = P::R>,
    {
        let (idx, depth) = self.best_match(addr)?;
        let value = self.table[idx].value.as_ref()?;
        Some((prefix_at(addr, depth), value))
    }

    /// Longest-prefix match that returns a mutable reference to the value. See [`Tree::lookup`].
    pub fn lookup_mut<A>(&mut self, addr: &A) -> Option<(P, &mut T)>
    where
        A: BitPath<R = P::R>,
    {
        let (idx, depth) = self.best_match(addr)?;
        let value = self.table[idx].value.as_mut()?;
        Some((prefix_at(addr, depth), value))
    }

    /// Call `f` for every stored prefix that contains `addr`, from the least to the most specific
    /// one. The walk stops as soon as `f` returns `false`.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// # use ipnet::Ipv4Net;
    /// # use std::net::Ipv4Addr;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut tree: Tree<Ipv4Net, _> = Tree::new();
    /// tree.insert("192.168.9.32/32".parse()?, 3);
    /// tree.insert("192.168.9.0/24".parse()?, 1);
    /// tree.insert("192.168.9.0/26".parse()?, 2);
    /// let mut seen = Vec::new();
    /// tree.lookup_traverse(&"192.168.9.32".parse::<Ipv4Addr>()?, |p, v| {
    ///     seen.push((p.prefix_len(), *v));
    ///     true
    /// });
    /// assert_eq!(seen, vec![(24, 1), (26, 2), (32, 3)]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup_traverse<A, F>(&self, addr: &A, mut f: F)
    where
        A: BitPath<R = P::R>,
        F: FnMut(P, &T) -> bool,
    {
        for (prefix, value) in self.cover(addr) {
            if !f(prefix, value) {
                break;
            }
        }
    }

    /// Iterate over all stored prefixes that contain `addr`, from the least to the most specific
    /// one. This is the iterator form of [`Tree::lookup_traverse`].
    pub fn cover<'a, 'b, A>(&'a self, addr: &'b A) -> Cover<'a, 'b, P, A, T>
    where
        A: BitPath<R = P::R>,
    {
        assert_len::<P>(addr.prefix_len());
        Cover {
            tree: self,
            addr,
            next: Some((0, 0)),
        }
    }

    /// Find the node of exactly `prefix`, if it was ever created.
    fn walk(&self, prefix: &P) -> Option<usize> {
        assert_len::<P>(prefix.prefix_len());
        let mut idx = 0;
        for depth in 0..prefix.prefix_len() {
            idx = self.table[idx].child(prefix.is_bit_set(depth))?;
        }
        Some(idx)
    }

    /// Find the node of exactly `prefix`, creating every missing node on the way.
    fn walk_or_create(&mut self, prefix: &P) -> usize {
        assert_len::<P>(prefix.prefix_len());
        let mut idx = 0;
        let mut created = 0;
        for depth in 0..prefix.prefix_len() {
            let right = prefix.is_bit_set(depth);
            idx = match self.table[idx].child(right) {
                Some(child) => child,
                None => {
                    // the node must exist before it is linked
                    let child = self.table.len();
                    self.table.push(Node::default());
                    self.table[idx].set_child(child, right);
                    created += 1;
                    child
                }
            };
        }
        if created > 0 {
            trace!(
                "created {created} nodes, {} nodes in the {}-bit tree",
                self.table.len(),
                P::width()
            );
        }
        idx
    }

    /// Index and depth of the deepest node on the path of `addr` that holds a value.
    fn best_match<A>(&self, addr: &A) -> Option<(usize, u8)>
    where
        A: BitPath<R = P::R>,
    {
        let len = addr.prefix_len();
        assert_len::<P>(len);
        let mut idx = 0;
        let mut depth = 0;
        let mut best_match = None;
        loop {
            if self.table[idx].value.is_some() {
                best_match = Some((idx, depth));
            }
            if depth == len {
                return best_match;
            }
            match self.table[idx].child(addr.is_bit_set(depth)) {
                Some(child) => {
                    idx = child;
                    depth += 1;
                }
                None => return best_match,
            }
        }
    }

    /// An iterator visiting all stored prefixes in lexicographic order: every prefix is yielded
    /// before the prefixes it contains, and the `0`-branch before the `1`-branch.
    ///
    /// ```
    /// # use map_trie::Tree;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut tree: Tree<Ipv4Net, _> = Tree::new();
    /// tree.insert("192.168.1.0/24".parse()?, 2);
    /// tree.insert("10.0.0.0/8".parse()?, 3);
    /// tree.insert("192.168.0.0/16".parse()?, 1);
    /// assert_eq!(
    ///     tree.iter().map(|(p, v)| (p.to_string(), *v)).collect::<Vec<_>>(),
    ///     vec![
    ///         ("10.0.0.0/8".to_string(), 3),
    ///         ("192.168.0.0/16".to_string(), 1),
    ///         ("192.168.1.0/24".to_string(), 2),
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, P, T> {
        self.into_iter()
    }

    /// An iterator visiting all stored prefixes in lexicographic order.
    pub fn keys(&self) -> Keys<'_, P, T> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in lexicographic order of their prefixes.
    pub fn values(&self) -> Values<'_, P, T> {
        Values { inner: self.iter() }
    }
}

#[inline(always)]
fn assert_len<P: BitPath>(len: u8) {
    assert!(
        len <= P::width(),
        "prefix length {len} exceeds the address width of {} bits",
        P::width()
    );
}

/// The prefix formed by the first `depth` bits of `addr`.
#[inline(always)]
fn prefix_at<P, A>(addr: &A, depth: u8) -> P
where
    P: Prefix,
    A: BitPath<R = P::R>,
{
    P::from_repr_len(addr.repr() & mask_from_prefix_len(depth), depth)
}

/// The representation of the child of a node with representation `repr` at depth `depth`.
#[inline(always)]
pub(crate) fn child_repr<R: num_traits::PrimInt>(repr: R, depth: u8, right: bool) -> R {
    if right {
        with_bit(repr, depth)
    } else {
        repr
    }
}

impl<P, T> PartialEq for Tree<P, T>
where
    P: Prefix + PartialEq,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<P, T> Eq for Tree<P, T>
where
    P: Prefix + Eq,
    T: Eq,
{
}

impl<P: Prefix, T> FromIterator<(P, T)> for Tree<P, T> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<P: Prefix, T> Extend<(P, T)> for Tree<P, T> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (prefix, value) in iter {
            self.insert(prefix, value);
        }
    }
}

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: Option<T>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            value: None,
            left: None,
            right: None,
        }
    }
}

impl<T> Node<T> {
    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    pub(crate) fn child(&self, right: bool) -> Option<usize> {
        if right {
            self.right
        } else {
            self.left
        }
    }

    #[inline(always)]
    fn set_child(&mut self, child: usize, right: bool) {
        if right {
            self.right = Some(child);
        } else {
            self.left = Some(child);
        }
    }
}
