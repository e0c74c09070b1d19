//! Module that contains the implementation for the iterators

use num_traits::{PrimInt, Zero};

use crate::prefix::{mask_from_prefix_len, BitPath, Prefix};

use super::{child_repr, Node, Tree};

/// An iterator over all entries of a [`Tree`] in lexicographic order.
pub struct Iter<'a, P: Prefix, T> {
    pub(crate) tree: &'a Tree<P, T>,
    pub(crate) nodes: Vec<(usize, P::R, u8)>,
}

// derive would require `P: Clone`
impl<P: Prefix, T> Clone for Iter<'_, P, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            nodes: self.nodes.clone(),
        }
    }
}

impl<'a, P: Prefix, T> Iterator for Iter<'a, P, T> {
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<(P, &'a T)> {
        while let Some((cur, repr, depth)) = self.nodes.pop() {
            let node = &self.tree.table[cur];
            push_children(&mut self.nodes, node, repr, depth);
            if let Some(v) = &node.value {
                return Some((P::from_repr_len(repr, depth), v));
            }
        }
        None
    }
}

/// An iterator over all prefixes of a [`Tree`] in lexicographic order.
#[derive(Clone)]
pub struct Keys<'a, P: Prefix, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<P: Prefix, T> Iterator for Keys<'_, P, T> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over all values of a [`Tree`] in lexicographic order of their associated
/// prefixes.
#[derive(Clone)]
pub struct Values<'a, P: Prefix, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<'a, P: Prefix, T> Iterator for Values<'a, P, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over all owned entries of a [`Tree`] in lexicographic order.
pub struct IntoIter<P: Prefix, T> {
    table: Vec<Node<T>>,
    nodes: Vec<(usize, P::R, u8)>,
}

impl<P: Prefix, T> Iterator for IntoIter<P, T> {
    type Item = (P, T);

    fn next(&mut self) -> Option<(P, T)> {
        while let Some((cur, repr, depth)) = self.nodes.pop() {
            let node = &mut self.table[cur];
            let value = node.value.take();
            push_children(&mut self.nodes, node, repr, depth);
            if let Some(v) = value {
                return Some((P::from_repr_len(repr, depth), v));
            }
        }
        None
    }
}

/// Push the children of `node` such that the left one is popped first.
#[inline(always)]
fn push_children<R, T>(nodes: &mut Vec<(usize, R, u8)>, node: &Node<T>, repr: R, depth: u8)
where
    R: PrimInt,
{
    if let Some(right) = node.right {
        nodes.push((right, child_repr(repr, depth, true), depth + 1));
    }
    if let Some(left) = node.left {
        nodes.push((left, repr, depth + 1));
    }
}

impl<P: Prefix, T> IntoIterator for Tree<P, T> {
    type Item = (P, T);

    type IntoIter = IntoIter<P, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self.table,
            nodes: vec![(0, P::R::zero(), 0)],
        }
    }
}

impl<'a, P: Prefix, T> IntoIterator for &'a Tree<P, T> {
    type Item = (P, &'a T);

    type IntoIter = Iter<'a, P, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            tree: self,
            nodes: vec![(0, P::R::zero(), 0)],
        }
    }
}

/// An iterator over all prefixes of a [`Tree`] that contain a given address, from the least to
/// the most specific one. See [`Tree::cover`] for how to create this iterator.
pub struct Cover<'a, 'b, P, A, T> {
    pub(super) tree: &'a Tree<P, T>,
    pub(super) addr: &'b A,
    /// The next node to visit and its depth.
    pub(super) next: Option<(usize, u8)>,
}

impl<'a, P, A, T> Iterator for Cover<'a, '_, P, A, T>
where
    P: Prefix,
    A: BitPath<R = P::R>,
{
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.next.take() {
            let node = &self.tree.table[idx];
            if depth < self.addr.prefix_len() {
                self.next = node
                    .child(self.addr.is_bit_set(depth))
                    .map(|child| (child, depth + 1));
            }
            if let Some(value) = node.value.as_ref() {
                let repr = self.addr.repr() & mask_from_prefix_len(depth);
                return Some((P::from_repr_len(repr, depth), value));
            }
        }
        None
    }
}
