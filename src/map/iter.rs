//! Module that contains the implementation for the iterators

use either::{Either, Left, Right};

use crate::family::{JointAddress, JointPrefix};
use crate::tree;

use super::MapTrie;

/// An iterator over all entries of a [`MapTrie`], first all IPv4 entries, then all IPv6 entries.
pub struct Iter<'a, P: JointPrefix, T> {
    pub(crate) v4: tree::Iter<'a, P::V4, T>,
    pub(crate) v6: tree::Iter<'a, P::V6, T>,
}

impl<P: JointPrefix, T> Clone for Iter<'_, P, T> {
    fn clone(&self) -> Self {
        Self {
            v4: self.v4.clone(),
            v6: self.v6.clone(),
        }
    }
}

impl<'a, P: JointPrefix, T> Iterator for Iter<'a, P, T> {
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<(P, &'a T)> {
        if let Some((p, t)) = self.v4.next() {
            return Some((P::from_v4(p), t));
        }
        self.v6.next().map(|(p, t)| (P::from_v6(p), t))
    }
}

/// An iterator over all prefixes of a [`MapTrie`].
#[derive(Clone)]
pub struct Keys<'a, P: JointPrefix, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<P: JointPrefix, T> Iterator for Keys<'_, P, T> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over all values of a [`MapTrie`].
#[derive(Clone)]
pub struct Values<'a, P: JointPrefix, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<'a, P: JointPrefix, T> Iterator for Values<'a, P, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over all owned entries of a [`MapTrie`], first all IPv4 entries, then all IPv6
/// entries.
pub struct IntoIter<P: JointPrefix, T> {
    v4: tree::IntoIter<P::V4, T>,
    v6: tree::IntoIter<P::V6, T>,
}

impl<P: JointPrefix, T> Iterator for IntoIter<P, T> {
    type Item = (P, T);

    fn next(&mut self) -> Option<(P, T)> {
        if let Some((p, t)) = self.v4.next() {
            return Some((P::from_v4(p), t));
        }
        self.v6.next().map(|(p, t)| (P::from_v6(p), t))
    }
}

impl<P: JointPrefix, T> IntoIterator for MapTrie<P, T> {
    type Item = (P, T);

    type IntoIter = IntoIter<P, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            v4: self.v4.into_iter(),
            v6: self.v6.into_iter(),
        }
    }
}

impl<'a, P: JointPrefix, T> IntoIterator for &'a MapTrie<P, T> {
    type Item = (P, &'a T);

    type IntoIter = Iter<'a, P, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            v4: self.v4.iter(),
            v6: self.v6.iter(),
        }
    }
}

/// An iterator over all prefixes of a [`MapTrie`] that contain a given address, from the least to
/// the most specific one. See [`MapTrie::cover`] for how to create this iterator.
pub struct Cover<'a, 'b, P, A, T>
where
    P: JointPrefix,
    A: JointAddress,
{
    #[allow(clippy::type_complexity)]
    pub(super) inner:
        Either<tree::Cover<'a, 'b, P::V4, A::V4, T>, tree::Cover<'a, 'b, P::V6, A::V6, T>>,
}

impl<'a, P, A, T> Iterator for Cover<'a, '_, P, A, T>
where
    P: JointPrefix,
    A: JointAddress,
{
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Left(c) => c.next().map(|(p, t)| (P::from_v4(p), t)),
            Right(c) => c.next().map(|(p, t)| (P::from_v6(p), t)),
        }
    }
}
