//! Module for testing using fuzzing (quickcheck)
#![allow(clippy::type_complexity)]

use std::fmt::Debug;
use std::net::Ipv4Addr;

use crate::*;
use quickcheck::Arbitrary;

mod basic;
mod traversals;

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 10000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        if !f(input.clone()) {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        if !f(i.clone()) {
            shrink_failure(f, i)
        }
    }
    // every shrunken input passes, so `input` is minimal
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

/// The longest stored prefix that contains `addr`, found by scanning all entries.
fn naive_lookup<T: Clone>(entries: &[(TestPrefix, T)], addr: Ipv4Addr) -> Option<(TestPrefix, T)> {
    entries
        .iter()
        .filter(|(p, _)| p.contains(&addr))
        .max_by_key(|(p, _)| p.1)
        .cloned()
}

/// All stored prefixes that contain `addr`, from the shortest to the longest.
fn naive_cover<T: Clone>(entries: &[(TestPrefix, T)], addr: Ipv4Addr) -> Vec<(TestPrefix, T)> {
    let mut cover: Vec<_> = entries
        .iter()
        .filter(|(p, _)| p.contains(&addr))
        .cloned()
        .collect();
    cover.sort_by_key(|(p, _)| p.1);
    cover
}

impl<P: Prefix + Arbitrary, T: Arbitrary> Arbitrary for Tree<P, T> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        <Vec<(P, T)> as Arbitrary>::arbitrary(g)
            .into_iter()
            .collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let elems = self.clone().into_iter().collect::<Vec<_>>();
        Box::new(elems.shrink().map(Tree::from_iter))
    }
}

/// An IPv4 address that is likely to fall into one of the generated [`TestPrefix`]es.
#[derive(PartialEq, Eq, Clone, Copy)]
struct TestAddr(Ipv4Addr);

impl Debug for TestAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0b{:032b}", u32::from(self.0))
    }
}

impl Arbitrary for TestAddr {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(Ipv4Addr::from(u32::arbitrary(g)))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(u32::from(self.0).shrink().map(|x| Self(Ipv4Addr::from(x))))
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(u32, u8);

impl Debug for TestPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let addr = format!("{:032b}", self.0)[..12].to_string();
        write!(f, "0b{addr}/{}", self.1)
    }
}

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
                12, 16, 24, 32,
            ])
            .unwrap();
        let x = u32::arbitrary(g);
        Self::from_repr_len(x, len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.1 == 0 {
            quickcheck::empty_shrinker()
        } else {
            quickcheck::single_shrinker(Self::from_repr_len(self.0, self.1 - 1))
        }
    }
}

impl BitPath for TestPrefix {
    type R = u32;

    fn repr(&self) -> u32 {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

impl Prefix for TestPrefix {
    fn from_repr_len(repr: u32, len: u8) -> Self {
        Self(BitPath::mask(&(repr, len)), len)
    }
}
