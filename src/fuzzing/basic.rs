use std::collections::HashMap;

use super::*;
use itertools::Itertools;

qc!(new, _new);
fn _new(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut tree = Tree::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        tree.insert(p, t);
        hmap.insert(p, t);
    }

    // pre-order is the sort order of `(repr, len)`
    tree.len() == hmap.len() && tree.into_iter().eq(hmap.into_iter().sorted())
}

qc!(insert_or_update, _insert_or_update);
fn _insert_or_update(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut tree = Tree::new();
    let mut hmap: HashMap<TestPrefix, i64> = HashMap::new();

    for (p, t) in list {
        let t = t as i64;
        let new = *tree.insert_or_update(p, || t, |x| x + t);
        let want = *hmap.entry(p).and_modify(|x| *x += t).or_insert(t);
        if new != want {
            return false;
        }
    }

    tree.len() == hmap.len() && tree.iter().all(|(p, t)| hmap.get(&p) == Some(t))
}

qc!(get, _get);
fn _get((list, probes): (Vec<(TestPrefix, i32)>, Vec<TestPrefix>)) -> bool {
    let tree: Tree<_, _> = list.iter().copied().collect();
    let hmap: HashMap<_, _> = list.into_iter().collect();
    probes
        .iter()
        .chain(hmap.keys())
        .all(|p| tree.get(p) == hmap.get(p) && tree.contains_key(p) == hmap.contains_key(p))
}

qc!(lookup, _lookup);
fn _lookup((list, addrs): (Vec<(TestPrefix, i32)>, Vec<TestAddr>)) -> bool {
    let tree: Tree<_, _> = list.iter().copied().collect();
    let entries = tree.iter().map(|(p, t)| (p, *t)).collect::<Vec<_>>();
    addrs.into_iter().all(|TestAddr(a)| {
        tree.lookup(&a).map(|(p, t)| (p, *t)) == naive_lookup(&entries, a)
    })
}

qc!(lookup_mut, _lookup_mut);
fn _lookup_mut((mut tree, addr): (Tree<TestPrefix, i32>, TestAddr)) -> bool {
    let want = tree.lookup(&addr.0).map(|(p, t)| (p, *t));
    let got = tree.lookup_mut(&addr.0).map(|(p, t)| {
        *t = t.wrapping_add(1);
        (p, t.wrapping_sub(1))
    });
    let after = want.map(|(p, t)| (p, t.wrapping_add(1)));
    got == want && tree.lookup(&addr.0).map(|(p, t)| (p, *t)) == after
}

qc!(insertion_order, _insertion_order);
fn _insertion_order((list, addrs): (Vec<(TestPrefix, i32)>, Vec<TestAddr>)) -> bool {
    let unique: Vec<_> = list
        .into_iter()
        .collect::<HashMap<_, _>>()
        .into_iter()
        .sorted()
        .collect();
    let forward: Tree<_, _> = unique.iter().copied().collect();
    let backward: Tree<_, _> = unique.iter().rev().copied().collect();

    forward == backward
        && forward.node_count() == backward.node_count()
        && addrs
            .iter()
            .all(|TestAddr(a)| forward.lookup(a) == backward.lookup(a))
}

qc!(equality, _equality);
fn _equality(list: Vec<(TestPrefix, i32)>) -> bool {
    let tree: Tree<_, _> = list.into_iter().collect();
    let clone = tree.clone().into_iter().collect::<Tree<_, _>>();
    tree == clone && tree.len() == clone.len() && tree.is_empty() == clone.is_empty()
}

qc!(keys_and_values, _keys_and_values);
fn _keys_and_values(tree: Tree<TestPrefix, i32>) -> bool {
    tree.keys().eq(tree.iter().map(|(p, _)| p))
        && tree.values().eq(tree.iter().map(|(_, t)| t))
        && tree.keys().tuple_windows().all(|(a, b)| a < b)
}
