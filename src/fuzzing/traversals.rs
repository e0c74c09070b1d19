use ip_network_table_deps_treebitmap::IpLookupTable;

use super::*;

qc!(cover, _cover);
fn _cover((tree, addr): (Tree<TestPrefix, i32>, TestAddr)) -> bool {
    let entries = tree.iter().map(|(p, t)| (p, *t)).collect::<Vec<_>>();
    tree.cover(&addr.0)
        .map(|(p, t)| (p, *t))
        .eq(naive_cover(&entries, addr.0))
}

qc!(cover_ends_in_lookup, _cover_ends_in_lookup);
fn _cover_ends_in_lookup((tree, addr): (Tree<TestPrefix, i32>, TestAddr)) -> bool {
    tree.cover(&addr.0).last() == tree.lookup(&addr.0)
}

qc!(cover_of_a_prefix, _cover_of_a_prefix);
fn _cover_of_a_prefix((tree, start): (Tree<TestPrefix, i32>, TestPrefix)) -> bool {
    let want = tree
        .iter()
        .filter(|(p, _)| p.contains(&start))
        .collect::<Vec<_>>();
    tree.cover(&start).eq(want)
}

qc!(lookup_traverse_stops_early, _lookup_traverse_stops_early);
fn _lookup_traverse_stops_early((tree, addr, k): (Tree<TestPrefix, i32>, TestAddr, u8)) -> bool {
    let k = (k % 8) as usize;
    let mut seen = Vec::new();
    tree.lookup_traverse(&addr.0, |p, t| {
        seen.push((p, *t));
        seen.len() <= k
    });
    let want = tree
        .cover(&addr.0)
        .map(|(p, t)| (p, *t))
        .take(k + 1)
        .collect::<Vec<_>>();
    seen == want
}

qc!(treebitmap, _treebitmap);
fn _treebitmap((list, addrs): (Vec<(TestPrefix, i32)>, Vec<TestAddr>)) -> bool {
    let mut tree = Tree::new();
    let mut table = IpLookupTable::<Ipv4Addr, i32>::new();
    for (p, t) in list {
        tree.insert(p, t);
        table.insert(Ipv4Addr::from(p.0), p.1 as u32, t);
    }
    addrs.into_iter().all(|TestAddr(a)| {
        let got = tree.lookup(&a).map(|(p, t)| (p.0, p.1 as u32, *t));
        let want = table
            .longest_match(a)
            .map(|(net, len, t)| (u32::from(net), len, *t));
        got == want
    })
}
