//! Node matching between two indexed trees.
//!
//! Two phases, after the GumTree family of algorithms:
//! 1. Top-down: pair the highest identical subtrees first, whole subtree at once.
//! 2. Bottom-up: pair inner nodes whose matched descendants mostly agree, then
//!    recover their remaining children greedily.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::index::TreeIndex;
use super::mapping::Mapping;
use crate::config::ComparisonOptions;
use crate::tree::{Node, NodeId};

/// Nodes keyed by subtree height; `pop` yields every node of the current
/// maximum height, in preorder.
struct HeightQueue<'i, 'a> {
    index: &'i TreeIndex<'a>,
    heap: BinaryHeap<(usize, Reverse<usize>, NodeId)>,
}

impl<'i, 'a> HeightQueue<'i, 'a> {
    fn new(index: &'i TreeIndex<'a>) -> Self {
        let mut queue = Self {
            index,
            heap: BinaryHeap::new(),
        };
        queue.push(index.root);
        queue
    }

    fn push(&mut self, id: NodeId) {
        self.heap
            .push((self.index.height(id), Reverse(self.index.rank(id)), id));
    }

    fn peek_max(&self) -> usize {
        self.heap.peek().map(|(h, _, _)| *h).unwrap_or(0)
    }

    fn pop(&mut self) -> Vec<NodeId> {
        let max = self.peek_max();
        let mut out = Vec::new();
        while let Some(&(h, _, id)) = self.heap.peek() {
            if h != max {
                break;
            }
            self.heap.pop();
            out.push(id);
        }
        out
    }

    fn open(&mut self, id: NodeId) {
        for &child in self.index.children(id) {
            self.push(child);
        }
    }
}

pub(crate) fn match_top_down(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &mut Mapping,
    min_height: usize,
) {
    let mut l1 = HeightQueue::new(src);
    let mut l2 = HeightQueue::new(dst);

    loop {
        let (max1, max2) = (l1.peek_max(), l2.peek_max());
        if max1.min(max2) <= min_height {
            break;
        }
        if max1 > max2 {
            for id in l1.pop() {
                l1.open(id);
            }
            continue;
        }
        if max2 > max1 {
            for id in l2.pop() {
                l2.open(id);
            }
            continue;
        }

        let h1 = l1.pop();
        let h2 = l2.pop();

        let mut by_hash: HashMap<u64, Vec<NodeId>> = HashMap::new();
        for &id2 in &h2 {
            by_hash.entry(dst.hash(id2)).or_default().push(id2);
        }

        for &id1 in &h1 {
            let Some(candidates) = by_hash.get_mut(&src.hash(id1)) else {
                continue;
            };
            let found = candidates
                .iter()
                .position(|&id2| !mapping.has_dst(id2) && src.isomorphic(id1, dst, id2));
            if let Some(pos) = found {
                let id2 = candidates.remove(pos);
                link_isomorphic(src, dst, mapping, id1, id2);
            }
        }

        for id1 in h1 {
            if !mapping.has_src(id1) {
                l1.open(id1);
            }
        }
        for id2 in h2 {
            if !mapping.has_dst(id2) {
                l2.open(id2);
            }
        }
    }
}

/// Link two identical subtrees node by node.
fn link_isomorphic(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &mut Mapping,
    id1: NodeId,
    id2: NodeId,
) {
    let mut stack = vec![(id1, id2)];
    while let Some((a, b)) = stack.pop() {
        mapping.link(a, b);
        stack.extend(
            src.children(a)
                .iter()
                .copied()
                .zip(dst.children(b).iter().copied()),
        );
    }
}

pub(crate) fn match_bottom_up(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &mut Mapping,
    options: &ComparisonOptions,
) {
    for &id1 in &src.postorder {
        if id1 == src.root {
            let id2 = dst.root;
            if !mapping.has_src(id1)
                && !mapping.has_dst(id2)
                && src.node(id1).kind == dst.node(id2).kind
            {
                mapping.link(id1, id2);
                recover(src, dst, mapping, id1, id2, options.max_recovery_size);
            }
            break;
        }

        if mapping.has_src(id1) {
            continue;
        }
        if !src.children(id1).iter().any(|&c| mapping.has_src(c)) {
            continue;
        }

        if let Some(id2) = find_candidate(src, dst, mapping, id1, options.min_similarity) {
            mapping.link(id1, id2);
            recover(src, dst, mapping, id1, id2, options.max_recovery_size);
        }
    }
}

/// Best unmatched destination node for `id1`: same kind, an ancestor of some
/// partner of `id1`'s descendants, and the highest descendant overlap.
fn find_candidate(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &Mapping,
    id1: NodeId,
    min_similarity: f64,
) -> Option<NodeId> {
    let kind = &src.node(id1).kind;

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut candidates: Vec<NodeId> = Vec::new();
    for &d in src.descendants(id1) {
        let Some(partner) = mapping.dst_of(d) else {
            continue;
        };
        let mut cursor = dst.parent(partner);
        while let Some(anc) = cursor {
            if !seen.insert(anc) {
                break;
            }
            if !mapping.has_dst(anc) && &dst.node(anc).kind == kind {
                candidates.push(anc);
            }
            cursor = dst.parent(anc);
        }
    }
    candidates.sort_by_key(|&id| dst.rank(id));

    let mut best: Option<NodeId> = None;
    let mut best_score = 0.0;
    for id2 in candidates {
        let score = jaccard(src, dst, mapping, id1, id2);
        if score >= min_similarity && score > best_score {
            best_score = score;
            best = Some(id2);
        }
    }
    best
}

/// Matched descendants shared by both subtrees over all their descendants.
fn jaccard(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &Mapping,
    id1: NodeId,
    id2: NodeId,
) -> f64 {
    let common = src
        .descendants(id1)
        .iter()
        .filter_map(|&d| mapping.dst_of(d))
        .filter(|&p| dst.is_descendant(p, id2))
        .count();
    let union = (src.size(id1) - 1) + (dst.size(id2) - 1) - common;
    if union == 0 {
        return 0.0;
    }
    common as f64 / union as f64
}

/// Pair up unmatched children below a freshly matched pair, recursively.
///
/// Children with identical labels are paired first, in sibling order. Pairs
/// with only the kind in common follow, but only while both subtrees are
/// within `max_size`.
fn recover(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &mut Mapping,
    id1: NodeId,
    id2: NodeId,
    max_size: usize,
) {
    let mut stack = vec![(id1, id2)];
    while let Some((a, b)) = stack.pop() {
        stack.extend(pair_children(src, dst, mapping, a, b, |n1, n2| {
            n1.same_label(n2)
        }));
        if src.size(a) <= max_size && dst.size(b) <= max_size {
            stack.extend(pair_children(src, dst, mapping, a, b, |n1, n2| {
                n1.kind == n2.kind
            }));
        }
    }
}

/// Link each unmatched child of `a` to the first unmatched child of `b`
/// accepted by `same`. Returns the new pairs.
fn pair_children(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &mut Mapping,
    a: NodeId,
    b: NodeId,
    same: impl Fn(&Node, &Node) -> bool,
) -> Vec<(NodeId, NodeId)> {
    let mut linked = Vec::new();
    for &c1 in src.children(a) {
        if mapping.has_src(c1) {
            continue;
        }
        let found = dst
            .children(b)
            .iter()
            .copied()
            .find(|&c2| !mapping.has_dst(c2) && same(src.node(c1), dst.node(c2)));
        if let Some(c2) = found {
            mapping.link(c1, c2);
            linked.push((c1, c2));
        }
    }
    linked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{SyntaxTree, SyntaxTreeBuilder, SyntaxTreeView};

    // (root (call f (args x y)) (call g (args z)) w)
    fn program(g_arg: &str, extra: bool) -> SyntaxTree {
        let mut b = SyntaxTreeBuilder::new();
        b.open("root", None);
        b.open("call", None);
        b.leaf("identifier", Some("f"));
        b.open("args", None);
        b.leaf("identifier", Some("x"));
        b.leaf("identifier", Some("y"));
        b.close();
        b.close();
        b.open("call", None);
        b.leaf("identifier", Some("g"));
        b.open("args", None);
        b.leaf("identifier", Some(g_arg));
        b.close();
        b.close();
        if extra {
            b.leaf("identifier", Some("extra"));
        }
        b.leaf("identifier", Some("w"));
        b.close();
        b.build().unwrap()
    }

    fn run(src: &SyntaxTree, dst: &SyntaxTree, options: &ComparisonOptions) -> Mapping {
        let i1 = TreeIndex::build(src).unwrap();
        let i2 = TreeIndex::build(dst).unwrap();
        let mut mapping = Mapping::new(i1.len(), i2.len());
        match_top_down(&i1, &i2, &mut mapping, options.min_height);
        match_bottom_up(&i1, &i2, &mut mapping, options);
        mapping
    }

    #[test]
    fn test_identical_trees_fully_matched() {
        let (src, dst) = (program("z", false), program("z", false));
        let mapping = run(&src, &dst, &ComparisonOptions::default());
        assert_eq!(mapping.matched(), src.node_count());
        for i in 0..src.node_count() {
            assert_eq!(mapping.dst_of(NodeId::new(i)), Some(NodeId::new(i)));
        }
    }

    #[test]
    fn test_top_down_only_matches_high_subtrees() {
        let (src, dst) = (program("z", false), program("q", false));
        let options = ComparisonOptions {
            min_height: 1,
            ..ComparisonOptions::default()
        };
        let i1 = TreeIndex::build(&src).unwrap();
        let i2 = TreeIndex::build(&dst).unwrap();
        let mut mapping = Mapping::new(i1.len(), i2.len());
        match_top_down(&i1, &i2, &mut mapping, options.min_height);

        // `call f (args x y)` survives intact; `call g` does not
        let call_f = src.children(src.root()).unwrap()[0];
        let call_g = src.children(src.root()).unwrap()[1];
        assert!(mapping.has_src(call_f));
        assert!(!mapping.has_src(call_g));
        assert!(!mapping.has_src(src.root()));
    }

    #[test]
    fn test_changed_leaf_recovered_bottom_up() {
        let (src, dst) = (program("z", false), program("q", false));
        let mapping = run(&src, &dst, &ComparisonOptions::default());
        // every node has a partner; the changed identifier pairs by kind
        assert_eq!(mapping.matched(), src.node_count());
    }

    #[test]
    fn test_extra_node_left_unmatched() {
        let (src, dst) = (program("z", false), program("z", true));
        let mapping = run(&src, &dst, &ComparisonOptions::default());
        assert_eq!(mapping.matched(), src.node_count());
        let extra = dst.children(dst.root()).unwrap()[2];
        assert!(!mapping.has_dst(extra));
    }

    #[test]
    fn test_different_roots_not_forced() {
        let mut b = SyntaxTreeBuilder::new();
        b.leaf("module", None);
        let src = b.build().unwrap();
        let mut b = SyntaxTreeBuilder::new();
        b.leaf("translation_unit", None);
        let dst = b.build().unwrap();
        let mapping = run(&src, &dst, &ComparisonOptions::default());
        assert_eq!(mapping.matched(), 0);
    }
}
