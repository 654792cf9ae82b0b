use std::collections::VecDeque;

use crate::tree::{Node, NodeId, SyntaxTreeView, TreeError};
use crate::utils::hash::subtree_hash;

/// Per-node facts the matcher needs, computed once per tree.
///
/// Building the index is the only fallible step: every id reachable from the
/// root is validated here, so lookups afterwards index plain vectors.
pub(crate) struct TreeIndex<'a> {
    pub root: NodeId,
    nodes: Vec<&'a Node>,
    preorder: Vec<NodeId>,
    rank: Vec<usize>,
    pub postorder: Vec<NodeId>,
    pub bfs: Vec<NodeId>,
    height: Vec<usize>,
    size: Vec<usize>,
    hash: Vec<u64>,
}

impl<'a> TreeIndex<'a> {
    pub fn build<T: SyntaxTreeView>(tree: &'a T) -> Result<Self, TreeError> {
        let count = tree.node_count();
        let nodes = (0..count)
            .map(|i| tree.node(NodeId::new(i)))
            .collect::<Result<Vec<_>, _>>()?;
        let check = |id: NodeId| {
            if id.index() < count {
                Ok(id)
            } else {
                Err(TreeError::InvalidNodeId { id, len: count })
            }
        };

        let root = check(tree.root())?;

        // preorder, children left to right
        let mut preorder = Vec::with_capacity(count);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            preorder.push(id);
            for &child in nodes[id.index()].children.iter().rev() {
                stack.push(check(child)?);
            }
        }

        let mut rank = vec![0; count];
        for (i, id) in preorder.iter().enumerate() {
            rank[id.index()] = i;
        }

        // reverse preorder visits every child before its parent
        let mut height = vec![1; count];
        let mut size = vec![1; count];
        let mut hash = vec![0; count];
        for &id in preorder.iter().rev() {
            let node = nodes[id.index()];
            for child in &node.children {
                height[id.index()] = height[id.index()].max(height[child.index()] + 1);
                size[id.index()] += size[child.index()];
            }
            let h = subtree_hash(node, node.children.iter().map(|c| hash[c.index()]));
            hash[id.index()] = h;
        }

        let mut postorder = Vec::with_capacity(count);
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                postorder.push(id);
                continue;
            }
            stack.push((id, true));
            for &child in nodes[id.index()].children.iter().rev() {
                stack.push((child, false));
            }
        }

        let mut bfs = Vec::with_capacity(count);
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            bfs.push(id);
            queue.extend(nodes[id.index()].children.iter().copied());
        }

        Ok(TreeIndex {
            root,
            nodes,
            preorder,
            rank,
            postorder,
            bfs,
            height,
            size,
            hash,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &'a Node {
        self.nodes[id.index()]
    }

    pub fn children(&self, id: NodeId) -> &'a [NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn height(&self, id: NodeId) -> usize {
        self.height[id.index()]
    }

    pub fn size(&self, id: NodeId) -> usize {
        self.size[id.index()]
    }

    pub fn hash(&self, id: NodeId) -> u64 {
        self.hash[id.index()]
    }

    pub fn rank(&self, id: NodeId) -> usize {
        self.rank[id.index()]
    }

    /// Strict descendants of `id`, in preorder.
    pub fn descendants(&self, id: NodeId) -> &[NodeId] {
        let start = self.rank(id) + 1;
        &self.preorder[start..start + self.size(id) - 1]
    }

    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let (r, a) = (self.rank(id), self.rank(ancestor));
        r > a && r < a + self.size(ancestor)
    }

    /// Same shape, kinds and values. Hashes only filter candidates; the
    /// preorder sequence of labels and arities decides.
    pub fn isomorphic(&self, id: NodeId, other: &TreeIndex<'_>, other_id: NodeId) -> bool {
        if self.hash(id) != other.hash(other_id) || self.size(id) != other.size(other_id) {
            return false;
        }
        let same = |a: NodeId, b: NodeId| {
            let (n1, n2) = (self.node(a), other.node(b));
            n1.same_label(n2) && n1.children.len() == n2.children.len()
        };
        same(id, other_id)
            && self
                .descendants(id)
                .iter()
                .zip(other.descendants(other_id))
                .all(|(&a, &b)| same(a, b))
    }
}
