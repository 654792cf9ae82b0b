//! Read-only syntax trees.
//!
//! A [`SyntaxTree`] is an arena of [`Node`]s addressed by dense [`NodeId`]s.
//! Trees are produced once by [`SyntaxTreeBuilder`] (usually driven by the
//! front-end in [`crate::parser`]) and never mutated afterwards. Everything
//! downstream (the diff engine, the size counter, the scorer) reads trees only
//! through the [`SyntaxTreeView`] trait.

mod builder;

pub use builder::SyntaxTreeBuilder;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a node, valid only inside the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {id} does not belong to this tree ({len} nodes)")]
    InvalidNodeId { id: NodeId, len: usize },
    #[error("tree has no root node")]
    EmptyTree,
    #[error("{0} node(s) were opened but never closed")]
    UnclosedNodes(usize),
    #[error("close() called with no open node")]
    UnbalancedClose,
    #[error("a second root node was added")]
    MultipleRoots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Grammar node type, e.g. `function_definition`.
    pub kind: String,
    /// Token text for leaves, operator/keyword text for inner nodes.
    pub value: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    /// Two nodes carry the same label when both kind and value agree.
    pub fn same_label(&self, other: &Node) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

/// Read-only traversal contract over a parsed program.
pub trait SyntaxTreeView {
    fn root(&self) -> NodeId;

    fn node(&self, id: NodeId) -> Result<&Node, TreeError>;

    fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.node(id)?.children)
    }

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    /// Number of nodes held by the tree. Per-node tables are sized by this.
    fn node_count(&self) -> usize;

    /// Every node of the tree, each exactly once. Calling it again restarts
    /// the enumeration.
    fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_;
}

/// Arena-backed syntax tree. Ids are handed out in preorder, so the root is
/// always `NodeId(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn from_nodes(nodes: Vec<Node>, root: NodeId) -> Self {
        SyntaxTree { nodes, root }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }
}

impl SyntaxTreeView for SyntaxTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.index()).ok_or(TreeError::InvalidNodeId {
            id,
            len: self.nodes.len(),
        })
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }
}
