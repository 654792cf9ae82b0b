use super::{Node, NodeId, SyntaxTree, TreeError};

/// Builds a [`SyntaxTree`] from a nested open/close sequence.
///
/// Nodes can only be attached under the currently open node, so the result is
/// a tree by construction. Misuse is reported once, from [`build`](Self::build).
#[derive(Debug, Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<Node>,
    stack: Vec<NodeId>,
    root: Option<NodeId>,
    error: Option<TreeError>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an inner node; children added until the matching `close` belong to it.
    pub fn open(&mut self, kind: &str, value: Option<&str>) -> NodeId {
        let id = self.attach(kind, value);
        self.stack.push(id);
        id
    }

    pub fn close(&mut self) {
        if self.stack.pop().is_none() && self.error.is_none() {
            self.error = Some(TreeError::UnbalancedClose);
        }
    }

    pub fn leaf(&mut self, kind: &str, value: Option<&str>) -> NodeId {
        self.attach(kind, value)
    }

    pub fn build(self) -> Result<SyntaxTree, TreeError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(TreeError::UnclosedNodes(self.stack.len()));
        }
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        Ok(SyntaxTree::from_nodes(self.nodes, root))
    }

    fn attach(&mut self, kind: &str, value: Option<&str>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let parent = self.stack.last().copied();

        match parent {
            Some(p) => self.nodes[p.index()].children.push(id),
            None if self.root.is_none() => self.root = Some(id),
            None => {
                if self.error.is_none() {
                    self.error = Some(TreeError::MultipleRoots);
                }
            }
        }

        self.nodes.push(Node {
            kind: kind.to_string(),
            value: value.map(String::from),
            parent,
            children: Vec::new(),
        });
        id
    }
}
