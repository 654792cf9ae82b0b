use thiserror::Error;

use super::change::ChangeKind;
use crate::tree::{NodeId, SyntaxTreeView, TreeError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("{table} table has {actual} entries, tree has {expected} nodes")]
    ShapeMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("destination node {dst} is mapped from both {first} and {second}")]
    MalformedMapping {
        dst: NodeId,
        first: NodeId,
        second: NodeId,
    },
}

/// Output of a diff oracle: both trees, a [`ChangeKind`] for every destination
/// node and an optional destination partner for every source node.
///
/// Both tables are indexed by [`NodeId::index`].
#[derive(Debug)]
pub struct ComparisonResult<'a, T: SyntaxTreeView> {
    source: &'a T,
    destination: &'a T,
    changes: Vec<ChangeKind>,
    mapping: Vec<Option<NodeId>>,
}

impl<'a, T: SyntaxTreeView> ComparisonResult<'a, T> {
    /// The mapping is trusted, not repaired. Debug builds assert it is injective.
    pub fn new(
        source: &'a T,
        destination: &'a T,
        changes: Vec<ChangeKind>,
        mapping: Vec<Option<NodeId>>,
    ) -> Result<Self, DiffError> {
        if changes.len() != destination.node_count() {
            return Err(DiffError::ShapeMismatch {
                table: "change",
                expected: destination.node_count(),
                actual: changes.len(),
            });
        }
        if mapping.len() != source.node_count() {
            return Err(DiffError::ShapeMismatch {
                table: "mapping",
                expected: source.node_count(),
                actual: mapping.len(),
            });
        }

        let result = ComparisonResult {
            source,
            destination,
            changes,
            mapping,
        };
        debug_assert_eq!(result.check_mapping(), Ok(()));
        Ok(result)
    }

    pub fn source(&self) -> &'a T {
        self.source
    }

    pub fn destination(&self) -> &'a T {
        self.destination
    }

    /// Change assigned to a destination node.
    pub fn change(&self, dst: NodeId) -> Result<ChangeKind, TreeError> {
        self.changes
            .get(dst.index())
            .copied()
            .ok_or(TreeError::InvalidNodeId {
                id: dst,
                len: self.changes.len(),
            })
    }

    /// Destination partner of a source node, `None` when it was deleted.
    pub fn mapped(&self, src: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.mapping
            .get(src.index())
            .copied()
            .ok_or(TreeError::InvalidNodeId {
                id: src,
                len: self.mapping.len(),
            })
    }

    /// Source-side view of a change: `Delete` for unmatched nodes, otherwise
    /// whatever the partner was classified as.
    pub fn source_change(&self, src: NodeId) -> Result<ChangeKind, TreeError> {
        match self.mapped(src)? {
            Some(dst) => self.change(dst),
            None => Ok(ChangeKind::Delete),
        }
    }

    /// Reports the first destination node claimed by two source nodes.
    pub fn check_mapping(&self) -> Result<(), DiffError> {
        let mut claimed: Vec<Option<NodeId>> = vec![None; self.destination.node_count()];
        for (i, dst) in self.mapping.iter().enumerate() {
            let Some(dst) = dst else { continue };
            let src = NodeId::new(i);
            let slot = claimed.get_mut(dst.index()).ok_or(TreeError::InvalidNodeId {
                id: *dst,
                len: self.destination.node_count(),
            })?;
            if let Some(first) = *slot {
                return Err(DiffError::MalformedMapping {
                    dst: *dst,
                    first,
                    second: src,
                });
            }
            *slot = Some(src);
        }
        Ok(())
    }
}
