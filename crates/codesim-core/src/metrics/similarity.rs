//! Edit-distance based similarity between two compared trees.
//!
//! Every destination node is charged by its [`ChangeKind`] and every source
//! node without a partner is charged once as a deletion. The total is then
//! normalized by the combined size of both trees:
//!
//! ```text
//! similarity = 1 - edit_cost / (size(source) + size(destination))
//! ```
//!
//! The value is not clamped; inconsistent oracle output can push it below zero.

use std::fmt;

use tracing::debug;

use super::size::tree_size;
use crate::model::change::ChangeKind;
use crate::model::comparison::ComparisonResult;
use crate::tree::{SyntaxTreeView, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Similarity {
    pub edit_cost: u64,
    pub source_size: usize,
    pub destination_size: usize,
}

impl Similarity {
    pub fn total_size(&self) -> usize {
        self.source_size + self.destination_size
    }

    /// `1 - edit_cost / total_size`, in raw form.
    pub fn ratio(&self) -> f64 {
        1.0 - self.edit_cost as f64 / self.total_size() as f64
    }

    pub fn percentage(&self) -> f64 {
        100.0 * self.ratio()
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.percentage())
    }
}

/// Edit units charged for one destination node.
pub fn change_weight(kind: ChangeKind) -> u64 {
    match kind {
        ChangeKind::None => 0,
        ChangeKind::Update | ChangeKind::Insert | ChangeKind::Move => 1,
        ChangeKind::UpdateMove => 2,
        // source-side marker; deletions are charged from the mapping instead
        ChangeKind::Delete => 0,
    }
}

pub fn edit_cost<T: SyntaxTreeView>(result: &ComparisonResult<'_, T>) -> Result<u64, TreeError> {
    let mut cost = 0;

    for dst in result.destination().all_nodes() {
        cost += change_weight(result.change(dst)?);
    }

    for src in result.source().all_nodes() {
        if result.mapped(src)?.is_none() {
            cost += 1;
        }
    }

    Ok(cost)
}

pub fn score<T: SyntaxTreeView>(result: &ComparisonResult<'_, T>) -> Result<Similarity, TreeError> {
    let similarity = Similarity {
        edit_cost: edit_cost(result)?,
        source_size: tree_size(result.source())?,
        destination_size: tree_size(result.destination())?,
    };
    debug!(
        edit_cost = similarity.edit_cost,
        total_size = similarity.total_size(),
        "scored comparison"
    );
    Ok(similarity)
}
