//! Tree alignment: the diff oracle contract and the bundled matcher.

mod classify;
mod index;
mod mapping;
mod matcher;

use tracing::debug;

use crate::config::{ComparisonOptions, MatchStrategy};
use crate::model::comparison::{ComparisonResult, DiffError};
use crate::tree::SyntaxTreeView;
use index::TreeIndex;
use mapping::Mapping;

/// Anything that can align two syntax trees.
///
/// Implementations must produce one change per destination node and an
/// injective source-to-destination mapping; the scorer trusts both.
pub trait DiffOracle {
    fn diff<'a, T: SyntaxTreeView>(
        &self,
        source: &'a T,
        destination: &'a T,
        options: &ComparisonOptions,
    ) -> Result<ComparisonResult<'a, T>, DiffError>;
}

/// Top-down / bottom-up tree matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDiffer;

impl DiffOracle for TreeDiffer {
    fn diff<'a, T: SyntaxTreeView>(
        &self,
        source: &'a T,
        destination: &'a T,
        options: &ComparisonOptions,
    ) -> Result<ComparisonResult<'a, T>, DiffError> {
        let src = TreeIndex::build(source)?;
        let dst = TreeIndex::build(destination)?;
        let mut mapping = Mapping::new(src.len(), dst.len());

        matcher::match_top_down(&src, &dst, &mut mapping, options.min_height);
        debug!(matched = mapping.matched(), "top-down matching done");

        if options.strategy == MatchStrategy::TopDownBottomUp {
            matcher::match_bottom_up(&src, &dst, &mut mapping, options);
            debug!(matched = mapping.matched(), "bottom-up matching done");
        }

        let changes = classify::classify(&src, &dst, &mapping);
        ComparisonResult::new(source, destination, changes, mapping.into_source_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::score;
    use crate::model::change::ChangeKind;
    use crate::tree::{NodeId, SyntaxTree, SyntaxTreeBuilder};

    // (function (name) (params p...) (body (return (binary lhs rhs))))
    fn function(name: &str, params: &[&str], op: &str, rhs: &str) -> SyntaxTree {
        let mut b = SyntaxTreeBuilder::new();
        b.open("function_definition", None);
        b.leaf("identifier", Some(name));
        b.open("parameter_list", None);
        for p in params {
            b.open("parameter_declaration", None);
            b.leaf("primitive_type", Some("int"));
            b.leaf("identifier", Some(*p));
            b.close();
        }
        b.close();
        b.open("compound_statement", None);
        b.open("return_statement", None);
        b.open("binary_expression", Some(op));
        b.leaf("identifier", Some("a"));
        b.leaf("identifier", Some(rhs));
        b.close();
        b.close();
        b.close();
        b.close();
        b.build().unwrap()
    }

    fn kinds_of<T: SyntaxTreeView>(result: &ComparisonResult<'_, T>) -> Vec<ChangeKind> {
        result
            .destination()
            .all_nodes()
            .map(|id| result.change(id).unwrap())
            .collect()
    }

    #[test]
    fn test_identical_trees_score_100() {
        let src = function("add", &["a", "b"], "+", "b");
        let dst = function("add", &["a", "b"], "+", "b");
        let result = TreeDiffer.diff(&src, &dst, &ComparisonOptions::default()).unwrap();
        assert!(kinds_of(&result).iter().all(|&k| k == ChangeKind::None));
        let sim = score(&result).unwrap();
        assert_eq!(sim.edit_cost, 0);
        assert_eq!(sim.to_string(), "100.00");
    }

    #[test]
    fn test_renamed_function_is_update() {
        let src = function("add", &["a", "b"], "+", "b");
        let dst = function("sum", &["a", "b"], "+", "b");
        let result = TreeDiffer.diff(&src, &dst, &ComparisonOptions::default()).unwrap();
        let kinds = kinds_of(&result);
        assert_eq!(kinds[1], ChangeKind::Update);
        assert_eq!(kinds.iter().filter(|&&k| k != ChangeKind::None).count(), 1);
        assert_eq!(score(&result).unwrap().edit_cost, 1);
    }

    #[test]
    fn test_changed_operator_is_update() {
        let src = function("f", &["a", "b"], "+", "b");
        let dst = function("f", &["a", "b"], "-", "b");
        let result = TreeDiffer.diff(&src, &dst, &ComparisonOptions::default()).unwrap();
        let updated: Vec<&str> = kinds_of(&result)
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == ChangeKind::Update)
            .map(|(i, _)| dst.node(NodeId::new(i)).unwrap().kind.as_str())
            .collect();
        assert_eq!(updated, vec!["binary_expression"]);
    }

    #[test]
    fn test_added_parameter_is_insert() {
        let src = function("f", &["a", "b"], "+", "b");
        let dst = function("f", &["a", "b", "c"], "+", "b");
        let result = TreeDiffer.diff(&src, &dst, &ComparisonOptions::default()).unwrap();
        let inserted = kinds_of(&result)
            .iter()
            .filter(|&&k| k == ChangeKind::Insert)
            .count();
        // parameter_declaration + primitive_type + identifier
        assert_eq!(inserted, 3);
        assert!(src.all_nodes().all(|id| result.mapped(id).unwrap().is_some()));

        let sim = score(&result).unwrap();
        assert_eq!(sim.edit_cost, 3);
        assert!(sim.ratio() < 1.0);
    }

    #[test]
    fn test_removed_parameter_counts_deletions() {
        let src = function("f", &["a", "b", "c"], "+", "b");
        let dst = function("f", &["a", "b"], "+", "b");
        let result = TreeDiffer.diff(&src, &dst, &ComparisonOptions::default()).unwrap();
        let deleted = src
            .all_nodes()
            .filter(|&id| result.source_change(id).unwrap() == ChangeKind::Delete)
            .count();
        assert_eq!(deleted, 3);
        assert_eq!(score(&result).unwrap().edit_cost, 3);
    }

    #[test]
    fn test_top_down_only_leaves_small_trees_unmatched() {
        let src = function("f", &["a"], "+", "b");
        let dst = function("g", &["a"], "+", "b");
        let options = ComparisonOptions {
            strategy: MatchStrategy::TopDown,
            ..ComparisonOptions::default()
        };
        let result = TreeDiffer.diff(&src, &dst, &options).unwrap();
        // the root differs, so it can only be paired bottom-up
        assert_eq!(result.mapped(src.root()).unwrap(), None);
        assert_eq!(result.change(dst.root()).unwrap(), ChangeKind::Insert);
    }

    #[test]
    fn test_mapping_is_injective() {
        let src = function("f", &["a", "b", "c"], "*", "c");
        let dst = function("g", &["c", "b"], "+", "a");
        let result = TreeDiffer.diff(&src, &dst, &ComparisonOptions::default()).unwrap();
        assert_eq!(result.check_mapping(), Ok(()));
    }
}
