//! End-to-end comparison: parse both inputs, align them, score the result.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::{ComparisonOptions, ConfigError};
use crate::diff::{DiffOracle, TreeDiffer};
use crate::metrics::{score, Similarity};
use crate::model::comparison::DiffError;
use crate::parser::{parse_file, ParseError};
use crate::tree::{SyntaxTreeView, TreeError};

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Score two already-built trees with the bundled [`TreeDiffer`].
pub fn compare_sources<T: SyntaxTreeView>(
    source: &T,
    destination: &T,
    options: &ComparisonOptions,
) -> Result<Similarity, CompareError> {
    compare_with(&TreeDiffer, source, destination, options)
}

/// Score two trees with any diff oracle.
pub fn compare_with<D: DiffOracle, T: SyntaxTreeView>(
    oracle: &D,
    source: &T,
    destination: &T,
    options: &ComparisonOptions,
) -> Result<Similarity, CompareError> {
    let result = oracle.diff(source, destination, options)?;
    Ok(score(&result)?)
}

/// Parse both files in parallel and score them. Either parse failure aborts
/// the comparison.
pub fn compare_files(
    source: &Path,
    destination: &Path,
    language: Option<&str>,
    options: &ComparisonOptions,
) -> Result<Similarity, CompareError> {
    let (src_tree, dst_tree) = rayon::join(
        || parse_file(source, language),
        || parse_file(destination, language),
    );
    let (src_tree, dst_tree) = (src_tree?, dst_tree?);
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        "comparing"
    );
    compare_sources(&src_tree, &dst_tree, options)
}
