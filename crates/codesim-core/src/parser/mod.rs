//! tree-sitter front-end: source text in, [`SyntaxTree`] out.

pub mod languages;
pub mod lowering;

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::tree::{SyntaxTree, SyntaxTreeView, TreeError};
use languages::{get_language_by_id, language_for_path, supported_language_ids, LanguageConfig};
use lowering::lower_tree;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no grammar for {path}")]
    UnsupportedLanguage { path: PathBuf },
    #[error(
        "unknown language: {0} (expected one of {expected})",
        expected = supported_language_ids().collect::<Vec<_>>().join(", ")
    )]
    UnknownLanguage(String),
    #[error("cannot load {language} grammar: {source}")]
    Language {
        language: &'static str,
        source: tree_sitter::LanguageError,
    },
    #[error("{language} parser produced no tree")]
    NoTree { language: &'static str },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

// One Parser per language per thread; both inputs may parse concurrently.
thread_local! {
    static PARSER_CACHE: RefCell<HashMap<&'static str, tree_sitter::Parser>> = RefCell::new(HashMap::new());
}

pub fn parse_source(content: &str, config: &'static LanguageConfig) -> Result<SyntaxTree, ParseError> {
    let tree = PARSER_CACHE.with(|cache| -> Result<tree_sitter::Tree, ParseError> {
        let mut cache = cache.borrow_mut();
        let parser = match cache.entry(config.id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let language = (config.get_language)()
                    .ok_or_else(|| ParseError::UnknownLanguage(config.id.to_string()))?;
                let mut parser = tree_sitter::Parser::new();
                parser
                    .set_language(&language)
                    .map_err(|source| ParseError::Language {
                        language: config.id,
                        source,
                    })?;
                entry.insert(parser)
            }
        };
        parser
            .parse(content.as_bytes(), None)
            .ok_or(ParseError::NoTree { language: config.id })
    })?;

    if tree.root_node().has_error() {
        warn!(language = config.id, "source has syntax errors, comparing the recovered tree");
    }

    let lowered = lower_tree(&tree, config, content)?;
    debug!(language = config.id, nodes = lowered.node_count(), "parsed");
    Ok(lowered)
}

/// Parse a file, choosing the grammar from `language` when given and from the
/// file extension otherwise.
pub fn parse_file(path: &Path, language: Option<&str>) -> Result<SyntaxTree, ParseError> {
    let config = match language {
        Some(id) => get_language_by_id(id).ok_or_else(|| ParseError::UnknownLanguage(id.to_string()))?,
        None => language_for_path(path).ok_or_else(|| ParseError::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?,
    };
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(_) = content {
        debug!(path = %path.display(), "replaced invalid UTF-8 sequences");
    }
    parse_source(&content, config)
}
