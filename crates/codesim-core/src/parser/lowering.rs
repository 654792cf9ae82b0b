use tree_sitter::{Node, Tree};

use super::languages::LanguageConfig;
use crate::tree::{SyntaxTree, SyntaxTreeBuilder, TreeError};

const PUNCTUATION: &[char] = &['(', ')', '{', '}', '[', ']', ';', ','];

/// Lower a concrete tree-sitter tree into a [`SyntaxTree`].
///
/// Only named nodes survive. Ignored kinds (comments) and nodes the parser
/// invented during error recovery are dropped along with their subtrees.
/// The walk keeps its own stack, so nesting depth is bounded by memory only.
pub fn lower_tree(tree: &Tree, config: &LanguageConfig, source: &str) -> Result<SyntaxTree, TreeError> {
    let source = source.as_bytes();
    let mut builder = SyntaxTreeBuilder::new();
    let mut stack = vec![Step::Enter(tree.root_node())];

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Enter(node) => node,
            Step::Exit => {
                builder.close();
                continue;
            }
        };

        let kept = kept_children(node, config);
        if kept.is_empty() {
            builder.leaf(node.kind(), node_text(node, source));
            continue;
        }

        builder.open(node.kind(), operator_tokens(node).as_deref());
        stack.push(Step::Exit);
        stack.extend(kept.into_iter().rev().map(Step::Enter));
    }

    builder.build()
}

enum Step<'t> {
    Enter(Node<'t>),
    Exit,
}

fn kept_children<'t>(node: Node<'t>, config: &LanguageConfig) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let kept: Vec<Node<'t>> = node
        .named_children(&mut cursor)
        .filter(|child| is_kept(*child, config))
        .collect();
    kept
}

fn is_kept(node: Node, config: &LanguageConfig) -> bool {
    !node.is_missing() && !config.ignored_node_types.contains(&node.kind())
}

fn node_text<'s>(node: Node, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source)
        .ok()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Anonymous children that are not punctuation: operators and keywords.
fn operator_tokens(node: Node) -> Option<String> {
    let mut cursor = node.walk();
    let tokens: Vec<&str> = node
        .children(&mut cursor)
        .filter(|child| !child.is_named() && !child.is_missing())
        .map(|child| child.kind())
        .filter(|kind| !kind.is_empty() && !kind.chars().all(|c| PUNCTUATION.contains(&c)))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}
