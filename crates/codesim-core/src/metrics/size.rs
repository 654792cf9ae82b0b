use crate::tree::{SyntaxTreeView, TreeError};

/// Number of nodes reachable from the root, root included.
pub fn tree_size<T: SyntaxTreeView>(tree: &T) -> Result<usize, TreeError> {
    let mut size = 1;
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        let children = tree.children(id)?;
        size += children.len();
        stack.extend_from_slice(children);
    }

    Ok(size)
}
