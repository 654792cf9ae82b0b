use xxhash_rust::xxh3::Xxh3;

use crate::tree::Node;

/// Hash of a subtree given its root node and the hashes of its children, in
/// order. Equal subtrees (same kinds, values and shape) hash equally.
pub fn subtree_hash(node: &Node, child_hashes: impl IntoIterator<Item = u64>) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(node.kind.as_bytes());
    match &node.value {
        // tag byte keeps `None` apart from `Some("")`
        Some(value) => {
            hasher.update(&[1]);
            hasher.update(value.as_bytes());
        }
        None => hasher.update(&[0]),
    }
    for child in child_hashes {
        hasher.update(&child.to_le_bytes());
    }
    hasher.digest()
}
