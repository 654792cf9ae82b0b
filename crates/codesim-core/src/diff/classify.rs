use super::index::TreeIndex;
use super::mapping::Mapping;
use crate::model::change::ChangeKind;
use crate::tree::NodeId;

/// Assign a [`ChangeKind`] to every destination node from a finished mapping.
///
/// A matched pair is moved when its parents don't correspond or when its
/// position among siblings differs once inserted, deleted and already moved
/// siblings are discounted. Every such sibling shifts the ones after it by -1.
pub(crate) fn classify(src: &TreeIndex<'_>, dst: &TreeIndex<'_>, mapping: &Mapping) -> Vec<ChangeKind> {
    let mut shift1 = vec![0i64; src.len()];
    let mut shift2 = vec![0i64; dst.len()];

    for &id1 in &src.bfs {
        if !mapping.has_src(id1) {
            shift1[id1.index()] -= 1;
        }
    }
    for &id2 in &dst.bfs {
        if !mapping.has_dst(id2) {
            shift2[id2.index()] -= 1;
        }
    }

    for &id1 in &src.bfs {
        let Some(id2) = mapping.dst_of(id1) else {
            continue;
        };
        if is_moved(src, dst, mapping, &shift1, &shift2, id1, id2) {
            shift1[id1.index()] -= 1;
            shift2[id2.index()] -= 1;
        }
    }

    let mut changes = vec![ChangeKind::Insert; dst.len()];
    for &id2 in &dst.bfs {
        let Some(id1) = mapping.src_of(id2) else {
            continue;
        };
        let moved = is_moved(src, dst, mapping, &shift1, &shift2, id1, id2);
        let updated = src.node(id1).value != dst.node(id2).value;
        changes[id2.index()] = match (moved, updated) {
            (false, false) => ChangeKind::None,
            (false, true) => ChangeKind::Update,
            (true, false) => ChangeKind::Move,
            (true, true) => ChangeKind::UpdateMove,
        };
    }
    changes
}

fn is_moved(
    src: &TreeIndex<'_>,
    dst: &TreeIndex<'_>,
    mapping: &Mapping,
    shift1: &[i64],
    shift2: &[i64],
    id1: NodeId,
    id2: NodeId,
) -> bool {
    let same_parents = match (src.parent(id1), dst.parent(id2)) {
        (None, None) => true,
        (Some(p1), Some(p2)) => mapping.dst_of(p1) == Some(p2),
        _ => false,
    };
    !same_parents || position(src, shift1, id1) != position(dst, shift2, id2)
}

/// Index among siblings, adjusted by the shifts of the siblings up to and
/// including `id`.
fn position(index: &TreeIndex<'_>, shifts: &[i64], id: NodeId) -> i64 {
    let Some(parent) = index.parent(id) else {
        return 0;
    };
    let mut pos = 0;
    for (i, &sibling) in index.children(parent).iter().enumerate() {
        pos += shifts[sibling.index()];
        if sibling == id {
            return pos + i as i64;
        }
    }
    pos
}
