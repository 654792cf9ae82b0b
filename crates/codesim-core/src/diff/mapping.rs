use crate::tree::NodeId;

/// One-to-one correspondence between source and destination nodes, kept in
/// both directions so either side can be queried in constant time.
#[derive(Debug, Clone)]
pub(crate) struct Mapping {
    src_to_dst: Vec<Option<NodeId>>,
    dst_to_src: Vec<Option<NodeId>>,
}

impl Mapping {
    pub fn new(src_len: usize, dst_len: usize) -> Self {
        Self {
            src_to_dst: vec![None; src_len],
            dst_to_src: vec![None; dst_len],
        }
    }

    /// Callers only link nodes that are unmapped on both sides.
    pub fn link(&mut self, src: NodeId, dst: NodeId) {
        debug_assert!(!self.has_src(src) && !self.has_dst(dst));
        self.src_to_dst[src.index()] = Some(dst);
        self.dst_to_src[dst.index()] = Some(src);
    }

    pub fn has_src(&self, src: NodeId) -> bool {
        self.src_to_dst[src.index()].is_some()
    }

    pub fn has_dst(&self, dst: NodeId) -> bool {
        self.dst_to_src[dst.index()].is_some()
    }

    pub fn dst_of(&self, src: NodeId) -> Option<NodeId> {
        self.src_to_dst[src.index()]
    }

    pub fn src_of(&self, dst: NodeId) -> Option<NodeId> {
        self.dst_to_src[dst.index()]
    }

    pub fn matched(&self) -> usize {
        self.src_to_dst.iter().filter(|d| d.is_some()).count()
    }

    pub fn into_source_table(self) -> Vec<Option<NodeId>> {
        self.src_to_dst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_both_directions() {
        let mut m = Mapping::new(3, 2);
        m.link(NodeId::new(2), NodeId::new(0));
        assert!(m.has_src(NodeId::new(2)));
        assert!(m.has_dst(NodeId::new(0)));
        assert!(!m.has_dst(NodeId::new(1)));
        assert_eq!(m.src_of(NodeId::new(0)), Some(NodeId::new(2)));
        assert_eq!(m.matched(), 1);
        assert_eq!(
            m.into_source_table(),
            vec![None, None, Some(NodeId::new(0))]
        );
    }
}
