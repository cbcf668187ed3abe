use rustc_hash::FxHashMap;

use crate::scene::NodeId;

/// Hands out dense pick ids starting at 1 and maps them back to nodes.
///
/// Id zero is reserved for the background clear color, so the first
/// assigned id is always 1. Ids are stable for the allocator's lifetime;
/// [`PickIdAllocator::clear`] resets the mapping between scenes.
#[derive(Debug, Default)]
pub struct PickIdAllocator {
    next: u32,
    by_node: FxHashMap<NodeId, u32>,
    by_id: FxHashMap<u32, NodeId>,
}

impl PickIdAllocator {
    /// An empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: 0,
            by_node: FxHashMap::default(),
            by_id: FxHashMap::default(),
        }
    }

    /// The pick id for `node`, assigning the next free id on first use.
    pub fn id_for(&mut self, node: NodeId) -> u32 {
        if let Some(&id) = self.by_node.get(&node) {
            return id;
        }
        self.next += 1;
        let id = self.next;
        let _ = self.by_node.insert(node, id);
        let _ = self.by_id.insert(id, node);
        id
    }

    /// The node a decoded pick id refers to. Zero (background) and
    /// unassigned ids resolve to `None`.
    #[must_use]
    pub fn resolve(&self, id: u32) -> Option<NodeId> {
        self.by_id.get(&id).copied()
    }

    /// Drop assignments for nodes `keep` rejects. The id counter does not
    /// rewind, so surviving and future ids stay unique.
    pub fn retain(&mut self, keep: impl Fn(NodeId) -> bool) {
        self.by_node.retain(|&node, _| keep(node));
        self.by_id.retain(|_, &mut node| keep(node));
    }

    /// Forget all assignments and start over from id 1.
    pub fn clear(&mut self) {
        self.next = 0;
        self.by_node.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_are_stable() {
        let mut alloc = PickIdAllocator::new();
        let a = alloc.id_for(NodeId(10));
        let b = alloc.id_for(NodeId(20));
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(alloc.id_for(NodeId(10)), 1);
    }

    #[test]
    fn zero_resolves_to_background() {
        let mut alloc = PickIdAllocator::new();
        let _ = alloc.id_for(NodeId(1));
        assert_eq!(alloc.resolve(0), None);
        assert_eq!(alloc.resolve(1), Some(NodeId(1)));
        assert_eq!(alloc.resolve(7), None);
    }

    #[test]
    fn retain_drops_both_directions_without_reusing_ids() {
        let mut alloc = PickIdAllocator::new();
        let kept = alloc.id_for(NodeId(1));
        let dropped = alloc.id_for(NodeId(2));
        alloc.retain(|node| node == NodeId(1));
        assert_eq!(alloc.resolve(kept), Some(NodeId(1)));
        assert_eq!(alloc.resolve(dropped), None);
        // a returning node gets a fresh id, never a recycled one
        assert_eq!(alloc.id_for(NodeId(2)), 3);
    }

    #[test]
    fn clear_resets_assignments() {
        let mut alloc = PickIdAllocator::new();
        let _ = alloc.id_for(NodeId(3));
        alloc.clear();
        assert_eq!(alloc.resolve(1), None);
        assert_eq!(alloc.id_for(NodeId(4)), 1);
    }
}
