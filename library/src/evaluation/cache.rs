//! Memoization of resolved layer outputs with dependency-aware invalidation.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use log::debug;
use uuid::Uuid;

use super::output::LayerOutput;
use crate::graph::GraphIndex;
use crate::model::node::SceneNode;

/// One memoized resolution result.
///
/// `output` is `None` for nodes that resolved to "not renderable"; a
/// negative answer is as valid a cache entry as a stack.
pub struct CacheEntry {
    pub output: Option<LayerOutput>,
    pub input_hash: u64,
    pub computed_at: Instant,
}

/// Per-node memo of resolution results, keyed by node id and guarded by an
/// input hash over the node's own data and its incoming wiring.
///
/// The hash only covers direct inputs, so edits must be propagated with
/// [`invalidate`](Self::invalidate): deleting every downstream entry is what
/// forces deep recomputation back through the changed node.
#[derive(Default)]
pub struct EvaluationCache {
    entries: HashMap<Uuid, CacheEntry>,
}

/// Hash of everything a node's resolution directly depends on: its own data
/// plus the slot-ordered list of (source id, target slot) incoming edges.
pub fn input_hash(node: &SceneNode, index: &GraphIndex) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    for conn in index.incoming(node.id()) {
        conn.from.hash(&mut hasher);
        conn.target_slot().hash(&mut hasher);
    }
    hasher.finish()
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored output for `node`, only if the stored hash still matches.
    pub fn get(&self, node: Uuid, hash: u64) -> Option<&Option<LayerOutput>> {
        let entry = self.entries.get(&node)?;
        if entry.input_hash == hash {
            Some(&entry.output)
        } else {
            None
        }
    }

    pub fn store(&mut self, node: Uuid, hash: u64, output: Option<LayerOutput>) {
        self.entries.insert(
            node,
            CacheEntry {
                output,
                input_hash: hash,
                computed_at: Instant::now(),
            },
        );
    }

    pub fn entry(&self, node: Uuid) -> Option<&CacheEntry> {
        self.entries.get(&node)
    }

    pub fn contains(&self, node: Uuid) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop `node`'s entry and every entry reachable downstream of it.
    ///
    /// Downstream entries may hold stale effect chains or time ranges even
    /// when their own input hash is unchanged, so they are deleted outright.
    pub fn invalidate(&mut self, node: Uuid, index: &GraphIndex) {
        let mut removed = usize::from(self.entries.remove(&node).is_some());
        for downstream in index.downstream(node) {
            removed += usize::from(self.entries.remove(&downstream).is_some());
        }
        debug!("invalidated {} cache entries from node {}", removed, node);
    }

    /// Wholesale reset, used on document load.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::connection::Connection;
    use crate::model::node::{EmptyNode, OperationKind, OperationNode, SceneNode};
    use crate::model::property::PropertyMap;

    #[test]
    fn test_input_hash_changes_with_node_data() {
        let mut node = OperationNode::new(OperationKind::Blur, PropertyMap::new());
        let connections: Vec<Connection> = Vec::new();
        let index = GraphIndex::new(&connections);

        let before = input_hash(&SceneNode::Operation(node.clone()), &index);
        node.enabled = false;
        let after = input_hash(&SceneNode::Operation(node), &index);
        assert_ne!(before, after);
    }

    #[test]
    fn test_input_hash_changes_with_wiring() {
        let node = SceneNode::Empty(EmptyNode::new());
        let upstream = Uuid::new_v4();

        let empty: Vec<Connection> = Vec::new();
        let wired = vec![Connection::with_slots(upstream, node.id(), None, Some(0))];

        let before = input_hash(&node, &GraphIndex::new(&empty));
        let after = input_hash(&node, &GraphIndex::new(&wired));
        assert_ne!(before, after);
    }

    #[test]
    fn test_get_rejects_stale_hash() {
        let mut cache = EvaluationCache::new();
        let id = Uuid::new_v4();
        cache.store(id, 1, None);

        assert!(cache.get(id, 1).is_some());
        assert!(cache.get(id, 2).is_none());
    }

    #[test]
    fn test_invalidate_removes_downstream_entries() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![
            Connection::with_slots(a, b, None, Some(0)),
            Connection::with_slots(b, c, None, Some(0)),
        ];
        let index = GraphIndex::new(&connections);

        let mut cache = EvaluationCache::new();
        cache.store(a, 1, None);
        cache.store(b, 2, None);
        cache.store(c, 3, None);

        cache.invalidate(a, &index);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_spares_upstream_entries() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![Connection::with_slots(a, b, None, Some(0))];
        let index = GraphIndex::new(&connections);

        let mut cache = EvaluationCache::new();
        cache.store(a, 1, None);
        cache.store(b, 2, None);

        cache.invalidate(b, &index);
        assert!(cache.contains(a));
        assert!(!cache.contains(b));
    }
}
