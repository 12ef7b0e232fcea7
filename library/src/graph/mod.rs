//! Read-only adjacency view over the node/edge collections.
//!
//! A `GraphIndex` borrows the current connection list and answers the two
//! questions resolution needs: "what feeds node N, in slot order" and
//! "what is reachable downstream of N". It holds no state of its own and
//! is built fresh for each evaluation pass.

use std::collections::{BTreeMap, HashSet, VecDeque};
use uuid::Uuid;

use crate::model::connection::Connection;

pub struct GraphIndex<'a> {
    connections: &'a [Connection],
}

impl<'a> GraphIndex<'a> {
    pub fn new(connections: &'a [Connection]) -> Self {
        Self { connections }
    }

    /// Incoming edges to `node`, sorted by target slot.
    ///
    /// The sort is stable, so edges sharing a slot keep their collection
    /// order; slot de-duplication (last write wins) happens in
    /// [`incoming_slots`](Self::incoming_slots).
    pub fn incoming(&self, node: Uuid) -> Vec<&'a Connection> {
        let mut edges: Vec<&Connection> =
            self.connections.iter().filter(|c| c.to == node).collect();
        edges.sort_by_key(|c| c.target_slot());
        edges
    }

    /// Incoming edges keyed by slot, one edge per slot.
    ///
    /// When two edges claim the same slot, the one appearing later in the
    /// collection wins.
    pub fn incoming_slots(&self, node: Uuid) -> Vec<(u32, &'a Connection)> {
        let mut by_slot: BTreeMap<u32, &Connection> = BTreeMap::new();
        for conn in self.connections.iter().filter(|c| c.to == node) {
            by_slot.insert(conn.target_slot(), conn);
        }
        by_slot.into_iter().collect()
    }

    /// The edge feeding `slot` of `node`, if any.
    pub fn incoming_at(&self, node: Uuid, slot: u32) -> Option<&'a Connection> {
        self.connections
            .iter()
            .filter(|c| c.to == node && c.target_slot() == slot)
            .next_back()
    }

    /// All nodes reachable by following outgoing edges from `node`,
    /// breadth-first. `node` itself is not included. Cycle-safe.
    pub fn downstream(&self, node: Uuid) -> Vec<Uuid> {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<Uuid> = VecDeque::new();
        let mut result = Vec::new();

        visited.insert(node);
        queue.push_back(node);

        while let Some(current) = queue.pop_front() {
            for conn in self.connections.iter().filter(|c| c.from == current) {
                if visited.insert(conn.to) {
                    result.push(conn.to);
                    queue.push_back(conn.to);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::connection::Connection;

    fn edge(from: Uuid, to: Uuid, slot: u32) -> Connection {
        Connection::with_slots(from, to, None, Some(slot))
    }

    #[test]
    fn test_incoming_sorted_by_slot() {
        let (a, b, target) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![edge(b, target, 1), edge(a, target, 0)];
        let index = GraphIndex::new(&connections);

        let incoming = index.incoming(target);
        assert_eq!(incoming.len(), 2);
        assert_eq!(incoming[0].from, a);
        assert_eq!(incoming[1].from, b);
    }

    #[test]
    fn test_duplicate_slot_last_edge_wins() {
        let (a, b, target) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![edge(a, target, 0), edge(b, target, 0)];
        let index = GraphIndex::new(&connections);

        let slots = index.incoming_slots(target);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].1.from, b);
        assert_eq!(index.incoming_at(target, 0).unwrap().from, b);
    }

    #[test]
    fn test_missing_slot_is_unresolved() {
        let (a, target) = (Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![edge(a, target, 0)];
        let index = GraphIndex::new(&connections);
        assert!(index.incoming_at(target, 1).is_none());
    }

    #[test]
    fn test_downstream_breadth_first() {
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![edge(a, b, 0), edge(b, c, 0), edge(a, d, 1)];
        let index = GraphIndex::new(&connections);

        let reachable = index.downstream(a);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains(&b));
        assert!(reachable.contains(&c));
        assert!(reachable.contains(&d));
    }

    #[test]
    fn test_downstream_terminates_on_cycle() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let connections = vec![edge(a, b, 0), edge(b, a, 0)];
        let index = GraphIndex::new(&connections);

        let reachable = index.downstream(a);
        assert_eq!(reachable, vec![b]);
    }
}
