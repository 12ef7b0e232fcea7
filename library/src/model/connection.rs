//! Connection model for the compositing graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed edge between two nodes.
///
/// Slots are explicit integer indices. Incoming edges to a node are ordered
/// by `to_slot`; for group nodes that order is stack order (slot 0 at the
/// bottom). A missing slot sorts as 0.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Connection {
    pub id: Uuid,
    /// Source node (output side).
    pub from: Uuid,
    /// Target node (input side).
    pub to: Uuid,
    #[serde(default)]
    pub from_slot: Option<u32>,
    #[serde(default)]
    pub to_slot: Option<u32>,
}

impl Connection {
    pub fn new(from: Uuid, to: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            from_slot: None,
            to_slot: None,
        }
    }

    pub fn with_slots(from: Uuid, to: Uuid, from_slot: Option<u32>, to_slot: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            from_slot,
            to_slot,
        }
    }

    /// Target slot index, with missing slots treated as 0.
    pub fn target_slot(&self) -> u32 {
        self.to_slot.unwrap_or(0)
    }
}
