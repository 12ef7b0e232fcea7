use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::property::PropertyMap;

/// A node in the compositing graph.
#[derive(Serialize, Deserialize, Clone, PartialEq, Hash, Debug)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum SceneNode {
    /// Emits the layer it references.
    Source(SourceNode),
    /// Placeholder with no output.
    Empty(EmptyNode),
    /// Applies an effect or transform to its single upstream input.
    Operation(OperationNode),
    /// Composites its ordered inputs into one stack.
    Group(GroupNode),
}

impl SceneNode {
    /// Get the ID of this node
    pub fn id(&self) -> Uuid {
        match self {
            SceneNode::Source(s) => s.id,
            SceneNode::Empty(e) => e.id,
            SceneNode::Operation(o) => o.id,
            SceneNode::Group(g) => g.id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Hash, Debug)]
pub struct SourceNode {
    pub id: Uuid,
    pub layer_id: Uuid,
}

impl SourceNode {
    pub fn new(layer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Hash, Debug)]
pub struct EmptyNode {
    pub id: Uuid,
}

impl EmptyNode {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for EmptyNode {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Hash, Debug)]
pub struct OperationNode {
    pub id: Uuid,
    pub kind: OperationKind,
    #[serde(default)]
    pub params: PropertyMap,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl OperationNode {
    pub fn new(kind: OperationKind, params: PropertyMap) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            params,
            enabled: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Hash, Debug)]
pub struct GroupNode {
    pub id: Uuid,
    /// References a `Group` record holding blend settings and members.
    pub group_id: Uuid,
}

impl GroupNode {
    pub fn new(group_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
        }
    }
}

/// The operation types the engine ships.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Blur,
    Brightness,
    Contrast,
    Grayscale,
    HueRotate,
    Transform,
}

impl OperationKind {
    /// Stable effect name recorded in applied-effect chains.
    pub fn effect_name(&self) -> &'static str {
        match self {
            OperationKind::Blur => "blur",
            OperationKind::Brightness => "brightness",
            OperationKind::Contrast => "contrast",
            OperationKind::Grayscale => "grayscale",
            OperationKind::HueRotate => "hue_rotate",
            OperationKind::Transform => "transform",
        }
    }

    /// Transform operations never join the effect chain; the renderer reads
    /// their parameters off the node path instead.
    pub fn is_transform(&self) -> bool {
        matches!(self, OperationKind::Transform)
    }
}
