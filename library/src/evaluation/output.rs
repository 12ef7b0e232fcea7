//! Resolved outputs produced by graph evaluation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::asset::AssetKind;
use crate::model::layer::{BlendMode, TimeRange};
use crate::model::property::PropertyMap;

/// Kind of media behind a resolved layer.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Video,
    Image,
    Shape,
    Composition,
}

impl From<&AssetKind> for SourceKind {
    fn from(kind: &AssetKind) -> Self {
        match kind {
            AssetKind::Video { .. } => SourceKind::Video,
            AssetKind::Image { .. } => SourceKind::Image,
            AssetKind::Shape { .. } => SourceKind::Shape,
            AssetKind::Composition { .. } => SourceKind::Composition,
        }
    }
}

/// One effect accumulated onto a layer as it passed through an operation
/// node. Chains are ordered first-applied first.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AppliedEffect {
    pub node_id: Uuid,
    pub name: String,
    pub params: PropertyMap,
}

/// The resolved description of one visual element at a point in the graph.
///
/// Built fresh at a source node, then extended copy-on-write as resolution
/// proceeds downstream; never mutated in place.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct LayerMetadata {
    /// The source node this element originated from.
    pub source_node: Uuid,
    pub source_kind: SourceKind,
    pub time_range: TimeRange,
    /// Native dimensions of the backing asset.
    pub intrinsic_size: (u32, u32),
    /// Dimensions this element renders at.
    pub output_size: (u32, u32),
    /// Accumulated effect chain, first-applied first.
    pub effects: Vec<AppliedEffect>,
    /// Node ids visited from the source to here.
    pub node_path: Vec<Uuid>,
}

impl LayerMetadata {
    /// Copy with `node_id` appended to the path and, optionally, one more
    /// effect appended to the chain.
    pub fn extended(&self, node_id: Uuid, effect: Option<AppliedEffect>) -> LayerMetadata {
        let mut next = self.clone();
        next.node_path.push(node_id);
        if let Some(effect) = effect {
            next.effects.push(effect);
        }
        next
    }
}

/// Compositing settings for one member of a stack.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct LayerBlendConfig {
    pub mode: BlendMode,
    pub opacity: f64,
    /// Position in the stack, 0 = background.
    pub stack_index: usize,
}

/// A stack member: resolved metadata plus how it composites.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct StackedLayer {
    pub layer: LayerMetadata,
    pub blend: LayerBlendConfig,
}

/// What a node produces: one layer, or an ordered stack of layers.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub enum LayerOutput {
    Single(LayerMetadata),
    Stack {
        /// Members bottom (index 0) to top.
        layers: Vec<StackedLayer>,
        /// Union of the members' ranges.
        time_range: TimeRange,
        size: (u32, u32),
        /// The merge node this stack originated from.
        merge_node: Uuid,
    },
}

impl LayerOutput {
    pub fn time_range(&self) -> TimeRange {
        match self {
            LayerOutput::Single(meta) => meta.time_range,
            LayerOutput::Stack { time_range, .. } => *time_range,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            LayerOutput::Single(meta) => meta.output_size,
            LayerOutput::Stack { size, .. } => *size,
        }
    }

    /// Every metadata reachable in this output, stack order for stacks.
    pub fn metadata(&self) -> Vec<&LayerMetadata> {
        match self {
            LayerOutput::Single(meta) => vec![meta],
            LayerOutput::Stack { layers, .. } => layers.iter().map(|s| &s.layer).collect(),
        }
    }
}
