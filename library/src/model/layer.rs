//! Layers and groups — the renderable placements referenced by scene nodes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transform::Transform;

/// Active window on the global timeline.
///
/// `in_frame` is inclusive, `out_frame` exclusive; `source_offset` shifts
/// where playback starts inside the source asset.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimeRange {
    pub in_frame: u64,
    pub out_frame: u64,
    #[serde(default)]
    pub source_offset: u64,
}

impl TimeRange {
    pub fn new(in_frame: u64, out_frame: u64) -> Self {
        debug_assert!(out_frame > in_frame);
        Self {
            in_frame,
            out_frame,
            source_offset: 0,
        }
    }

    pub fn with_offset(in_frame: u64, out_frame: u64, source_offset: u64) -> Self {
        debug_assert!(out_frame > in_frame);
        Self {
            in_frame,
            out_frame,
            source_offset,
        }
    }

    /// Whether the global frame falls inside `[in_frame, out_frame)`.
    pub fn contains(&self, global_frame: u64) -> bool {
        global_frame >= self.in_frame && global_frame < self.out_frame
    }

    /// Saturating: a malformed range (out <= in) reports zero frames
    /// instead of underflowing.
    pub fn duration(&self) -> u64 {
        self.out_frame.saturating_sub(self.in_frame)
    }

    /// The `out_frame > in_frame` invariant. Constructors debug-assert it;
    /// deserialized data is checked through this at load time.
    pub fn is_valid(&self) -> bool {
        self.out_frame > self.in_frame
    }

    /// Smallest range covering both: min of ins, max of outs.
    ///
    /// The union keeps `self`'s source offset; offsets are per-layer state
    /// and meaningless on a composite range.
    pub fn union(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            in_frame: self.in_frame.min(other.in_frame),
            out_frame: self.out_frame.max(other.out_frame),
            source_offset: self.source_offset,
        }
    }
}

/// How a layer composites against what is below it in a stack.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Add,
}

/// A placement of one asset: transform, timing, and the effect nodes that
/// have been attached to it in the graph.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub asset_id: Uuid,
    #[serde(default)]
    pub transform: Transform,
    pub time_range: TimeRange,
    #[serde(default)]
    pub effect_node_ids: Vec<Uuid>,
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Overrides the asset's intrinsic dimensions when present.
    #[serde(default)]
    pub size_override: Option<(u32, u32)>,
}

impl Layer {
    pub fn new(name: &str, asset_id: Uuid, time_range: TimeRange) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            asset_id,
            transform: Transform::default(),
            time_range,
            effect_node_ids: Vec::new(),
            blend_mode: BlendMode::default(),
            size_override: None,
        }
    }
}

/// Same shape as [`Layer`] but composites an ordered list of members
/// (layer ids or nested group ids) instead of referencing an asset.
/// Index 0 renders first (background).
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl Group {
    pub fn new(name: &str, member_ids: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            member_ids,
            transform: Transform::default(),
            time_range: None,
            blend_mode: BlendMode::default(),
        }
    }
}
