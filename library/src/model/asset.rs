use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable description of a piece of raw media.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    pub kind: AssetKind,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetKind {
    Video {
        /// Duration in seconds.
        duration: f64,
        fps: f64,
        /// Number of decoded frames.
        frame_count: u64,
        /// Decode handle (opaque to the engine, resolved by the frame pipeline).
        source: String,
        /// Present while frame extraction is still running.
        #[serde(default)]
        loading: Option<LoadProgress>,
    },
    Image {
        source: String,
    },
    Shape {
        paths: Vec<ShapePath>,
    },
    Composition {
        width: u32,
        height: u32,
        fps: f64,
        duration_frames: u64,
    },
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct LoadProgress {
    /// 0.0–1.0 completion of frame extraction.
    pub progress: f32,
}

/// One sub-path of a vector shape asset.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ShapePath {
    /// SVG-style path data.
    pub data: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
}

impl Asset {
    pub fn new(name: &str, width: u32, height: u32, kind: AssetKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            kind,
        }
    }

    /// Total addressable source frames: 1 for still media, the decoded count
    /// for video, the declared duration for a nested composition.
    pub fn frame_count(&self) -> u64 {
        match &self.kind {
            AssetKind::Video { frame_count, .. } => *frame_count,
            AssetKind::Image { .. } | AssetKind::Shape { .. } => 1,
            AssetKind::Composition {
                duration_frames, ..
            } => *duration_frames,
        }
    }

    /// False while a video asset's frame extraction is still in progress.
    pub fn is_ready(&self) -> bool {
        match &self.kind {
            AssetKind::Video { loading, .. } => loading.is_none(),
            _ => true,
        }
    }
}
