pub mod cache;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod graphics;
pub mod model;
pub mod util;

pub use cache::{FrameDecoder, FrameImage, FrameImageCache, FrameKey, fetch_frame};
pub use error::EngineError;
pub use evaluation::{
    AppliedEffect, Evaluator, LayerBlendConfig, LayerMetadata, LayerOutput, StackedLayer,
    map_global_frame_to_source,
};
pub use graph::GraphIndex;
pub use graphics::{BoundingBox, accumulated_bounds, transformed_bounds};
pub use model::{Project, SceneNode, TimeRange};
