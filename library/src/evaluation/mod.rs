//! Scene-graph evaluation — resolves nodes into layer outputs with
//! memoization and dependency-aware invalidation.

pub mod cache;
pub mod engine;
pub mod output;
pub mod resolver;
pub mod timing;

pub use cache::{CacheEntry, EvaluationCache};
pub use engine::Evaluator;
pub use output::{
    AppliedEffect, LayerBlendConfig, LayerMetadata, LayerOutput, SourceKind, StackedLayer,
};
pub use resolver::LayerResolver;
pub use timing::map_global_frame_to_source;
