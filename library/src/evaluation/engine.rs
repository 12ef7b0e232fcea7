//! Session-level evaluation facade.
//!
//! An [`Evaluator`] owns the memo cache for one editing session and is the
//! surface the rendering side talks to. It is created per document and
//! cleared on document load; there is no process-global state.

use std::collections::HashSet;

use uuid::Uuid;

use super::cache::EvaluationCache;
use super::output::{AppliedEffect, LayerBlendConfig, LayerOutput, StackedLayer};
use super::resolver::LayerResolver;
use crate::graph::GraphIndex;
use crate::model::layer::{BlendMode, TimeRange};
use crate::model::node::SceneNode;
use crate::model::project::Project;
use crate::util::timing::ScopedTimer;

#[derive(Default)]
pub struct Evaluator {
    cache: EvaluationCache,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a node's output, serving from the cache when its inputs are
    /// unchanged. `None` means "not renderable right now".
    pub fn get_layer_output(&mut self, project: &Project, node: Uuid) -> Option<LayerOutput> {
        let _timer = ScopedTimer::debug_lazy(|| format!("resolve node {}", node));
        let resolver = LayerResolver::new(project);
        let mut visited = HashSet::new();
        resolver.resolve(node, &mut self.cache, &mut visited)
    }

    /// Timeline window over which the node has any visible content.
    pub fn get_effective_time_range(
        &mut self,
        project: &Project,
        node: Uuid,
    ) -> Option<TimeRange> {
        self.get_layer_output(project, node)
            .map(|output| output.time_range())
    }

    /// Accumulated effect chain at `node` for one of the sources feeding it.
    ///
    /// With `source` set, picks the metadata originating from that source
    /// node; otherwise the first (bottom) metadata.
    pub fn get_layer_effect_chain(
        &mut self,
        project: &Project,
        node: Uuid,
        source: Option<Uuid>,
    ) -> Option<Vec<AppliedEffect>> {
        let output = self.get_layer_output(project, node)?;
        let metadata = output.metadata();
        let selected = match source {
            Some(source) => metadata.iter().find(|m| m.source_node == source)?,
            None => metadata.first()?,
        };
        Some(selected.effects.clone())
    }

    /// Uniform stack view of a node's output: a `Single` becomes a
    /// one-element stack at index 0 blending with its layer's own settings.
    pub fn get_layers_at_node(
        &mut self,
        project: &Project,
        node: Uuid,
    ) -> Option<Vec<StackedLayer>> {
        match self.get_layer_output(project, node)? {
            LayerOutput::Single(meta) => {
                let (mode, opacity) = layer_blend_defaults(project, meta.source_node);
                Some(vec![StackedLayer {
                    layer: meta,
                    blend: LayerBlendConfig {
                        mode,
                        opacity,
                        stack_index: 0,
                    },
                }])
            }
            LayerOutput::Stack { layers, .. } => Some(layers),
        }
    }

    pub fn get_output_dimensions(
        &mut self,
        project: &Project,
        node: Uuid,
    ) -> Option<(u32, u32)> {
        self.get_layer_output(project, node)
            .map(|output| output.size())
    }

    /// Drop cached results for `node` and everything downstream of it.
    /// Call after the node's data or wiring changed.
    pub fn invalidate(&mut self, project: &Project, node: Uuid) {
        let index = GraphIndex::new(&project.connections);
        self.cache.invalidate(node, &index);
    }

    /// Wholesale cache reset, for document load/close.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }
}

/// Blend settings a lone layer composites with: its own blend mode and
/// opacity, defaults when the layer record cannot be reached.
fn layer_blend_defaults(project: &Project, source_node: Uuid) -> (BlendMode, f64) {
    match project.get_node(source_node) {
        Some(SceneNode::Source(source)) => project
            .get_layer(source.layer_id)
            .map(|layer| (layer.blend_mode, layer.transform.opacity))
            .unwrap_or((BlendMode::Normal, 1.0)),
        _ => (BlendMode::Normal, 1.0),
    }
}
