//! Recursive layer resolution — walks the graph upstream from a node and
//! produces its [`LayerOutput`].
//!
//! Every failure mode here means "not renderable right now", never an
//! error: an in-progress edit graph is incomplete by design, so unresolved
//! inputs, dangling references, and unknown wiring all yield `None`.

use std::collections::HashSet;

use log::{debug, warn};
use uuid::Uuid;

use super::cache::{EvaluationCache, input_hash};
use super::output::{
    AppliedEffect, LayerBlendConfig, LayerMetadata, LayerOutput, SourceKind, StackedLayer,
};
use crate::graph::GraphIndex;
use crate::model::layer::{BlendMode, TimeRange};
use crate::model::node::{GroupNode, OperationNode, SceneNode, SourceNode};
use crate::model::project::Project;

pub struct LayerResolver<'a> {
    project: &'a Project,
    index: GraphIndex<'a>,
}

impl<'a> LayerResolver<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            index: GraphIndex::new(&project.connections),
        }
    }

    pub fn index(&self) -> &GraphIndex<'a> {
        &self.index
    }

    /// Resolve `node_id`, consulting and populating the cache.
    ///
    /// `visited` carries the current recursion path; re-entering a node on
    /// the same path means the graph has a cycle, which resolves to `None`
    /// rather than recursing forever.
    pub fn resolve(
        &self,
        node_id: Uuid,
        cache: &mut EvaluationCache,
        visited: &mut HashSet<Uuid>,
    ) -> Option<LayerOutput> {
        self.resolve_guarded(node_id, cache, visited).0
    }

    /// Like [`resolve`](Self::resolve), but also reports whether any part
    /// of the subtree was cut short by the cycle guard.
    fn resolve_guarded(
        &self,
        node_id: Uuid,
        cache: &mut EvaluationCache,
        visited: &mut HashSet<Uuid>,
    ) -> (Option<LayerOutput>, bool) {
        if !visited.insert(node_id) {
            warn!("cycle detected at node {}, treating as unresolved", node_id);
            return (None, true);
        }
        let result = self.resolve_uncached(node_id, cache, visited);
        visited.remove(&node_id);
        result
    }

    fn resolve_uncached(
        &self,
        node_id: Uuid,
        cache: &mut EvaluationCache,
        visited: &mut HashSet<Uuid>,
    ) -> (Option<LayerOutput>, bool) {
        let Some(node) = self.project.get_node(node_id) else {
            return (None, false);
        };
        let hash = input_hash(node, &self.index);

        if let Some(output) = cache.get(node_id, hash) {
            return (output.clone(), false);
        }
        debug!("cache miss for node {}, resolving", node_id);

        let (output, truncated) = match node {
            SceneNode::Source(source) => (self.resolve_source(source), false),
            SceneNode::Empty(_) => (None, false),
            SceneNode::Operation(op) => self.resolve_operation(op, cache, visited),
            SceneNode::Group(group) => self.resolve_group(group, cache, visited),
        };

        // A result computed under cycle truncation reflects the truncated
        // walk, not the node's real inputs: memoizing it would make cached
        // answers depend on which node was queried first.
        if !truncated {
            cache.store(node_id, hash, output.clone());
        }
        (output, truncated)
    }

    /// Source nodes mint a fresh metadata from their layer and its asset.
    fn resolve_source(&self, source: &SourceNode) -> Option<LayerOutput> {
        let layer = self.project.get_layer(source.layer_id)?;

        // A dangling asset reference is the renderer's "missing" state, not
        // a resolution failure: keep whatever the layer itself declares.
        let asset = self.project.get_asset(layer.asset_id);
        let intrinsic = match asset {
            Some(asset) => (asset.width, asset.height),
            None => layer.size_override?,
        };
        let output_size = layer.size_override.unwrap_or(intrinsic);
        let source_kind = asset
            .map(|a| SourceKind::from(&a.kind))
            .unwrap_or(SourceKind::Image);

        Some(LayerOutput::Single(LayerMetadata {
            source_node: source.id,
            source_kind,
            time_range: layer.time_range,
            intrinsic_size: intrinsic,
            output_size,
            effects: Vec::new(),
            node_path: vec![source.id],
        }))
    }

    /// Operations pass their single upstream through, appending one applied
    /// effect when enabled. Disabled operations and transform operations
    /// extend the node path only.
    fn resolve_operation(
        &self,
        op: &OperationNode,
        cache: &mut EvaluationCache,
        visited: &mut HashSet<Uuid>,
    ) -> (Option<LayerOutput>, bool) {
        let Some(upstream_edge) = self.index.incoming_at(op.id, 0) else {
            return (None, false);
        };
        let (upstream, truncated) = self.resolve_guarded(upstream_edge.from, cache, visited);
        let Some(upstream) = upstream else {
            return (None, truncated);
        };

        let effect = (op.enabled && !op.kind.is_transform()).then(|| AppliedEffect {
            node_id: op.id,
            name: op.kind.effect_name().to_string(),
            params: op.params.clone(),
        });

        let output = match upstream {
            LayerOutput::Single(meta) => {
                LayerOutput::Single(meta.extended(op.id, effect))
            }
            LayerOutput::Stack {
                layers,
                time_range,
                size,
                merge_node,
            } => LayerOutput::Stack {
                layers: layers
                    .iter()
                    .map(|stacked| StackedLayer {
                        layer: stacked.layer.extended(op.id, effect.clone()),
                        blend: stacked.blend.clone(),
                    })
                    .collect(),
                time_range,
                size,
                merge_node,
            },
        };
        (Some(output), truncated)
    }

    /// Group nodes flatten their slot-ordered inputs into one stack.
    fn resolve_group(
        &self,
        group_node: &GroupNode,
        cache: &mut EvaluationCache,
        visited: &mut HashSet<Uuid>,
    ) -> (Option<LayerOutput>, bool) {
        // Slot 0 is mandatory; without it the composite has no background.
        if self.index.incoming_at(group_node.id, 0).is_none() {
            return (None, false);
        }

        // The merge's own blend settings come from the referenced group
        // record. A dangling reference falls back to defaults.
        let (merge_blend, merge_opacity) = match self.project.get_group(group_node.group_id) {
            Some(group) => (group.blend_mode, group.transform.opacity),
            None => {
                warn!(
                    "group record {} missing for node {}, using default blend",
                    group_node.group_id, group_node.id
                );
                (BlendMode::Normal, 1.0)
            }
        };

        let mut layers: Vec<StackedLayer> = Vec::new();
        let mut union_range: Option<TimeRange> = None;
        let mut size: Option<(u32, u32)> = None;
        let mut truncated = false;

        for (slot, conn) in self.index.incoming_slots(group_node.id) {
            let (input, input_truncated) = self.resolve_guarded(conn.from, cache, visited);
            truncated |= input_truncated;
            let Some(input) = input else {
                if slot == 0 {
                    return (None, truncated);
                }
                continue;
            };

            union_range = Some(match union_range {
                Some(range) => range.union(&input.time_range()),
                None => input.time_range(),
            });
            // Output dimensions copy the first (bottom) input.
            size.get_or_insert(input.size());

            match input {
                LayerOutput::Single(meta) => {
                    layers.push(StackedLayer {
                        layer: meta.extended(group_node.id, None),
                        blend: LayerBlendConfig {
                            mode: merge_blend,
                            opacity: merge_opacity,
                            stack_index: layers.len(),
                        },
                    });
                }
                LayerOutput::Stack {
                    layers: members, ..
                } => {
                    // The merge's blend settings land on the topmost member
                    // of this input: they govern how the whole input
                    // composites against what is already in the stack.
                    let top = members.len().saturating_sub(1);
                    for (position, member) in members.into_iter().enumerate() {
                        let (mode, opacity) = if position == top {
                            (merge_blend, merge_opacity)
                        } else {
                            (member.blend.mode, member.blend.opacity)
                        };
                        layers.push(StackedLayer {
                            layer: member.layer.extended(group_node.id, None),
                            blend: LayerBlendConfig {
                                mode,
                                opacity,
                                stack_index: layers.len(),
                            },
                        });
                    }
                }
            }
        }

        if layers.is_empty() {
            return (None, truncated);
        }

        let time_range = union_range.unwrap_or(TimeRange {
            in_frame: self.project.timeline.start,
            out_frame: self.project.timeline.end.max(self.project.timeline.start + 1),
            source_offset: 0,
        });
        let size = size.unwrap_or((0, 0));

        (
            Some(LayerOutput::Stack {
                layers,
                time_range,
                size,
                merge_node: group_node.id,
            }),
            truncated,
        )
    }
}
