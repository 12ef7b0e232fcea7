use compositor_core::cache::{FrameImageCache, FrameKey};
use compositor_core::evaluation::{Evaluator, LayerOutput};
use compositor_core::model::asset::{Asset, AssetKind};
use compositor_core::model::connection::Connection;
use compositor_core::model::layer::{BlendMode, Group, Layer, TimeRange};
use compositor_core::model::node::{
    GroupNode, OperationKind, OperationNode, SceneNode, SourceNode,
};
use compositor_core::model::project::Project;
use compositor_core::model::property::PropertyMap;

use image::RgbaImage;
use std::sync::Arc;
use uuid::Uuid;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn add_video_source(project: &mut Project, frames: u64, range: TimeRange) -> Uuid {
    let asset = Asset::new(
        "clip",
        1920,
        1080,
        AssetKind::Video {
            duration: frames as f64 / 30.0,
            fps: 30.0,
            frame_count: frames,
            source: "clip.mp4".to_string(),
            loading: None,
        },
    );
    let asset_id = project.add_asset(asset);
    let layer_id = project.add_layer(Layer::new("clip", asset_id, range));
    project.add_node(SceneNode::Source(SourceNode::new(layer_id)))
}

fn add_operation(project: &mut Project, kind: OperationKind) -> Uuid {
    project.add_node(SceneNode::Operation(OperationNode::new(
        kind,
        PropertyMap::new(),
    )))
}

fn add_merge(project: &mut Project, blend: BlendMode) -> Uuid {
    let mut group = Group::new("merge", Vec::new());
    group.blend_mode = blend;
    let group_id = project.add_group(group);
    project.add_node(SceneNode::Group(GroupNode::new(group_id)))
}

fn connect(project: &mut Project, from: Uuid, to: Uuid, slot: u32) {
    project.add_connection(Connection::with_slots(from, to, None, Some(slot)));
}

/// Two effect-chained sources merged, with a nested merge: the full shape a
/// real composite takes.
#[test]
fn test_full_composite_graph() {
    init_logs();
    let mut project = Project::new("Composite");

    // Background: source -> blur -> brightness.
    let bg = add_video_source(&mut project, 60, TimeRange::new(0, 60));
    let blur = add_operation(&mut project, OperationKind::Blur);
    let brightness = add_operation(&mut project, OperationKind::Brightness);
    connect(&mut project, bg, blur, 0);
    connect(&mut project, blur, brightness, 0);

    // Foreground pair merged with multiply.
    let fg_a = add_video_source(&mut project, 30, TimeRange::new(10, 40));
    let fg_b = add_video_source(&mut project, 30, TimeRange::new(20, 50));
    let inner = add_merge(&mut project, BlendMode::Multiply);
    connect(&mut project, fg_a, inner, 0);
    connect(&mut project, fg_b, inner, 1);

    // Final composite.
    let root = add_merge(&mut project, BlendMode::Normal);
    connect(&mut project, brightness, root, 0);
    connect(&mut project, inner, root, 1);

    let mut evaluator = Evaluator::new();
    let output = evaluator.get_layer_output(&project, root).unwrap();

    let LayerOutput::Stack {
        layers,
        time_range,
        size,
        merge_node,
    } = output
    else {
        panic!("expected Stack");
    };

    assert_eq!(merge_node, root);
    assert_eq!(size, (1920, 1080));
    // Union over [0,60), [10,40), [20,50).
    assert_eq!(time_range.in_frame, 0);
    assert_eq!(time_range.out_frame, 60);

    // Background first, then the inner stack flattened in order.
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[0].layer.source_node, bg);
    assert_eq!(layers[1].layer.source_node, fg_a);
    assert_eq!(layers[2].layer.source_node, fg_b);
    for (index, layer) in layers.iter().enumerate() {
        assert_eq!(layer.blend.stack_index, index);
    }

    // The background carries its two-effect chain, first-applied first.
    let chain: Vec<&str> = layers[0]
        .layer
        .effects
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(chain, vec!["blur", "brightness"]);

    // Inner merge blending: bottom member keeps multiply, its top member is
    // overwritten by the outer merge's normal blend.
    assert_eq!(layers[1].blend.mode, BlendMode::Multiply);
    assert_eq!(layers[2].blend.mode, BlendMode::Normal);
}

#[test]
fn test_edit_invalidate_requery() {
    let mut project = Project::new("Edit");
    let source = add_video_source(&mut project, 30, TimeRange::new(0, 30));
    let blur = add_operation(&mut project, OperationKind::Blur);
    let root = add_merge(&mut project, BlendMode::Normal);
    connect(&mut project, source, blur, 0);
    connect(&mut project, blur, root, 0);

    let mut evaluator = Evaluator::new();
    let before = evaluator
        .get_layer_effect_chain(&project, root, Some(source))
        .unwrap();
    assert_eq!(before.len(), 1);

    // Edit the blur parameters and notify.
    if let Some(SceneNode::Operation(op)) = project.get_node_mut(blur) {
        op.params.set("radius", 12.0);
    }
    evaluator.invalidate(&project, blur);

    let after = evaluator
        .get_layer_effect_chain(&project, root, Some(source))
        .unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].params.get_f64("radius"), Some(12.0));
}

#[test]
fn test_rewire_changes_stack_order() {
    let mut project = Project::new("Rewire");
    let a = add_video_source(&mut project, 30, TimeRange::new(0, 30));
    let b = add_video_source(&mut project, 30, TimeRange::new(0, 30));
    let root = add_merge(&mut project, BlendMode::Normal);
    let conn_a = project.add_connection(Connection::with_slots(a, root, None, Some(0)));
    let conn_b = project.add_connection(Connection::with_slots(b, root, None, Some(1)));

    let mut evaluator = Evaluator::new();
    let layers = evaluator.get_layers_at_node(&project, root).unwrap();
    assert_eq!(layers[0].layer.source_node, a);
    assert_eq!(layers[1].layer.source_node, b);

    // Swap the slots and notify; the wiring change alone alters the input
    // hash, but the invalidate keeps downstream consumers honest too.
    project.remove_connection(conn_a);
    project.remove_connection(conn_b);
    project.add_connection(Connection::with_slots(a, root, None, Some(1)));
    project.add_connection(Connection::with_slots(b, root, None, Some(0)));
    evaluator.invalidate(&project, root);

    let layers = evaluator.get_layers_at_node(&project, root).unwrap();
    assert_eq!(layers[0].layer.source_node, b);
    assert_eq!(layers[1].layer.source_node, a);
}

#[test]
fn test_frame_cache_capacity_and_asset_clear() {
    let cache = FrameImageCache::with_capacity(3);
    let asset = Uuid::new_v4();

    for frame in 0..4 {
        cache.put(
            FrameKey::new(asset, frame),
            Arc::new(compositor_core::cache::FrameImage::new(RgbaImage::new(
                4, 4,
            ))),
        );
    }
    assert_eq!(cache.len(), 3);
    assert!(cache.get(FrameKey::new(asset, 0)).is_none());

    cache.clear_asset(asset);
    assert!(cache.is_empty());
}
