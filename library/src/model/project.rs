use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::Asset;
use super::connection::Connection;
use super::layer::{Group, Layer};
use super::node::SceneNode;
use crate::error::EngineError;

/// The editing session document: every store the evaluator reads.
///
/// The evaluator never mutates a project; mutation happens through the
/// editing surface, which then invalidates the affected nodes.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub nodes: HashMap<Uuid, SceneNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub assets: HashMap<Uuid, Asset>,
    #[serde(default)]
    pub layers: HashMap<Uuid, Layer>,
    #[serde(default)]
    pub groups: HashMap<Uuid, Group>,
    #[serde(default)]
    pub timeline: TimelineRange,
}

/// Global timeline extent, used to seed union ranges when no node-local
/// range exists.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimelineRange {
    pub start: u64,
    pub end: u64,
}

impl Default for TimelineRange {
    fn default() -> Self {
        Self { start: 0, end: 300 }
    }
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            connections: Vec::new(),
            assets: HashMap::new(),
            layers: HashMap::new(),
            groups: HashMap::new(),
            timeline: TimelineRange::default(),
        }
    }

    pub fn load(json_str: &str) -> Result<Self, EngineError> {
        let project: Project = serde_json::from_str(json_str)?;
        project.validate()?;
        Ok(project)
    }

    /// Model invariants that serde cannot enforce: every time range must be
    /// non-empty. Constructors debug-assert this; loaded documents come
    /// from outside and are checked here.
    fn validate(&self) -> Result<(), EngineError> {
        for layer in self.layers.values() {
            if !layer.time_range.is_valid() {
                return Err(EngineError::project(format!(
                    "layer {} has empty time range [{}, {})",
                    layer.id, layer.time_range.in_frame, layer.time_range.out_frame
                )));
            }
        }
        for group in self.groups.values() {
            if let Some(range) = &group.time_range {
                if !range.is_valid() {
                    return Err(EngineError::project(format!(
                        "group {} has empty time range [{}, {})",
                        group.id, range.in_frame, range.out_frame
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn add_node(&mut self, node: SceneNode) -> Uuid {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    pub fn get_node(&self, id: Uuid) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_node_mut(&mut self, id: Uuid) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn remove_node(&mut self, id: Uuid) -> Option<SceneNode> {
        self.connections.retain(|c| c.from != id && c.to != id);
        self.nodes.remove(&id)
    }

    pub fn add_connection(&mut self, connection: Connection) -> Uuid {
        let id = connection.id;
        self.connections.push(connection);
        id
    }

    pub fn remove_connection(&mut self, id: Uuid) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    pub fn add_asset(&mut self, asset: Asset) -> Uuid {
        let id = asset.id;
        self.assets.insert(id, asset);
        id
    }

    pub fn get_asset(&self, id: Uuid) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn remove_asset(&mut self, id: Uuid) -> Option<Asset> {
        self.assets.remove(&id)
    }

    pub fn add_layer(&mut self, layer: Layer) -> Uuid {
        let id = layer.id;
        self.layers.insert(id, layer);
        id
    }

    pub fn get_layer(&self, id: Uuid) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn get_layer_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    pub fn add_group(&mut self, group: Group) -> Uuid {
        let id = group.id;
        self.groups.insert(id, group);
        id
    }

    pub fn get_group(&self, id: Uuid) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn get_group_mut(&mut self, id: Uuid) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::asset::AssetKind;
    use crate::model::layer::TimeRange;
    use crate::model::node::SourceNode;

    #[test]
    fn test_project_round_trip() {
        let mut project = Project::new("Test");
        let asset = Asset::new(
            "clip",
            1920,
            1080,
            AssetKind::Video {
                duration: 1.0,
                fps: 30.0,
                frame_count: 30,
                source: "clip.mp4".to_string(),
                loading: None,
            },
        );
        let asset_id = project.add_asset(asset);
        let layer = Layer::new("clip layer", asset_id, TimeRange::new(0, 30));
        let layer_id = project.add_layer(layer);
        project.add_node(SceneNode::Source(SourceNode::new(layer_id)));

        let json = project.save().unwrap();
        let restored = Project::load(&json).unwrap();
        assert_eq!(project, restored);
    }

    #[test]
    fn test_load_rejects_empty_time_range() {
        let mut project = Project::new("Test");
        let asset_id = project.add_asset(Asset::new(
            "still",
            640,
            480,
            AssetKind::Image {
                source: "still.png".to_string(),
            },
        ));
        let mut layer = Layer::new("still", asset_id, TimeRange::new(0, 10));
        layer.time_range = TimeRange {
            in_frame: 10,
            out_frame: 10,
            source_offset: 0,
        };
        project.add_layer(layer);

        let json = project.save().unwrap();
        let result = Project::load(&json);
        assert!(matches!(result, Err(EngineError::Project(_))));
    }

    #[test]
    fn test_remove_node_drops_its_connections() {
        let mut project = Project::new("Test");
        let a = project.add_node(SceneNode::Empty(crate::model::node::EmptyNode::new()));
        let b = project.add_node(SceneNode::Empty(crate::model::node::EmptyNode::new()));
        project.add_connection(Connection::new(a, b));

        project.remove_node(a);
        assert!(project.connections.is_empty());
        assert!(project.get_node(b).is_some());
    }
}
