pub mod asset;
pub mod connection;
pub mod layer;
pub mod node;
pub mod project;
pub mod property;
pub mod transform;

pub use asset::{Asset, AssetKind, LoadProgress, ShapePath};
pub use connection::Connection;
pub use layer::{BlendMode, Group, Layer, TimeRange};
pub use node::{EmptyNode, GroupNode, OperationKind, OperationNode, SceneNode, SourceNode};
pub use project::{Project, TimelineRange};
pub use property::{PropertyMap, PropertyValue};
pub use transform::{Anchor, Position, Scale, Transform};
