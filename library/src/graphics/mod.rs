pub mod bounds;

pub use bounds::{BoundingBox, accumulated_bounds, transformed_bounds};
