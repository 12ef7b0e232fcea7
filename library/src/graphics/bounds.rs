//! Axis-aligned bounds of transformed rectangles.

use crate::model::transform::Transform;

/// Screen-space axis-aligned box. Recomputed on demand, never cached
/// across graph mutations.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl BoundingBox {
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            center_x: x + width / 2.0,
            center_y: y + height / 2.0,
        }
    }
}

/// AABB of a `width` x `height` rectangle after applying `transform`.
///
/// Each corner is translated to the anchor, scaled, rotated, translated
/// back, and offset by the position; the box is the min/max of the four
/// transformed corners.
pub fn transformed_bounds(width: f64, height: f64, transform: &Transform) -> BoundingBox {
    let anchor_x = transform.anchor.x * width;
    let anchor_y = transform.anchor.y * height;
    let radians = transform.rotation.to_radians();
    let (sin, cos) = radians.sin_cos();

    let corners = [
        (0.0, 0.0),
        (width, 0.0),
        (0.0, height),
        (width, height),
    ];

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (corner_x, corner_y) in corners {
        let dx = (corner_x - anchor_x) * transform.scale.x;
        let dy = (corner_y - anchor_y) * transform.scale.y;
        let rx = dx * cos - dy * sin;
        let ry = dx * sin + dy * cos;
        let x = rx + anchor_x + transform.position.x;
        let y = ry + anchor_y + transform.position.y;

        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    BoundingBox::from_rect(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Bounds after a chain of transforms.
///
/// Each stage computes its bounds against the previous stage's box
/// dimensions and is offset by that box's top-left, so bounds generally
/// grow (rotating a wide rectangle increases its bounding height).
pub fn accumulated_bounds(
    width: f64,
    height: f64,
    base: &Transform,
    chain: &[Transform],
) -> BoundingBox {
    let mut bounds = transformed_bounds(width, height, base);
    for transform in chain {
        let stage = transformed_bounds(bounds.width, bounds.height, transform);
        bounds = BoundingBox::from_rect(
            bounds.x + stage.x,
            bounds.y + stage.y,
            stage.width,
            stage.height,
        );
    }
    bounds
}
