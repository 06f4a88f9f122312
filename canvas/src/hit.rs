//! Hit-testing: which shape, if any, lies under a point.
//!
//! Tests run against the unrotated geometry. A rotated rectangle is still
//! picked by its axis-aligned box.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{EDGE_HIT_TOLERANCE, PENCIL_HIT_TOLERANCE};
use crate::doc::{Shape, ShapeKind};
use crate::geom::{Point, point_to_segment_distance};

/// Whether `point` counts as "on" `shape` for selection.
///
/// Boxes and circles are solid. Lines and arrows are hit within
/// [`EDGE_HIT_TOLERANCE`] of the segment, pencil strokes within
/// [`PENCIL_HIT_TOLERANCE`] of any recorded sample. Text uses a fixed-width
/// box above the baseline. Unknown kinds never hit.
#[must_use]
pub fn hit_test(point: Point, shape: &Shape) -> bool {
    match &shape.kind {
        ShapeKind::Rectangle | ShapeKind::Text { .. } => shape.bounds().contains(point),
        ShapeKind::Circle => point.distance(shape.circle_center()) <= shape.radius(),
        ShapeKind::Line { .. } | ShapeKind::Arrow { .. } => match shape.segment() {
            Some((a, b)) => point_to_segment_distance(point, a, b) < EDGE_HIT_TOLERANCE,
            None => false,
        },
        ShapeKind::Pencil { points } => points.iter().any(|p| point.distance(*p) < PENCIL_HIT_TOLERANCE),
        ShapeKind::Unknown => false,
    }
}

/// The last shape in draw order that `point` hits.
#[must_use]
pub fn topmost_hit(point: Point, shapes: &[Shape]) -> Option<&Shape> {
    shapes.iter().rev().find(|s| hit_test(point, s))
}
