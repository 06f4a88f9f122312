//! Planar geometry shared by hit-testing, rendering, and the input engine.
//!
//! All coordinates are world units with the y axis pointing down, matching
//! the 2D canvas convention. Angles are radians unless a name says otherwise.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH};

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// This point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// An axis-aligned box. `width` and `height` are never negative when built
/// through [`Bounds::from_corners`] or [`Bounds::enclosing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The box spanned by two opposite corners, in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Self::from_corners(min, max))
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment on all four edges.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// The box grown by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }
}

/// Distance from `p` to the closed segment `a`–`b`.
///
/// The projection parameter is clamped to `[0, 1]`. A zero-length segment
/// uses parameter `-1`, so the result is the distance to `a`.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq
    } else {
        -1.0
    };

    let nearest = if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        Point::new(a.x + t * dx, a.y + t * dy)
    };
    p.distance(nearest)
}

/// End points of the two arrowhead wings for a shaft from `start` to `end`.
///
/// Each wing starts at `end`, has length [`ARROW_HEAD_LENGTH`], and sits
/// [`ARROW_HEAD_ANGLE`] either side of the reversed shaft direction.
#[must_use]
pub fn arrowhead_wings(start: Point, end: Point) -> [Point; 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |a: f64| {
        Point::new(
            end.x - ARROW_HEAD_LENGTH * a.cos(),
            end.y - ARROW_HEAD_LENGTH * a.sin(),
        )
    };
    [wing(angle - ARROW_HEAD_ANGLE), wing(angle + ARROW_HEAD_ANGLE)]
}

/// Fold an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if folded >= 360.0 { 0.0 } else { folded }
}
