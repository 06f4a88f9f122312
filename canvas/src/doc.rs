//! Document model: shapes, pages, and sparse shape updates.
//!
//! A [`Shape`] carries the fields every kind shares (identity, owning page,
//! anchor position, optional extent, style) plus a [`ShapeKind`] holding the
//! per-kind geometry. Shapes are replaced rather than mutated: a
//! [`ShapePatch`] applied with [`Shape::merged`] yields a new value.
//!
//! The JSON form uses camelCase keys with the kind in a `type` tag, so stored
//! pages and REST payloads look like:
//!
//! ```json
//! {"id": "…", "pageId": "…", "type": "line", "x": 0, "y": 0, "endX": 100, "endY": 0}
//! ```

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, TEXT_HIT_WIDTH,
};
use crate::geom::{Bounds, Point, normalize_degrees};

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// Unique identifier for a page.
pub type PageId = Uuid;

/// Per-kind geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle; `(x, y)` is the top-left corner.
    Rectangle,
    /// Circle inscribed in the bounding box; `width` is the diameter.
    Circle,
    /// Straight segment from `(x, y)` to the end point.
    #[serde(rename_all = "camelCase")]
    Line {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_y: Option<f64>,
    },
    /// Segment with a V-shaped head at the end point.
    #[serde(rename_all = "camelCase")]
    Arrow {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_y: Option<f64>,
    },
    /// Freehand stroke; samples in the order they were recorded.
    Pencil {
        #[serde(default)]
        points: Vec<Point>,
    },
    /// Single-line text; `(x, y)` is the baseline anchor.
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
    },
    /// A `type` tag this build does not know. Never drawn, never hit.
    #[serde(other)]
    Unknown,
}

impl ShapeKind {
    /// The `type` tag used on the wire.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line { .. } => "line",
            Self::Arrow { .. } => "arrow",
            Self::Pencil { .. } => "pencil",
            Self::Text { .. } => "text",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the kind is sized by dragging out a box.
    #[must_use]
    pub fn is_boxed(&self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Text { .. })
    }
}

/// A shape as stored on a page and sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Assigned at creation and never changed. Missing ids get a fresh one.
    #[serde(default = "Uuid::new_v4")]
    pub id: ShapeId,
    /// The page that owns this shape.
    pub page_id: PageId,
    /// Anchor x; meaning depends on the kind.
    pub x: f64,
    /// Anchor y; meaning depends on the kind.
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Clockwise rotation in degrees around the bounding-box center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Stroke and fill color as a CSS color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl Shape {
    /// A new shape of `kind` anchored at `origin`, with a fresh id and the
    /// default style.
    #[must_use]
    pub fn new(page_id: PageId, kind: ShapeKind, origin: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_id,
            x: origin.x,
            y: origin.y,
            width: None,
            height: None,
            rotation: None,
            color: None,
            stroke_width: None,
            kind,
        }
    }

    /// Anchor position `(x, y)`.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// `(width, height)` with absent values read as zero.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width.unwrap_or(0.0), self.height.unwrap_or(0.0))
    }

    /// Rotation folded into `[0, 360)` degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        normalize_degrees(self.rotation.unwrap_or(0.0))
    }

    /// Center of the bounding box anchored at `(x, y)`; the rotation pivot.
    #[must_use]
    pub fn pivot(&self) -> Point {
        let (w, h) = self.size();
        Bounds::new(self.x, self.y, w, h).center()
    }

    #[must_use]
    pub fn stroke_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH)
    }

    /// Circle radius, half the width.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.size().0 / 2.0
    }

    /// Circle center, one radius in from the top-left corner on both axes.
    #[must_use]
    pub fn circle_center(&self) -> Point {
        let r = self.radius();
        Point::new(self.x + r, self.y + r)
    }

    /// Start and end of a line or arrow. Unset end coordinates fall back to
    /// the start coordinates.
    #[must_use]
    pub fn segment(&self) -> Option<(Point, Point)> {
        match self.kind {
            ShapeKind::Line { end_x, end_y } | ShapeKind::Arrow { end_x, end_y } => Some((
                self.origin(),
                Point::new(end_x.unwrap_or(self.x), end_y.unwrap_or(self.y)),
            )),
            _ => None,
        }
    }

    /// Text font size, defaulting to 16.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        match &self.kind {
            ShapeKind::Text { font_size, .. } => font_size.unwrap_or(DEFAULT_FONT_SIZE),
            _ => DEFAULT_FONT_SIZE,
        }
    }

    /// CSS font shorthand used to draw text, e.g. `"16px Arial"`.
    #[must_use]
    pub fn font(&self) -> String {
        let family = match &self.kind {
            ShapeKind::Text { font_family, .. } => font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
            _ => DEFAULT_FONT_FAMILY,
        };
        format!("{}px {family}", self.font_size())
    }

    /// Axis-aligned extent of the shape's geometry, ignoring rotation.
    ///
    /// Text uses the same fixed-width box as hit-testing.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let (w, h) = self.size();
        match &self.kind {
            ShapeKind::Rectangle | ShapeKind::Unknown => Bounds::new(self.x, self.y, w, h),
            ShapeKind::Circle => Bounds::new(self.x, self.y, w, w),
            ShapeKind::Line { .. } | ShapeKind::Arrow { .. } => {
                let (a, b) = self.segment().unwrap_or((self.origin(), self.origin()));
                Bounds::from_corners(a, b)
            }
            ShapeKind::Pencil { points } => {
                Bounds::enclosing(points.iter().copied()).unwrap_or(Bounds::new(self.x, self.y, 0.0, 0.0))
            }
            ShapeKind::Text { .. } => {
                let fs = self.font_size();
                Bounds::new(self.x, self.y - fs, TEXT_HIT_WIDTH, fs)
            }
        }
    }

    /// Apply `patch` and return the merged shape. Fields absent from the
    /// patch keep their current values; kind-specific fields that do not
    /// belong to this shape's kind are ignored.
    #[must_use]
    pub fn merged(&self, patch: &ShapePatch) -> Shape {
        let mut next = self.clone();
        if let Some(x) = patch.x {
            next.x = x;
        }
        if let Some(y) = patch.y {
            next.y = y;
        }
        if let Some(w) = patch.width {
            next.width = Some(w);
        }
        if let Some(h) = patch.height {
            next.height = Some(h);
        }
        if let Some(r) = patch.rotation {
            next.rotation = Some(r);
        }
        if let Some(ref color) = patch.color {
            next.color = Some(color.clone());
        }
        if let Some(sw) = patch.stroke_width {
            next.stroke_width = Some(sw);
        }

        match &mut next.kind {
            ShapeKind::Line { end_x, end_y } | ShapeKind::Arrow { end_x, end_y } => {
                if patch.end_x.is_some() {
                    *end_x = patch.end_x;
                }
                if patch.end_y.is_some() {
                    *end_y = patch.end_y;
                }
            }
            ShapeKind::Pencil { points } => {
                if let Some(ref incoming) = patch.points {
                    points.clone_from(incoming);
                }
            }
            ShapeKind::Text { content, font_size, font_family } => {
                if patch.content.is_some() {
                    content.clone_from(&patch.content);
                }
                if patch.font_size.is_some() {
                    *font_size = patch.font_size;
                }
                if patch.font_family.is_some() {
                    font_family.clone_from(&patch.font_family);
                }
            }
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Unknown => {}
        }
        next
    }

    /// The same shape with any negative extent folded back so that
    /// `width`/`height` are non-negative and cover the same area.
    #[must_use]
    pub fn normalized(mut self) -> Shape {
        if let Some(w) = self.width.filter(|w| *w < 0.0) {
            self.x += w;
            self.width = Some(-w);
        }
        if let Some(h) = self.height.filter(|h| *h < 0.0) {
            self.y += h;
            self.height = Some(-h);
        }
        self
    }

    /// Patch that moves every coordinate of this shape by `(dx, dy)`.
    #[must_use]
    pub fn translation(&self, dx: f64, dy: f64) -> ShapePatch {
        let mut patch = ShapePatch { x: Some(self.x + dx), y: Some(self.y + dy), ..ShapePatch::default() };
        match &self.kind {
            ShapeKind::Line { end_x, end_y } | ShapeKind::Arrow { end_x, end_y } => {
                patch.end_x = Some(end_x.unwrap_or(self.x) + dx);
                patch.end_y = Some(end_y.unwrap_or(self.y) + dy);
            }
            ShapeKind::Pencil { points } => {
                patch.points = Some(points.iter().map(|p| p.offset(dx, dy)).collect());
            }
            _ => {}
        }
        patch
    }
}

/// Sparse update for a shape. Only present fields are applied.
///
/// Identity (`id`), ownership (`pageId`) and kind are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// A named, ordered collection of shapes. Insertion order is draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Page {
    /// A new empty page with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), name: name.into(), shapes: Vec::new() }
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    /// The page header without its shapes.
    #[must_use]
    pub fn summary(&self) -> PageSummary {
        PageSummary { id: self.id, name: self.name.clone() }
    }
}

/// Page header as listed by the REST backend, which stores shapes separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: PageId,
    pub name: String,
}

/// Default name for the page at zero-based position `index`.
#[must_use]
pub fn default_page_name(index: usize) -> String {
    format!("Page {}", index + 1)
}
