//! Rendering: draws shapes and the editor scene onto a [`Surface`].
//!
//! Nothing here mutates application state. Every drawing call is scoped by a
//! `save`/`restore` pair so consecutive shapes never see each other's
//! transform or style.
//!
//! Fallible surface calls propagate through `Result<(), S::Error>`. The
//! top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use crate::consts::{
    GRID_COLOR, GRID_LINE_WIDTH, GRID_SIZE, SELECTION_COLOR, SELECTION_DASH, SELECTION_LINE_WIDTH,
    SELECTION_PADDING,
};
use crate::doc::{Shape, ShapeKind};
use crate::geom::{Point, arrowhead_wings};
use crate::surface::Surface;

/// Draw one shape, honoring its rotation about the bounding-box center.
///
/// # Errors
///
/// Returns the surface error if a transform, arc, or text call fails.
pub fn render<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    surface.save();
    let result = draw_shape(surface, shape);
    surface.restore();
    result
}

fn draw_shape<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    rotate_about_pivot(surface, shape)?;

    surface.set_stroke_style(shape.stroke_color());
    surface.set_fill_style(shape.stroke_color());
    surface.set_line_width(shape.line_width());

    match &shape.kind {
        ShapeKind::Rectangle => {
            let (w, h) = shape.size();
            surface.stroke_rect(shape.x, shape.y, w, h);
            Ok(())
        }
        ShapeKind::Circle => draw_circle(surface, shape),
        ShapeKind::Line { .. } => {
            if let Some((a, b)) = shape.segment() {
                stroke_segment(surface, a, b);
            }
            Ok(())
        }
        ShapeKind::Arrow { .. } => {
            if let Some((a, b)) = shape.segment() {
                draw_arrow(surface, a, b);
            }
            Ok(())
        }
        ShapeKind::Pencil { points } => {
            draw_polyline(surface, points);
            Ok(())
        }
        ShapeKind::Text { content, .. } => {
            surface.set_font(&shape.font());
            surface.fill_text(content.as_deref().unwrap_or(""), shape.x, shape.y)
        }
        ShapeKind::Unknown => Ok(()),
    }
}

/// Apply the shape's rotation around its pivot. A rotation that folds to
/// zero leaves the transform untouched.
fn rotate_about_pivot<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let degrees = shape.rotation_degrees();
    if degrees > 0.0 {
        let pivot = shape.pivot();
        surface.translate(pivot.x, pivot.y)?;
        surface.rotate(degrees.to_radians())?;
        surface.translate(-pivot.x, -pivot.y)?;
    }
    Ok(())
}

fn draw_circle<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let radius = shape.radius();
    // Canvas rejects negative radii; an unnormalized shape draws nothing.
    if radius < 0.0 {
        return Ok(());
    }
    let center = shape.circle_center();
    surface.begin_path();
    surface.arc(center.x, center.y, radius, 0.0, TAU)?;
    surface.stroke();
    Ok(())
}

fn stroke_segment<S: Surface>(surface: &mut S, a: Point, b: Point) {
    surface.begin_path();
    surface.move_to(a.x, a.y);
    surface.line_to(b.x, b.y);
    surface.stroke();
}

fn draw_arrow<S: Surface>(surface: &mut S, start: Point, end: Point) {
    stroke_segment(surface, start, end);

    let [left, right] = arrowhead_wings(start, end);
    surface.begin_path();
    surface.move_to(end.x, end.y);
    surface.line_to(left.x, left.y);
    surface.move_to(end.x, end.y);
    surface.line_to(right.x, right.y);
    surface.stroke();
}

/// Connected polyline through `points`; fewer than two draws nothing.
fn draw_polyline<S: Surface>(surface: &mut S, points: &[Point]) {
    let [first, rest @ ..] = points else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    surface.begin_path();
    surface.move_to(first.x, first.y);
    for p in rest {
        surface.line_to(p.x, p.y);
    }
    surface.stroke();
}

// =============================================================
// Scene
// =============================================================

/// Everything the editor paints in one pass.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Committed shapes of the current page in insertion order.
    pub shapes: &'a [Shape],
    /// The shape being drawn, not yet committed.
    pub provisional: Option<&'a Shape>,
    pub selected: Option<&'a Shape>,
    /// Surface size in world units, used to span the grid.
    pub width: f64,
    pub height: f64,
    pub grid: bool,
}

/// Clear the surface and repaint the whole scene.
///
/// Layers, bottom first: background grid, committed shapes, the provisional
/// shape, then the selection outline.
///
/// # Errors
///
/// Returns the first surface error encountered.
pub fn draw_scene<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<(), S::Error> {
    surface.clear()?;

    if scene.grid {
        draw_grid(surface, scene.width, scene.height);
    }

    for shape in scene.shapes {
        render(surface, shape)?;
    }

    if let Some(shape) = scene.provisional {
        render(surface, shape)?;
    }

    if let Some(shape) = scene.selected {
        surface.save();
        let result = draw_selection(surface, shape);
        surface.restore();
        result?;
    }

    Ok(())
}

fn draw_grid<S: Surface>(surface: &mut S, width: f64, height: f64) {
    surface.save();
    surface.set_stroke_style(GRID_COLOR);
    surface.set_line_width(GRID_LINE_WIDTH);
    surface.begin_path();

    let mut x = 0.0;
    while x < width {
        surface.move_to(x, 0.0);
        surface.line_to(x, height);
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < height {
        surface.move_to(0.0, y);
        surface.line_to(width, y);
        y += GRID_SIZE;
    }

    surface.stroke();
    surface.restore();
}

fn draw_selection<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    rotate_about_pivot(surface, shape)?;
    surface.set_stroke_style(SELECTION_COLOR);
    surface.set_line_width(SELECTION_LINE_WIDTH);
    surface.set_line_dash(&[SELECTION_DASH, SELECTION_DASH])?;

    let outline = shape.bounds().inflate(SELECTION_PADDING);
    surface.stroke_rect(outline.x, outline.y, outline.width, outline.height);

    surface.set_line_dash(&[])
}
