//! Drawing surface abstraction.
//!
//! [`Surface`] is the subset of the 2D canvas API the renderer needs. The
//! browser context implements it in [`crate::web`], the offscreen raster in
//! [`crate::raster`], and [`Recorder`] captures calls for inspection.
//!
//! Methods the browser can reject return `Result`; the rest cannot fail on
//! any backend.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::convert::Infallible;

/// A 2D drawing target with canvas-style state and path semantics.
///
/// State set through the `set_*` methods and transforms is saved and restored
/// as a stack by [`Surface::save`] and [`Surface::restore`].
pub trait Surface {
    type Error;

    /// Erase the whole surface. The current transform applies to later
    /// drawing but not to the erase itself.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the surface cannot be erased.
    fn clear(&mut self) -> Result<(), Self::Error>;

    fn save(&mut self);
    fn restore(&mut self);

    /// # Errors
    ///
    /// Returns the backend error if the transform is rejected.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;

    /// Rotate by `radians`, clockwise on screen.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the transform is rejected.
    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error>;

    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);

    /// Alternating dash and gap lengths. An empty slice draws solid lines.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the pattern is rejected.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Self::Error>;

    /// CSS font shorthand such as `"16px Arial"`.
    fn set_font(&mut self, font: &str);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);

    /// Add a clockwise arc around `(x, y)` to the current path.
    ///
    /// # Errors
    ///
    /// Returns the backend error for a negative radius.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), Self::Error>;

    fn stroke(&mut self);
    fn fill(&mut self);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill `text` with its baseline starting at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns the backend error if text cannot be drawn.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    LineDash(Vec<f64>),
    Font(String),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Stroke,
    Fill,
    StrokeRect(f64, f64, f64, f64),
    FillText(String, f64, f64),
}

/// A surface that draws nothing and remembers every call in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls not yet matched by a `restore`.
    #[must_use]
    pub fn save_depth(&self) -> i64 {
        self.ops.iter().fold(0, |depth, op| match op {
            DrawOp::Save => depth + 1,
            DrawOp::Restore => depth - 1,
            _ => depth,
        })
    }

    /// Recorded path and paint calls, without state changes.
    #[must_use]
    pub fn geometry(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    DrawOp::MoveTo(..)
                        | DrawOp::LineTo(..)
                        | DrawOp::Arc { .. }
                        | DrawOp::StrokeRect(..)
                        | DrawOp::FillText(..)
                )
            })
            .collect()
    }
}

impl Surface for Recorder {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Translate(x, y));
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Rotate(radians));
        Ok(())
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::StrokeStyle(color.to_owned()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::FillStyle(color.to_owned()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Infallible> {
        self.ops.push(DrawOp::LineDash(segments.to_vec()));
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_owned()));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Arc { x, y, radius, start, end });
        Ok(())
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::StrokeRect(x, y, width, height));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::FillText(text.to_owned(), x, y));
        Ok(())
    }
}
