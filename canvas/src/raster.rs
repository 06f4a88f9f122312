//! Offscreen raster backend built on `tiny-skia`.
//!
//! [`PixmapSurface`] follows the 2D canvas model closely enough for the
//! renderer: a save/restore state stack, path building in user space under
//! the current transform, and anti-aliased stroke and fill. Text is drawn
//! from `rusttype` glyph outlines when a font has been supplied; without one
//! `fill_text` is a no-op.
//!
//! Path points are mapped to device space as they are added, so a path
//! keeps the transform that was current when each point was recorded.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::convert::Infallible;
use std::f64::consts::{FRAC_PI_2, TAU};

use rusttype::{Font, OutlineBuilder, Scale, point as rt_point};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::consts::DEFAULT_FONT_SIZE;
use crate::surface::Surface;

/// Errors from creating or exporting a raster surface.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("font data could not be parsed")]
    InvalidFont,
    #[error("png encoding failed: {0}")]
    Png(String),
}

#[derive(Debug, Clone)]
struct DrawState {
    transform: Transform,
    stroke: Color,
    fill: Color,
    line_width: f32,
    dash: Vec<f32>,
    font_px: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            stroke: Color::BLACK,
            fill: Color::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            font_px: narrow(DEFAULT_FONT_SIZE),
        }
    }
}

/// A canvas-like surface that paints into an RGBA pixmap.
pub struct PixmapSurface {
    pixmap: Pixmap,
    background: Color,
    font: Option<Font<'static>>,
    state: DrawState,
    stack: Vec<DrawState>,
    path: PathBuilder,
    has_current_point: bool,
}

impl PixmapSurface {
    /// A transparent surface of `width` by `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidSize`] when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            background: Color::TRANSPARENT,
            font: None,
            state: DrawState::default(),
            stack: Vec::new(),
            path: PathBuilder::new(),
            has_current_point: false,
        })
    }

    /// Use `css` as the color `clear` paints, and paint it now.
    #[must_use]
    pub fn with_background(mut self, css: &str) -> Self {
        self.background = parse_color(css);
        self.pixmap.fill(self.background);
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    /// Load a TrueType or OpenType font from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidFont`] if the data is not a font.
    pub fn with_font_bytes(self, bytes: Vec<u8>) -> Result<Self, RasterError> {
        let font = Font::try_from_vec(bytes).ok_or(RasterError::InvalidFont)?;
        Ok(self.with_font(font))
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// # Errors
    ///
    /// Returns [`RasterError::Png`] if encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        self.pixmap.encode_png().map_err(|e| RasterError::Png(e.to_string()))
    }

    fn map(&self, x: f64, y: f64) -> (f32, f32) {
        let mut pts = [tiny_skia::Point::from_xy(narrow(x), narrow(y))];
        self.state.transform.map_points(&mut pts);
        (pts[0].x, pts[0].y)
    }

    fn path_line_or_move(&mut self, x: f64, y: f64) {
        if self.has_current_point {
            self.line_to(x, y);
        } else {
            self.move_to(x, y);
        }
    }

    fn stroke_builder(&mut self, builder: PathBuilder) {
        let Some(path) = builder.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(self.state.stroke);
        paint.anti_alias = true;

        let mut stroke = Stroke { width: self.state.line_width, ..Stroke::default() };
        if !self.state.dash.is_empty() {
            stroke.dash = StrokeDash::new(self.state.dash.clone(), 0.0);
        }
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_builder(&mut self, builder: PathBuilder) {
        let Some(path) = builder.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(self.state.fill);
        paint.anti_alias = true;
        self.pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

impl Surface for PixmapSurface {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.pixmap.fill(self.background);
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), Infallible> {
        self.state.transform = self.state.transform.pre_translate(narrow(x), narrow(y));
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Infallible> {
        let rotation = Transform::from_rotate(narrow(radians.to_degrees()));
        self.state.transform = self.state.transform.pre_concat(rotation);
        Ok(())
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = parse_color(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.state.fill = parse_color(color);
    }

    fn set_line_width(&mut self, width: f64) {
        // Canvas ignores non-positive and non-finite widths.
        if width.is_finite() && width > 0.0 {
            self.state.line_width = narrow(width);
        }
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Infallible> {
        if segments.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Ok(());
        }
        let mut dash: Vec<f32> = segments.iter().map(|s| narrow(*s)).collect();
        // An odd-length pattern repeats to even length.
        if dash.len() % 2 == 1 {
            dash.extend_from_within(..);
        }
        self.state.dash = if dash.iter().sum::<f32>() > 0.0 { dash } else { Vec::new() };
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        if let Some(px) = parse_font_px(font) {
            self.state.font_px = px;
        }
    }

    fn begin_path(&mut self) {
        self.path = PathBuilder::new();
        self.has_current_point = false;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.map(x, y);
        self.path.move_to(dx, dy);
        self.has_current_point = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if !self.has_current_point {
            self.move_to(x, y);
            return;
        }
        let (dx, dy) = self.map(x, y);
        self.path.line_to(dx, dy);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), Infallible> {
        if !radius.is_finite() || radius < 0.0 {
            return Ok(());
        }
        let sweep = if end - start >= TAU { TAU } else { (end - start).rem_euclid(TAU) };
        let point_at = |a: f64| (x + radius * a.cos(), y + radius * a.sin());

        let (sx, sy) = point_at(start);
        self.path_line_or_move(sx, sy);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = (sweep / FRAC_PI_2).ceil().max(1.0) as u32;
        let step = sweep / f64::from(segments);
        let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;

        for i in 0..segments {
            let a0 = start + step * f64::from(i);
            let a1 = a0 + step;
            let (x0, y0) = point_at(a0);
            let (x3, y3) = point_at(a1);
            let c1 = self.map(x0 - k * a0.sin(), y0 + k * a0.cos());
            let c2 = self.map(x3 + k * a1.sin(), y3 - k * a1.cos());
            let p3 = self.map(x3, y3);
            self.path.cubic_to(c1.0, c1.1, c2.0, c2.1, p3.0, p3.1);
        }
        Ok(())
    }

    fn stroke(&mut self) {
        self.stroke_builder(self.path.clone());
    }

    fn fill(&mut self) {
        self.fill_builder(self.path.clone());
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
        let mut builder = PathBuilder::new();
        for (i, (cx, cy)) in corners.into_iter().enumerate() {
            let (dx, dy) = self.map(cx, cy);
            if i == 0 {
                builder.move_to(dx, dy);
            } else {
                builder.line_to(dx, dy);
            }
        }
        builder.close();
        self.stroke_builder(builder);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Infallible> {
        let Some(font) = self.font.as_ref() else {
            log::debug!("no font loaded, skipping text {text:?}");
            return Ok(());
        };

        let mut outline = GlyphOutline { builder: PathBuilder::new(), transform: self.state.transform };
        let scale = Scale::uniform(self.state.font_px);
        for glyph in font.layout(text, scale, rt_point(narrow(x), narrow(y))) {
            glyph.build_outline(&mut outline);
        }
        self.fill_builder(outline.builder);
        Ok(())
    }
}

/// Collects positioned glyph contours into a device-space path.
struct GlyphOutline {
    builder: PathBuilder,
    transform: Transform,
}

impl GlyphOutline {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        let mut pts = [tiny_skia::Point::from_xy(x, y)];
        self.transform.map_points(&mut pts);
        (pts[0].x, pts[0].y)
    }
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(v: f64) -> f32 {
    v as f32
}

/// Parse a CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, or a basic
/// named color. Anything else is black.
#[must_use]
pub fn parse_color(css: &str) -> Color {
    let css = css.trim();
    if let Some(hex) = css.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(Color::BLACK);
    }
    let (r, g, b, a) = match css.to_ascii_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "lime" => (0, 255, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    };
    Color::from_rgba8(r, g, b, a)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let n: Vec<u8> = hex.bytes().map(hex_nibble).collect::<Option<_>>()?;
    let (r, g, b, a) = match n[..] {
        [r, g, b] => (r * 17, g * 17, b * 17, 255),
        [r, g, b, a] => (r * 17, g * 17, b * 17, a * 17),
        [r1, r0, g1, g0, b1, b0] => (hex_byte(r1, r0), hex_byte(g1, g0), hex_byte(b1, b0), 255),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            (hex_byte(r1, r0), hex_byte(g1, g0), hex_byte(b1, b0), hex_byte(a1, a0))
        }
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}

/// Value of one ASCII hex digit.
const fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

const fn hex_byte(hi: u8, lo: u8) -> u8 {
    (hi << 4) | lo
}

/// Pixel size from a CSS font shorthand such as `"bold 24px Georgia"`.
fn parse_font_px(font: &str) -> Option<f32> {
    let px = font.split_whitespace().find_map(|token| token.strip_suffix("px"))?;
    match px.parse::<f32>() {
        Ok(px) if px.is_finite() && px > 0.0 => Some(px),
        _ => None,
    }
}
