use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::ROTATE_STEP_DEG;
use crate::doc::{Page, PageId, Shape, ShapeId, ShapeKind, ShapePatch};
use crate::geom::{Bounds, Point, normalize_degrees};
use crate::hit::topmost_hit;
use crate::input::{Button, InputState, Tool, UiState};
use crate::render::{Scene, draw_scene};
use crate::store::{PageBackend, PageStore, StoreError};
use crate::surface::Surface;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated(Shape),
    ShapeUpdated { id: ShapeId, fields: ShapePatch },
    ShapeDeleted { id: ShapeId },
    RenderNeeded,
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore<B: PageBackend> {
    pub store: PageStore<B>,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    /// Draw the background grid.
    pub grid: bool,
}

impl<B: PageBackend> EngineCore<B> {
    #[must_use]
    pub fn new(store: PageStore<B>) -> Self {
        Self {
            store,
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            grid: true,
        }
    }

    // --- Tool / page ---

    /// Set the active tool. An unfinished drawing is abandoned.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        self.on_pointer_cancel()
    }

    /// Switch pages, dropping the selection and any gesture.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PageNotFound`] for an unknown id.
    pub fn set_current_page(&mut self, id: &PageId) -> Result<Vec<Action>, StoreError> {
        self.store.set_current_page(id)?;
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        Ok(vec![Action::RenderNeeded])
    }

    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.dpr = dpr;
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Store errors from looking up the current page's shapes.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, StoreError> {
        if button != Button::Primary {
            return Ok(Vec::new());
        }

        let page = self.store.current_page();
        if let Some(shape) = self.ui.tool.provisional_shape(page.id, pt) {
            self.ui.selected_id = None;
            self.input = InputState::Drawing { shape, anchor: pt };
            return Ok(vec![Action::RenderNeeded]);
        }

        match topmost_hit(pt, &page.shapes) {
            Some(shape) => {
                let offset = Point::new(pt.x - shape.x, pt.y - shape.y);
                self.ui.selected_id = Some(shape.id);
                self.input = InputState::DraggingShape { id: shape.id, offset };
            }
            None => {
                self.ui.selected_id = None;
                self.input = InputState::Idle;
            }
        }
        Ok(vec![Action::RenderNeeded])
    }

    /// # Errors
    ///
    /// Store errors from moving the dragged shape.
    pub fn on_pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, StoreError> {
        match &mut self.input {
            InputState::Idle => Ok(Vec::new()),
            InputState::Drawing { shape, anchor } => {
                extend_provisional(shape, *anchor, pt);
                Ok(vec![Action::RenderNeeded])
            }
            InputState::DraggingShape { id, offset } => {
                let (id, offset) = (*id, *offset);
                let Ok(shape) = self.store.shape(&id) else {
                    // Removed mid-drag; nothing left to move.
                    self.input = InputState::Idle;
                    return Ok(Vec::new());
                };
                let fields = shape.translation(pt.x - offset.x - shape.x, pt.y - offset.y - shape.y);
                self.store.update_shape(&id, &fields)?;
                Ok(vec![Action::ShapeUpdated { id, fields }, Action::RenderNeeded])
            }
        }
    }

    /// Finish the gesture. A drawing gesture commits its shape to the current
    /// page.
    ///
    /// # Errors
    ///
    /// Store errors from committing the shape. The provisional shape is
    /// discarded either way.
    pub fn on_pointer_up(&mut self, _pt: Point, button: Button) -> Result<Vec<Action>, StoreError> {
        if button != Button::Primary {
            return Ok(Vec::new());
        }
        match std::mem::take(&mut self.input) {
            InputState::Drawing { shape, .. } => {
                let committed = self.store.add_shape(shape)?;
                log::debug!("committed {} {}", committed.kind.name(), committed.id);
                Ok(vec![Action::ShapeCreated(committed), Action::RenderNeeded])
            }
            InputState::DraggingShape { .. } | InputState::Idle => Ok(Vec::new()),
        }
    }

    /// Abandon the gesture, e.g. when the pointer is released outside the
    /// canvas. A provisional shape is dropped without touching the store.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Drawing { .. } => vec![Action::RenderNeeded],
            InputState::DraggingShape { .. } | InputState::Idle => Vec::new(),
        }
    }

    // --- Selection commands ---

    /// # Errors
    ///
    /// Store errors from removing the shape.
    pub fn delete_selected(&mut self) -> Result<Vec<Action>, StoreError> {
        let Some(id) = self.ui.selected_id.take() else {
            return Ok(Vec::new());
        };
        self.input = InputState::Idle;
        self.store.delete_shape(&id)?;
        Ok(vec![Action::ShapeDeleted { id }, Action::RenderNeeded])
    }

    /// # Errors
    ///
    /// Store errors from updating the shape.
    pub fn set_selected_color(&mut self, color: &str) -> Result<Vec<Action>, StoreError> {
        self.update_selected(ShapePatch { color: Some(color.to_owned()), ..ShapePatch::default() })
    }

    /// Set the selected shape's rotation in degrees, folded into `[0, 360)`.
    /// Pencil strokes do not rotate.
    ///
    /// # Errors
    ///
    /// Store errors from updating the shape.
    pub fn set_selected_rotation(&mut self, degrees: f64) -> Result<Vec<Action>, StoreError> {
        if self.selected_shape().is_none_or(|s| matches!(s.kind, ShapeKind::Pencil { .. })) {
            return Ok(Vec::new());
        }
        self.update_selected(ShapePatch { rotation: Some(normalize_degrees(degrees)), ..ShapePatch::default() })
    }

    /// Turn the selected shape by one rotate step.
    ///
    /// # Errors
    ///
    /// Store errors from updating the shape.
    pub fn rotate_selected(&mut self) -> Result<Vec<Action>, StoreError> {
        let Some(shape) = self.selected_shape() else {
            return Ok(Vec::new());
        };
        let degrees = shape.rotation_degrees() + ROTATE_STEP_DEG;
        self.set_selected_rotation(degrees)
    }

    /// Replace the selected text shape's content. Other kinds are left alone.
    ///
    /// # Errors
    ///
    /// Store errors from updating the shape.
    pub fn set_selected_content(&mut self, content: &str) -> Result<Vec<Action>, StoreError> {
        if !self.selected_is_text() {
            return Ok(Vec::new());
        }
        self.update_selected(ShapePatch { content: Some(content.to_owned()), ..ShapePatch::default() })
    }

    /// # Errors
    ///
    /// Store errors from updating the shape.
    pub fn set_selected_font_size(&mut self, size: f64) -> Result<Vec<Action>, StoreError> {
        if !self.selected_is_text() {
            return Ok(Vec::new());
        }
        self.update_selected(ShapePatch { font_size: Some(size), ..ShapePatch::default() })
    }

    fn selected_is_text(&self) -> bool {
        self.selected_shape().is_some_and(|s| matches!(s.kind, ShapeKind::Text { .. }))
    }

    fn update_selected(&mut self, fields: ShapePatch) -> Result<Vec<Action>, StoreError> {
        let Some(id) = self.ui.selected_id else {
            return Ok(Vec::new());
        };
        self.store.update_shape(&id, &fields)?;
        Ok(vec![Action::ShapeUpdated { id, fields }, Action::RenderNeeded])
    }

    // --- Queries ---

    #[must_use]
    pub fn current_page(&self) -> &Page {
        self.store.current_page()
    }

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected_id
    }

    /// The selected shape if it is still on the current page.
    #[must_use]
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.ui.selected_id.and_then(|id| self.current_page().shape(&id))
    }

    /// The shape being drawn, if a drawing gesture is in progress.
    #[must_use]
    pub fn provisional(&self) -> Option<&Shape> {
        match &self.input {
            InputState::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }

    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            shapes: &self.current_page().shapes,
            provisional: self.provisional(),
            selected: self.selected_shape(),
            width: self.viewport_width,
            height: self.viewport_height,
            grid: self.grid,
        }
    }

    /// Repaint the whole scene onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns the surface error from the first failing call.
    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        draw_scene(surface, &self.scene())
    }
}

/// Grow a provisional shape toward the pointer.
fn extend_provisional(shape: &mut Shape, anchor: Point, pt: Point) {
    match &mut shape.kind {
        ShapeKind::Pencil { points } => points.push(pt),
        ShapeKind::Line { end_x, end_y } | ShapeKind::Arrow { end_x, end_y } => {
            *end_x = Some(pt.x);
            *end_y = Some(pt.y);
        }
        ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Text { .. } => {
            let b = Bounds::from_corners(anchor, pt);
            shape.x = b.x;
            shape.y = b.y;
            shape.width = Some(b.width);
            shape.height = Some(b.height);
        }
        ShapeKind::Unknown => {}
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine<B: PageBackend> {
    canvas: HtmlCanvasElement,
    pub core: EngineCore<B>,
}

impl<B: PageBackend> Engine<B> {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, store: PageStore<B>) -> Self {
        Self { canvas, core: EngineCore::new(store) }
    }

    /// Update viewport dimensions and size the backing store to match.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width(device_px(width_css * dpr));
        self.canvas.set_height(device_px(height_css * dpr));
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    /// # Errors
    ///
    /// See [`EngineCore::on_pointer_down`].
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, StoreError> {
        self.core.on_pointer_down(pt, button)
    }

    /// # Errors
    ///
    /// See [`EngineCore::on_pointer_move`].
    pub fn on_pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, StoreError> {
        self.core.on_pointer_move(pt)
    }

    /// # Errors
    ///
    /// See [`EngineCore::on_pointer_up`].
    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, StoreError> {
        self.core.on_pointer_up(pt, button)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let mut ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        let dpr = self.core.dpr;
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.core.render(&mut ctx)
    }

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.core.selection()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}
