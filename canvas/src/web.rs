//! Browser bindings: the `Canvas2D` context as a [`Surface`] and
//! `localStorage` as a [`PageBackend`].

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Storage};

use crate::doc::Page;
use crate::store::{BackendError, PageBackend, STORAGE_KEY};
use crate::surface::Surface;

// Inherent context methods take `&self`, so they are called by path to keep
// them from resolving to the `&mut self` trait methods below.
impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear(&mut self) -> Result<(), JsValue> {
        let Some(canvas) = self.canvas() else {
            return Ok(());
        };
        CanvasRenderingContext2d::save(self);
        let result = CanvasRenderingContext2d::set_transform(self, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        if result.is_ok() {
            self.clear_rect(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));
        }
        CanvasRenderingContext2d::restore(self);
        result
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::translate(self, x, y)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::rotate(self, radians)
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), JsValue> {
        let array: js_sys::Array = segments.iter().map(|s| JsValue::from_f64(*s)).collect();
        CanvasRenderingContext2d::set_line_dash(self, &array)
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::arc(self, x, y, radius, start, end)
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::stroke_rect(self, x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::fill_text(self, text, x, y)
    }
}

/// Pages kept as one JSON string under [`STORAGE_KEY`] in `localStorage`.
pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    /// Bind to the window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] outside a browser window or when
    /// storage is disabled.
    pub fn new() -> Result<Self, BackendError> {
        let window = web_sys::window().ok_or_else(|| BackendError::Unavailable("no window".into()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(BackendError::Unavailable("localStorage disabled".into())),
            Err(e) => Err(js_error(&e)),
        }
    }
}

impl PageBackend for LocalStorageBackend {
    fn load(&mut self) -> Result<Option<Vec<Page>>, BackendError> {
        match self.storage.get_item(STORAGE_KEY).map_err(|e| js_error(&e))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, pages: &[Page]) -> Result<(), BackendError> {
        let json = serde_json::to_string(pages)?;
        self.storage.set_item(STORAGE_KEY, &json).map_err(|e| js_error(&e))
    }
}

fn js_error(value: &JsValue) -> BackendError {
    BackendError::Unavailable(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
