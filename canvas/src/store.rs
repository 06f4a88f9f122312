//! Page store: the authoritative page and shape lists for the editor.
//!
//! DESIGN
//! ======
//! [`PageStore`] owns every page in memory and writes the full list through
//! an injected [`PageBackend`] after each successful mutation. Backends are
//! dumb blob stores: the browser uses `localStorage`, native tools use a JSON
//! file, and tests use memory.
//!
//! INVARIANTS
//! ==========
//! There is always at least one page, and exactly one of them is current.
//! Shape ids are unique across all pages and every shape's `page_id` names
//! the page that holds it. Committed boxes have non-negative extents and
//! committed pencil strokes have at least one point.
//!
//! ERROR HANDLING
//! ==============
//! Lookups on unknown ids return `PageNotFound`/`ShapeNotFound`. A failed
//! backend write leaves the in-memory change in place and is reported as
//! `StoreError::Backend`; the next successful write persists it.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::doc::{Page, PageId, Shape, ShapeId, ShapeKind, ShapePatch, default_page_name};

/// Key under which the browser backend keeps the serialized page list.
pub const STORAGE_KEY: &str = "whiteboard-pages";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("page not found: {0}")]
    PageNotFound(PageId),
    #[error("shape not found: {0}")]
    ShapeNotFound(ShapeId),
    #[error("shape already exists: {0}")]
    DuplicateShape(ShapeId),
    #[error("cannot delete the only page")]
    LastPage,
    #[error("page name must not be blank")]
    BlankName,
    #[error("pencil stroke has no points")]
    EmptyStroke,
    #[error("at least one page is required")]
    NoPages,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

// =============================================================================
// BACKENDS
// =============================================================================

/// Durable storage for the full page list.
pub trait PageBackend {
    /// The stored pages, or `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if stored data exists but cannot be read.
    fn load(&mut self) -> Result<Option<Vec<Page>>, BackendError>;

    /// Replace the stored pages.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the pages cannot be written.
    fn save(&mut self, pages: &[Page]) -> Result<(), BackendError>;
}

/// Keeps the last saved page list in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pages: Option<Vec<Page>>,
    saves: usize,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds `pages`.
    #[must_use]
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self { pages: Some(pages), saves: 0 }
    }

    #[must_use]
    pub fn saved(&self) -> Option<&[Page]> {
        self.pages.as_deref()
    }

    /// How many times `save` has been called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PageBackend for MemoryBackend {
    fn load(&mut self) -> Result<Option<Vec<Page>>, BackendError> {
        Ok(self.pages.clone())
    }

    fn save(&mut self, pages: &[Page]) -> Result<(), BackendError> {
        self.pages = Some(pages.to_vec());
        self.saves += 1;
        Ok(())
    }
}

/// Stores pages as pretty-printed JSON in a single file.
///
/// A missing file loads as "nothing stored".
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Option<Vec<Page>>, BackendError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, pages: &[Page]) -> Result<(), BackendError> {
        let raw = serde_json::to_string_pretty(pages)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Pages and shapes with write-through persistence.
pub struct PageStore<B: PageBackend> {
    backend: B,
    pages: Vec<Page>,
    /// Index into `pages`; always in bounds.
    current: usize,
}

impl<B: PageBackend> PageStore<B> {
    /// Load pages from `backend`. When nothing is stored, or the stored list
    /// is empty, a single `"Page 1"` is created and saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if loading or the initial save fails.
    pub fn open(mut backend: B) -> Result<Self, StoreError> {
        let stored = backend.load()?.filter(|pages| !pages.is_empty());
        let mut store = Self { backend, pages: Vec::new(), current: 0 };
        match stored {
            Some(pages) => store.pages = adopt_shapes(pages),
            None => {
                log::info!("no stored pages, starting with an empty page");
                store.pages.push(Page::new(default_page_name(0)));
                store.flush()?;
            }
        }
        Ok(store)
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Pages ---

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// # Errors
    ///
    /// Returns [`StoreError::PageNotFound`] for an unknown id.
    pub fn page(&self, id: &PageId) -> Result<&Page, StoreError> {
        self.pages.iter().find(|p| p.id == *id).ok_or(StoreError::PageNotFound(*id))
    }

    #[must_use]
    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    /// # Errors
    ///
    /// Returns [`StoreError::PageNotFound`] for an unknown id.
    pub fn set_current_page(&mut self, id: &PageId) -> Result<(), StoreError> {
        self.current = self.page_index(id)?;
        Ok(())
    }

    /// Append an empty page named after its position and make it current.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the write fails.
    pub fn add_page(&mut self) -> Result<&Page, StoreError> {
        self.pages.push(Page::new(default_page_name(self.pages.len())));
        self.current = self.pages.len() - 1;
        self.flush()?;
        Ok(self.current_page())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::BlankName`] if `name` is empty after trimming,
    /// [`StoreError::PageNotFound`] for an unknown id.
    pub fn rename_page(&mut self, id: &PageId, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::BlankName);
        }
        let index = self.page_index(id)?;
        self.pages[index].name = name.to_owned();
        self.flush()
    }

    /// Remove a page and its shapes. If it was current, the first remaining
    /// page becomes current.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LastPage`] when it is the only page,
    /// [`StoreError::PageNotFound`] for an unknown id.
    pub fn delete_page(&mut self, id: &PageId) -> Result<Page, StoreError> {
        let index = self.page_index(id)?;
        if self.pages.len() == 1 {
            return Err(StoreError::LastPage);
        }
        let removed = self.pages.remove(index);
        if index == self.current {
            self.current = 0;
        } else if index < self.current {
            self.current -= 1;
        }
        self.flush()?;
        Ok(removed)
    }

    /// Remove every shape from a page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PageNotFound`] for an unknown id.
    pub fn clear_page(&mut self, id: &PageId) -> Result<(), StoreError> {
        let index = self.page_index(id)?;
        self.pages[index].shapes.clear();
        self.flush()
    }

    /// Replace every page, e.g. from an imported file. The first page becomes
    /// current.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoPages`] for an empty list.
    pub fn load_pages(&mut self, pages: Vec<Page>) -> Result<(), StoreError> {
        if pages.is_empty() {
            return Err(StoreError::NoPages);
        }
        self.pages = adopt_shapes(pages);
        self.current = 0;
        self.flush()
    }

    // --- Shapes ---

    /// Shapes of a page in draw order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PageNotFound`] for an unknown id.
    pub fn list_shapes(&self, page_id: &PageId) -> Result<&[Shape], StoreError> {
        Ok(&self.page(page_id)?.shapes)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ShapeNotFound`] for an unknown id.
    pub fn shape(&self, id: &ShapeId) -> Result<&Shape, StoreError> {
        self.pages
            .iter()
            .find_map(|p| p.shape(id))
            .ok_or(StoreError::ShapeNotFound(*id))
    }

    /// Append a shape to the page named by its `page_id`. Negative extents
    /// are normalized before the shape is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PageNotFound`] if the page does not exist,
    /// [`StoreError::DuplicateShape`] if the id is taken, and
    /// [`StoreError::EmptyStroke`] for a pencil shape with no points.
    pub fn add_shape(&mut self, shape: Shape) -> Result<Shape, StoreError> {
        let index = self.page_index(&shape.page_id)?;
        if self.locate(&shape.id).is_some() {
            return Err(StoreError::DuplicateShape(shape.id));
        }
        if matches!(&shape.kind, ShapeKind::Pencil { points } if points.is_empty()) {
            return Err(StoreError::EmptyStroke);
        }
        let shape = shape.normalized();
        self.pages[index].shapes.push(shape.clone());
        self.flush()?;
        Ok(shape)
    }

    /// Merge `patch` into a shape and return the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeNotFound`] for an unknown id and
    /// [`StoreError::EmptyStroke`] if the patch empties a pencil stroke.
    pub fn update_shape(&mut self, id: &ShapeId, patch: &ShapePatch) -> Result<Shape, StoreError> {
        let (p, s) = self.locate(id).ok_or(StoreError::ShapeNotFound(*id))?;
        let merged = self.pages[p].shapes[s].merged(patch).normalized();
        if matches!(&merged.kind, ShapeKind::Pencil { points } if points.is_empty()) {
            return Err(StoreError::EmptyStroke);
        }
        self.pages[p].shapes[s] = merged.clone();
        self.flush()?;
        Ok(merged)
    }

    /// Remove a shape and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeNotFound`] for an unknown id.
    pub fn delete_shape(&mut self, id: &ShapeId) -> Result<Shape, StoreError> {
        let (p, s) = self.locate(id).ok_or(StoreError::ShapeNotFound(*id))?;
        let removed = self.pages[p].shapes.remove(s);
        self.flush()?;
        Ok(removed)
    }

    // --- Internals ---

    fn page_index(&self, id: &PageId) -> Result<usize, StoreError> {
        self.pages.iter().position(|p| p.id == *id).ok_or(StoreError::PageNotFound(*id))
    }

    /// `(page index, shape index)` of a shape.
    fn locate(&self, id: &ShapeId) -> Option<(usize, usize)> {
        self.pages
            .iter()
            .enumerate()
            .find_map(|(p, page)| page.shapes.iter().position(|s| s.id == *id).map(|s| (p, s)))
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if let Err(e) = self.backend.save(&self.pages) {
            log::warn!("failed to persist {} pages: {e}", self.pages.len());
            return Err(e.into());
        }
        Ok(())
    }
}

/// Point every shape's `page_id` at the page that holds it.
fn adopt_shapes(mut pages: Vec<Page>) -> Vec<Page> {
    for page in &mut pages {
        for shape in &mut page.shapes {
            if shape.page_id != page.id {
                log::warn!("shape {} claimed page {}, reassigned to {}", shape.id, shape.page_id, page.id);
                shape.page_id = page.id;
            }
        }
    }
    pages
}
