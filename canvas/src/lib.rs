//! Shape geometry, rendering, and input engine for the whiteboard.
//!
//! This crate is compiled to WebAssembly for the browser editor and linked
//! natively by the server and CLI. It owns the document model for pages and
//! shapes, hit-testing, pointer gestures, and drawing the scene onto any
//! [`surface::Surface`]: the browser `Canvas2D` context or an offscreen
//! [`raster::PixmapSurface`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Page and shape types, patches, and per-kind geometry |
//! | [`store`] | Page store with write-through persistence backends |
//! | [`input`] | Tools and the gesture state machine |
//! | [`hit`] | Hit-testing against shapes |
//! | [`render`] | Per-shape and whole-scene drawing |
//! | [`surface`] | Drawing target trait and the call recorder |
//! | [`raster`] | tiny-skia surface for PNG export |
//! | [`web`] | Browser context surface and `localStorage` backend |
//! | [`geom`] | Points, bounds, and distance helpers |
//! | [`consts`] | Shared drawing and tolerance constants |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod raster;
pub mod render;
pub mod store;
pub mod surface;
pub mod web;
