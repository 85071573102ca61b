//! Core of a browser-based page annotation editor.
//!
//! Pages hold raster content (scans, photos, rasterized PDF pages) and black
//! redaction rectangles drawn over it. The crate owns page orientation and
//! zoom, the draw/select gesture machine, and the per-page raster export.
//! The host forwards DOM pointer and keyboard events to
//! [`engine::EditorCore`], applies the returned [`engine::Action`]s, and
//! supplies a [`surface::RenderSurface`] to paint and snapshot scenes.
//! [`web::CanvasSurface`] is the stock surface for an HTML `<canvas>`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Editor`] and its surface-free [`engine::EditorCore`] |
//! | [`page`] | Pages, rectangles, placed images, and the page store |
//! | [`viewport`] | Current page, zoom, and screen/page conversion |
//! | [`input`] | Input event types and the draw gesture state |
//! | [`hit`] | Rectangle hit-testing in page space |
//! | [`geometry`] | Points, sizes, affine transforms, orientation remapping |
//! | [`scene`] | Plain-data description of what the stage shows |
//! | [`surface`] | Rendering and document-rasterizer seams |
//! | [`export`] | Per-page raster export |
//! | [`render`] | Paints a scene on a 2D canvas context |
//! | [`web`] | `web-sys` implementation of the rendering surface |
//! | [`config`] | Editor configuration |
//! | [`consts`] | Shared defaults |

pub mod config;
pub mod consts;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod page;
pub mod render;
pub mod scene;
pub mod surface;
pub mod viewport;
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
