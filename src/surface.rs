//! The rendering-surface seam.
//!
//! The editor never paints pixels. It pushes a [`Scene`] to a
//! [`RenderSurface`], waits for a frame when it needs one painted, and asks
//! for raster snapshots. Decoding images is also the surface's job because
//! the surface is what has to hold on to the decoded bitmaps.
//!
//! Browser futures are not `Send`, hence `?Send` on the async traits.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::page::ImageSource;
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to decode image {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("snapshot failed: {0}")]
    Snapshot(String),
    #[error("rendering surface unavailable: {0}")]
    Unavailable(String),
    #[error("document rasterization failed: {0}")]
    Rasterize(String),
}

/// An image the surface has decoded and can now paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub source: ImageSource,
    /// Natural pixel dimensions.
    pub natural: Size,
}

/// Full-stage snapshot parameters. `width_px` and `height_px` are the
/// output dimensions; `pixel_ratio` maps stage pixels to output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub width_px: u32,
    pub height_px: u32,
    pub pixel_ratio: f64,
}

/// Raw RGBA8 pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A 2D surface that can show a [`Scene`] and rasterize it.
#[async_trait::async_trait(?Send)]
pub trait RenderSurface {
    /// Load `source` and report its natural size. Completes once the bitmap
    /// is ready to paint.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Decode`] if the image cannot be loaded.
    async fn decode(&mut self, source: &ImageSource) -> Result<DecodedImage, SurfaceError>;

    /// Replace whatever the surface shows with `scene`.
    ///
    /// # Errors
    ///
    /// Returns a [`SurfaceError`] if the surface cannot accept the scene.
    fn present(&mut self, scene: &Scene) -> Result<(), SurfaceError>;

    /// Resolve after the surface has painted the last presented scene.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Unavailable`] when frames cannot be scheduled.
    async fn next_frame(&mut self) -> Result<(), SurfaceError>;

    /// Rasterize the whole stage of the last presented scene.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Snapshot`] when the pixels cannot be read.
    async fn snapshot(&mut self, request: SnapshotRequest) -> Result<RasterImage, SurfaceError>;
}

/// External converter that turns a non-raster document (e.g. a PDF) into
/// one raster image per page.
#[async_trait::async_trait(?Send)]
pub trait DocumentRasterizer {
    /// Render every page of `source` at `scale` (1.0 = 72 dpi).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Rasterize`] when the document cannot be read.
    async fn rasterize(&self, source: &ImageSource, scale: f64) -> Result<Vec<ImageSource>, SurfaceError>;
}
