//! Per-page raster export.
//!
//! Each page is shown on the stage, given one frame to paint, and snapshotted
//! with the long edge of the stage normalized to the requested pixel count.
//! Pages are processed strictly one after another; the exporter borrows the
//! editor mutably for the whole run, so nothing else can move the current
//! page underneath it.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use tracing::{debug, info, warn};

use crate::engine::{Editor, EditorError};
use crate::geometry::Size;
use crate::page::PageError;
use crate::scene::Scene;
use crate::surface::{RasterImage, RenderSurface, SnapshotRequest, SurfaceError};

/// One exported page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    /// 1-based position in the document.
    pub page_number: usize,
    /// Suggested download name, e.g. `page-1.png`.
    pub file_name: String,
    pub image: RasterImage,
}

/// Suggested file name for the `page_number`-th page.
#[must_use]
pub fn file_name(page_number: usize) -> String {
    format!("page-{page_number}.png")
}

/// Snapshot parameters that scale `stage` so its longer side becomes exactly
/// `long_edge` pixels. `None` for an empty stage or a zero long edge.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn snapshot_request(stage: Size, long_edge: u32) -> Option<SnapshotRequest> {
    if long_edge == 0 || !stage.is_positive() {
        return None;
    }
    let pixel_ratio = f64::from(long_edge) / stage.long_edge();
    let to_px = |v: f64| ((v * pixel_ratio).round() as u32).clamp(1, long_edge);
    Some(SnapshotRequest { width_px: to_px(stage.width), height_px: to_px(stage.height), pixel_ratio })
}

/// Combine an export outcome with the re-render that follows it. An export
/// failure wins over a render failure, which is only logged.
fn settle<T>(result: Result<T, EditorError>, rendered: Result<(), EditorError>) -> Result<T, EditorError> {
    match (result, rendered) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(render_err)) => Err(render_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(render_err)) => {
            warn!(error = %render_err, "re-render after failed export also failed");
            Err(e)
        }
    }
}

fn check_long_edge(long_edge: u32) -> Result<(), EditorError> {
    if long_edge == 0 {
        return Err(EditorError::InvalidArgument("export long edge must be positive".into()));
    }
    Ok(())
}

impl<S: RenderSurface> Editor<S> {
    /// Export every page in document order at `long_edge` pixels on the
    /// longer side. Each page is made current in turn; the page that was
    /// current before the call is restored afterwards, even on failure.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidArgument`] for a zero long edge,
    /// [`PageError::NoCurrentPage`] when there are no pages, and any
    /// [`SurfaceError`] raised while painting or snapshotting.
    pub async fn export_all(&mut self, long_edge: u32) -> Result<Vec<ExportedPage>, EditorError> {
        check_long_edge(long_edge)?;
        let Some(restore) = self.core.current_page_index() else {
            return Err(PageError::NoCurrentPage.into());
        };
        let selected = self.core.selection();
        let count = self.core.page_count();
        info!(pages = count, long_edge, "export started");

        let result = self.export_pages(count, long_edge).await;

        // Back to where the user was, selection included.
        self.core.go_to_page(restore);
        if let Some(id) = selected {
            self.core.select(id);
        }
        let exported = settle(result, self.render())?;
        info!(pages = exported.len(), "export finished");
        Ok(exported)
    }

    /// [`export_all`](Self::export_all) at the configured
    /// [`export_long_edge`](crate::config::EditorConfig::export_long_edge).
    ///
    /// # Errors
    ///
    /// Same as [`export_all`](Self::export_all).
    pub async fn export_document(&mut self) -> Result<Vec<ExportedPage>, EditorError> {
        self.export_all(self.core.config.export_long_edge).await
    }

    async fn export_pages(&mut self, count: usize, long_edge: u32) -> Result<Vec<ExportedPage>, EditorError> {
        let mut exported = Vec::with_capacity(count);
        for index in 0..count {
            self.core.go_to_page(index);
            let scene = self.core.scene();
            exported.push(self.capture(index, &scene, long_edge).await?);
        }
        Ok(exported)
    }

    /// Export a single page without changing which page is current. The live
    /// scene is re-presented afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidArgument`] for a zero long edge,
    /// [`PageError::OutOfRange`] for a bad index, and any [`SurfaceError`].
    pub async fn export_page(&mut self, index: usize, long_edge: u32) -> Result<ExportedPage, EditorError> {
        check_long_edge(long_edge)?;
        let scene = self.core.page_scene(index)?;
        let result = self.capture(index, &scene, long_edge).await;
        settle(result, self.render())
    }

    async fn capture(&mut self, index: usize, scene: &Scene, long_edge: u32) -> Result<ExportedPage, EditorError> {
        let request = snapshot_request(scene.stage, long_edge)
            .ok_or_else(|| SurfaceError::Snapshot(format!("page {} has an empty stage", index + 1)))?;
        self.surface.present(scene)?;
        self.surface.next_frame().await?;
        let image = self.surface.snapshot(request).await?;
        debug!(page = index, width = image.width, height = image.height, "page exported");
        Ok(ExportedPage { page_number: index + 1, file_name: file_name(index + 1), image })
    }
}
