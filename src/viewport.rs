//! Viewport: page navigation, zoom, and the stage transform.
//!
//! The stage is the on-screen surface that shows exactly one page. Its size
//! is the current page's content frame times `zoom`. Page content is never
//! rotated by the stage itself (orientation is baked into page coordinates
//! by [`Page::set_orientation`](crate::page::Page::set_orientation)), so the
//! stage transform is a zoom followed by a translation to the stage origin.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use tracing::{debug, warn};

use crate::geometry::{Affine, Point, Size};
use crate::page::PageStore;

/// Zoom and stage geometry for the current page.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    zoom: f64,
    stage: Size,
    origin: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, stage: Size::new(0.0, 0.0), origin: Point::default() }
    }
}

impl Viewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom factor; always positive.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Displayed stage size in screen pixels.
    #[must_use]
    pub fn stage_size(&self) -> Size {
        self.stage
    }

    /// Top-left corner of the stage in screen space.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Move the stage within the host element. Pointer conversion picks this
    /// up immediately.
    pub fn set_stage_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    // --- Navigation ---

    /// Make `index` the current page and resize the stage for it. Out of
    /// range indices are ignored. Returns whether the page changed hands.
    pub fn go_to_page(&mut self, pages: &mut PageStore, index: usize) -> bool {
        if let Err(e) = pages.set_current(index) {
            debug!(error = %e, "navigation ignored");
            return false;
        }
        self.apply_orientation(pages);
        true
    }

    /// Advance one page; no-op on the last page.
    pub fn next_page(&mut self, pages: &mut PageStore) -> bool {
        match pages.current_index() {
            Some(i) => self.go_to_page(pages, i + 1),
            None => false,
        }
    }

    /// Go back one page; no-op on the first page.
    pub fn prev_page(&mut self, pages: &mut PageStore) -> bool {
        match pages.current_index().and_then(|i| i.checked_sub(1)) {
            Some(i) => self.go_to_page(pages, i),
            None => false,
        }
    }

    // --- Presentation ---

    /// Recompute the displayed stage size from the current page's oriented
    /// frame and the zoom. Shape coordinates are not touched. With no pages
    /// the stage collapses to zero.
    pub fn apply_orientation(&mut self, pages: &PageStore) {
        self.stage = match pages.current_page() {
            Ok(page) => page.content_size().scaled(self.zoom),
            Err(_) => Size::new(0.0, 0.0),
        };
    }

    /// Set the zoom factor. Non-positive or non-finite factors are ignored.
    /// Returns whether the zoom was applied.
    pub fn set_zoom(&mut self, pages: &PageStore, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            warn!(factor, "rejected zoom factor");
            return false;
        }
        self.zoom = factor;
        self.apply_orientation(pages);
        true
    }

    /// Multiply the zoom by `step`.
    pub fn zoom_in(&mut self, pages: &PageStore, step: f64) -> bool {
        self.set_zoom(pages, self.zoom * step)
    }

    /// Divide the zoom by `step`.
    pub fn zoom_out(&mut self, pages: &PageStore, step: f64) -> bool {
        self.set_zoom(pages, self.zoom / step)
    }

    pub fn reset_zoom(&mut self, pages: &PageStore) -> bool {
        self.set_zoom(pages, 1.0)
    }

    // --- Coordinate conversion ---

    /// Page space → screen space.
    #[must_use]
    pub fn stage_transform(&self) -> Affine {
        Affine::scale(self.zoom, self.zoom).then(Affine::translate(self.origin.x, self.origin.y))
    }

    /// Convert a pointer position to current-page coordinates by undoing the
    /// full stage transform.
    #[must_use]
    pub fn screen_to_page(&self, screen: Point) -> Point {
        self.stage_transform().invert().unwrap_or_default().apply(screen)
    }

    /// Convert a current-page coordinate to screen space.
    #[must_use]
    pub fn page_to_screen(&self, page: Point) -> Point {
        self.stage_transform().apply(page)
    }
}
