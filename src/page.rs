//! Page model: pages, their redaction rectangles and placed images, and the
//! ordered store that owns them.
//!
//! Shape and image coordinates are always expressed in the page's *current*
//! orientation. Turning a page re-expresses every coordinate through
//! [`geometry::remap_transform`](crate::geometry::remap_transform) so nothing
//! drifts or falls off the page; the viewport never has to rotate content.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::geometry::{self, Affine, Bounds, Orientation, Point, Size};

/// Unique identifier for a redaction rectangle.
pub type ShapeId = Uuid;

/// Unique identifier for a placed image.
pub type ImageId = Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error("page index {index} out of range (page count {count})")]
    OutOfRange { index: usize, count: usize },
    #[error("no current page")]
    NoCurrentPage,
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidImage { width: f64, height: f64 },
    #[error("invalid page dimensions: {width}x{height}")]
    InvalidPageSize { width: f64, height: f64 },
}

/// A redaction rectangle drawn on a page.
///
/// The rectangle turns about its `(x, y)` origin by `rotation` degrees, the
/// same convention a 2D scene-graph node uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    pub id: ShapeId,
    /// Origin x in page space.
    pub x: f64,
    /// Origin y in page space.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees, kept in `[0, 360)`.
    pub rotation: f64,
}

impl RectShape {
    /// A new unrotated rectangle covering `bounds`.
    #[must_use]
    pub fn new(id: ShapeId, bounds: Bounds) -> Self {
        Self { id, x: bounds.x, y: bounds.y, width: bounds.width, height: bounds.height, rotation: 0.0 }
    }

    /// Replace position and size, leaving rotation alone.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    /// Transform from page space into this rectangle's own frame, where the
    /// body spans `[0, width] × [0, height]`.
    #[must_use]
    pub fn page_to_local(&self) -> Affine {
        Affine::translate(-self.x, -self.y).then(Affine::rotate_deg(-self.rotation))
    }

    /// Whether a page-space point lies on the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let local = self.page_to_local().apply(p);
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }
}

/// Where a raster image comes from: a URL, object URL, or data URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(pub String);

impl ImageSource {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A raster image fitted onto a page. Not selectable or movable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub id: ImageId,
    pub source: ImageSource,
    /// Natural pixel dimensions reported by the decoder.
    pub natural: Size,
    pub x: f64,
    pub y: f64,
    /// Uniform scale from natural pixels to page units.
    pub scale: f64,
    /// Clockwise rotation in degrees about `(x, y)`, kept in `[0, 360)`.
    pub rotation: f64,
}

impl PlacedImage {
    /// Size on the page before rotation.
    #[must_use]
    pub fn displayed_size(&self) -> Size {
        self.natural.scaled(self.scale)
    }
}

/// One document page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub orientation: Orientation,
    /// Unrotated content dimensions, fixed at creation.
    pub base: Size,
    /// Rectangles in z-order; the last one is topmost.
    pub shapes: Vec<RectShape>,
    pub images: Vec<PlacedImage>,
}

impl Page {
    #[must_use]
    pub fn new(base: Size) -> Self {
        Self { orientation: Orientation::Deg0, base, shapes: Vec::new(), images: Vec::new() }
    }

    /// The content frame at the current orientation.
    #[must_use]
    pub fn content_size(&self) -> Size {
        geometry::oriented_size(self.base, self.orientation)
    }

    /// Turn the page to `new`, re-expressing every shape and image in the new
    /// frame and adding the orientation delta to their rotation. The stored
    /// orientation is updated last. Returns the applied delta in degrees.
    pub fn set_orientation(&mut self, new: Orientation) -> f64 {
        let old = self.orientation;
        if old == new {
            return 0.0;
        }
        let delta = old.delta_to(new);
        let remap = geometry::remap_transform(self.base, old, new);

        for shape in &mut self.shapes {
            let p = remap.apply(Point::new(shape.x, shape.y));
            shape.x = p.x;
            shape.y = p.y;
            shape.rotation = geometry::normalize_degrees(shape.rotation + delta);
        }
        for image in &mut self.images {
            let p = remap.apply(Point::new(image.x, image.y));
            image.x = p.x;
            image.y = p.y;
            image.rotation = geometry::normalize_degrees(image.rotation + delta);
        }

        self.orientation = new;
        debug!(from = old.degrees(), to = new.degrees(), shapes = self.shapes.len(), "page orientation changed");
        delta
    }

    /// Fit an image of `natural` pixel size inside the current content frame
    /// without distortion, center it, and append it.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidImage`] when either natural dimension is
    /// not strictly positive.
    pub fn place_image(&mut self, source: ImageSource, natural: Size) -> Result<ImageId, PageError> {
        if !natural.is_positive() {
            return Err(PageError::InvalidImage { width: natural.width, height: natural.height });
        }
        let frame = self.content_size();
        let scale = (frame.width / natural.width).min(frame.height / natural.height);
        let shown = natural.scaled(scale);
        let image = PlacedImage {
            id: Uuid::new_v4(),
            source,
            natural,
            x: (frame.width - shown.width) / 2.0,
            y: (frame.height - shown.height) / 2.0,
            scale,
            rotation: 0.0,
        };
        let id = image.id;
        self.images.push(image);
        Ok(id)
    }

    /// Append a rectangle on top of the existing ones.
    pub fn add_shape(&mut self, shape: RectShape) {
        self.shapes.push(shape);
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&RectShape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut RectShape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    /// Remove a rectangle by id, returning it if it was present.
    pub fn remove_shape(&mut self, id: &ShapeId) -> Option<RectShape> {
        let pos = self.shapes.iter().position(|s| &s.id == id)?;
        Some(self.shapes.remove(pos))
    }
}

/// Ordered collection of pages plus the current-page cursor.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages: Vec<Page>,
    current: Option<usize>,
    default_size: Size,
}

impl PageStore {
    /// Create an empty store whose new pages default to `default_size`.
    #[must_use]
    pub fn new(default_size: Size) -> Self {
        Self { pages: Vec::new(), current: None, default_size }
    }

    /// Append a page with the default size and make it current.
    pub fn add_page(&mut self) -> usize {
        self.push(Page::new(self.default_size))
    }

    /// Append a page with explicit unrotated dimensions and make it current.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidPageSize`] unless both dimensions are
    /// finite and positive.
    pub fn add_page_with_size(&mut self, base: Size) -> Result<usize, PageError> {
        if !base.is_positive() {
            return Err(PageError::InvalidPageSize { width: base.width, height: base.height });
        }
        Ok(self.push(Page::new(base)))
    }

    fn push(&mut self, page: Page) -> usize {
        self.pages.push(page);
        let index = self.pages.len() - 1;
        self.current = Some(index);
        debug!(page = index, count = self.pages.len(), "page added");
        index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Make `index` current.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] when `index` is not a valid page.
    pub fn set_current(&mut self, index: usize) -> Result<(), PageError> {
        if index >= self.pages.len() {
            return Err(PageError::OutOfRange { index, count: self.pages.len() });
        }
        self.current = Some(index);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] when `index` is not a valid page.
    pub fn get(&self, index: usize) -> Result<&Page, PageError> {
        let count = self.pages.len();
        self.pages.get(index).ok_or(PageError::OutOfRange { index, count })
    }

    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] when `index` is not a valid page.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Page, PageError> {
        let count = self.pages.len();
        self.pages.get_mut(index).ok_or(PageError::OutOfRange { index, count })
    }

    /// # Errors
    ///
    /// Returns [`PageError::NoCurrentPage`] when the store is empty.
    pub fn current_page(&self) -> Result<&Page, PageError> {
        self.current.and_then(|i| self.pages.get(i)).ok_or(PageError::NoCurrentPage)
    }

    /// # Errors
    ///
    /// Returns [`PageError::NoCurrentPage`] when the store is empty.
    pub fn current_page_mut(&mut self) -> Result<&mut Page, PageError> {
        self.current.and_then(|i| self.pages.get_mut(i)).ok_or(PageError::NoCurrentPage)
    }

    /// Pages in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}
