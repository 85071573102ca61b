//! Declarative scene handed to the rendering surface.
//!
//! A [`Scene`] is a plain-data snapshot of what the stage should show: its
//! pixel size, the zoom to paint page units at, and every image and rectangle
//! in draw order with their resolved styles. Surfaces never read editor state
//! directly.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::config::EditorConfig;
use crate::geometry::Size;
use crate::page::{ImageId, ImageSource, Page, ShapeId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneImage {
    pub id: ImageId,
    pub source: ImageSource,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRect {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Page shown, or `None` for an empty editor.
    pub page: Option<usize>,
    /// Stage size in screen pixels.
    pub stage: Size,
    /// Page units → stage pixels.
    pub zoom: f64,
    /// Page content, painted first.
    pub images: Vec<SceneImage>,
    /// Rectangles in z-order, painted above the images.
    pub rects: Vec<SceneRect>,
}

impl Scene {
    /// Nothing to show.
    #[must_use]
    pub fn empty() -> Self {
        Self { page: None, stage: Size::new(0.0, 0.0), zoom: 1.0, images: Vec::new(), rects: Vec::new() }
    }

    /// Describe `page` at `zoom`, highlighting `selected` if it lives there.
    #[must_use]
    pub fn for_page(index: usize, page: &Page, zoom: f64, selected: Option<ShapeId>, config: &EditorConfig) -> Self {
        let images = page
            .images
            .iter()
            .map(|img| {
                let shown = img.displayed_size();
                SceneImage {
                    id: img.id,
                    source: img.source.clone(),
                    x: img.x,
                    y: img.y,
                    width: shown.width,
                    height: shown.height,
                    rotation: img.rotation,
                }
            })
            .collect();

        let rects = page
            .shapes
            .iter()
            .map(|shape| {
                let is_selected = selected == Some(shape.id);
                SceneRect {
                    id: shape.id,
                    x: shape.x,
                    y: shape.y,
                    width: shape.width,
                    height: shape.height,
                    rotation: shape.rotation,
                    fill: config.rect_fill.clone(),
                    stroke: if is_selected { config.selected_stroke.clone() } else { config.rect_stroke.clone() },
                    stroke_width: if is_selected { config.selected_stroke_width } else { config.stroke_width },
                    selected: is_selected,
                }
            })
            .collect();

        Self { page: Some(index), stage: page.content_size().scaled(zoom), zoom, images, rects }
    }

    /// Sources the surface must have decoded before painting.
    pub fn image_sources(&self) -> impl Iterator<Item = &ImageSource> {
        self.images.iter().map(|img| &img.source)
    }
}
