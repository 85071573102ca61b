//! Editor configuration.
//!
//! Every field has a default, so hosts only pass the keys they care about:
//!
//! ```json
//! { "page_width": 595.0, "page_height": 842.0, "zoom_step": 1.25 }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_DOCUMENT_RENDER_SCALE, DEFAULT_EXPORT_LONG_EDGE_PX, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH, DEFAULT_RECT_FILL, DEFAULT_RECT_STROKE,
    DEFAULT_SELECTED_STROKE, DEFAULT_SELECTED_STROKE_WIDTH, DEFAULT_STROKE_WIDTH, DEFAULT_ZOOM_STEP,
};
use crate::geometry::Size;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid editor config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Unrotated width of pages created by `add_page`.
    pub page_width: f64,
    /// Unrotated height of pages created by `add_page`.
    pub page_height: f64,
    /// Multiplicative zoom step; must be greater than 1.
    pub zoom_step: f64,
    /// Scale passed to the document rasterizer on ingest.
    pub document_render_scale: f64,
    /// Long edge, in pixels, the host exports pages at.
    pub export_long_edge: u32,
    pub rect_fill: String,
    pub rect_stroke: String,
    pub selected_stroke: String,
    pub stroke_width: f64,
    pub selected_stroke_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            zoom_step: DEFAULT_ZOOM_STEP,
            document_render_scale: DEFAULT_DOCUMENT_RENDER_SCALE,
            export_long_edge: DEFAULT_EXPORT_LONG_EDGE_PX,
            rect_fill: DEFAULT_RECT_FILL.to_string(),
            rect_stroke: DEFAULT_RECT_STROKE.to_string(),
            selected_stroke: DEFAULT_SELECTED_STROKE.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            selected_stroke_width: DEFAULT_SELECTED_STROKE_WIDTH,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_size().is_positive() {
            return Err(ConfigError::Invalid(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!("zoom_step must be greater than 1, got {}", self.zoom_step)));
        }
        if !self.document_render_scale.is_finite() || self.document_render_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "document_render_scale must be positive, got {}",
                self.document_render_scale
            )));
        }
        if self.export_long_edge == 0 {
            return Err(ConfigError::Invalid("export_long_edge must be positive".into()));
        }
        if self.stroke_width < 0.0 || self.selected_stroke_width < 0.0 {
            return Err(ConfigError::Invalid("stroke widths must not be negative".into()));
        }
        Ok(())
    }

    /// Default unrotated page size.
    #[must_use]
    pub fn page_size(&self) -> Size {
        Size::new(self.page_width, self.page_height)
    }
}
