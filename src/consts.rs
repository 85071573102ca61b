//! Shared numeric constants for the editor.

// ── Page defaults ───────────────────────────────────────────────

/// Default unrotated page width: US Letter portrait at 72 points per inch.
pub const DEFAULT_PAGE_WIDTH: f64 = 612.0;

/// Default unrotated page height: US Letter portrait at 72 points per inch.
pub const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Multiplicative step applied by zoom-in / zoom-out.
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;

// ── Ingest ──────────────────────────────────────────────────────

/// Render scale requested from the document rasterizer (1.0 = 72 dpi).
pub const DEFAULT_DOCUMENT_RENDER_SCALE: f64 = 2.0;

// ── Styling ─────────────────────────────────────────────────────

/// Redaction fill.
pub const DEFAULT_RECT_FILL: &str = "#000000";

/// Stroke of an unselected redaction rectangle.
pub const DEFAULT_RECT_STROKE: &str = "#1F1A17";

/// Stroke of the selected redaction rectangle.
pub const DEFAULT_SELECTED_STROKE: &str = "#D94B4B";

/// Stroke width in page units.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Stroke width of the selected rectangle in page units.
pub const DEFAULT_SELECTED_STROKE_WIDTH: f64 = 3.0;

/// Paper colour painted under the page content.
pub const PAGE_BACKGROUND: &str = "#FFFFFF";

// ── Export ──────────────────────────────────────────────────────

/// Long edge used when the host does not pick one.
pub const DEFAULT_EXPORT_LONG_EDGE_PX: u32 = 3000;
