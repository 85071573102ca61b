//! Browser rendering surface.
//!
//! [`CanvasSurface`] implements [`RenderSurface`] on top of an on-page
//! `<canvas>`. Presenting paints synchronously through [`crate::render`];
//! snapshots repaint the last scene into a detached canvas sized to the
//! request and read its pixels back.
//!
//! Images must be same-origin, data/blob URLs, or served with CORS headers,
//! otherwise the canvas is tainted and snapshots fail.

use js_sys::Promise;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::engine::Editor;
use crate::geometry::Size;
use crate::page::ImageSource;
use crate::render::{self, ImageCache};
use crate::scene::Scene;
use crate::surface::{DecodedImage, RasterImage, RenderSurface, SnapshotRequest, SurfaceError};

/// An editor bound to a browser canvas.
pub type CanvasEditor = Editor<CanvasSurface>;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    images: ImageCache,
    scene: Scene,
    device_pixel_ratio: f64,
}

impl CanvasSurface {
    /// Bind to `canvas`, rendering at the window's device pixel ratio.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let device_pixel_ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0);
        Self { canvas, images: ImageCache::new(), scene: Scene::empty(), device_pixel_ratio }
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn resize(&self) -> Result<(), SurfaceError> {
        let stage = self.scene.stage;
        let width = to_px(stage.width * self.device_pixel_ratio);
        let height = to_px(stage.height * self.device_pixel_ratio);
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", stage.width)).map_err(unavailable)?;
        style.set_property("height", &format!("{}px", stage.height)).map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl RenderSurface for CanvasSurface {
    async fn decode(&mut self, source: &ImageSource) -> Result<DecodedImage, SurfaceError> {
        if let Some(element) = self.images.get(source.as_str()) {
            return Ok(DecodedImage { source: source.clone(), natural: natural_size(element) });
        }

        let decode_error = |e: &JsValue| SurfaceError::Decode { url: source.as_str().to_string(), reason: js_reason(e) };
        let element = HtmlImageElement::new().map_err(|e| decode_error(&e))?;
        element.set_cross_origin(Some("anonymous"));
        element.set_src(source.as_str());
        JsFuture::from(element.decode()).await.map_err(|e| decode_error(&e))?;

        let natural = natural_size(&element);
        debug!(source = source.as_str(), width = natural.width, height = natural.height, "image decoded");
        self.images.insert(source.as_str().to_string(), element);
        Ok(DecodedImage { source: source.clone(), natural })
    }

    fn present(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        self.scene = scene.clone();
        self.resize()?;
        let ctx = context_2d(&self.canvas).map_err(unavailable)?;
        render::draw(&ctx, &self.scene, &self.images, self.device_pixel_ratio).map_err(unavailable)
    }

    async fn next_frame(&mut self) -> Result<(), SurfaceError> {
        let Some(window) = web_sys::window() else {
            return Err(SurfaceError::Unavailable("no window".into()));
        };
        let frame = Promise::new(&mut |resolve, reject| {
            if let Err(err) = window.request_animation_frame(&resolve) {
                if let Err(err) = reject.call1(&JsValue::UNDEFINED, &err) {
                    warn!(reason = %js_reason(&err), "could not reject frame promise");
                }
            }
        });
        JsFuture::from(frame).await.map_err(unavailable)?;
        Ok(())
    }

    async fn snapshot(&mut self, request: SnapshotRequest) -> Result<RasterImage, SurfaceError> {
        let snapshot_error = |e: JsValue| SurfaceError::Snapshot(js_reason(&e));
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Err(SurfaceError::Unavailable("no document".into()));
        };
        let offscreen = document
            .create_element("canvas")
            .map_err(snapshot_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::Snapshot("created element is not a canvas".into()))?;
        offscreen.set_width(request.width_px);
        offscreen.set_height(request.height_px);

        let ctx = context_2d(&offscreen).map_err(snapshot_error)?;
        render::draw(&ctx, &self.scene, &self.images, request.pixel_ratio).map_err(snapshot_error)?;
        let data = ctx
            .get_image_data(0.0, 0.0, f64::from(request.width_px), f64::from(request.height_px))
            .map_err(snapshot_error)?;
        Ok(RasterImage { width: data.width(), height: data.height(), rgba: data.data().0 })
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    let Some(ctx) = canvas.get_context("2d")? else {
        return Err(JsValue::from_str("2d context unavailable"));
    };
    ctx.dyn_into::<CanvasRenderingContext2d>().map_err(JsValue::from)
}

fn natural_size(element: &HtmlImageElement) -> Size {
    Size::new(f64::from(element.natural_width()), f64::from(element.natural_height()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

fn unavailable(e: JsValue) -> SurfaceError {
    SurfaceError::Unavailable(js_reason(&e))
}

fn js_reason(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}
