//! Rendering: paints a [`Scene`] onto a 2D context.
//!
//! This module is the only place that issues drawing calls on a
//! [`web_sys::CanvasRenderingContext2d`]. It reads a scene and a cache of
//! decoded images and mutates nothing else.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::PAGE_BACKGROUND;
use crate::scene::{Scene, SceneImage, SceneRect};

/// Decoded bitmaps keyed by image source.
pub type ImageCache = HashMap<String, HtmlImageElement>;

/// Draw `scene` at `pixel_ratio` output pixels per stage pixel. The context's
/// backing store is expected to be `stage * pixel_ratio` pixels.
///
/// Images missing from `images` are skipped.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene, images: &ImageCache, pixel_ratio: f64) -> Result<(), JsValue> {
    // Layer 1: clear to paper in stage pixels.
    ctx.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.stage.width, scene.stage.height);
    ctx.set_fill_style_str(PAGE_BACKGROUND);
    ctx.fill_rect(0.0, 0.0, scene.stage.width, scene.stage.height);

    // Everything below is in page units.
    ctx.scale(scene.zoom, scene.zoom)?;

    // Layer 2: page content.
    for image in &scene.images {
        if let Some(element) = images.get(image.source.as_str()) {
            draw_image(ctx, image, element)?;
        }
    }

    // Layer 3: rectangles in z-order.
    for rect in &scene.rects {
        draw_rect(ctx, rect)?;
    }

    Ok(())
}

fn draw_image(ctx: &CanvasRenderingContext2d, image: &SceneImage, element: &HtmlImageElement) -> Result<(), JsValue> {
    ctx.save();
    translate_and_rotate(ctx, image.x, image.y, image.rotation)?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(element, 0.0, 0.0, image.width, image.height)?;
    ctx.restore();
    Ok(())
}

fn draw_rect(ctx: &CanvasRenderingContext2d, rect: &SceneRect) -> Result<(), JsValue> {
    ctx.save();
    translate_and_rotate(ctx, rect.x, rect.y, rect.rotation)?;

    ctx.set_fill_style_str(&rect.fill);
    ctx.fill_rect(0.0, 0.0, rect.width, rect.height);

    if rect.stroke_width > 0.0 {
        ctx.set_stroke_style_str(&rect.stroke);
        ctx.set_line_width(rect.stroke_width);
        ctx.stroke_rect(0.0, 0.0, rect.width, rect.height);
    }

    ctx.restore();
    Ok(())
}

/// Move the origin to `(x, y)` and turn clockwise by `rotation` degrees.
/// Shapes and images pivot on their top-left corner.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, x: f64, y: f64, rotation: f64) -> Result<(), JsValue> {
    ctx.translate(x, y)?;
    ctx.rotate(rotation.to_radians())?;
    Ok(())
}
