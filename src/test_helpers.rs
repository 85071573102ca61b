//! Recording fakes for the surface seams.

use std::collections::HashMap;
use std::sync::Once;

use crate::geometry::Size;
use crate::page::ImageSource;
use crate::scene::Scene;
use crate::surface::{DecodedImage, DocumentRasterizer, RasterImage, RenderSurface, SnapshotRequest, SurfaceError};

static TRACING: Once = Once::new();

/// Send `tracing` output to the test harness so failing tests show the log.
pub(crate) fn init_tracing() {
    TRACING.call_once(|| tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).init());
}

/// A surface that knows a fixed set of images and records every call.
#[derive(Default)]
pub(crate) struct FakeSurface {
    pub images: HashMap<String, Size>,
    pub decoded: Vec<ImageSource>,
    pub presented: Vec<Scene>,
    pub frames: usize,
    pub snapshots: Vec<(Option<usize>, SnapshotRequest)>,
    pub fail_snapshot_on_page: Option<usize>,
    pub fail_present_on_page: Option<usize>,
}

impl FakeSurface {
    pub fn with_image(mut self, source: &str, width: f64, height: f64) -> Self {
        self.images.insert(source.to_string(), Size::new(width, height));
        self
    }

    fn last_page(&self) -> Option<usize> {
        self.presented.last().and_then(|s| s.page)
    }
}

#[async_trait::async_trait(?Send)]
impl RenderSurface for FakeSurface {
    async fn decode(&mut self, source: &ImageSource) -> Result<DecodedImage, SurfaceError> {
        let Some(natural) = self.images.get(source.as_str()).copied() else {
            return Err(SurfaceError::Decode { url: source.as_str().to_string(), reason: "not found".into() });
        };
        self.decoded.push(source.clone());
        Ok(DecodedImage { source: source.clone(), natural })
    }

    fn present(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        if scene.page.is_some() && scene.page == self.fail_present_on_page {
            return Err(SurfaceError::Unavailable("context lost".into()));
        }
        self.presented.push(scene.clone());
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<(), SurfaceError> {
        self.frames += 1;
        Ok(())
    }

    async fn snapshot(&mut self, request: SnapshotRequest) -> Result<RasterImage, SurfaceError> {
        let page = self.last_page();
        if page.is_some() && page == self.fail_snapshot_on_page {
            return Err(SurfaceError::Snapshot("canvas tainted".into()));
        }
        self.snapshots.push((page, request));
        let marker = page.map_or(0, |p| u8::try_from(p).unwrap_or(u8::MAX));
        Ok(RasterImage { width: request.width_px, height: request.height_px, rgba: vec![marker] })
    }
}

/// A rasterizer that renders every document to a fixed list of page images.
pub(crate) struct FakeRasterizer {
    pub pages: Vec<ImageSource>,
    pub fail: bool,
}

#[async_trait::async_trait(?Send)]
impl DocumentRasterizer for FakeRasterizer {
    async fn rasterize(&self, _source: &ImageSource, _scale: f64) -> Result<Vec<ImageSource>, SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Rasterize("encrypted document".into()));
        }
        Ok(self.pages.clone())
    }
}
