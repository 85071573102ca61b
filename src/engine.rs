use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{ConfigError, EditorConfig};
use crate::geometry::{self, Orientation, Point, Size};
use crate::hit;
use crate::input::{Button, InputState, Key, UiState};
use crate::page::{ImageId, ImageSource, Page, PageError, PageStore, RectShape, ShapeId};
use crate::scene::Scene;
use crate::surface::{DecodedImage, DocumentRasterizer, RenderSurface, SurfaceError};
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated { page: usize, shape: RectShape },
    ShapeUpdated { page: usize, shape: RectShape },
    ShapeDeleted { page: usize, id: ShapeId },
    SelectionChanged(Option<ShapeId>),
    PageChanged(usize),
    SetCursor(String),
    RenderNeeded,
}

/// Core editor state: everything that doesn't depend on a rendering surface.
///
/// Separated from [`Editor`] so it can be tested without a browser.
pub struct EditorCore {
    pub config: EditorConfig,
    pub(crate) pages: PageStore,
    pub(crate) viewport: Viewport,
    pub(crate) ui: UiState,
    pub(crate) input: InputState,
    current_tx: watch::Sender<Option<usize>>,
    count_tx: watch::Sender<usize>,
    selection_tx: watch::Sender<Option<ShapeId>>,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` fails validation.
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        let (current_tx, _) = watch::channel(None);
        let (count_tx, _) = watch::channel(0);
        let (selection_tx, _) = watch::channel(None);
        Self {
            pages: PageStore::new(config.page_size()),
            config,
            viewport: Viewport::new(),
            ui: UiState::default(),
            input: InputState::default(),
            current_tx,
            count_tx,
            selection_tx,
        }
    }

    // --- Observables ---

    // A watch receiver only holds the latest value: every change marks it
    // changed, but changes made between two reads are coalesced into the
    // last one. Receivers track state; they do not replay history.

    /// Receives the current page index whenever it changes. Changes between
    /// two reads coalesce, so a receiver that polls after `export_all` sees
    /// only the restored page.
    #[must_use]
    pub fn watch_current_page(&self) -> watch::Receiver<Option<usize>> {
        self.current_tx.subscribe()
    }

    /// Receives the page count whenever it changes (latest value only).
    #[must_use]
    pub fn watch_page_count(&self) -> watch::Receiver<usize> {
        self.count_tx.subscribe()
    }

    /// Receives the selected rectangle whenever it changes, including when a
    /// new page or a page switch clears it without returning an action
    /// (latest value only).
    #[must_use]
    pub fn watch_selection(&self) -> watch::Receiver<Option<ShapeId>> {
        self.selection_tx.subscribe()
    }

    fn publish(&self) {
        let current = self.pages.current_index();
        let count = self.pages.len();
        let selected = self.ui.selected;
        self.current_tx.send_if_modified(|v| replace_if_changed(v, current));
        self.count_tx.send_if_modified(|v| replace_if_changed(v, count));
        self.selection_tx.send_if_modified(|v| replace_if_changed(v, selected));
    }

    // --- Pages ---

    /// Append a default-size page and make it current. Any selection is
    /// cleared and reported through [`watch_selection`](Self::watch_selection).
    pub fn add_page(&mut self) -> usize {
        let index = self.pages.add_page();
        self.enter_page();
        index
    }

    /// Append a page with explicit unrotated dimensions and make it current.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidPageSize`] for non-positive dimensions.
    pub fn add_page_with_size(&mut self, base: Size) -> Result<usize, EditorError> {
        let index = self.pages.add_page_with_size(base)?;
        self.enter_page();
        Ok(index)
    }

    /// Fit a decoded image onto page `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] for a bad index and
    /// [`PageError::InvalidImage`] for zero-sized images.
    pub fn place_image(&mut self, index: usize, image: DecodedImage) -> Result<ImageId, EditorError> {
        let page = self.pages.get_mut(index)?;
        let id = page.place_image(image.source, image.natural)?;
        debug!(page = index, %id, "image placed");
        Ok(id)
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn current_page_index(&self) -> Option<usize> {
        self.pages.current_index()
    }

    /// # Errors
    ///
    /// Returns [`PageError::NoCurrentPage`] when there are no pages.
    pub fn current_page(&self) -> Result<&Page, PageError> {
        self.pages.current_page()
    }

    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] for a bad index.
    pub fn page(&self, index: usize) -> Result<&Page, PageError> {
        self.pages.get(index)
    }

    // --- Navigation ---

    /// Show page `index`. Out-of-range indices are ignored.
    pub fn go_to_page(&mut self, index: usize) -> Vec<Action> {
        if !self.viewport.go_to_page(&mut self.pages, index) {
            return vec![];
        }
        self.finish_draw();
        let mut actions = self.clear_selection();
        self.publish();
        actions.push(Action::PageChanged(index));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn next_page(&mut self) -> Vec<Action> {
        match self.pages.current_index() {
            Some(i) => self.go_to_page(i + 1),
            None => vec![],
        }
    }

    pub fn prev_page(&mut self) -> Vec<Action> {
        match self.pages.current_index().and_then(|i| i.checked_sub(1)) {
            Some(i) => self.go_to_page(i),
            None => vec![],
        }
    }

    fn enter_page(&mut self) {
        self.finish_draw();
        self.ui.selected = None;
        self.viewport.apply_orientation(&self.pages);
        self.publish();
    }

    // --- Orientation ---

    /// Turn the current page to `orientation`, carrying every annotation
    /// along, then resize the stage. No-op without pages.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Vec<Action> {
        self.finish_draw();
        let Ok(page) = self.pages.current_page_mut() else {
            return vec![];
        };
        page.set_orientation(orientation);
        self.viewport.apply_orientation(&self.pages);
        vec![Action::RenderNeeded]
    }

    /// Quarter turn clockwise.
    pub fn rotate_right(&mut self) -> Vec<Action> {
        match self.pages.current_page().map(|page| page.orientation) {
            Ok(orientation) => self.set_orientation(orientation.rotated_cw()),
            Err(_) => vec![],
        }
    }

    /// Quarter turn counter-clockwise.
    pub fn rotate_left(&mut self) -> Vec<Action> {
        match self.pages.current_page().map(|page| page.orientation) {
            Ok(orientation) => self.set_orientation(orientation.rotated_ccw()),
            Err(_) => vec![],
        }
    }

    // --- Zoom ---

    /// Set the zoom factor; non-positive factors are ignored.
    pub fn set_zoom(&mut self, factor: f64) -> Vec<Action> {
        render_if(self.viewport.set_zoom(&self.pages, factor))
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        render_if(self.viewport.zoom_in(&self.pages, self.config.zoom_step))
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        render_if(self.viewport.zoom_out(&self.pages, self.config.zoom_step))
    }

    pub fn reset_zoom(&mut self) -> Vec<Action> {
        render_if(self.viewport.reset_zoom(&self.pages))
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    /// Displayed stage size in screen pixels.
    #[must_use]
    pub fn stage_size(&self) -> Size {
        self.viewport.stage_size()
    }

    /// Where the stage sits in the host's pointer coordinate space.
    pub fn set_stage_origin(&mut self, origin: Point) {
        self.viewport.set_stage_origin(origin);
    }

    // --- Draw tool ---

    /// Arm the draw tool: the next pointer-down on a page starts a rectangle.
    pub fn activate_draw_mode(&mut self) -> Vec<Action> {
        self.ui.draw_armed = true;
        vec![Action::SetCursor(self.ui.cursor().to_string())]
    }

    /// Disarm the draw tool without touching any rectangle.
    pub fn cancel_draw_mode(&mut self) -> Vec<Action> {
        if !self.ui.draw_armed {
            return vec![];
        }
        self.ui.draw_armed = false;
        vec![Action::SetCursor(self.ui.cursor().to_string())]
    }

    #[must_use]
    pub fn is_draw_armed(&self) -> bool {
        self.ui.draw_armed
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.input.is_drawing()
    }

    /// The selected rectangle on the current page, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected
    }

    /// Select rectangle `id` on the current page. No-op if it is not there
    /// or already selected.
    pub fn select(&mut self, id: ShapeId) -> Vec<Action> {
        let present = self.pages.current_page().is_ok_and(|page| page.shape(&id).is_some());
        if !present || self.ui.selected == Some(id) {
            return vec![];
        }
        self.ui.selected = Some(id);
        self.publish();
        vec![Action::SelectionChanged(Some(id)), Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input.is_drawing() {
            return vec![];
        }
        let Some(index) = self.pages.current_index() else {
            return vec![];
        };
        let local = self.viewport.screen_to_page(screen);
        if self.ui.draw_armed {
            self.begin_draw(index, local)
        } else {
            self.toggle_selection_at(index, local)
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let local = self.viewport.screen_to_page(screen);
        self.resize_drawing(local).map_or_else(Vec::new, |action| vec![action, Action::RenderNeeded])
    }

    /// Finish the rectangle being drawn, whichever button was released.
    pub fn on_pointer_up(&mut self, screen: Point, _button: Button) -> Vec<Action> {
        let local = self.viewport.screen_to_page(screen);
        let Some(update) = self.resize_drawing(local) else {
            return vec![];
        };
        if let Action::ShapeUpdated { page, shape } = &update {
            debug!(page, id = %shape.id, width = shape.width, height = shape.height, "rectangle finished");
        }
        self.input = InputState::Idle;
        vec![update, Action::SetCursor(self.ui.cursor().to_string()), Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match key.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => {
                let mut actions = self.cancel_draw_mode();
                actions.extend(self.clear_selection());
                actions
            }
            "ArrowRight" | "PageDown" => self.next_page(),
            "ArrowLeft" | "PageUp" => self.prev_page(),
            "+" | "=" => self.zoom_in(),
            "-" => self.zoom_out(),
            "0" => self.reset_zoom(),
            _ => vec![],
        }
    }

    /// Remove the selected rectangle; no-op without a selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected else {
            return vec![];
        };
        let Some(index) = self.pages.current_index() else {
            return vec![];
        };
        self.ui.selected = None;
        self.publish();
        let removed = match self.pages.current_page_mut() {
            Ok(page) => page.remove_shape(&id),
            Err(_) => None,
        };
        let mut actions = vec![Action::SelectionChanged(None)];
        if removed.is_some() {
            debug!(page = index, %id, "rectangle deleted");
            actions.push(Action::ShapeDeleted { page: index, id });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_draw(&mut self, index: usize, anchor: Point) -> Vec<Action> {
        let mut actions = self.clear_selection();
        self.ui.draw_armed = false;
        let shape = RectShape::new(Uuid::new_v4(), geometry::bounding_box(anchor, anchor));
        let Ok(page) = self.pages.get_mut(index) else {
            return actions;
        };
        page.add_shape(shape.clone());
        self.input = InputState::Drawing { id: shape.id, page: index, anchor };
        actions.push(Action::ShapeCreated { page: index, shape });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Stretch the in-progress rectangle to the box spanned by its anchor and
    /// `local`. Returns `None` when nothing is being drawn.
    fn resize_drawing(&mut self, local: Point) -> Option<Action> {
        let InputState::Drawing { id, page, anchor } = self.input else {
            return None;
        };
        let Ok(target) = self.pages.get_mut(page) else {
            return None;
        };
        let shape = target.shape_mut(&id)?;
        shape.set_bounds(geometry::bounding_box(anchor, local));
        Some(Action::ShapeUpdated { page, shape: shape.clone() })
    }

    fn toggle_selection_at(&mut self, index: usize, local: Point) -> Vec<Action> {
        let Ok(page) = self.pages.get(index) else {
            return vec![];
        };
        let next = match (hit::hit_test(page, local), self.ui.selected) {
            (Some(hit), Some(current)) if hit == current => None,
            (hit, _) => hit,
        };
        if next == self.ui.selected {
            return vec![];
        }
        self.ui.selected = next;
        self.publish();
        vec![Action::SelectionChanged(next), Action::RenderNeeded]
    }

    fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selected.take().is_none() {
            return vec![];
        }
        self.publish();
        vec![Action::SelectionChanged(None)]
    }

    /// Drop back to idle, keeping whatever was drawn so far.
    fn finish_draw(&mut self) {
        if self.input.is_drawing() {
            self.input = InputState::Idle;
        }
    }

    // --- Scene ---

    /// What the stage should show right now.
    #[must_use]
    pub fn scene(&self) -> Scene {
        match (self.pages.current_index(), self.pages.current_page()) {
            (Some(index), Ok(page)) => {
                Scene::for_page(index, page, self.viewport.zoom(), self.ui.selected, &self.config)
            }
            _ => Scene::empty(),
        }
    }

    /// Page `index` at the current zoom, without selection highlight and
    /// without making it current.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] for a bad index.
    pub fn page_scene(&self, index: usize) -> Result<Scene, PageError> {
        let page = self.pages.get(index)?;
        Ok(Scene::for_page(index, page, self.viewport.zoom(), None, &self.config))
    }
}

fn render_if(changed: bool) -> Vec<Action> {
    if changed { vec![Action::RenderNeeded] } else { vec![] }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// The full editor. Wraps [`EditorCore`] and owns the rendering surface.
pub struct Editor<S> {
    pub core: EditorCore,
    pub(crate) surface: S,
}

impl<S: RenderSurface> Editor<S> {
    /// Create an editor with default configuration bound to `surface`.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { core: EditorCore::new(), surface }
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` fails validation.
    pub fn with_config(surface: S, config: EditorConfig) -> Result<Self, ConfigError> {
        Ok(Self { core: EditorCore::with_config(config)?, surface })
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Push the current scene to the surface.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Surface`] if the surface rejects the scene.
    pub fn render(&mut self) -> Result<(), EditorError> {
        self.surface.present(&self.core.scene())?;
        Ok(())
    }

    /// Decode `source` and fit it onto page `index`. The page is left
    /// untouched if decoding fails.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::OutOfRange`] for a bad index and
    /// [`SurfaceError::Decode`] when the image cannot be loaded.
    pub async fn add_image(&mut self, index: usize, source: ImageSource) -> Result<ImageId, EditorError> {
        self.core.page(index)?;
        let decoded = self.decode(&source).await?;
        self.core.place_image(index, decoded)
    }

    /// [`add_image`](Self::add_image) onto the current page.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NoCurrentPage`] when there are no pages, plus the
    /// errors of [`add_image`](Self::add_image).
    pub async fn add_image_to_current(&mut self, source: ImageSource) -> Result<ImageId, EditorError> {
        let index = self.core.current_page_index().ok_or(PageError::NoCurrentPage)?;
        self.add_image(index, source).await
    }

    /// Add one page per image, in order. Returns the new page indices. Stops
    /// at the first image that fails to decode or has no usable size; pages
    /// already added stay, and no page is added for the failing image.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Decode`] for an unreadable image and
    /// [`PageError::InvalidImage`] for one without positive dimensions.
    pub async fn open_images<I>(&mut self, sources: I) -> Result<Vec<usize>, EditorError>
    where
        I: IntoIterator<Item = ImageSource>,
    {
        let mut added = Vec::new();
        for source in sources {
            let decoded = self.decode(&source).await?;
            if !decoded.natural.is_positive() {
                warn!(source = source.as_str(), "image has no usable size");
                let Size { width, height } = decoded.natural;
                return Err(PageError::InvalidImage { width, height }.into());
            }
            let index = self.core.add_page();
            self.core.place_image(index, decoded)?;
            added.push(index);
        }
        Ok(added)
    }

    /// Rasterize a non-raster document with `rasterizer` and add one page per
    /// rendered page.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Rasterize`] when conversion fails, plus the
    /// errors of [`open_images`](Self::open_images).
    pub async fn ingest_document<R>(&mut self, rasterizer: &R, source: &ImageSource) -> Result<Vec<usize>, EditorError>
    where
        R: DocumentRasterizer + ?Sized,
    {
        let rendered = rasterizer.rasterize(source, self.core.config.document_render_scale).await?;
        debug!(source = source.as_str(), pages = rendered.len(), "document rasterized");
        self.open_images(rendered).await
    }

    async fn decode(&mut self, source: &ImageSource) -> Result<DecodedImage, EditorError> {
        self.surface.decode(source).await.map_err(|e| {
            warn!(error = %e, source = source.as_str(), "image decode failed");
            EditorError::from(e)
        })
    }
}
