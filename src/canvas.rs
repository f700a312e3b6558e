//! The canvas session.
//!
//! [`Canvas`] owns every piece of state: the document, the view transform,
//! the selection, and the background fetch. Every public operation enters
//! here so the stores stay consistent and notifications go out only after
//! a change is fully committed.

use crate::error::{CanvasError, CanvasResult};
use crate::fetch::{DecodedImage, FetchCoordinator, FetchOutcome, FetchStatus, ImageResolver, LocalImageResolver};
use crate::geometry::{ContainerSize, DocPoint, Vec2};
use crate::history::{CommandBus, HistoryStatus, MutationEffect};
use crate::input::coords::{CoordinateContext, CoordinateMapper};
use crate::input::{GestureConfig, GestureCoordinator, GestureState};
use crate::model::{BackgroundSource, DocumentModel, ElementId};
use crate::profile_scope;
use crate::selection::SelectionSet;
use crate::settings::CanvasSettings;
use crate::snapshot::DocumentSnapshot;
use crate::spatial_index::SpatialIndex;
use crate::store::{Store, SubscriptionId};
use crate::transform::{TransformState, ViewState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// An element as it should appear in the current frame, with any gesture
/// in flight already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedElement {
    pub id: ElementId,
    pub glyph: String,
    /// Screen position of the glyph center
    pub screen_position: Vec2,
    /// Font size in screen units
    pub font_size: f32,
    pub selected: bool,
}

pub struct Canvas {
    pub(crate) document: Store<DocumentModel>,
    pub(crate) transform: Store<TransformState>,
    pub(crate) selection: Store<SelectionSet>,
    pub(crate) fetch_status: Store<FetchStatus>,
    pub(crate) history: CommandBus,
    pub(crate) fetch: FetchCoordinator,
    pub(crate) index: SpatialIndex,
    pub(crate) gestures: GestureCoordinator,
    pub(crate) settings: CanvasSettings,
    pub(crate) container: Option<ContainerSize>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_settings(CanvasSettings::default())
    }

    pub fn with_settings(settings: CanvasSettings) -> Self {
        Self::with_resolver(settings, Arc::new(LocalImageResolver))
    }

    pub fn with_resolver(settings: CanvasSettings, resolver: Arc<dyn ImageResolver>) -> Self {
        let settings = settings.sanitized();
        let mut transform = TransformState::new();
        transform.set_zoom_bounds(settings.min_zoom, settings.max_zoom);
        Self {
            document: Store::new(DocumentModel::new()),
            transform: Store::new(transform),
            selection: Store::new(SelectionSet::new()),
            fetch_status: Store::new(FetchStatus::Idle),
            history: CommandBus::new(settings.max_history, settings.min_glyph_size),
            fetch: FetchCoordinator::new(resolver, settings.fetch_workers),
            index: SpatialIndex::new(),
            gestures: GestureCoordinator::new(GestureConfig::from(&settings)),
            settings,
            container: None,
        }
    }

    // ---- read access ----

    pub fn document(&self) -> &DocumentModel {
        self.document.get()
    }

    pub fn transform(&self) -> &TransformState {
        self.transform.get()
    }

    pub fn selection(&self) -> &SelectionSet {
        self.selection.get()
    }

    pub fn fetch_status(&self) -> &FetchStatus {
        self.fetch_status.get()
    }

    pub fn history(&self) -> &CommandBus {
        &self.history
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gestures.state()
    }

    /// The decoded image of the current background, once fetched.
    pub fn background_image(&self) -> Option<&DecodedImage> {
        self.fetch.image()
    }

    pub fn container(&self) -> Option<ContainerSize> {
        self.container
    }

    pub fn set_container_size(&mut self, container: ContainerSize) {
        self.container = Some(container);
    }

    pub(crate) fn coordinate_context(&self) -> CanvasResult<CoordinateContext<'_>> {
        let container = self.container.unwrap_or(ContainerSize::new(0.0, 0.0));
        CoordinateContext::new(container, self.transform.get())
    }

    // ---- subscriptions ----

    pub fn subscribe_document(&mut self, listener: impl FnMut(&DocumentModel) + 'static) -> SubscriptionId {
        self.document.subscribe(listener)
    }

    pub fn unsubscribe_document(&mut self, id: SubscriptionId) -> bool {
        self.document.unsubscribe(id)
    }

    pub fn subscribe_transform(&mut self, listener: impl FnMut(&TransformState) + 'static) -> SubscriptionId {
        self.transform.subscribe(listener)
    }

    pub fn unsubscribe_transform(&mut self, id: SubscriptionId) -> bool {
        self.transform.unsubscribe(id)
    }

    pub fn subscribe_selection(&mut self, listener: impl FnMut(&SelectionSet) + 'static) -> SubscriptionId {
        self.selection.subscribe(listener)
    }

    pub fn unsubscribe_selection(&mut self, id: SubscriptionId) -> bool {
        self.selection.unsubscribe(id)
    }

    pub fn subscribe_fetch_status(&mut self, listener: impl FnMut(&FetchStatus) + 'static) -> SubscriptionId {
        self.fetch_status.subscribe(listener)
    }

    pub fn unsubscribe_fetch_status(&mut self, id: SubscriptionId) -> bool {
        self.fetch_status.unsubscribe(id)
    }

    // ---- document commands ----

    fn commit<R>(&mut self, f: impl FnOnce(&mut CommandBus, &mut DocumentModel) -> R) -> R {
        let history = &mut self.history;
        self.document.update_silently(|model| f(history, model))
    }

    /// Rebuild derived state and notify after a mutation reached the model.
    /// Document and selection change together, listeners only run once both
    /// are settled.
    fn finish_mutation(&mut self, effect: &MutationEffect) {
        self.index.rebuild(self.document.get().elements());
        let model = self.document.get();
        let pruned = if effect.removed.is_empty() {
            0
        } else {
            self.selection.update_silently(|selection| selection.prune(model))
        };
        self.document.notify();
        if pruned > 0 {
            debug!(pruned, "Pruned selection after removal");
            self.selection.notify();
        }
        if effect.background_changed {
            self.request_background(false);
        }
    }

    /// Place a glyph at a document point.
    pub fn add_element(&mut self, glyph: &str, at: DocPoint, size: i32) -> CanvasResult<ElementId> {
        let id = self.commit(|history, model| history.add_element(model, glyph, at, size))?;
        self.finish_mutation(&MutationEffect::default());
        Ok(id)
    }

    pub fn move_elements(&mut self, ids: &[ElementId], delta: DocPoint) -> bool {
        let pushed = self.commit(|history, model| history.move_elements(model, ids, delta));
        if pushed {
            self.finish_mutation(&MutationEffect::default());
        }
        pushed
    }

    pub fn scale_elements(&mut self, ids: &[ElementId], factor: f32) -> bool {
        let pushed = self.commit(|history, model| history.scale_elements(model, ids, factor));
        if pushed {
            self.finish_mutation(&MutationEffect::default());
        }
        pushed
    }

    /// Remove an element and drop it from the selection in the same commit.
    pub fn delete_element(&mut self, id: ElementId) -> CanvasResult<()> {
        let effect = self.commit(|history, model| history.delete_element(model, id))?;
        self.finish_mutation(&effect);
        Ok(())
    }

    /// Replace the background and start resolving it. An unchanged source
    /// pushes nothing but is retried when its last fetch failed.
    pub fn set_background(&mut self, source: BackgroundSource, autofit: bool) -> bool {
        let pushed = self.commit(|history, model| history.set_background(model, source));
        if pushed {
            self.finish_mutation(&MutationEffect::default());
            self.request_background(autofit);
        } else if matches!(self.fetch_status.get(), FetchStatus::Failed { .. }) {
            self.request_background(autofit);
        }
        pushed
    }

    pub fn undo(&mut self) -> HistoryStatus {
        let status = self.commit(|history, model| history.undo(model));
        if status.applied {
            self.finish_mutation(&status.effect);
        }
        status
    }

    pub fn redo(&mut self) -> HistoryStatus {
        let status = self.commit(|history, model| history.redo(model));
        if status.applied {
            self.finish_mutation(&status.effect);
        }
        status
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- selection ----

    /// Toggle membership of `id`. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: ElementId) -> bool {
        if !self.document.get().contains(id) {
            return false;
        }
        self.selection.update(|selection| selection.toggle(id))
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.get().is_empty() {
            self.selection.update(SelectionSet::clear);
        }
    }

    // ---- background ----

    fn request_background(&mut self, autofit: bool) {
        let source = self.document.get().background().clone();
        self.fetch.request(&source, autofit);
        self.sync_fetch_status();
    }

    fn sync_fetch_status(&mut self) {
        if self.fetch_status.get() != self.fetch.status() {
            self.fetch_status.set(self.fetch.status().clone());
        }
    }

    fn apply_fetch_outcomes(&mut self, outcomes: &[FetchOutcome]) {
        for outcome in outcomes {
            if let FetchOutcome::Fetched { autofit: true, .. } = outcome {
                self.fit_to_screen();
            }
        }
        self.sync_fetch_status();
    }

    /// Apply background completions that have arrived. Call once per frame.
    pub fn poll_background(&mut self) -> Vec<FetchOutcome> {
        let outcomes = self.fetch.poll();
        self.apply_fetch_outcomes(&outcomes);
        outcomes
    }

    /// Block up to `timeout` for a background completion and apply it.
    pub fn wait_for_background(&mut self, timeout: Duration) -> Vec<FetchOutcome> {
        let outcomes = self.fetch.wait(timeout);
        self.apply_fetch_outcomes(&outcomes);
        outcomes
    }

    // ---- view ----

    /// Zoom so the background image fills the container. No-op without a
    /// fetched image or a usable container. A canvas pan or pinch in
    /// progress continues from the fitted view.
    pub fn fit_to_screen(&mut self) -> bool {
        let (Some(container), Some(image)) = (self.container, self.fetch.image()) else {
            debug!("Fit to screen skipped, no image or container");
            return false;
        };
        let (width, height) = (image.width, image.height);
        if container.is_degenerate() {
            return false;
        }
        let fitted = self.transform.update(|t| t.fit_to(container, width, height));
        if fitted {
            self.reanchor_canvas_gesture();
        }
        fitted
    }

    pub fn view_state(&self) -> ViewState {
        self.transform.get().view_state()
    }

    pub fn restore_view(&mut self, view: ViewState) {
        self.transform.update(|t| t.restore_view(view));
    }

    /// Screen point to document point, honoring an in-flight selection drag.
    pub fn document_point_at(&self, screen: Vec2) -> CanvasResult<DocPoint> {
        let ctx = self.coordinate_context()?;
        let offset = self.active_offset();
        Ok(CoordinateMapper::to_document_in(screen, &ctx, offset).truncate())
    }

    /// Selection drag offset in screen units, while one is in flight.
    pub fn active_offset(&self) -> Option<Vec2> {
        self.gestures
            .state()
            .selection_translation()
            .map(|translation| CoordinateMapper::delta_to_screen(translation, self.transform.get()))
    }

    /// Topmost element under a screen point.
    pub fn hit_test(&self, screen: Vec2) -> Option<ElementId> {
        profile_scope!("hit_test");
        let ctx = self.coordinate_context().ok()?;
        let point = CoordinateMapper::to_document_in(screen, &ctx, None);
        self.index.topmost_at(point)
    }

    /// Font size for a glyph dropped at the current zoom, so it appears at
    /// the default size on screen.
    pub fn drop_glyph_size(&self) -> i32 {
        let zoom = self.transform.get().effective_zoom();
        let size = (self.settings.default_glyph_size as f32 / zoom).round();
        if size >= i32::MAX as f32 {
            i32::MAX
        } else {
            (size as i32).max(self.settings.min_glyph_size)
        }
    }

    /// Every element as it should be drawn now, bottom to top.
    pub fn presented_elements(&self) -> CanvasResult<Vec<PresentedElement>> {
        let ctx = self.coordinate_context()?;
        let zoom = ctx.transform.effective_zoom();
        let state = self.gestures.state();
        let drag = state.selection_translation().unwrap_or(Vec2::ZERO);
        let factor = state.selection_factor().unwrap_or(1.0);
        let selection = self.selection.get();

        Ok(self
            .document
            .get()
            .elements()
            .iter()
            .map(|element| {
                let selected = selection.contains(element.id);
                let mut position = element.position.as_vec2();
                let mut size = element.size as f32;
                if selected {
                    position += drag;
                    size *= factor;
                }
                PresentedElement {
                    id: element.id,
                    glyph: element.glyph.clone(),
                    screen_position: CoordinateMapper::to_screen_in(position, &ctx),
                    font_size: size * zoom,
                    selected,
                }
            })
            .collect())
    }

    // ---- persistence ----

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::from_model(self.document.get())
    }

    /// Replace the document wholesale. Selection, history and any gesture
    /// in flight are dropped and the background is resolved again.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) {
        let model = snapshot.into_model();
        info!(elements = model.len(), background = %model.background().describe(), "Restoring document");
        self.reset_gestures();
        self.history.clear();
        self.document.update_silently(|current| *current = model);
        self.selection.update_silently(SelectionSet::clear);
        self.index.rebuild(self.document.get().elements());
        self.document.notify();
        self.selection.notify();
        self.request_background(false);
    }

    pub(crate) fn reset_gestures(&mut self) {
        if self.transform.get().is_gesture_active() {
            self.transform.update(TransformState::cancel_gesture);
        }
        self.gestures.settle();
    }

    // ---- settings ----

    /// Swap in new settings. Worker count is fixed at construction.
    pub fn apply_settings(&mut self, settings: CanvasSettings) {
        let settings = settings.sanitized();
        self.history.configure(settings.max_history, settings.min_glyph_size);
        self.gestures.config = GestureConfig::from(&settings);
        let (min_zoom, max_zoom) = (settings.min_zoom, settings.max_zoom);
        if self.transform.get().zoom_bounds() != (min_zoom, max_zoom) {
            self.transform.update(|t| t.set_zoom_bounds(min_zoom, max_zoom));
        }
        info!("Applied canvas settings");
        self.settings = settings;
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("elements", &self.document.get().len())
            .field("selection", self.selection.get())
            .field("transform", self.transform.get())
            .field("fetch_status", self.fetch_status.get())
            .field("gesture", &self.gestures.state().name())
            .finish()
    }
}

/// Degenerate-geometry errors are dropped quietly; anything else is passed on.
pub(crate) fn skip_invalid_geometry<T>(result: CanvasResult<T>) -> CanvasResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_skippable() => {
            debug!("Skipped: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
