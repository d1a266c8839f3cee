//! The [`Lightbox`] engine: open/close/navigate over a gallery of slides.
//!
//! The engine is headless and single-threaded. The embedder feeds it
//! [`InputEvent`]s, calls [`Lightbox::frame`] once per render tick, reports
//! asynchronous media completions, and drains [`EngineEvent`]s to keep its
//! presentation in sync. All navigation maintains two bounds: at most the
//! current slide and its immediate neighbors hold resources, and the slider
//! offset is always `-(current * viewport_width)` when at rest.

use crate::drag::{Axis, DragEngine, DragOutcome, GestureEnv};
use crate::focus::{Control, FocusHost, FocusManager, NavDirection, NullFocusHost};
use crate::gallery::Gallery;
use crate::input::{Hit, InputBindings, InputEvent, Key};
use crate::lifecycle::{validate_transition, SlideLifecycle};
use crate::EngineError;
use lightbox_media::{
    builtin_handlers, handler_for_kind, EmbedGate, FetchState, FragmentResolver, MediaContext,
    MediaHandler, NoFragments,
};
use lightbox_schema::{
    GalleryManifest, MediaSource, NavigationVisibility, Options, SourceId,
};
use tracing::{debug, info, warn};

const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// Result of an asynchronous media fetch reported by the embedder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLoadOutcome {
    Complete,
    Failed(String),
}

/// State changes for the embedder to mirror, drained via
/// [`Lightbox::take_events`] in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Opened { index: usize },
    Closed { restored_focus: bool },
    Moved { from: usize, to: usize },
    SlideAdded { index: usize },
    SlideLoaded { index: usize },
    SlideFailed { index: usize },
    OffsetChanged { offset: f64 },
    PlayersReady { count: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub open: bool,
    pub current: usize,
    pub previous: Option<usize>,
}

pub struct Lightbox {
    options: Options,
    handlers: Vec<Box<dyn MediaHandler>>,
    gallery: Gallery,
    nav: NavigationState,
    drag: DragEngine,
    focus: FocusManager,
    bindings: InputBindings,
    embed: EmbedGate,
    fragments: Box<dyn FragmentResolver>,
    focus_host: Box<dyn FocusHost>,
    viewport_width: f64,
    base_offset: f64,
    live_delta: f64,
    dismiss_delta: f64,
    touch_capable: bool,
    in_transition: bool,
    events: Vec<EngineEvent>,
}

impl Lightbox {
    pub fn new(options: Options) -> Result<Self, EngineError> {
        Self::with_hosts(options, Box::new(NoFragments), Box::new(NullFocusHost))
    }

    /// Construct with embedder-supplied page integration: a fragment
    /// resolver for inline slides and a focus host for trap restore.
    pub fn with_hosts(
        options: Options,
        fragments: Box<dyn FragmentResolver>,
        focus_host: Box<dyn FocusHost>,
    ) -> Result<Self, EngineError> {
        options.validate()?;
        Ok(Self {
            options,
            handlers: builtin_handlers(),
            gallery: Gallery::new(),
            nav: NavigationState::default(),
            drag: DragEngine::new(),
            focus: FocusManager::new(),
            bindings: InputBindings::new(),
            embed: EmbedGate::new(),
            fragments,
            focus_host,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            base_offset: 0.0,
            live_delta: 0.0,
            dismiss_delta: 0.0,
            touch_capable: false,
            in_transition: false,
            events: Vec::new(),
        })
    }

    /// Build an engine from a parsed manifest: its options plus its slides,
    /// registered in manifest order.
    pub fn from_manifest(manifest: &GalleryManifest) -> Result<Self, EngineError> {
        let mut engine = Self::new(manifest.options.clone())?;
        for source in manifest.sources()? {
            engine.add(source)?;
        }
        Ok(engine)
    }

    /// Replace the handler set, e.g. to interpose instrumentation around
    /// the built-in handlers.
    pub fn set_handlers(&mut self, handlers: Vec<Box<dyn MediaHandler>>) {
        self.handlers = handlers;
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn is_open(&self) -> bool {
        self.nav.open
    }

    pub fn nav(&self) -> NavigationState {
        self.nav
    }

    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    pub fn focused(&self) -> Option<Control> {
        self.focus.focused()
    }

    /// Horizontal track translation, including any live drag displacement.
    pub fn offset(&self) -> f64 {
        self.base_offset + self.live_delta
    }

    /// Vertical translation of the current slide during a dismiss gesture;
    /// zero whenever no vertically locked drag is in flight.
    pub fn dismiss_offset(&self) -> f64 {
        self.dismiss_delta
    }

    pub fn is_touch_capable(&self) -> bool {
        self.touch_capable
    }

    pub fn set_touch_capable(&mut self, touch: bool) {
        self.touch_capable = touch;
        if self.nav.open {
            self.focus.sync_enabled(self.enabled_controls());
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
        if self.nav.open {
            self.recompute_offset();
        }
    }

    /// Whether the host page should suppress its scrollbar right now.
    pub fn scrollbar_hidden(&self) -> bool {
        self.nav.open && self.options.hide_scrollbar_while_open
    }

    pub fn current_index(&self) -> Result<usize, EngineError> {
        if self.nav.open {
            Ok(self.nav.current)
        } else {
            Err(EngineError::NoActiveSlide)
        }
    }

    /// The position indicator text, `"current/total"`. Hidden while closed,
    /// when disabled, and for single-slide galleries.
    pub fn counter(&self) -> Option<String> {
        if !self.nav.open || !self.options.counter_visible || self.gallery.count() <= 1 {
            return None;
        }
        Some(format!("{}/{}", self.nav.current + 1, self.gallery.count()))
    }

    /// Register a source as the last slide. Allowed while open; the new
    /// slide joins the live gallery without disturbing the current one.
    pub fn add(&mut self, source: MediaSource) -> Result<usize, EngineError> {
        let mut ctx = media_ctx(&self.options, self.fragments.as_ref(), &mut self.embed);
        let index = self.gallery.register(source, &self.handlers, &mut ctx)?;
        if self.nav.open {
            if index.abs_diff(self.nav.current) <= 1 {
                self.preload_slide(index);
            }
            self.focus.sync_enabled(self.enabled_controls());
        }
        self.events.push(EngineEvent::SlideAdded { index });
        Ok(index)
    }

    /// Open the overlay at `index` (default 0). Opening while already open
    /// at a different index retargets, behaving like a direct navigation;
    /// at the same index it fails with [`EngineError::AlreadyOpen`].
    pub fn open(&mut self, index: Option<usize>) -> Result<(), EngineError> {
        if self.gallery.is_empty() {
            return Err(EngineError::EmptyGallery);
        }
        let len = self.gallery.count();
        let target = index.unwrap_or(0);
        if target >= len {
            return Err(EngineError::IndexOutOfRange { index: target, len });
        }

        if self.nav.open {
            if target == self.nav.current {
                return Err(EngineError::AlreadyOpen);
            }
            if self.in_transition {
                return Err(EngineError::TransitionInProgress);
            }
            let hint = if target < self.nav.current {
                NavDirection::Left
            } else {
                NavDirection::Right
            };
            self.move_to(target, Some(hint));
            return Ok(());
        }

        self.nav.open = true;
        self.nav.current = target;
        self.focus.on_open(self.focus_host.active_focus());
        self.bindings.bind(&self.options);
        self.load_slide(target);
        self.preload_neighbors();
        self.enforce_window();
        self.recompute_offset();
        self.focus.recompute(self.enabled_controls(), None);
        info!(index = target, count = len, "overlay opened");
        self.events.push(EngineEvent::Opened { index: target });
        Ok(())
    }

    /// Close the overlay: release the current slide, remove input bindings,
    /// and hand focus back to the element captured at open.
    pub fn close(&mut self) -> Result<(), EngineError> {
        if !self.nav.open {
            return Err(EngineError::AlreadyClosed);
        }
        if self.drag.is_active() {
            let _outcome = self.drag.release();
            self.live_delta = 0.0;
            self.dismiss_delta = 0.0;
        }
        let current = self.nav.current;
        self.leave_slide(current);
        self.cleanup_slide(current);
        self.bindings.unbind();
        let restored = match self.focus.on_close() {
            Some(target) => self.focus_host.try_focus(&target),
            None => false,
        };
        self.nav.open = false;
        self.nav.previous = Some(current);
        self.in_transition = false;
        info!(index = current, "overlay closed");
        self.events.push(EngineEvent::Closed {
            restored_focus: restored,
        });
        Ok(())
    }

    /// Advance to the next slide. At the last slide this is a no-op: the
    /// index is unchanged, no lifecycle hooks run, and the call succeeds.
    pub fn next(&mut self) -> Result<usize, EngineError> {
        self.ensure_navigable()?;
        let target = self.nav.current + 1;
        if target >= self.gallery.count() {
            debug!(index = self.nav.current, "next at last slide, staying");
            return Ok(self.nav.current);
        }
        self.move_to(target, Some(NavDirection::Right));
        Ok(target)
    }

    /// Step back to the previous slide; a no-op at the first slide.
    pub fn prev(&mut self) -> Result<usize, EngineError> {
        self.ensure_navigable()?;
        let Some(target) = self.nav.current.checked_sub(1) else {
            debug!("prev at first slide, staying");
            return Ok(self.nav.current);
        };
        self.move_to(target, Some(NavDirection::Left));
        Ok(target)
    }

    /// Drop all slides and state. Closes first when open.
    pub fn reset(&mut self) {
        if self.nav.open {
            if let Err(error) = self.close() {
                debug!(%error, "close during reset failed");
            }
        }
        self.gallery.reset(&self.handlers);
        self.nav = NavigationState::default();
        self.base_offset = 0.0;
        self.live_delta = 0.0;
        self.dismiss_delta = 0.0;
    }

    /// Feed one input event. Events outside the current bindings, and
    /// navigation refused at a boundary or mid-transition, have no effect.
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.bindings.accepts(&event) {
            return;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::PointerDown { x, y, hit } => {
                if self.in_transition {
                    return;
                }
                let env = self.gesture_env();
                self.drag.begin(x, y, hit == Hit::FormControl, env);
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(delta) = self.drag.sample(x, y) {
                    match delta.axis {
                        Axis::Horizontal => self.live_delta = delta.delta,
                        Axis::Vertical => self.dismiss_delta = delta.delta,
                        Axis::None => {}
                    }
                }
            }
            InputEvent::PointerUp => self.commit_drag(),
            InputEvent::Click(hit) => self.handle_click(hit),
            InputEvent::Resize { width } => self.bindings.queue_resize(width),
        }
    }

    /// Per-render-tick work: apply the coalesced resize and settle any
    /// in-flight transition.
    pub fn frame(&mut self) {
        if let Some(width) = self.bindings.take_resize() {
            self.set_viewport_width(width);
        }
        self.in_transition = false;
    }

    /// Report an asynchronous media completion. Completions for unknown
    /// sources or slides no longer holding resources are stale and ignored.
    pub fn media_loaded(&mut self, id: &SourceId, outcome: MediaLoadOutcome) {
        let Some(index) = self.gallery.index_of(id) else {
            debug!(source = %id, "completion for unknown source, ignoring");
            return;
        };
        let is_current = self.nav.open && index == self.nav.current;
        let Some(slide) = self.gallery.get_mut(index) else {
            return;
        };
        if !slide.lifecycle.is_hot() {
            debug!(index, state = %slide.lifecycle, "stale completion, ignoring");
            return;
        }
        match outcome {
            MediaLoadOutcome::Complete => {
                if let Some(image) = slide.surface.as_image_mut() {
                    image.fetch = FetchState::Complete;
                }
                slide.surface.failed = false;
                if is_current {
                    slide.surface.faded_in = true;
                }
                self.events.push(EngineEvent::SlideLoaded { index });
            }
            MediaLoadOutcome::Failed(reason) => {
                if let Some(image) = slide.surface.as_image_mut() {
                    image.fetch = FetchState::Failed;
                }
                slide.surface.failed = true;
                warn!(index, %reason, "media load failed");
                self.events.push(EngineEvent::SlideFailed { index });
            }
        }
    }

    /// Signal that the embed SDK finished loading. Queued player requests
    /// are flushed in order and their players marked created; the current
    /// slide starts playback if autoplay asked for it.
    pub fn embed_ready(&mut self) {
        let first = !self.embed.is_ready();
        let flushed = self.embed.notify_ready();
        let count = flushed.len();
        for request in &flushed {
            for i in 0..self.gallery.count() {
                if let Some(player) = self
                    .gallery
                    .get_mut(i)
                    .and_then(|slide| slide.surface.as_player_mut())
                {
                    if player.player_id == request.player_id {
                        player.created = true;
                        break;
                    }
                }
            }
        }
        if self.nav.open && self.options.autoplay_video {
            let current = self.nav.current;
            if let Some(slide) = self.gallery.get_mut(current) {
                if slide.lifecycle == SlideLifecycle::Loaded {
                    if let Some(player) = slide.surface.as_player_mut() {
                        if player.created {
                            player.playing = true;
                        }
                    }
                }
            }
        }
        if first {
            info!(count, "embed SDK ready");
            self.events.push(EngineEvent::PlayersReady { count });
        }
    }

    /// Drain all events emitted since the last drain, in order.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                if let Err(error) = self.close() {
                    debug!(%error, "escape close refused");
                }
            }
            Key::ArrowLeft => self.step_quietly(NavDirection::Left),
            Key::ArrowRight => self.step_quietly(NavDirection::Right),
            Key::Tab { shift } => {
                self.focus.on_tab(shift);
            }
        }
    }

    fn handle_click(&mut self, hit: Hit) {
        match hit {
            Hit::PrevButton => self.step_quietly(NavDirection::Left),
            Hit::NextButton => self.step_quietly(NavDirection::Right),
            Hit::CloseButton | Hit::Backdrop => {
                if let Err(error) = self.close() {
                    debug!(%error, "click close refused");
                }
            }
            Hit::Slide | Hit::FormControl => {}
        }
    }

    fn commit_drag(&mut self) {
        let outcome = self.drag.release();
        self.live_delta = 0.0;
        self.dismiss_delta = 0.0;
        match outcome {
            DragOutcome::Prev => self.step_quietly(NavDirection::Left),
            DragOutcome::Next => self.step_quietly(NavDirection::Right),
            DragOutcome::Dismiss => {
                if let Err(error) = self.close() {
                    debug!(%error, "dismiss refused");
                }
            }
            DragOutcome::SnapBack => {
                self.events.push(EngineEvent::OffsetChanged {
                    offset: self.base_offset,
                });
            }
            DragOutcome::Ignored => {}
        }
    }

    /// Navigation from input: refusals while closed or mid-transition are
    /// swallowed rather than surfaced.
    fn step_quietly(&mut self, direction: NavDirection) {
        let result = match direction {
            NavDirection::Left => self.prev(),
            NavDirection::Right => self.next(),
        };
        if let Err(error) = result {
            debug!(%error, "navigation refused");
        }
    }

    fn ensure_navigable(&self) -> Result<(), EngineError> {
        if !self.nav.open {
            return Err(EngineError::AlreadyClosed);
        }
        if self.in_transition {
            return Err(EngineError::TransitionInProgress);
        }
        Ok(())
    }

    fn move_to(&mut self, target: usize, hint: Option<NavDirection>) {
        let from = self.nav.current;
        self.leave_slide(from);
        self.nav.previous = Some(from);
        self.nav.current = target;
        self.load_slide(target);
        self.preload_neighbors();
        self.enforce_window();
        self.recompute_offset();
        self.in_transition = true;
        debug!(from, to = target, "slide changed");
        self.events.push(EngineEvent::Moved { from, to: target });
        self.focus.recompute(self.enabled_controls(), hint);
    }

    fn gesture_env(&self) -> GestureEnv {
        GestureEnv {
            threshold: self.options.drag_threshold_px,
            horizontal_enabled: true,
            dismiss_enabled: self.options.swipe_to_close,
            slide_count: self.gallery.count(),
            current: self.nav.current,
        }
    }

    /// Overlay controls currently usable, in tab order.
    fn enabled_controls(&self) -> Vec<Control> {
        let count = self.gallery.count();
        let nav_visible = count > 1
            && match self.options.navigation_visibility {
                NavigationVisibility::Always => true,
                NavigationVisibility::Never => false,
                NavigationVisibility::TouchDependent => !self.touch_capable,
            };
        let mut controls = Vec::new();
        if nav_visible && self.nav.current > 0 {
            controls.push(Control::Prev);
        }
        if nav_visible && self.nav.current + 1 < count {
            controls.push(Control::Next);
        }
        if self.options.close_visible {
            controls.push(Control::Close);
        }
        controls
    }

    #[allow(clippy::cast_precision_loss)]
    fn recompute_offset(&mut self) {
        let offset = -(self.nav.current as f64) * self.viewport_width;
        if (offset - self.base_offset).abs() > f64::EPSILON {
            self.base_offset = offset;
            self.events.push(EngineEvent::OffsetChanged { offset });
        }
    }

    fn preload_neighbors(&mut self) {
        let current = self.nav.current;
        if let Some(before) = current.checked_sub(1) {
            self.preload_slide(before);
        }
        if current + 1 < self.gallery.count() {
            self.preload_slide(current + 1);
        }
    }

    /// Release every hot slide outside the current window.
    fn enforce_window(&mut self) {
        let current = self.nav.current;
        for i in 0..self.gallery.count() {
            if i.abs_diff(current) <= 1 {
                continue;
            }
            self.leave_slide(i);
            self.cleanup_slide(i);
        }
    }

    fn load_slide(&mut self, index: usize) {
        let Some(slide) = self.gallery.get_mut(index) else {
            return;
        };
        if validate_transition(slide.lifecycle, SlideLifecycle::Loaded).is_err() {
            debug!(index, state = %slide.lifecycle, "load skipped");
            return;
        }
        let Some(handler) = handler_for_kind(&self.handlers, slide.kind) else {
            return;
        };
        let mut ctx = media_ctx(&self.options, self.fragments.as_ref(), &mut self.embed);
        handler.load(&mut slide.surface, &mut ctx);
        slide.lifecycle = SlideLifecycle::Loaded;
    }

    fn preload_slide(&mut self, index: usize) {
        let Some(slide) = self.gallery.get_mut(index) else {
            return;
        };
        if validate_transition(slide.lifecycle, SlideLifecycle::Preloaded).is_err() {
            return;
        }
        let Some(handler) = handler_for_kind(&self.handlers, slide.kind) else {
            return;
        };
        handler.preload(&mut slide.surface);
        slide.lifecycle = SlideLifecycle::Preloaded;
    }

    fn leave_slide(&mut self, index: usize) {
        let Some(slide) = self.gallery.get_mut(index) else {
            return;
        };
        if validate_transition(slide.lifecycle, SlideLifecycle::Left).is_err() {
            return;
        }
        let Some(handler) = handler_for_kind(&self.handlers, slide.kind) else {
            return;
        };
        handler.leave(&mut slide.surface);
        slide.lifecycle = SlideLifecycle::Left;
    }

    fn cleanup_slide(&mut self, index: usize) {
        let Some(slide) = self.gallery.get_mut(index) else {
            return;
        };
        if validate_transition(slide.lifecycle, SlideLifecycle::CleanedUp).is_err() {
            return;
        }
        let Some(handler) = handler_for_kind(&self.handlers, slide.kind) else {
            return;
        };
        handler.cleanup(&mut slide.surface);
        slide.lifecycle = SlideLifecycle::CleanedUp;
    }
}

fn media_ctx<'a>(
    options: &Options,
    fragments: &'a dyn FragmentResolver,
    embed: &'a mut EmbedGate,
) -> MediaContext<'a> {
    MediaContext {
        fragments,
        embed,
        captions: options.captions,
        caption_source: options.caption_source,
        autoplay_video: options.autoplay_video,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusTarget;
    use lightbox_media::{Hook, HookLog, ProbeHandler, ResolvedFragment};
    use lightbox_schema::{compute_source_id, parse_manifest_str, MediaKind};
    use std::sync::{Arc, Mutex};

    fn image_engine(count: usize) -> Lightbox {
        let mut engine = Lightbox::new(Options::default()).unwrap();
        for i in 0..count {
            engine.add(MediaSource::url(format!("photo-{i}.jpg"))).unwrap();
        }
        engine.take_events();
        engine
    }

    fn hot_count(engine: &Lightbox) -> usize {
        engine
            .gallery()
            .slides()
            .iter()
            .filter(|s| s.lifecycle.is_hot())
            .count()
    }

    struct RecordingFocusHost {
        active: Option<FocusTarget>,
        restored: Arc<Mutex<Vec<FocusTarget>>>,
    }

    impl FocusHost for RecordingFocusHost {
        fn active_focus(&self) -> Option<FocusTarget> {
            self.active.clone()
        }

        fn try_focus(&mut self, target: &FocusTarget) -> bool {
            self.restored.lock().unwrap().push(target.clone());
            true
        }
    }

    struct OneFragment;

    impl FragmentResolver for OneFragment {
        fn resolve(&self, selector: &str) -> Option<ResolvedFragment> {
            (selector == "#clip").then(|| ResolvedFragment {
                html: "<video></video>".to_owned(),
                has_video: true,
            })
        }
    }

    #[test]
    fn open_requires_slides_and_a_valid_index() {
        let mut engine = Lightbox::new(Options::default()).unwrap();
        assert!(matches!(engine.open(None), Err(EngineError::EmptyGallery)));

        engine.add(MediaSource::url("a.jpg")).unwrap();
        assert!(matches!(
            engine.open(Some(3)),
            Err(EngineError::IndexOutOfRange { index: 3, len: 1 })
        ));
        engine.open(None).unwrap();
        assert_eq!(engine.current_index().unwrap(), 0);
    }

    #[test]
    fn open_loads_current_and_preloads_neighbors() {
        let mut engine = image_engine(5);
        engine.open(Some(2)).unwrap();

        let states: Vec<SlideLifecycle> = engine
            .gallery()
            .slides()
            .iter()
            .map(|s| s.lifecycle)
            .collect();
        assert_eq!(
            states,
            vec![
                SlideLifecycle::Uninitialized,
                SlideLifecycle::Preloaded,
                SlideLifecycle::Loaded,
                SlideLifecycle::Preloaded,
                SlideLifecycle::Uninitialized,
            ]
        );
        assert_eq!(hot_count(&engine), 3);
    }

    #[test]
    fn reopen_at_same_index_fails_but_retarget_navigates() {
        let mut engine = image_engine(4);
        engine.open(Some(1)).unwrap();
        assert!(matches!(engine.open(Some(1)), Err(EngineError::AlreadyOpen)));

        engine.frame();
        engine.open(Some(3)).unwrap();
        assert_eq!(engine.current_index().unwrap(), 3);
        assert!(engine
            .take_events()
            .contains(&EngineEvent::Moved { from: 1, to: 3 }));
    }

    #[test]
    fn navigation_keeps_the_hot_window_bounded() {
        let mut engine = image_engine(8);
        engine.open(Some(0)).unwrap();
        for _ in 0..7 {
            engine.frame();
            engine.next().unwrap();
            assert!(hot_count(&engine) <= 3);
        }
        assert_eq!(engine.current_index().unwrap(), 7);
        // Slides far behind were released, not merely suspended.
        assert_eq!(
            engine.gallery().get(0).unwrap().lifecycle,
            SlideLifecycle::CleanedUp
        );
    }

    #[test]
    fn navigation_at_boundaries_is_a_noop() {
        let log = HookLog::new();
        let mut engine = Lightbox::new(Options::default()).unwrap();
        engine.set_handlers(ProbeHandler::wrap_builtin(&log));
        for i in 0..2 {
            engine.add(MediaSource::url(format!("b{i}.jpg"))).unwrap();
        }
        engine.open(Some(0)).unwrap();
        engine.take_events();
        log.clear();

        // No previous slide: index unchanged, no hooks, call succeeds.
        assert_eq!(engine.prev().unwrap(), 0);
        assert_eq!(engine.current_index().unwrap(), 0);
        assert!(log.is_empty());
        assert!(engine.take_events().is_empty());

        assert_eq!(engine.next().unwrap(), 1);
        engine.frame();
        log.clear();
        engine.take_events();

        // Same at the last slide.
        assert_eq!(engine.next().unwrap(), 1);
        assert_eq!(engine.current_index().unwrap(), 1);
        assert!(log.is_empty());
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn reentrant_navigation_is_rejected_until_frame() {
        let mut engine = image_engine(5);
        engine.open(Some(0)).unwrap();
        engine.next().unwrap();
        assert!(matches!(
            engine.next(),
            Err(EngineError::TransitionInProgress)
        ));
        engine.frame();
        engine.next().unwrap();
        assert_eq!(engine.current_index().unwrap(), 2);
    }

    #[test]
    fn navigation_while_closed_errors() {
        let mut engine = image_engine(3);
        assert!(matches!(engine.next(), Err(EngineError::AlreadyClosed)));
        assert!(matches!(engine.prev(), Err(EngineError::AlreadyClosed)));
        assert!(matches!(engine.close(), Err(EngineError::AlreadyClosed)));
        assert!(matches!(
            engine.current_index(),
            Err(EngineError::NoActiveSlide)
        ));
    }

    #[test]
    fn counter_reflects_position_and_hides_for_single_slide() {
        let mut engine = image_engine(3);
        assert_eq!(engine.counter(), None);
        engine.open(Some(0)).unwrap();
        assert_eq!(engine.counter().as_deref(), Some("1/3"));
        engine.next().unwrap();
        assert_eq!(engine.counter().as_deref(), Some("2/3"));

        let mut single = image_engine(1);
        single.open(None).unwrap();
        assert_eq!(single.counter(), None);
    }

    #[test]
    fn offset_tracks_current_slide_and_viewport() {
        let mut engine = image_engine(3);
        engine.open(Some(0)).unwrap();
        assert!((engine.offset() - 0.0).abs() < f64::EPSILON);
        engine.next().unwrap();
        assert!((engine.offset() - -1280.0).abs() < f64::EPSILON);

        // Resize arrives through input and lands on the next frame.
        engine.handle_input(InputEvent::Resize { width: 800.0 });
        assert!((engine.offset() - -1280.0).abs() < f64::EPSILON);
        engine.frame();
        assert!((engine.offset() - -800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drag_sequence_from_open_to_close() {
        // Three images, defaults (20px threshold): a 50px leftward drag
        // commits to the next slide, a 5px drag snaps back, then the
        // overlay closes and focus returns to the opener.
        let restored = Arc::new(Mutex::new(Vec::new()));
        let host = RecordingFocusHost {
            active: Some(FocusTarget::new("opener")),
            restored: Arc::clone(&restored),
        };
        let mut engine =
            Lightbox::with_hosts(Options::default(), Box::new(NoFragments), Box::new(host))
                .unwrap();
        for i in 0..3 {
            engine.add(MediaSource::url(format!("p{i}.jpg"))).unwrap();
        }
        engine.open(Some(0)).unwrap();
        assert_eq!(engine.counter().as_deref(), Some("1/3"));

        engine.handle_input(InputEvent::PointerDown {
            x: 300.0,
            y: 200.0,
            hit: Hit::Slide,
        });
        engine.handle_input(InputEvent::PointerMove { x: 250.0, y: 200.0 });
        assert!((engine.offset() - -50.0).abs() < f64::EPSILON);
        engine.handle_input(InputEvent::PointerUp);
        assert_eq!(engine.counter().as_deref(), Some("2/3"));
        engine.frame();

        engine.handle_input(InputEvent::PointerDown {
            x: 300.0,
            y: 200.0,
            hit: Hit::Slide,
        });
        engine.handle_input(InputEvent::PointerMove { x: 305.0, y: 200.0 });
        engine.handle_input(InputEvent::PointerUp);
        assert_eq!(engine.counter().as_deref(), Some("2/3"));

        engine.close().unwrap();
        assert!(!engine.is_open());
        assert_eq!(
            restored.lock().unwrap().as_slice(),
            &[FocusTarget::new("opener")]
        );
        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::Closed {
            restored_focus: true
        }));
    }

    #[test]
    fn vertical_drag_dismisses() {
        let mut engine = image_engine(3);
        engine.open(Some(1)).unwrap();
        engine.frame();
        engine.handle_input(InputEvent::PointerDown {
            x: 300.0,
            y: 200.0,
            hit: Hit::Slide,
        });
        engine.handle_input(InputEvent::PointerMove { x: 300.0, y: 260.0 });
        engine.handle_input(InputEvent::PointerUp);
        assert!(!engine.is_open());
    }

    #[test]
    fn vertical_drag_live_translates_until_release() {
        let mut engine = image_engine(3);
        engine.open(Some(1)).unwrap();
        engine.frame();
        engine.handle_input(InputEvent::PointerDown {
            x: 300.0,
            y: 200.0,
            hit: Hit::Slide,
        });
        engine.handle_input(InputEvent::PointerMove { x: 300.0, y: 212.0 });
        assert!((engine.dismiss_offset() - 12.0).abs() < f64::EPSILON);
        // The horizontal track does not move during a vertical gesture.
        assert!((engine.offset() - -1280.0).abs() < f64::EPSILON);

        // Below the threshold the slide settles back to rest.
        engine.handle_input(InputEvent::PointerUp);
        assert!(engine.dismiss_offset().abs() < f64::EPSILON);
        assert!(engine.is_open());
    }

    #[test]
    fn input_after_close_has_no_effect() {
        let mut engine = image_engine(3);
        engine.open(Some(0)).unwrap();
        engine.close().unwrap();
        engine.take_events();

        engine.handle_input(InputEvent::Key(Key::ArrowRight));
        engine.handle_input(InputEvent::Click(Hit::NextButton));
        engine.handle_input(InputEvent::PointerDown {
            x: 0.0,
            y: 0.0,
            hit: Hit::Slide,
        });
        engine.handle_input(InputEvent::PointerUp);
        assert!(engine.take_events().is_empty());
        assert!(!engine.is_open());
    }

    #[test]
    fn keyboard_navigation_and_escape() {
        let mut engine = image_engine(3);
        engine.open(Some(0)).unwrap();
        engine.frame();
        engine.handle_input(InputEvent::Key(Key::ArrowRight));
        assert_eq!(engine.current_index().unwrap(), 1);
        engine.frame();
        engine.handle_input(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(engine.current_index().unwrap(), 0);
        engine.frame();
        // Boundary arrow stays put.
        engine.handle_input(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(engine.current_index().unwrap(), 0);
        engine.handle_input(InputEvent::Key(Key::Escape));
        assert!(!engine.is_open());
    }

    #[test]
    fn keyboard_disabled_ignores_keys() {
        let options = Options {
            keyboard_enabled: false,
            ..Options::default()
        };
        let mut engine = Lightbox::new(options).unwrap();
        for i in 0..2 {
            engine.add(MediaSource::url(format!("k{i}.jpg"))).unwrap();
        }
        engine.open(Some(0)).unwrap();
        engine.frame();
        engine.handle_input(InputEvent::Key(Key::ArrowRight));
        assert_eq!(engine.current_index().unwrap(), 0);
        engine.handle_input(InputEvent::Key(Key::Escape));
        assert!(engine.is_open());
    }

    #[test]
    fn backdrop_click_honors_config() {
        let mut engine = image_engine(2);
        engine.open(Some(0)).unwrap();
        engine.handle_input(InputEvent::Click(Hit::Backdrop));
        assert!(!engine.is_open());

        let options = Options {
            click_outside_closes: false,
            ..Options::default()
        };
        let mut engine = Lightbox::new(options).unwrap();
        engine.add(MediaSource::url("a.jpg")).unwrap();
        engine.open(None).unwrap();
        engine.handle_input(InputEvent::Click(Hit::Backdrop));
        assert!(engine.is_open());
        engine.handle_input(InputEvent::Click(Hit::CloseButton));
        assert!(!engine.is_open());
    }

    #[test]
    fn tab_cycles_the_enabled_controls() {
        let mut engine = image_engine(3);
        engine.open(Some(1)).unwrap();
        // Default navigation visibility shows buttons on non-touch devices.
        assert_eq!(engine.focused(), Some(Control::Next));
        engine.handle_input(InputEvent::Key(Key::Tab { shift: false }));
        assert_eq!(engine.focused(), Some(Control::Close));
        engine.handle_input(InputEvent::Key(Key::Tab { shift: false }));
        assert_eq!(engine.focused(), Some(Control::Prev)); // wrap
        engine.handle_input(InputEvent::Key(Key::Tab { shift: true }));
        assert_eq!(engine.focused(), Some(Control::Close)); // shift wrap
    }

    #[test]
    fn touch_capable_hides_navigation_buttons() {
        let mut engine = image_engine(3);
        engine.set_touch_capable(true);
        engine.open(Some(1)).unwrap();
        assert_eq!(engine.focused(), Some(Control::Close));
        engine.handle_input(InputEvent::Key(Key::Tab { shift: false }));
        assert_eq!(engine.focused(), Some(Control::Close));
    }

    #[test]
    fn focus_hint_follows_direction() {
        let mut engine = image_engine(3);
        engine.open(Some(2)).unwrap();
        engine.frame();
        engine.prev().unwrap();
        assert_eq!(engine.focused(), Some(Control::Prev));
        engine.frame();
        engine.prev().unwrap();
        // Prev disabled at the first slide: fall back to next.
        assert_eq!(engine.focused(), Some(Control::Next));
    }

    #[test]
    fn media_completions_apply_to_hot_slides_only() {
        let mut engine = image_engine(5);
        let far_id = compute_source_id(&MediaSource::url("photo-4.jpg")).id;
        let current_id = compute_source_id(&MediaSource::url("photo-0.jpg")).id;
        engine.open(Some(0)).unwrap();
        engine.take_events();

        engine.media_loaded(&current_id, MediaLoadOutcome::Complete);
        assert!(engine.gallery().get(0).unwrap().surface.faded_in);
        assert!(engine
            .take_events()
            .contains(&EngineEvent::SlideLoaded { index: 0 }));

        // A completion for a slide that never acquired resources is stale.
        engine.media_loaded(&far_id, MediaLoadOutcome::Complete);
        assert!(engine.take_events().is_empty());
        assert!(!engine.gallery().get(4).unwrap().surface.faded_in);
    }

    #[test]
    fn failed_media_marks_the_slide() {
        let mut engine = image_engine(2);
        let id = compute_source_id(&MediaSource::url("photo-0.jpg")).id;
        engine.open(Some(0)).unwrap();
        engine.take_events();

        engine.media_loaded(&id, MediaLoadOutcome::Failed("404".to_owned()));
        let slide = engine.gallery().get(0).unwrap();
        assert!(slide.surface.failed);
        assert!(engine
            .take_events()
            .contains(&EngineEvent::SlideFailed { index: 0 }));
    }

    #[test]
    fn completion_for_unknown_source_is_ignored() {
        let mut engine = image_engine(2);
        engine.open(Some(0)).unwrap();
        engine.take_events();
        let unknown = compute_source_id(&MediaSource::url("never-added.jpg")).id;
        engine.media_loaded(&unknown, MediaLoadOutcome::Complete);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn embed_ready_creates_queued_players() {
        let mut engine = image_engine(1);
        let video_index = engine
            .add(MediaSource::url("https://vimeo.com/123").with_kind(MediaKind::Video))
            .unwrap();
        engine.take_events();

        // Registration queued a player request behind the gate.
        let slide = engine.gallery().get(video_index).unwrap();
        assert!(matches!(
            &slide.surface.content,
            Some(lightbox_media::MediaContent::Player(p)) if !p.created
        ));

        engine.embed_ready();
        let slide = engine.gallery().get(video_index).unwrap();
        assert!(matches!(
            &slide.surface.content,
            Some(lightbox_media::MediaContent::Player(p)) if p.created
        ));
        assert!(engine
            .take_events()
            .contains(&EngineEvent::PlayersReady { count: 1 }));

        // A second ready signal changes nothing.
        engine.embed_ready();
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn add_while_open_preloads_adjacent_slides() {
        let mut engine = image_engine(1);
        engine.open(None).unwrap();
        engine.take_events();

        let index = engine.add(MediaSource::url("late.jpg")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(
            engine.gallery().get(1).unwrap().lifecycle,
            SlideLifecycle::Preloaded
        );
        assert_eq!(engine.counter().as_deref(), Some("1/2"));
        assert!(engine
            .take_events()
            .contains(&EngineEvent::SlideAdded { index: 1 }));
    }

    #[test]
    fn close_releases_the_current_slide_and_bindings() {
        let log = HookLog::new();
        let mut engine = Lightbox::new(Options::default()).unwrap();
        engine.set_handlers(ProbeHandler::wrap_builtin(&log));
        for i in 0..3 {
            engine.add(MediaSource::url(format!("c{i}.jpg"))).unwrap();
        }
        engine.open(Some(1)).unwrap();
        log.clear();

        engine.close().unwrap();
        assert_eq!(log.count_of(Hook::Leave), 1);
        assert_eq!(log.count_of(Hook::Cleanup), 1);
        assert_eq!(
            engine.gallery().get(1).unwrap().lifecycle,
            SlideLifecycle::CleanedUp
        );
        // Reopening binds and loads again; nothing leaked from the first
        // session.
        engine.open(Some(1)).unwrap();
        assert_eq!(
            engine.gallery().get(1).unwrap().lifecycle,
            SlideLifecycle::Loaded
        );
    }

    #[test]
    fn repeated_open_close_cycles_do_not_accumulate_hooks() {
        let log = HookLog::new();
        let mut engine = Lightbox::new(Options::default()).unwrap();
        engine.set_handlers(ProbeHandler::wrap_builtin(&log));
        for i in 0..3 {
            engine.add(MediaSource::url(format!("r{i}.jpg"))).unwrap();
        }

        log.clear();
        engine.open(Some(0)).unwrap();
        engine.close().unwrap();
        let per_cycle = log.len();

        log.clear();
        for _ in 0..10 {
            engine.open(Some(0)).unwrap();
            engine.close().unwrap();
        }
        // Hook traffic scales linearly with cycles: one binding set per
        // open, fully removed per close.
        assert_eq!(log.len(), per_cycle * 10);
    }

    #[test]
    fn inline_slide_resumes_after_leave() {
        let mut engine = Lightbox::with_hosts(
            Options {
                autoplay_video: true,
                ..Options::default()
            },
            Box::new(OneFragment),
            Box::new(NullFocusHost),
        )
        .unwrap();
        engine.add(MediaSource::fragment("#clip")).unwrap();
        engine.add(MediaSource::url("b.jpg")).unwrap();

        engine.open(Some(0)).unwrap();
        {
            let slide = engine.gallery().get(0).unwrap();
            assert!(matches!(
                &slide.surface.content,
                Some(lightbox_media::MediaContent::Inline(c)) if c.video_playing
            ));
        }
        engine.next().unwrap();
        {
            let slide = engine.gallery().get(0).unwrap();
            assert_eq!(slide.lifecycle, SlideLifecycle::Left);
            assert!(matches!(
                &slide.surface.content,
                Some(lightbox_media::MediaContent::Inline(c)) if !c.video_playing
            ));
        }
        engine.frame();
        engine.prev().unwrap();
        let slide = engine.gallery().get(0).unwrap();
        assert_eq!(slide.lifecycle, SlideLifecycle::Loaded);
    }

    #[test]
    fn from_manifest_builds_options_and_slides() {
        let manifest = parse_manifest_str(
            r##"
manifest-version = 1

[options]
counter-visible = false

[[slide]]
url = "one.jpg"
alt = "First"

[[slide]]
fragment = "#clip"
kind = "inline"
"##,
        )
        .unwrap();
        // The inline slide needs a resolver; without one the build fails.
        assert!(matches!(
            Lightbox::from_manifest(&manifest),
            Err(EngineError::Media(_))
        ));

        let manifest = parse_manifest_str(
            r#"
manifest-version = 1

[options]
counter-visible = false

[[slide]]
url = "one.jpg"

[[slide]]
url = "two.jpg"
"#,
        )
        .unwrap();
        let mut engine = Lightbox::from_manifest(&manifest).unwrap();
        assert_eq!(engine.gallery().count(), 2);
        engine.open(None).unwrap();
        assert_eq!(engine.counter(), None);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let mut engine = image_engine(1);
        let err = engine.add(MediaSource::url("photo-0.jpg")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateSource(_)));
        assert_eq!(engine.gallery().count(), 1);
    }

    #[test]
    fn reset_closes_and_empties() {
        let mut engine = image_engine(3);
        engine.open(Some(1)).unwrap();
        engine.reset();
        assert!(!engine.is_open());
        assert_eq!(engine.gallery().count(), 0);
        assert!(matches!(engine.open(None), Err(EngineError::EmptyGallery)));
    }

    #[test]
    fn scrollbar_hidden_only_while_open() {
        let mut engine = image_engine(1);
        assert!(!engine.scrollbar_hidden());
        engine.open(None).unwrap();
        assert!(engine.scrollbar_hidden());
        engine.close().unwrap();
        assert!(!engine.scrollbar_hidden());
    }

    #[test]
    fn invalid_options_are_rejected_at_construction() {
        let options = Options {
            drag_threshold_px: 0.0,
            ..Options::default()
        };
        assert!(matches!(
            Lightbox::new(options),
            Err(EngineError::Options(_))
        ));
    }
}
