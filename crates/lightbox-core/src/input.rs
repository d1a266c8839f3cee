//! Input event coordination.
//!
//! The embedder translates platform events into [`InputEvent`]s and feeds
//! them to the engine. Bindings follow the overlay: installed at open,
//! removed at close, so a closed overlay accepts nothing. Resize events
//! are coalesced and applied once per frame.

use lightbox_schema::Options;
use tracing::debug;

/// Keys the engine responds to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab { shift: bool },
    Escape,
    ArrowLeft,
    ArrowRight,
}

/// What a pointer event landed on, as classified by the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    PrevButton,
    NextButton,
    CloseButton,
    /// The dimmed area outside the slide content.
    Backdrop,
    Slide,
    /// An interactive element inside a slide (input, textarea, select).
    FormControl,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    PointerDown { x: f64, y: f64, hit: Hit },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Click(Hit),
    Resize { width: f64 },
}

/// The set of event classes currently bound, mirroring the option flags
/// captured at open time.
#[derive(Debug, Default)]
pub struct InputBindings {
    bound: bool,
    keyboard: bool,
    pointer: bool,
    click: bool,
    click_outside: bool,
    pending_resize: Option<f64>,
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Install bindings per the options in force at open time.
    pub fn bind(&mut self, options: &Options) {
        self.bound = true;
        self.keyboard = options.keyboard_enabled;
        self.pointer = options.draggable;
        self.click = true;
        self.click_outside = options.click_outside_closes;
        debug!(
            keyboard = self.keyboard,
            pointer = self.pointer,
            click_outside = self.click_outside,
            "input bound"
        );
    }

    /// Remove every binding. Pending resize state is dropped with them.
    pub fn unbind(&mut self) {
        *self = Self::default();
        debug!("input unbound");
    }

    /// Whether the event passes the current bindings. Events refused here
    /// must have no effect at all on the engine.
    pub fn accepts(&self, event: &InputEvent) -> bool {
        if !self.bound {
            return false;
        }
        match event {
            InputEvent::Key(_) => self.keyboard,
            InputEvent::PointerDown { .. } | InputEvent::PointerMove { .. } | InputEvent::PointerUp => {
                self.pointer
            }
            InputEvent::Click(Hit::Backdrop) => self.click && self.click_outside,
            InputEvent::Click(_) => self.click,
            InputEvent::Resize { .. } => true,
        }
    }

    /// Record a resize, replacing any earlier unapplied one.
    pub fn queue_resize(&mut self, width: f64) {
        self.pending_resize = Some(width);
    }

    /// Take the latest queued resize, if any.
    pub fn take_resize(&mut self) -> Option<f64> {
        self.pending_resize.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_accepts_nothing() {
        let bindings = InputBindings::new();
        assert!(!bindings.accepts(&InputEvent::Key(Key::Escape)));
        assert!(!bindings.accepts(&InputEvent::Click(Hit::CloseButton)));
        assert!(!bindings.accepts(&InputEvent::Resize { width: 800.0 }));
    }

    #[test]
    fn bind_follows_option_flags() {
        let options = Options {
            keyboard_enabled: false,
            draggable: false,
            ..Options::default()
        };

        let mut bindings = InputBindings::new();
        bindings.bind(&options);

        assert!(!bindings.accepts(&InputEvent::Key(Key::Escape)));
        assert!(!bindings.accepts(&InputEvent::PointerUp));
        assert!(bindings.accepts(&InputEvent::Click(Hit::NextButton)));
    }

    #[test]
    fn backdrop_clicks_gated_separately() {
        let options = Options {
            click_outside_closes: false,
            ..Options::default()
        };

        let mut bindings = InputBindings::new();
        bindings.bind(&options);

        assert!(!bindings.accepts(&InputEvent::Click(Hit::Backdrop)));
        assert!(bindings.accepts(&InputEvent::Click(Hit::CloseButton)));
    }

    #[test]
    fn unbind_restores_the_closed_state() {
        let mut bindings = InputBindings::new();
        bindings.bind(&Options::default());
        bindings.queue_resize(640.0);

        bindings.unbind();
        assert!(!bindings.is_bound());
        assert!(!bindings.accepts(&InputEvent::Key(Key::Escape)));
        assert_eq!(bindings.take_resize(), None);
    }

    #[test]
    fn resize_coalesces_to_the_latest() {
        let mut bindings = InputBindings::new();
        bindings.bind(&Options::default());

        bindings.queue_resize(800.0);
        bindings.queue_resize(1024.0);
        assert_eq!(bindings.take_resize(), Some(1024.0));
        assert_eq!(bindings.take_resize(), None);
    }
}
