//! Carousel engine for the Lightbox viewer.
//!
//! This crate ties together source descriptors, media handlers, and the
//! navigation state machine into [`Lightbox`] — the central API for opening,
//! closing, and navigating a gallery of heterogeneous media slides. It also
//! provides the drag/swipe gesture engine, the modal focus trap, the input
//! event coordinator, and slide lifecycle validation.

pub mod drag;
pub mod engine;
pub mod focus;
pub mod gallery;
pub mod input;
pub mod lifecycle;

pub use drag::{Axis, DragEngine, DragOutcome, GestureEnv, TrackDelta};
pub use engine::{EngineEvent, Lightbox, MediaLoadOutcome, NavigationState};
pub use focus::{Control, FocusHost, FocusManager, FocusTarget, NavDirection, NullFocusHost};
pub use gallery::{Gallery, Slide};
pub use input::{Hit, InputBindings, InputEvent, Key};
pub use lifecycle::{validate_transition, SlideLifecycle};

use lightbox_schema::ShortId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("source error: {0}")]
    Source(#[from] lightbox_schema::SourceError),
    #[error("options error: {0}")]
    Options(#[from] lightbox_schema::OptionsError),
    #[error("media error: {0}")]
    Media(#[from] lightbox_media::MediaError),
    #[error("source already registered: {0}")]
    DuplicateSource(ShortId),
    #[error("slide index {index} out of range (gallery has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot open an empty gallery")]
    EmptyGallery,
    #[error("overlay is already open at this index")]
    AlreadyOpen,
    #[error("overlay is not open")]
    AlreadyClosed,
    #[error("no active slide: overlay is closed")]
    NoActiveSlide,
    #[error("a navigation transition is already in progress")]
    TransitionInProgress,
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidLifecycle {
        from: SlideLifecycle,
        to: SlideLifecycle,
    },
}
