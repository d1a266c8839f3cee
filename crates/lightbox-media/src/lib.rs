//! Media handler plugins, slide surfaces, and host integration for the
//! Lightbox engine.
//!
//! Each media kind (image, iframe, inline fragment, third-party video)
//! implements the [`MediaHandler`] lifecycle contract: detect, initialize,
//! preload, load, leave, cleanup. The [`Surface`] is the headless stand-in
//! for the slide's DOM subtree, and the [`EmbedGate`] queues third-party
//! player requests until the page has loaded the embed SDK.

pub mod embed;
pub mod handler;
pub mod iframe;
pub mod image;
pub mod inline;
pub mod probe;
pub mod surface;
pub mod video;

pub use embed::{EmbedGate, PlayerRequest};
pub use handler::{
    builtin_handlers, handler_for, handler_for_kind, FragmentResolver, MediaContext, MediaHandler,
    NoFragments, ResolvedFragment,
};
pub use iframe::IframeHandler;
pub use image::ImageHandler;
pub use inline::InlineHandler;
pub use probe::{Hook, HookLog, HookRecord, ProbeHandler};
pub use surface::{
    FetchState, FrameContent, ImageContent, InlineContent, MediaContent, PlayerContent, Surface,
};
pub use video::VideoHandler;

use lightbox_schema::MediaKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot resolve target '{0}' in the page")]
    UnresolvedTarget(String),
    #[error("no handler claims source '{0}'")]
    UnsupportedSource(String),
    #[error("invalid target for {kind} media: {detail}")]
    InvalidTarget { kind: MediaKind, detail: String },
}
