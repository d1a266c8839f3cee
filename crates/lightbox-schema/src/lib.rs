//! Source descriptors, gallery manifest parsing, options, and identity
//! hashing for the Lightbox engine.
//!
//! This crate owns everything the engine needs to know about a gallery
//! before any slide exists: what each source points at, which media kind
//! claims it, how the viewer is configured, and the content-derived
//! identity used to reject duplicate registrations.

pub mod identity;
pub mod options;
pub mod source;
pub mod types;

pub use identity::{compute_source_id, SourceIdentity, SHORT_ID_LEN};
pub use options::{CaptionSource, NavigationVisibility, Options, OptionsError};
pub use source::{
    parse_manifest_file, parse_manifest_str, GalleryManifest, MediaKind, MediaSource, SlideEntry,
    SourceError, SourceTarget,
};
pub use types::{ShortId, SourceId};
