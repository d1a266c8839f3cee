//! The media handler contract and detection priority.
//!
//! Each media kind implements [`MediaHandler`]: a `detect` predicate asked
//! once at registration, plus the five lifecycle hooks. Detection walks
//! [`builtin_handlers`] in a fixed priority order — video, iframe, inline,
//! image — so the explicit-kind handlers always claim a source before the
//! generic image fallback. First match wins.

use crate::embed::EmbedGate;
use crate::MediaError;
use lightbox_schema::{CaptionSource, MediaKind, MediaSource};

use crate::surface::Surface;

/// A resolved in-page fragment, as returned by the embedder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFragment {
    pub html: String,
    /// Whether the fragment contains a video element the inline handler
    /// must pause on leave.
    pub has_video: bool,
}

/// Resolves fragment selectors against the host page. The engine never
/// touches a real document; the embedder supplies this.
pub trait FragmentResolver: Send + Sync {
    fn resolve(&self, selector: &str) -> Option<ResolvedFragment>;
}

/// A resolver for pages without inline content; every lookup misses.
pub struct NoFragments;

impl FragmentResolver for NoFragments {
    fn resolve(&self, _selector: &str) -> Option<ResolvedFragment> {
        None
    }
}

/// Per-instance services handed to lifecycle hooks. Owned by one engine
/// instance; two viewers on the same page share nothing through it.
pub struct MediaContext<'a> {
    pub fragments: &'a dyn FragmentResolver,
    pub embed: &'a mut EmbedGate,
    pub captions: bool,
    pub caption_source: CaptionSource,
    pub autoplay_video: bool,
}

impl MediaContext<'_> {
    /// Caption text for a source under the current caption configuration.
    pub fn caption_for(&self, source: &MediaSource) -> Option<String> {
        if !self.captions {
            return None;
        }
        match self.caption_source {
            CaptionSource::SelfCaption => source.caption.clone(),
            CaptionSource::AltText => source.alt_text.clone(),
        }
    }
}

pub trait MediaHandler: Send + Sync {
    fn kind(&self) -> MediaKind;

    /// Pure, total, side-effect-free; called once per source at
    /// registration.
    fn detect(&self, source: &MediaSource) -> bool;

    /// Build the slide's internal representation on the surface.
    fn initialize(
        &self,
        source: &MediaSource,
        surface: &mut Surface,
        ctx: &mut MediaContext<'_>,
    ) -> Result<(), MediaError>;

    /// Idempotent warm-up for a not-yet-visible slide. Default no-op:
    /// heavy or stateful media must not be primed off-screen.
    fn preload(&self, _surface: &mut Surface) {}

    /// Make the media visible/active.
    fn load(&self, surface: &mut Surface, ctx: &mut MediaContext<'_>);

    /// Suspend without discarding state; always resumable by a later
    /// `load`. Default no-op.
    fn leave(&self, _surface: &mut Surface) {}

    /// One-way release of heavy resources.
    fn cleanup(&self, surface: &mut Surface);
}

/// The built-in handler set, in detection priority order.
pub fn builtin_handlers() -> Vec<Box<dyn MediaHandler>> {
    vec![
        Box::new(crate::video::VideoHandler),
        Box::new(crate::iframe::IframeHandler),
        Box::new(crate::inline::InlineHandler),
        Box::new(crate::image::ImageHandler),
    ]
}

/// First handler claiming the source, walking the list in order.
pub fn handler_for<'a>(
    handlers: &'a [Box<dyn MediaHandler>],
    source: &MediaSource,
) -> Option<&'a dyn MediaHandler> {
    handlers
        .iter()
        .find(|h| h.detect(source))
        .map(Box::as_ref)
}

/// Handler for an already-detected kind, used for lifecycle dispatch.
pub fn handler_for_kind<'a>(
    handlers: &'a [Box<dyn MediaHandler>],
    kind: MediaKind,
) -> Option<&'a dyn MediaHandler> {
    handlers
        .iter()
        .find(|h| h.kind() == kind)
        .map(Box::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        let handlers = builtin_handlers();
        let kinds: Vec<MediaKind> = handlers.iter().map(|h| h.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                MediaKind::Video,
                MediaKind::Iframe,
                MediaKind::Inline,
                MediaKind::Image
            ]
        );
    }

    #[test]
    fn explicit_kind_claims_before_image_fallback() {
        let handlers = builtin_handlers();
        // An image-looking URL with an explicit video tag must go to the
        // video handler.
        let source = MediaSource::url("clip.png").with_kind(MediaKind::Video);
        let handler = handler_for(&handlers, &source).unwrap();
        assert_eq!(handler.kind(), MediaKind::Video);
    }

    #[test]
    fn untagged_image_url_falls_through_to_image() {
        let handlers = builtin_handlers();
        let handler = handler_for(&handlers, &MediaSource::url("photo.webp")).unwrap();
        assert_eq!(handler.kind(), MediaKind::Image);
    }

    #[test]
    fn untagged_fragment_goes_to_inline() {
        let handlers = builtin_handlers();
        let handler = handler_for(&handlers, &MediaSource::fragment("#bio")).unwrap();
        assert_eq!(handler.kind(), MediaKind::Inline);
    }

    #[test]
    fn undetectable_source_matches_nothing() {
        let handlers = builtin_handlers();
        assert!(handler_for(&handlers, &MediaSource::url("plain/file.mp4")).is_none());
    }

    #[test]
    fn caption_selection_follows_config() {
        let mut embed = EmbedGate::new();
        let source = MediaSource::url("a.jpg")
            .with_alt_text("Alt")
            .with_caption("Caption");

        let ctx = MediaContext {
            fragments: &NoFragments,
            embed: &mut embed,
            captions: true,
            caption_source: CaptionSource::AltText,
            autoplay_video: false,
        };
        assert_eq!(ctx.caption_for(&source).as_deref(), Some("Alt"));

        let mut embed = EmbedGate::new();
        let ctx = MediaContext {
            fragments: &NoFragments,
            embed: &mut embed,
            captions: false,
            caption_source: CaptionSource::SelfCaption,
            autoplay_video: false,
        };
        assert_eq!(ctx.caption_for(&source), None);
    }
}
