//! Inline handler: copies an in-page fragment into the slide.

use crate::handler::{MediaContext, MediaHandler};
use crate::surface::{InlineContent, MediaContent, Surface};
use crate::MediaError;
use lightbox_schema::{MediaKind, MediaSource, SourceTarget};
use tracing::debug;

/// Claims sources explicitly tagged `inline`, or any untagged fragment
/// target (a selector can only mean in-page content).
pub struct InlineHandler;

impl MediaHandler for InlineHandler {
    fn kind(&self) -> MediaKind {
        MediaKind::Inline
    }

    fn detect(&self, source: &MediaSource) -> bool {
        match source.kind {
            Some(kind) => kind == MediaKind::Inline,
            None => matches!(source.target, SourceTarget::Fragment(_)),
        }
    }

    fn initialize(
        &self,
        source: &MediaSource,
        surface: &mut Surface,
        ctx: &mut MediaContext<'_>,
    ) -> Result<(), MediaError> {
        let SourceTarget::Fragment(selector) = &source.target else {
            return Err(MediaError::InvalidTarget {
                kind: MediaKind::Inline,
                detail: "inline sources must point at a fragment selector".to_owned(),
            });
        };
        let Some(fragment) = ctx.fragments.resolve(selector) else {
            return Err(MediaError::UnresolvedTarget(selector.clone()));
        };
        surface.content = Some(MediaContent::Inline(InlineContent {
            selector: selector.clone(),
            html: fragment.html,
            has_video: fragment.has_video,
            video_playing: false,
            resume_at: 0.0,
        }));
        Ok(())
    }

    fn load(&self, surface: &mut Surface, ctx: &mut MediaContext<'_>) {
        if let Some(inline) = surface.as_inline_mut() {
            if inline.has_video && ctx.autoplay_video {
                debug!(selector = %inline.selector, resume_at = inline.resume_at, "resuming inline video");
                inline.video_playing = true;
            }
        }
    }

    fn leave(&self, surface: &mut Surface) {
        // Pause, keep the playback position: a returning user resumes.
        if let Some(inline) = surface.as_inline_mut() {
            inline.video_playing = false;
        }
    }

    fn cleanup(&self, surface: &mut Surface) {
        // The fragment copy itself is light; release means stopping the
        // embedded video and forgetting its position.
        if let Some(inline) = surface.as_inline_mut() {
            inline.video_playing = false;
            inline.resume_at = 0.0;
        }
        surface.faded_in = false;
    }
}
