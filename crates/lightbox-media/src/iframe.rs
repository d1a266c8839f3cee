//! Iframe handler: deferred-src embedded frames.

use crate::handler::{MediaContext, MediaHandler};
use crate::surface::{FrameContent, MediaContent, Surface};
use crate::MediaError;
use lightbox_schema::{MediaKind, MediaSource, SourceTarget};

/// Claims sources explicitly tagged `iframe`. Never detected implicitly.
pub struct IframeHandler;

impl MediaHandler for IframeHandler {
    fn kind(&self) -> MediaKind {
        MediaKind::Iframe
    }

    fn detect(&self, source: &MediaSource) -> bool {
        source.kind == Some(MediaKind::Iframe)
    }

    fn initialize(
        &self,
        source: &MediaSource,
        surface: &mut Surface,
        _ctx: &mut MediaContext<'_>,
    ) -> Result<(), MediaError> {
        let SourceTarget::Url(url) = &source.target else {
            return Err(MediaError::InvalidTarget {
                kind: MediaKind::Iframe,
                detail: "iframe sources must point at a URL".to_owned(),
            });
        };
        surface.content = Some(MediaContent::Frame(FrameContent {
            src: url.clone(),
            mounted: false,
        }));
        Ok(())
    }

    // No preload override: an off-screen frame must not start fetching.

    fn load(&self, surface: &mut Surface, _ctx: &mut MediaContext<'_>) {
        if let Some(frame) = surface.as_frame_mut() {
            frame.mounted = true;
        }
    }

    fn cleanup(&self, surface: &mut Surface) {
        // Unmounting replaces the element, discarding buffered content.
        if let Some(frame) = surface.as_frame_mut() {
            frame.mounted = false;
        }
        surface.faded_in = false;
    }
}
