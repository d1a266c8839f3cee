//! Image handler: deferred-src images with asynchronous fetch completion.

use crate::handler::{MediaContext, MediaHandler};
use crate::surface::{FetchState, ImageContent, MediaContent, Surface};
use crate::MediaError;
use lightbox_schema::{MediaKind, MediaSource, SourceTarget};
use tracing::debug;

/// The generic fallback: claims an explicit `image` tag, or any untagged
/// URL matching the image extension pattern. Last in the priority list.
pub struct ImageHandler;

impl MediaHandler for ImageHandler {
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    fn detect(&self, source: &MediaSource) -> bool {
        match source.kind {
            Some(kind) => kind == MediaKind::Image,
            None => source.matches_image_extension(),
        }
    }

    fn initialize(
        &self,
        source: &MediaSource,
        surface: &mut Surface,
        ctx: &mut MediaContext<'_>,
    ) -> Result<(), MediaError> {
        let SourceTarget::Url(url) = &source.target else {
            return Err(MediaError::InvalidTarget {
                kind: MediaKind::Image,
                detail: "image sources must point at a URL".to_owned(),
            });
        };
        surface.content = Some(MediaContent::Image(ImageContent {
            src: url.clone(),
            alt: source.alt_text.clone().unwrap_or_default(),
            caption: ctx.caption_for(source),
            fetch: FetchState::Deferred,
        }));
        Ok(())
    }

    // Images are cheap to warm up: preload does the same work as load.
    fn preload(&self, surface: &mut Surface) {
        start_fetch(surface);
    }

    fn load(&self, surface: &mut Surface, _ctx: &mut MediaContext<'_>) {
        start_fetch(surface);
    }

    fn cleanup(&self, surface: &mut Surface) {
        // Aborts an in-flight fetch and drops decoded bytes by falling
        // back to the deferred state; the src survives for a later reload.
        if let Some(image) = surface.as_image_mut() {
            if image.fetch != FetchState::Deferred {
                debug!(src = %image.src, "releasing image fetch");
            }
            image.fetch = FetchState::Deferred;
        }
        surface.faded_in = false;
    }
}

/// Idempotent: a fetch already pending, complete, or failed is left alone.
fn start_fetch(surface: &mut Surface) {
    if let Some(image) = surface.as_image_mut() {
        if image.fetch == FetchState::Deferred {
            image.fetch = FetchState::Pending;
        }
    }
}
