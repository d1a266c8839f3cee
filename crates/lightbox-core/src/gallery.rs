//! The gallery registry: ordered, deduplicated slides.
//!
//! The gallery exclusively owns every [`Slide`] and its surface. A slide is
//! created exactly once per source at registration and destroyed only when
//! the gallery itself is reset.

use crate::lifecycle::SlideLifecycle;
use crate::EngineError;
use lightbox_media::{handler_for, MediaContext, MediaHandler, Surface};
use lightbox_schema::{compute_source_id, MediaKind, MediaSource, ShortId, SourceId};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug)]
pub struct Slide {
    pub id: SourceId,
    pub short_id: ShortId,
    pub kind: MediaKind,
    pub lifecycle: SlideLifecycle,
    pub surface: Surface,
    pub source: MediaSource,
}

#[derive(Default)]
pub struct Gallery {
    slides: Vec<Slide>,
    by_id: HashMap<SourceId, usize>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    pub fn index_of(&self, id: &SourceId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, source: &MediaSource) -> bool {
        let identity = compute_source_id(source);
        self.by_id.contains_key(&identity.id)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Register a source: resolve its handler by priority, build the slide
    /// surface, and append. The gallery is left untouched on any failure —
    /// a duplicate source, an unclaimed source, or a failed initialize.
    pub fn register(
        &mut self,
        source: MediaSource,
        handlers: &[Box<dyn MediaHandler>],
        ctx: &mut MediaContext<'_>,
    ) -> Result<usize, EngineError> {
        let identity = compute_source_id(&source);
        if self.by_id.contains_key(&identity.id) {
            return Err(EngineError::DuplicateSource(identity.short_id));
        }

        let handler = handler_for(handlers, &source).ok_or_else(|| {
            EngineError::Media(lightbox_media::MediaError::UnsupportedSource(
                source.canonical_target(),
            ))
        })?;

        let mut surface = Surface::new();
        handler.initialize(&source, &mut surface, ctx)?;

        let index = self.slides.len();
        debug!(
            short_id = %identity.short_id,
            kind = %handler.kind(),
            index,
            "registered slide"
        );
        self.by_id.insert(identity.id.clone(), index);
        self.slides.push(Slide {
            id: identity.id,
            short_id: identity.short_id,
            kind: handler.kind(),
            lifecycle: SlideLifecycle::Uninitialized,
            surface,
            source,
        });
        Ok(index)
    }

    /// Release every slide's resources and drop the collection.
    pub fn reset(&mut self, handlers: &[Box<dyn MediaHandler>]) {
        for slide in &mut self.slides {
            if slide.lifecycle == SlideLifecycle::CleanedUp {
                continue;
            }
            if let Some(handler) = lightbox_media::handler_for_kind(handlers, slide.kind) {
                handler.cleanup(&mut slide.surface);
            }
            slide.lifecycle = SlideLifecycle::CleanedUp;
        }
        self.slides.clear();
        self.by_id.clear();
    }
}
