//! Recording wrapper for lifecycle hooks, used by engine tests and the
//! stress binary to assert call sequences without real media.

use crate::handler::{MediaContext, MediaHandler};
use crate::surface::Surface;
use crate::MediaError;
use lightbox_schema::{MediaKind, MediaSource};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Initialize,
    Preload,
    Load,
    Leave,
    Cleanup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRecord {
    pub hook: Hook,
    pub target: Option<String>,
}

/// Shared, clonable log of hook invocations.
#[derive(Debug, Clone, Default)]
pub struct HookLog(Arc<Mutex<Vec<HookRecord>>>);

impl HookLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, hook: Hook, target: Option<String>) {
        if let Ok(mut records) = self.0.lock() {
            records.push(HookRecord { hook, target });
        }
    }

    pub fn records(&self) -> Vec<HookRecord> {
        self.0.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.0.lock() {
            records.clear();
        }
    }

    pub fn count_of(&self, hook: Hook) -> usize {
        self.records().iter().filter(|r| r.hook == hook).count()
    }

    /// Hooks recorded against a target, in call order.
    pub fn hooks_for(&self, target: &str) -> Vec<Hook> {
        self.records()
            .iter()
            .filter(|r| r.target.as_deref() == Some(target))
            .map(|r| r.hook)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Delegates every call to the wrapped handler, recording it first.
pub struct ProbeHandler {
    inner: Box<dyn MediaHandler>,
    log: HookLog,
}

impl ProbeHandler {
    pub fn new(inner: Box<dyn MediaHandler>, log: HookLog) -> Self {
        Self { inner, log }
    }

    /// The built-in handler set, each wrapped with the same log.
    pub fn wrap_builtin(log: &HookLog) -> Vec<Box<dyn MediaHandler>> {
        crate::handler::builtin_handlers()
            .into_iter()
            .map(|inner| Box::new(Self::new(inner, log.clone())) as Box<dyn MediaHandler>)
            .collect()
    }
}

impl MediaHandler for ProbeHandler {
    fn kind(&self) -> MediaKind {
        self.inner.kind()
    }

    fn detect(&self, source: &MediaSource) -> bool {
        self.inner.detect(source)
    }

    fn initialize(
        &self,
        source: &MediaSource,
        surface: &mut Surface,
        ctx: &mut MediaContext<'_>,
    ) -> Result<(), MediaError> {
        self.log
            .push(Hook::Initialize, Some(source.target.as_str().to_owned()));
        self.inner.initialize(source, surface, ctx)
    }

    fn preload(&self, surface: &mut Surface) {
        self.log
            .push(Hook::Preload, surface.target_hint().map(str::to_owned));
        self.inner.preload(surface);
    }

    fn load(&self, surface: &mut Surface, ctx: &mut MediaContext<'_>) {
        self.log
            .push(Hook::Load, surface.target_hint().map(str::to_owned));
        self.inner.load(surface, ctx);
    }

    fn leave(&self, surface: &mut Surface) {
        self.log
            .push(Hook::Leave, surface.target_hint().map(str::to_owned));
        self.inner.leave(surface);
    }

    fn cleanup(&self, surface: &mut Surface) {
        self.log
            .push(Hook::Cleanup, surface.target_hint().map(str::to_owned));
        self.inner.cleanup(surface);
    }
}
