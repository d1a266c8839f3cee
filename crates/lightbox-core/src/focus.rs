//! The modal focus trap.
//!
//! While the overlay is open, focus cycles through the currently *enabled*
//! controls only — a disabled "next" at the last slide is out of the cycle,
//! not merely skipped. The externally focused element is captured at open
//! and restored at close; a target that has since left the document makes
//! the restore a silent no-op.

use std::fmt;

/// Overlay controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prev,
    Next,
    Close,
}

/// Direction of the navigation step just taken, used as a focus hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Left,
    Right,
}

/// Opaque token naming an element outside the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget(String);

impl FocusTarget {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The embedder's view of page focus. `try_focus` returns false when the
/// target no longer exists; the engine treats that as a no-op.
pub trait FocusHost: Send + Sync {
    fn active_focus(&self) -> Option<FocusTarget>;
    fn try_focus(&mut self, target: &FocusTarget) -> bool;
}

/// Host for pages with no focus integration.
pub struct NullFocusHost;

impl FocusHost for NullFocusHost {
    fn active_focus(&self) -> Option<FocusTarget> {
        None
    }

    fn try_focus(&mut self, _target: &FocusTarget) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct FocusManager {
    prior: Option<FocusTarget>,
    enabled: Vec<Control>,
    focused: Option<Control>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<Control> {
        self.focused
    }

    pub fn enabled(&self) -> &[Control] {
        &self.enabled
    }

    pub fn first(&self) -> Option<Control> {
        self.enabled.first().copied()
    }

    pub fn last(&self) -> Option<Control> {
        self.enabled.last().copied()
    }

    /// Capture the externally focused element at open time.
    pub fn on_open(&mut self, prior: Option<FocusTarget>) {
        self.prior = prior;
        self.focused = None;
    }

    /// Install the new enabled set and move focus to the default control:
    /// the button matching the direction just taken, falling back next →
    /// prev → close when disabled.
    pub fn recompute(&mut self, enabled: Vec<Control>, hint: Option<NavDirection>) {
        self.enabled = enabled;
        let has = |c: Control| self.enabled.contains(&c);

        let preferred = match hint {
            Some(NavDirection::Left) => [Control::Prev, Control::Next],
            // No hint prefers "next", like a fresh open.
            Some(NavDirection::Right) | None => [Control::Next, Control::Prev],
        };
        self.focused = preferred
            .into_iter()
            .find(|&c| has(c))
            .or_else(|| has(Control::Close).then_some(Control::Close));
    }

    /// Update the enabled set without stealing focus (used when slides are
    /// added while open). Focus moves only if its control got disabled.
    pub fn sync_enabled(&mut self, enabled: Vec<Control>) {
        self.enabled = enabled;
        if let Some(current) = self.focused {
            if !self.enabled.contains(&current) {
                self.focused = self.first();
            }
        }
    }

    /// Step the tab cycle. Forward wraps last → first; shift+tab at the
    /// first control wraps to the last. Disabled controls are not in the
    /// cycle at all.
    pub fn on_tab(&mut self, shift: bool) -> Option<Control> {
        if self.enabled.is_empty() {
            self.focused = None;
            return None;
        }
        let len = self.enabled.len();
        let position = self
            .focused
            .and_then(|c| self.enabled.iter().position(|&e| e == c));
        let index = match (position, shift) {
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
            (None, false) => 0,
            (None, true) => len - 1,
        };
        self.focused = Some(self.enabled[index]);
        self.focused
    }

    /// Surrender the trap, returning the captured pre-open target. Always
    /// returns whatever was captured; the caller attempts the restore and
    /// ignores a missing element.
    pub fn on_close(&mut self) -> Option<FocusTarget> {
        self.enabled.clear();
        self.focused = None;
        self.prior.take()
    }
}
