//! Slide lifecycle state machine.
//!
//! Every slide moves through a fixed set of states. `Leave` pairs with a
//! later `Load` (suspend is resumable); `CleanedUp` is a one-way release,
//! re-entered only by re-acquiring resources through `Preloaded`/`Loaded`
//! when the user navigates back.

use crate::EngineError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideLifecycle {
    /// Registered, surface built, no resources acquired.
    Uninitialized,
    Preloaded,
    Loaded,
    /// Suspended but resumable; playback positions survive.
    Left,
    CleanedUp,
}

impl SlideLifecycle {
    /// Whether the slide currently holds resources. The engine bounds the
    /// number of hot slides to the current one plus its neighbors.
    pub fn is_hot(self) -> bool {
        matches!(self, Self::Preloaded | Self::Loaded | Self::Left)
    }
}

impl fmt::Display for SlideLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Preloaded => "preloaded",
            Self::Loaded => "loaded",
            Self::Left => "left",
            Self::CleanedUp => "cleaned-up",
        };
        f.write_str(s)
    }
}

pub fn validate_transition(from: SlideLifecycle, to: SlideLifecycle) -> Result<(), EngineError> {
    use SlideLifecycle::{CleanedUp, Left, Loaded, Preloaded, Uninitialized};

    let valid = matches!(
        (from, to),
        // preload is idempotent and may re-acquire after cleanup
        (Uninitialized | Preloaded | CleanedUp, Preloaded)
            | (Uninitialized | Preloaded | Left | CleanedUp, Loaded)
            | (Loaded, Left)
            | (Preloaded | Left, CleanedUp)
    );

    if valid {
        Ok(())
    } else {
        Err(EngineError::InvalidLifecycle { from, to })
    }
}
