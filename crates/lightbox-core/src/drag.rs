//! The drag/swipe gesture engine.
//!
//! Interprets a stream of pointer samples between pointer-down and
//! pointer-up into axis-locked live translation and a final commit
//! decision. The commit rule depends only on total displacement at
//! release, never on velocity, so identical gestures always produce
//! identical outcomes.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    None,
    /// Navigation axis: live-translates the slider track.
    Horizontal,
    /// Dismiss axis.
    Vertical,
}

/// Gesture context captured at pointer-down. The environment is frozen for
/// the whole gesture; a mid-gesture option change affects the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEnv {
    pub threshold: f64,
    pub horizontal_enabled: bool,
    pub dismiss_enabled: bool,
    pub slide_count: usize,
    pub current: usize,
}

/// Live translation along the locked axis, relative to gesture start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackDelta {
    pub axis: Axis,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Prev,
    Next,
    Dismiss,
    /// Below threshold or no eligible navigation: restore the pre-gesture
    /// offset.
    SnapBack,
    /// The gesture never engaged (single slide, form control, or no
    /// pointer-down).
    Ignored,
}

#[derive(Debug, Default)]
struct DragState {
    active: bool,
    ignored: bool,
    start_x: f64,
    start_y: f64,
    current_x: f64,
    current_y: f64,
    axis: Axis,
    env: Option<GestureEnv>,
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.active && !self.state.ignored
    }

    pub fn axis(&self) -> Axis {
        self.state.axis
    }

    /// Start a gesture. Gestures over form controls and in single-slide
    /// galleries are ignored entirely: no translation, no commit.
    pub fn begin(&mut self, x: f64, y: f64, over_form_control: bool, env: GestureEnv) {
        self.state = DragState {
            active: true,
            ignored: over_form_control || env.slide_count <= 1,
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
            axis: Axis::None,
            env: Some(env),
        };
    }

    /// Feed one pointer sample. Returns the live translation along the
    /// locked axis, or `None` before the axis locks (and always for
    /// ignored gestures).
    pub fn sample(&mut self, x: f64, y: f64) -> Option<TrackDelta> {
        let s = &mut self.state;
        if !s.active || s.ignored {
            return None;
        }
        s.current_x = x;
        s.current_y = y;

        let dx = s.current_x - s.start_x;
        let dy = s.current_y - s.start_y;

        if s.axis == Axis::None && (dx != 0.0 || dy != 0.0) {
            let horizontal = s.env.is_some_and(|e| e.horizontal_enabled);
            s.axis = if dx != 0.0 && horizontal {
                Axis::Horizontal
            } else {
                Axis::Vertical
            };
            debug!(axis = ?s.axis, "axis locked");
        }

        match s.axis {
            Axis::Horizontal => Some(TrackDelta {
                axis: Axis::Horizontal,
                delta: dx,
            }),
            Axis::Vertical => Some(TrackDelta {
                axis: Axis::Vertical,
                delta: dy,
            }),
            Axis::None => None,
        }
    }

    /// End the gesture and decide. State is zeroed regardless of outcome;
    /// no cross-gesture memory survives.
    pub fn release(&mut self) -> DragOutcome {
        let s = std::mem::take(&mut self.state);
        if !s.active || s.ignored {
            return DragOutcome::Ignored;
        }
        let Some(env) = s.env else {
            return DragOutcome::Ignored;
        };

        let movement_x = s.current_x - s.start_x;
        let movement_y = s.current_y - s.start_y;

        match s.axis {
            Axis::Horizontal => {
                // Dragging right exposes the previous slide.
                if movement_x > env.threshold && env.current > 0 {
                    DragOutcome::Prev
                } else if movement_x < -env.threshold && env.current + 1 < env.slide_count {
                    DragOutcome::Next
                } else {
                    DragOutcome::SnapBack
                }
            }
            Axis::Vertical => {
                if movement_y.abs() > env.threshold && env.dismiss_enabled {
                    DragOutcome::Dismiss
                } else {
                    DragOutcome::SnapBack
                }
            }
            Axis::None => DragOutcome::SnapBack,
        }
    }
}
