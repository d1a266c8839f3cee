//! Viewer options and their defaults.
//!
//! Field names and defaults follow the original lightbox contract: captions
//! sourced from alt text, touch-dependent navigation buttons, a 20px drag
//! threshold, and swipe-to-close enabled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to parse options: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("drag-threshold-px must be finite and positive, got {0}")]
    InvalidThreshold(f64),
}

/// Where a slide's caption text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionSource {
    /// The caption declared on the source itself.
    #[serde(rename = "self")]
    SelfCaption,
    /// The source's alternate text.
    #[serde(rename = "alternate-text")]
    AltText,
}

/// When the prev/next buttons are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationVisibility {
    Always,
    Never,
    /// Shown on pointer-driven devices, hidden when touch is the primary
    /// input (swiping replaces the buttons there).
    TouchDependent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Options {
    pub captions: bool,
    pub caption_source: CaptionSource,
    pub navigation_visibility: NavigationVisibility,
    pub counter_visible: bool,
    pub close_visible: bool,
    pub keyboard_enabled: bool,
    pub click_outside_closes: bool,
    pub swipe_to_close: bool,
    pub draggable: bool,
    pub drag_threshold_px: f64,
    pub autoplay_video: bool,
    pub hide_scrollbar_while_open: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            captions: true,
            caption_source: CaptionSource::AltText,
            navigation_visibility: NavigationVisibility::TouchDependent,
            counter_visible: true,
            close_visible: true,
            keyboard_enabled: true,
            click_outside_closes: true,
            swipe_to_close: true,
            draggable: true,
            drag_threshold_px: 20.0,
            autoplay_video: false,
            hide_scrollbar_while_open: true,
        }
    }
}

impl Options {
    pub fn from_toml_str(input: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.drag_threshold_px.is_finite() || self.drag_threshold_px <= 0.0 {
            return Err(OptionsError::InvalidThreshold(self.drag_threshold_px));
        }
        Ok(())
    }
}
