//! The slide surface: a headless stand-in for the slide's DOM subtree.
//!
//! A [`Surface`] holds the per-kind resource handle a handler builds at
//! initialization and mutates through the lifecycle hooks. The engine never
//! inspects kind-specific fields; it only reads the cross-kind flags
//! (`faded_in`, `failed`) and the kind tag.

use lightbox_schema::MediaKind;
use serde::{Deserialize, Serialize};

/// Network fetch progress of an image slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchState {
    /// The src is known but no bytes have been requested.
    Deferred,
    /// Fetch in flight; completion arrives asynchronously.
    Pending,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    pub caption: Option<String>,
    pub fetch: FetchState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameContent {
    pub src: String,
    /// Whether the src is currently mounted. Unmounting drops any
    /// partially buffered content.
    pub mounted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineContent {
    pub selector: String,
    pub html: String,
    pub has_video: bool,
    pub video_playing: bool,
    /// Playback position to resume from, in seconds.
    pub resume_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerContent {
    pub player_id: u32,
    pub video_url: String,
    /// False until the embed SDK has created the player, and again after
    /// cleanup destroys it.
    pub created: bool,
    pub playing: bool,
    pub resume_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaContent {
    Image(ImageContent),
    Frame(FrameContent),
    Inline(InlineContent),
    Player(PlayerContent),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub content: Option<MediaContent>,
    pub faded_in: bool,
    pub failed: bool,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<MediaKind> {
        self.content.as_ref().map(|c| match c {
            MediaContent::Image(_) => MediaKind::Image,
            MediaContent::Frame(_) => MediaKind::Iframe,
            MediaContent::Inline(_) => MediaKind::Inline,
            MediaContent::Player(_) => MediaKind::Video,
        })
    }

    /// A loggable name for what this surface presents.
    pub fn target_hint(&self) -> Option<&str> {
        self.content.as_ref().map(|c| match c {
            MediaContent::Image(i) => i.src.as_str(),
            MediaContent::Frame(f) => f.src.as_str(),
            MediaContent::Inline(h) => h.selector.as_str(),
            MediaContent::Player(p) => p.video_url.as_str(),
        })
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageContent> {
        match self.content.as_mut() {
            Some(MediaContent::Image(i)) => Some(i),
            _ => None,
        }
    }

    pub fn as_frame_mut(&mut self) -> Option<&mut FrameContent> {
        match self.content.as_mut() {
            Some(MediaContent::Frame(f)) => Some(f),
            _ => None,
        }
    }

    pub fn as_inline_mut(&mut self) -> Option<&mut InlineContent> {
        match self.content.as_mut() {
            Some(MediaContent::Inline(h)) => Some(h),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerContent> {
        match self.content.as_mut() {
            Some(MediaContent::Player(p)) => Some(p),
            _ => None,
        }
    }
}
