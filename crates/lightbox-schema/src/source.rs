//! Media source descriptors and the gallery manifest.
//!
//! A gallery is registered from an ordered list of [`MediaSource`] values,
//! each pointing at a URL or an in-page fragment. Sources can carry an
//! explicit kind tag; untagged URL sources fall back to the image
//! file-extension pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::Options;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read gallery manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse gallery manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported manifest_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("slide {index}: neither url nor fragment given")]
    EmptyTarget { index: usize },
    #[error("slide {index}: url and fragment are mutually exclusive")]
    BothTargets { index: usize },
}

/// The closed set of media kinds the engine knows how to present.
///
/// Detection walks handlers in the fixed priority order video, iframe,
/// inline, image — explicit kinds claim a source before the generic image
/// fallback ever sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Iframe,
    Inline,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Image => "image",
            Self::Iframe => "iframe",
            Self::Inline => "inline",
            Self::Video => "video",
        };
        f.write_str(s)
    }
}

/// Where a source's content lives: an external URL, or a selector naming
/// an in-page fragment (inline kind only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTarget {
    Url(String),
    Fragment(String),
}

impl SourceTarget {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::Fragment(s) => s,
        }
    }
}

/// One gallery member as handed to the engine at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub target: SourceTarget,
    /// Explicit kind tag. When absent the source is claimed by the image
    /// handler if the URL matches the extension pattern, or by the inline
    /// handler if the target is a fragment selector.
    pub kind: Option<MediaKind>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
}

/// File extensions the image handler claims when no explicit kind is given.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "tiff", "tif", "gif", "bmp", "webp", "svg", "ico",
];

impl MediaSource {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            target: SourceTarget::Url(url.into()),
            kind: None,
            alt_text: None,
            caption: None,
        }
    }

    pub fn fragment(selector: impl Into<String>) -> Self {
        Self {
            target: SourceTarget::Fragment(selector.into()),
            kind: None,
            alt_text: None,
            caption: None,
        }
    }

    pub fn with_kind(mut self, kind: MediaKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Canonical string form of the target, used for identity hashing.
    /// The scheme prefix keeps a URL and a same-spelled selector distinct.
    pub fn canonical_target(&self) -> String {
        match &self.target {
            SourceTarget::Url(u) => format!("url:{u}"),
            SourceTarget::Fragment(s) => format!("fragment:{s}"),
        }
    }

    /// Whether an untagged URL target matches the image extension pattern.
    /// Query strings and URL fragments are ignored; matching is
    /// case-insensitive.
    pub fn matches_image_extension(&self) -> bool {
        let SourceTarget::Url(url) = &self.target else {
            return false;
        };
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url);
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        IMAGE_EXTENSIONS.contains(&ext.as_str())
    }
}

/// TOML gallery manifest: a `manifest-version`, an ordered `[[slide]]`
/// list, and an optional `[options]` table. Keys are kebab-case, like the
/// options table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GalleryManifest {
    pub manifest_version: u32,
    #[serde(default, rename = "slide")]
    pub slides: Vec<SlideEntry>,
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SlideEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub fragment: Option<String>,
    #[serde(default)]
    pub kind: Option<MediaKind>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl SlideEntry {
    fn to_source(&self, index: usize) -> Result<MediaSource, SourceError> {
        let target = match (&self.url, &self.fragment) {
            (Some(u), None) => SourceTarget::Url(u.clone()),
            (None, Some(s)) => SourceTarget::Fragment(s.clone()),
            (Some(_), Some(_)) => return Err(SourceError::BothTargets { index }),
            (None, None) => return Err(SourceError::EmptyTarget { index }),
        };
        Ok(MediaSource {
            target,
            kind: self.kind,
            alt_text: self.alt.clone(),
            caption: self.caption.clone(),
        })
    }
}

impl GalleryManifest {
    /// Convert the slide entries to [`MediaSource`] values, in manifest order.
    pub fn sources(&self) -> Result<Vec<MediaSource>, SourceError> {
        self.slides
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.to_source(i))
            .collect()
    }
}

pub fn parse_manifest_str(input: &str) -> Result<GalleryManifest, SourceError> {
    let manifest: GalleryManifest = toml::from_str(input)?;
    if manifest.manifest_version != 1 {
        return Err(SourceError::UnsupportedVersion(manifest.manifest_version));
    }
    Ok(manifest)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<GalleryManifest, SourceError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}
