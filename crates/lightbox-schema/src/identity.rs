//! Source identity hashing.
//!
//! Every registered source gets a content-derived identity: the blake3 hash
//! of its canonical target string. The gallery uses the full id as the dedup
//! key and the 12-character short id for display and logs.

use crate::source::MediaSource;
use crate::types::{ShortId, SourceId};

pub const SHORT_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    pub id: SourceId,
    pub short_id: ShortId,
}

/// Compute the identity of a source from its canonical target.
///
/// Identity is target-only: two sources pointing at the same URL are the
/// same gallery member even if their captions differ.
pub fn compute_source_id(source: &MediaSource) -> SourceIdentity {
    let hex = blake3::hash(source.canonical_target().as_bytes())
        .to_hex()
        .to_string();
    let short_id = ShortId::new(&hex[..SHORT_ID_LEN]);
    SourceIdentity {
        id: SourceId::new(hex),
        short_id,
    }
}
