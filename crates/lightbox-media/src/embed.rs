//! The embed-SDK ready gate and per-instance player id allocation.
//!
//! Third-party players depend on an SDK the page loads asynchronously.
//! Player requests made before the SDK is ready are queued and flushed
//! exactly once, in original order, when readiness fires; requests after
//! the flush are served immediately. Each engine instance owns its own
//! gate and id pool, so two viewers on one page never share player ids.

use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRequest {
    pub player_id: u32,
    pub video_url: String,
}

#[derive(Debug, Default)]
pub struct EmbedGate {
    ready: bool,
    next_player_id: u32,
    pending: VecDeque<PlayerRequest>,
}

impl EmbedGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Allocate a player id unique within this engine instance.
    pub fn allocate_player(&mut self) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        id
    }

    /// Request a player. Returns true when the SDK is ready and the player
    /// exists now; false when the request was queued for the flush.
    pub fn request(&mut self, request: PlayerRequest) -> bool {
        if self.ready {
            return true;
        }
        debug!(
            player_id = request.player_id,
            "embed SDK not ready, queueing player request"
        );
        self.pending.push_back(request);
        false
    }

    /// Open the gate and drain the queue in original order. A second call
    /// is a no-op returning no requests; the gate never closes again.
    pub fn notify_ready(&mut self) -> Vec<PlayerRequest> {
        if self.ready {
            return Vec::new();
        }
        self.ready = true;
        let flushed: Vec<PlayerRequest> = self.pending.drain(..).collect();
        if !flushed.is_empty() {
            debug!(count = flushed.len(), "embed SDK ready, flushing player requests");
        }
        flushed
    }
}
