//! Third-party video handler: players created through the embed gate.

use crate::embed::PlayerRequest;
use crate::handler::{MediaContext, MediaHandler};
use crate::surface::{MediaContent, PlayerContent, Surface};
use crate::MediaError;
use lightbox_schema::{MediaKind, MediaSource, SourceTarget};
use tracing::debug;

/// Claims sources explicitly tagged `video`. Player creation goes through
/// the SDK ready gate: before readiness the request is queued, never
/// rejected.
pub struct VideoHandler;

impl MediaHandler for VideoHandler {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn detect(&self, source: &MediaSource) -> bool {
        source.kind == Some(MediaKind::Video)
    }

    fn initialize(
        &self,
        source: &MediaSource,
        surface: &mut Surface,
        ctx: &mut MediaContext<'_>,
    ) -> Result<(), MediaError> {
        let SourceTarget::Url(url) = &source.target else {
            return Err(MediaError::InvalidTarget {
                kind: MediaKind::Video,
                detail: "video sources must point at a URL".to_owned(),
            });
        };
        let player_id = ctx.embed.allocate_player();
        let created = ctx.embed.request(PlayerRequest {
            player_id,
            video_url: url.clone(),
        });
        surface.content = Some(MediaContent::Player(PlayerContent {
            player_id,
            video_url: url.clone(),
            created,
            playing: false,
            resume_at: 0.0,
        }));
        Ok(())
    }

    // No preload override: players are stateful, priming happens on load.

    fn load(&self, surface: &mut Surface, ctx: &mut MediaContext<'_>) {
        let autoplay = ctx.autoplay_video;
        let ready = ctx.embed.is_ready();
        if let Some(player) = surface.as_player_mut() {
            // A player destroyed by cleanup is recreated here once the SDK
            // is up; while the gate is closed the original queued request
            // still covers this slide.
            if !player.created && ready {
                let request = PlayerRequest {
                    player_id: player.player_id,
                    video_url: player.video_url.clone(),
                };
                player.created = ctx.embed.request(request);
            }
            if player.created && autoplay {
                debug!(player_id = player.player_id, resume_at = player.resume_at, "priming player");
                player.playing = true;
            }
        }
    }

    fn leave(&self, surface: &mut Surface) {
        // Pause and remember the position so a returning user resumes.
        if let Some(player) = surface.as_player_mut() {
            player.playing = false;
        }
    }

    fn cleanup(&self, surface: &mut Surface) {
        // Destroys the player; buffered media goes with it.
        if let Some(player) = surface.as_player_mut() {
            if player.created {
                debug!(player_id = player.player_id, "destroying player");
            }
            player.created = false;
            player.playing = false;
            player.resume_at = 0.0;
        }
        surface.faded_in = false;
    }
}
