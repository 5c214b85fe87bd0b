use serde::Serialize;

/// Playback cursor over a recorded artifact.
///
/// Tracks play/pause and a 1-second-resolution position. Reaching the end
/// of the artifact resets to paused at position zero.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackCursor {
    playing: bool,
    position_seconds: u64,
    duration_seconds: u64,
}

impl PlaybackCursor {
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            playing: false,
            position_seconds: 0,
            duration_seconds,
        }
    }

    /// Toggle between playing and paused.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Advance the cursor while playing. Has no effect while paused.
    pub fn advance(&mut self, seconds: u64) {
        if !self.playing {
            return;
        }

        self.position_seconds = self.position_seconds.saturating_add(seconds);
        if self.position_seconds >= self.duration_seconds {
            // End of artifact: back to paused at the start.
            self.playing = false;
            self.position_seconds = 0;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position_seconds(&self) -> u64 {
        self.position_seconds
    }
}
