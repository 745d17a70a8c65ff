//! Playback session state and the per-frame cue lookup.

use serde::{Deserialize, Serialize};

use crate::cue::CueTimeline;
use crate::ids::SessionId;
use crate::viseme::VisemeId;

/// Lifecycle state of a playback session. `Idle -> Active` on begin,
/// `Active -> Idle` on end; there are no intermediate states and no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No audio is playing; ticks return nothing.
    Idle,
    /// Armed with a timeline and a start timestamp.
    Active,
}

impl SessionState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// One run of audio playback paired with its cue timeline.
///
/// Owned exclusively by the frame loop; mutated only by `begin`/`end` and
/// read by `tick`. The timeline is read-only once attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    pub id: SessionId,
    pub timeline: CueTimeline,
    /// Wall-clock timestamp (seconds) captured when playback started.
    pub started_at: f64,
    pub state: SessionState,
}

impl PlaybackSession {
    /// Arm a session: capture the start timestamp and mark it active.
    pub fn begin(id: SessionId, timeline: CueTimeline, started_at: f64) -> Self {
        Self {
            id,
            timeline,
            started_at,
            state: SessionState::Active,
        }
    }

    /// Which viseme is active at wall-clock time `now`.
    ///
    /// Returns `None` while idle, and `None` inside a timeline gap; on a gap
    /// the caller leaves the previously applied expression as-is.
    #[inline]
    pub fn tick(&self, now: f64) -> Option<VisemeId> {
        if !self.state.is_active() {
            return None;
        }
        let elapsed = (now - self.started_at) as f32;
        self.timeline.cue_at(elapsed)
    }

    /// Disarm the session and release the timeline.
    pub fn end(&mut self) {
        self.state = SessionState::Idle;
        self.timeline = CueTimeline::default();
    }

    /// Seconds of playback remaining past `now`, zero once every cue is behind.
    pub fn remaining(&self, now: f64) -> f32 {
        if !self.state.is_active() {
            return 0.0;
        }
        let elapsed = (now - self.started_at) as f32;
        (self.timeline.duration() - elapsed).max(0.0)
    }
}
