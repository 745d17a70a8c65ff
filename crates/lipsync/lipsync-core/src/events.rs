//! Semantic events emitted while stepping the engine.
//!
//! Adapters drain these each frame and forward them to the host (console,
//! metrics, UI). Nothing in here is fatal; events exist so degraded behavior
//! is observable instead of silent.

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::viseme::VisemeId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SyncEvent {
    /// A session was armed with a timeline.
    PlaybackStarted { session: SessionId, cue_count: usize },
    /// A session was disarmed and the face reset to silence.
    PlaybackEnded { session: SessionId },
    /// A cue referenced a viseme missing from the table; the frame was a no-op.
    MissingViseme { id: VisemeId },
    /// A weight write hit a channel the model does not drive.
    MissingTarget { channel: String },
}
