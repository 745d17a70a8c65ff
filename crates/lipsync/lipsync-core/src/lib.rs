//! Lip-Sync Core (host-agnostic)
//!
//! This crate owns the non-visual half of avatar lip sync: loading timed
//! viseme cues for an audio clip, deciding which viseme is active on each
//! rendered frame, and writing morph-channel weights through a host-provided
//! sink. Rendering, audio playback, and the fetch transport are adapter
//! concerns (see `lipsync-wasm` for the browser host).

pub mod clock;
pub mod config;
pub mod cue;
pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod loader;
pub mod rig;
pub mod session;
pub mod viseme;

// Re-exports for consumers (adapters)
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use cue::{Cue, CueTimeline};
pub use engine::LipSync;
pub use error::LipSyncError;
pub use events::SyncEvent;
pub use ids::SessionId;
pub use loader::{audio_id, load_cues, parse_mouth_cues, CueSource, FileCueSource};
pub use rig::{MorphSink, MorphTargetSet};
pub use session::{PlaybackSession, SessionState};
pub use viseme::{VisemeId, VisemeTable, VisemeWeights};

/// Result type for fallible lip-sync operations.
pub type Result<T> = core::result::Result<T, LipSyncError>;
