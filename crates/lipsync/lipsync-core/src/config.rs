//! Core configuration for lipsync-core.

use serde::{Deserialize, Serialize};

/// Configuration for cue normalization and engine behavior.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Interval width assigned to instant-style cues (`{time}` records with
    /// no `end`), in seconds.
    #[serde(default = "default_instant_cue_width")]
    pub instant_cue_width: f32,
}

fn default_instant_cue_width() -> f32 {
    0.1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instant_cue_width: default_instant_cue_width(),
        }
    }
}
