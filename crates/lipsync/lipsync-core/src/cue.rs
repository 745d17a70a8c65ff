//! Timed viseme cues and the timeline lookup.

use serde::{Deserialize, Serialize};

use crate::viseme::VisemeId;

/// One time interval during which a single viseme is active. The interval is
/// inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start of the interval, seconds from playback start.
    pub start: f32,
    /// End of the interval, seconds. Must be greater than `start`.
    pub end: f32,
    /// Viseme active during the interval.
    pub value: VisemeId,
}

impl Cue {
    pub fn new(start: f32, end: f32, value: VisemeId) -> Self {
        Self { start, end, value }
    }

    /// Whether `elapsed` falls inside this cue's interval.
    #[inline]
    pub fn contains(&self, elapsed: f32) -> bool {
        elapsed >= self.start && elapsed <= self.end
    }
}

/// Ordered-by-start sequence of cues for one audio clip.
///
/// The sequence need not be gap-free or non-overlapping: lookup returns no
/// viseme inside a gap, and the first matching cue wins on overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueTimeline {
    pub cues: Vec<Cue>,
}

impl CueTimeline {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    /// The fixed degraded-mode timeline used whenever a cue resource cannot
    /// be retrieved or parsed. Guarantees playback visuals never freeze on a
    /// missing resource.
    pub fn fallback() -> Self {
        Self::new(vec![
            Cue::new(0.0, 0.1, VisemeId::B),
            Cue::new(0.1, 0.2, VisemeId::A),
            Cue::new(0.2, 0.3, VisemeId::B),
        ])
    }

    /// First cue whose interval contains `elapsed`, scanning in list order.
    #[inline]
    pub fn cue_at(&self, elapsed: f32) -> Option<VisemeId> {
        self.cues
            .iter()
            .find(|cue| cue.contains(elapsed))
            .map(|cue| cue.value)
    }

    /// End of the last cue, or 0 for an empty timeline.
    pub fn duration(&self) -> f32 {
        self.cues.iter().fold(0.0, |acc, c| acc.max(c.end))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Validate basic invariants: finite times, `start >= 0`, `end > start`,
    /// cues ordered by start time.
    pub fn validate_basic(&self) -> Result<(), String> {
        let mut last_start = f32::NEG_INFINITY;
        for cue in &self.cues {
            if !cue.start.is_finite() || !cue.end.is_finite() {
                return Err(format!("non-finite cue times for {}", cue.value));
            }
            if cue.start < 0.0 {
                return Err(format!("cue start {} is negative", cue.start));
            }
            if cue.end <= cue.start {
                return Err(format!(
                    "cue end {} must be greater than start {}",
                    cue.end, cue.start
                ));
            }
            if cue.start < last_start {
                return Err("cues must be ordered by start time".into());
            }
            last_start = cue.start;
        }
        Ok(())
    }
}
