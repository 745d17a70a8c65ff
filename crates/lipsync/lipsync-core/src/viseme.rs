//! Viseme labels and their morph-channel weight maps.

use core::fmt;
use core::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Visual mouth-shape category. Closed set, fixed at build time; the names
/// mirror the cue wire format (Rhubarb-style letters plus a few extras).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisemeId {
    /// 'ah' as in 'father'
    A,
    /// 'ee' as in 'beat'
    I,
    /// 'eh' as in 'bet'
    E,
    /// 'oh' as in 'boat'
    O,
    /// 'oo' as in 'boot'
    U,
    /// Bilabial plosives (p, b, m)
    B,
    /// Labiodental fricatives (f, v)
    F,
    /// Dental fricatives (th)
    T,
    /// Alveolar plosives (t, d)
    D,
    /// Velar plosives (k, g)
    K,
    /// Post-alveolar affricates (ch, j)
    #[serde(rename = "CH")]
    Ch,
    /// Sibilant fricatives (s, z)
    S,
    /// Alveolar nasals (n)
    N,
    /// Alveolar approximants (r)
    R,
    /// Silence/neutral: every channel at 0
    X,
    /// Blend for the 'ai' diphthong
    #[serde(rename = "AI")]
    Ai,
    /// Blend for the 'oi' diphthong
    #[serde(rename = "OI")]
    Oi,
    /// Blend for the 'au' diphthong
    #[serde(rename = "AU")]
    Au,
}

impl VisemeId {
    /// Wire name of this viseme (the string used in cue payloads).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::I => "I",
            Self::E => "E",
            Self::O => "O",
            Self::U => "U",
            Self::B => "B",
            Self::F => "F",
            Self::T => "T",
            Self::D => "D",
            Self::K => "K",
            Self::Ch => "CH",
            Self::S => "S",
            Self::N => "N",
            Self::R => "R",
            Self::X => "X",
            Self::Ai => "AI",
            Self::Oi => "OI",
            Self::Au => "AU",
        }
    }

    /// The neutral viseme applied when playback ends.
    #[inline]
    pub fn silence() -> Self {
        Self::X
    }
}

impl fmt::Display for VisemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisemeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "A" => Self::A,
            "I" => Self::I,
            "E" => Self::E,
            "O" => Self::O,
            "U" => Self::U,
            "B" => Self::B,
            "F" => Self::F,
            "T" => Self::T,
            "D" => Self::D,
            "K" => Self::K,
            "CH" => Self::Ch,
            "S" => Self::S,
            "N" => Self::N,
            "R" => Self::R,
            "X" => Self::X,
            "AI" => Self::Ai,
            "OI" => Self::Oi,
            "AU" => Self::Au,
            _ => return Err(()),
        })
    }
}

/// Morph-channel weights for one viseme. Channels not present are implicitly 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisemeWeights(HashMap<String, f32>);

impl VisemeWeights {
    /// Build weights from (channel, intensity) pairs. Intensities are clamped
    /// to [0, 1].
    pub fn of(pairs: &[(&str, f32)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clamp(0.0, 1.0)))
                .collect(),
        )
    }

    #[inline]
    pub fn get(&self, channel: &str) -> f32 {
        self.0.get(channel).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Static mapping from viseme to morph-channel weights. Loaded once at
/// startup; lookup misses are recoverable, never a panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisemeTable {
    entries: HashMap<VisemeId, VisemeWeights>,
}

impl VisemeTable {
    /// Empty table (useful for hosts supplying their own mapping).
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: VisemeId, weights: VisemeWeights) {
        self.entries.insert(id, weights);
    }

    #[inline]
    pub fn get(&self, id: VisemeId) -> Option<&VisemeWeights> {
        self.entries.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: VisemeId) -> bool {
        self.entries.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for VisemeTable {
    /// The compiled-in mapping onto ARKit/Wolf3D-style `viseme_*` morph
    /// targets, including the weighted diphthong blends.
    fn default() -> Self {
        let mut t = Self::empty();
        t.insert(VisemeId::A, VisemeWeights::of(&[("viseme_aa", 1.0)]));
        t.insert(VisemeId::I, VisemeWeights::of(&[("viseme_I", 1.0)]));
        t.insert(VisemeId::E, VisemeWeights::of(&[("viseme_E", 1.0)]));
        t.insert(VisemeId::O, VisemeWeights::of(&[("viseme_O", 1.0)]));
        t.insert(VisemeId::U, VisemeWeights::of(&[("viseme_U", 1.0)]));
        t.insert(VisemeId::B, VisemeWeights::of(&[("viseme_PP", 1.0)]));
        t.insert(VisemeId::F, VisemeWeights::of(&[("viseme_FF", 1.0)]));
        t.insert(VisemeId::T, VisemeWeights::of(&[("viseme_TH", 1.0)]));
        t.insert(VisemeId::D, VisemeWeights::of(&[("viseme_DD", 1.0)]));
        t.insert(VisemeId::K, VisemeWeights::of(&[("viseme_kk", 1.0)]));
        t.insert(VisemeId::Ch, VisemeWeights::of(&[("viseme_CH", 1.0)]));
        t.insert(VisemeId::S, VisemeWeights::of(&[("viseme_SS", 1.0)]));
        t.insert(VisemeId::N, VisemeWeights::of(&[("viseme_nn", 1.0)]));
        t.insert(VisemeId::R, VisemeWeights::of(&[("viseme_RR", 1.0)]));
        // Silence: all channels implicitly 0.
        t.insert(VisemeId::X, VisemeWeights::default());
        t.insert(
            VisemeId::Ai,
            VisemeWeights::of(&[("viseme_aa", 0.7), ("viseme_I", 0.3)]),
        );
        t.insert(
            VisemeId::Oi,
            VisemeWeights::of(&[("viseme_O", 0.7), ("viseme_I", 0.3)]),
        );
        t.insert(
            VisemeId::Au,
            VisemeWeights::of(&[("viseme_aa", 0.7), ("viseme_U", 0.3)]),
        );
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for id in [VisemeId::A, VisemeId::Ch, VisemeId::Ai, VisemeId::X] {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            let back: VisemeId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
            assert_eq!(id.as_str().parse::<VisemeId>(), Ok(id));
        }
        assert!("viseme_aa".parse::<VisemeId>().is_err());
    }

    #[test]
    fn default_table_covers_every_viseme() {
        let table = VisemeTable::default();
        for id in [
            VisemeId::A,
            VisemeId::I,
            VisemeId::E,
            VisemeId::O,
            VisemeId::U,
            VisemeId::B,
            VisemeId::F,
            VisemeId::T,
            VisemeId::D,
            VisemeId::K,
            VisemeId::Ch,
            VisemeId::S,
            VisemeId::N,
            VisemeId::R,
            VisemeId::X,
            VisemeId::Ai,
            VisemeId::Oi,
            VisemeId::Au,
        ] {
            assert!(table.contains(id), "missing entry for {id}");
        }
    }

    #[test]
    fn silence_drives_no_channels() {
        let table = VisemeTable::default();
        assert!(table.get(VisemeId::X).unwrap().is_empty());
    }

    #[test]
    fn blend_weights() {
        let table = VisemeTable::default();
        let ai = table.get(VisemeId::Ai).unwrap();
        assert_eq!(ai.get("viseme_aa"), 0.7);
        assert_eq!(ai.get("viseme_I"), 0.3);
        assert_eq!(ai.get("viseme_PP"), 0.0);
    }

    #[test]
    fn weights_clamp_to_unit_range() {
        let w = VisemeWeights::of(&[("viseme_aa", 2.0), ("viseme_I", -0.5)]);
        assert_eq!(w.get("viseme_aa"), 1.0);
        assert_eq!(w.get("viseme_I"), 0.0);
    }
}
