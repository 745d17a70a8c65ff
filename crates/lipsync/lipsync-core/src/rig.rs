//! The seam between the scheduler and whatever drives the face.

use hashbrown::HashMap;

/// Receiver for morph-channel weight writes.
///
/// Hosts implement this over their mesh (morph-target influences, blend
/// shapes, ...). `set_weight` returns `false` when the named channel is not
/// drivable on the loaded model; the caller reports the miss and moves on.
pub trait MorphSink {
    fn set_weight(&mut self, channel: &str, value: f32) -> bool;
}

/// Concrete named-channel store: the native and test stand-in for a mesh's
/// morph-target influences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphTargetSet {
    influences: HashMap<String, f32>,
}

impl MorphTargetSet {
    /// Build a set with the given drivable channel names, all at weight 0.
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            influences: channels.into_iter().map(|c| (c.into(), 0.0)).collect(),
        }
    }

    #[inline]
    pub fn weight(&self, channel: &str) -> Option<f32> {
        self.influences.get(channel).copied()
    }

    #[inline]
    pub fn has_channel(&self, channel: &str) -> bool {
        self.influences.contains_key(channel)
    }

    /// Channels currently driven above zero.
    pub fn active_channels(&self) -> Vec<&str> {
        let mut active: Vec<&str> = self
            .influences
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(c, _)| c.as_str())
            .collect();
        active.sort_unstable();
        active
    }
}

impl MorphSink for MorphTargetSet {
    fn set_weight(&mut self, channel: &str, value: f32) -> bool {
        match self.influences.get_mut(channel) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
