//! Cue resource loading and payload normalization.
//!
//! Cue payloads arrive in one of three shapes (see [`parse_mouth_cues`]); all
//! are normalized to one canonical [`CueTimeline`] so the scheduler never has
//! to sniff formats. Retrieval failures never surface to the caller:
//! [`load_cues`] absorbs every error into the fixed fallback timeline.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::Config;
use crate::cue::{Cue, CueTimeline};
use crate::viseme::VisemeId;

/// Source of raw cue JSON keyed by audio id. The browser host implements
/// this over `fetch`; natively a directory of sidecar files does the job.
pub trait CueSource {
    fn fetch(&self, id: &str) -> crate::Result<String>;
}

/// Reads `<root>/<id>.json` from disk.
#[derive(Debug, Clone)]
pub struct FileCueSource {
    root: PathBuf,
}

impl FileCueSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CueSource for FileCueSource {
    fn fetch(&self, id: &str) -> crate::Result<String> {
        let path = self.root.join(format!("{id}.json"));
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Derive the cue resource id from an audio URL or file name: last path
/// segment, extension stripped.
pub fn audio_id(url: &str) -> &str {
    let name = url.rsplit('/').next().unwrap_or(url);
    name.split('.').next().unwrap_or(name)
}

// Raw payload shapes. Order matters for untagged matching: an object with a
// `mouthCues` field must not fall through to the generic map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Keyed {
        #[serde(rename = "mouthCues")]
        mouth_cues: Vec<Cue>,
    },
    List(Vec<Cue>),
    Map(serde_json::Map<String, serde_json::Value>),
}

/// A loosely shaped map entry: either a full `{start,end}` record or a single
/// `{time}` instant, with an optional explicit viseme value.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    start: Option<f32>,
    #[serde(default)]
    end: Option<f32>,
    #[serde(default)]
    time: Option<f32>,
    #[serde(default)]
    value: Option<String>,
}

impl RawRecord {
    /// Resolve the viseme label: the record's own `value`, else the map key.
    fn viseme(&self, key: &str) -> Option<VisemeId> {
        let label = self.value.as_deref().unwrap_or(key);
        VisemeId::from_str(label).ok()
    }
}

/// Parse a cue payload into a canonical timeline.
///
/// Accepted shapes:
/// 1. `{ "mouthCues": [ {start, end, value}, ... ] }` — passed through unchanged.
/// 2. A bare array of `{start, end, value}` records — passed through unchanged.
/// 3. An arbitrary map of key → record, where each record carries either
///    `{start, end}` or a single `{time}` instant. Instants widen to
///    `[time, time + instant_cue_width]`; a missing `value` defaults to the
///    record's own key. Records without timing, or whose label is not a
///    viseme, are dropped. Map-derived cues are sorted by start time, since
///    map iteration order carries no meaning.
///
/// Anything else is a [`LipSyncError::MalformedPayload`].
pub fn parse_mouth_cues(json: &str, cfg: &Config) -> crate::Result<CueTimeline> {
    let payload: RawPayload = serde_json::from_str(json)?;
    let timeline = match payload {
        RawPayload::Keyed { mouth_cues } => CueTimeline::new(mouth_cues),
        RawPayload::List(cues) => CueTimeline::new(cues),
        RawPayload::Map(entries) => {
            let mut cues: Vec<Cue> = Vec::with_capacity(entries.len());
            for (key, raw) in entries {
                let Ok(record) = serde_json::from_value::<RawRecord>(raw) else {
                    continue;
                };
                let Some(value) = record.viseme(&key) else {
                    log::warn!("dropping cue '{key}': label is not a viseme");
                    continue;
                };
                match record {
                    RawRecord {
                        start: Some(start),
                        end: Some(end),
                        ..
                    } => cues.push(Cue::new(start, end, value)),
                    RawRecord { time: Some(t), .. } => {
                        cues.push(Cue::new(t, t + cfg.instant_cue_width, value))
                    }
                    _ => continue,
                }
            }
            cues.sort_by(|a, b| a.start.total_cmp(&b.start));
            CueTimeline::new(cues)
        }
    };
    Ok(timeline)
}

/// Resolve the cue timeline for an audio clip. Never fails: retrieval errors,
/// malformed payloads, and empty results all degrade to the fallback triple,
/// so the scheduler always receives a usable timeline.
pub fn load_cues(source: &dyn CueSource, audio: &str, cfg: &Config) -> CueTimeline {
    let id = audio_id(audio);
    let timeline = source
        .fetch(id)
        .and_then(|json| parse_mouth_cues(&json, cfg));
    match timeline {
        Ok(tl) if !tl.is_empty() => {
            if let Err(reason) = tl.validate_basic() {
                // Tolerated: lookup handles gaps/overlaps, and passthrough
                // shapes are delivered unmodified.
                log::warn!("cue timeline for '{id}' is irregular: {reason}");
            }
            tl
        }
        Ok(_) => {
            log::warn!("cue resource for '{id}' is empty, using fallback cues");
            CueTimeline::fallback()
        }
        Err(err) => {
            log::warn!(
                "cue load for '{id}' failed ({}): {err}, using fallback cues",
                err.category()
            );
            CueTimeline::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LipSyncError;

    #[test]
    fn audio_id_strips_path_and_extension() {
        assert_eq!(audio_id("/audio/reply_7.wav"), "reply_7");
        assert_eq!(audio_id("https://host/static/tts/clip.mp3"), "clip");
        assert_eq!(audio_id("clip.ogg"), "clip");
        assert_eq!(audio_id("clip"), "clip");
        assert_eq!(audio_id("archive.tar.gz"), "archive");
    }

    #[test]
    fn instant_records_widen_by_configured_width() {
        let cfg = Config {
            instant_cue_width: 0.25,
        };
        let tl = parse_mouth_cues(r#"{"S": {"time": 1.0}}"#, &cfg).unwrap();
        assert_eq!(tl.cues, vec![Cue::new(1.0, 1.25, VisemeId::S)]);
    }

    #[test]
    fn map_value_field_overrides_key() {
        let cfg = Config::default();
        let tl = parse_mouth_cues(r#"{"first": {"time": 0.0, "value": "CH"}}"#, &cfg).unwrap();
        assert_eq!(tl.cues[0].value, VisemeId::Ch);
    }

    #[test]
    fn non_viseme_map_keys_are_dropped() {
        let cfg = Config::default();
        let tl = parse_mouth_cues(
            r#"{"metadata": {"duration": 3.0}, "A": {"time": 0.5}, "banana": {"time": 0.7}}"#,
            &cfg,
        )
        .unwrap();
        assert_eq!(tl.cues, vec![Cue::new(0.5, 0.6, VisemeId::A)]);
    }

    #[test]
    fn map_cues_sort_by_start() {
        let cfg = Config::default();
        let tl = parse_mouth_cues(
            r#"{"S": {"time": 0.9}, "A": {"time": 0.1}, "B": {"start": 0.4, "end": 0.5}}"#,
            &cfg,
        )
        .unwrap();
        let starts: Vec<f32> = tl.cues.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.1, 0.4, 0.9]);
    }

    #[test]
    fn scalar_payload_is_malformed() {
        let cfg = Config::default();
        let err = parse_mouth_cues("42", &cfg).unwrap_err();
        assert!(matches!(err, LipSyncError::MalformedPayload { .. }));
    }
}
