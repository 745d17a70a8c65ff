//! Browser bindings for the lip-sync core.
//!
//! The host keeps its responsibilities from the original page: fetching cue
//! JSON, driving the render loop, and exposing a morph-target setter. This
//! layer normalizes payloads, owns the playback session, and calls back into
//! JS with `(channel, weight)` writes each frame.

use js_sys::{Function, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use lipsync_core::{parse_mouth_cues, Config, CueTimeline, LipSync, MorphSink};

#[wasm_bindgen]
pub struct LipSyncPlayer {
    core: LipSync,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Morph sink over a JS callback `set_weight(channel: string, value: number)`.
/// A strict `false` return marks the channel as missing on the model; any
/// other return value (including `undefined`) counts as applied.
struct JsSink {
    f: Function,
}

impl MorphSink for JsSink {
    fn set_weight(&mut self, channel: &str, value: f32) -> bool {
        let channel = JsValue::from_str(channel);
        let value = JsValue::from_f64(value as f64);
        match self.f.call2(&JsValue::UNDEFINED, &channel, &value) {
            Ok(ret) => ret.as_bool() != Some(false),
            Err(_) => false,
        }
    }
}

#[wasm_bindgen]
impl LipSyncPlayer {
    /// Create a player. Pass a JSON config object or undefined/null for
    /// defaults. Example: `new LipSyncPlayer({ instant_cue_width: 0.1 })`
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LipSyncPlayer, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(LipSyncPlayer {
            core: LipSync::new(cfg),
        })
    }

    /// Normalize a fetched cue payload (any supported shape) into a cue
    /// timeline. Never throws: unusable payloads resolve to the fallback
    /// cues, matching the loader's degrade-don't-fail contract.
    #[wasm_bindgen(js_name = load_cues)]
    pub fn load_cues(&self, data_json: JsValue) -> Result<JsValue, JsError> {
        let timeline = self.normalize(&data_json);
        swb::to_value(&timeline).map_err(|e| JsError::new(&format!("timeline error: {e}")))
    }

    /// Arm a playback session with a timeline produced by `load_cues` (or a
    /// raw payload; it is normalized the same way). Returns the session id.
    pub fn begin(&mut self, timeline: JsValue) -> u32 {
        let timeline = self.normalize(&timeline);
        self.core.begin(timeline).0
    }

    /// Per-frame step: applies the active cue's weights through `set_weight`
    /// and returns the active viseme name, or undefined on a gap / when idle.
    pub fn update(&mut self, set_weight: Function) -> Option<String> {
        let mut sink = JsSink { f: set_weight };
        self.core
            .update(&mut sink)
            .map(|id| id.as_str().to_string())
    }

    /// Disarm the session and reset the face to the silence viseme.
    pub fn end(&mut self, set_weight: Function) {
        let mut sink = JsSink { f: set_weight };
        self.core.end(&mut sink);
    }

    #[wasm_bindgen(js_name = is_active)]
    pub fn is_active(&self) -> bool {
        self.core.is_active()
    }

    /// Drain accumulated events (playback transitions, lookup misses) as a
    /// JSON-compatible array.
    #[wasm_bindgen(js_name = take_events)]
    pub fn take_events(&mut self) -> Result<JsValue, JsError> {
        let events = self.core.take_events();
        swb::to_value(&events).map_err(|e| JsError::new(&format!("events error: {e}")))
    }

    fn normalize(&self, payload: &JsValue) -> CueTimeline {
        if jsvalue_is_undefined_or_null(payload) {
            return CueTimeline::fallback();
        }
        // Stringify the JS object so the core parser (expects &str) is reused.
        let json = match JSON::stringify(payload)
            .ok()
            .and_then(|s| s.as_string())
        {
            Some(json) => json,
            None => return CueTimeline::fallback(),
        };
        match parse_mouth_cues(&json, self.core.config()) {
            Ok(tl) if !tl.is_empty() => tl,
            _ => CueTimeline::fallback(),
        }
    }
}

/// Derive the cue resource id from an audio URL (last segment, extension
/// stripped), e.g. `/static/audio/reply_3.mp3` -> `reply_3`.
#[wasm_bindgen(js_name = audio_id)]
pub fn audio_id(url: &str) -> String {
    lipsync_core::audio_id(url).to_string()
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
