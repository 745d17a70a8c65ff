//! Engine: session ownership and the frame-driven apply step.
//!
//! One `LipSync` value replaces the ambient module state of a typical
//! browser implementation (current cue list, playing flag, start timestamp):
//! the session is an explicit value owned here, armed by [`LipSync::begin`]
//! and disarmed by [`LipSync::end`], with [`LipSync::update`] called once per
//! rendered frame in between.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::cue::CueTimeline;
use crate::events::SyncEvent;
use crate::ids::{IdAllocator, SessionId};
use crate::loader::{load_cues, CueSource};
use crate::rig::MorphSink;
use crate::session::PlaybackSession;
use crate::viseme::{VisemeId, VisemeTable};

#[derive(Debug)]
pub struct LipSync {
    cfg: Config,
    table: VisemeTable,
    clock: Box<dyn Clock>,
    ids: IdAllocator,
    session: Option<PlaybackSession>,
    /// Channels driven non-zero by the last applied viseme. Zeroed before the
    /// next viseme is written so stale weights never linger.
    hot_channels: Vec<String>,
    applied: Option<VisemeId>,
    events: Vec<SyncEvent>,
}

impl LipSync {
    /// Create an engine with the compiled-in viseme table and a system clock.
    pub fn new(cfg: Config) -> Self {
        Self::with_clock(cfg, Box::new(SystemClock::new()))
    }

    /// Create an engine with an injected clock (tests, host-driven time).
    pub fn with_clock(cfg: Config, clock: Box<dyn Clock>) -> Self {
        Self {
            cfg,
            table: VisemeTable::default(),
            clock,
            ids: IdAllocator::new(),
            session: None,
            hot_channels: Vec::new(),
            applied: None,
            events: Vec::new(),
        }
    }

    /// Replace the viseme table (hosts with custom morph-channel naming).
    pub fn set_table(&mut self, table: VisemeTable) {
        self.table = table;
    }

    #[inline]
    pub fn table(&self) -> &VisemeTable {
        &self.table
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Current session, if any (idle sessions are dropped on `end`).
    #[inline]
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.state.is_active())
    }

    /// Viseme most recently written to the sink.
    #[inline]
    pub fn applied_viseme(&self) -> Option<VisemeId> {
        self.applied
    }

    /// Drain events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<SyncEvent> {
        core::mem::take(&mut self.events)
    }

    /// Arm a new session at the current clock time. Any prior session is
    /// fully superseded; its timeline is never read again.
    pub fn begin(&mut self, timeline: CueTimeline) -> SessionId {
        let now = self.clock.now();
        self.begin_at(timeline, now)
    }

    /// Arm a new session with an explicit start timestamp (hosts that carry
    /// their own frame time).
    pub fn begin_at(&mut self, timeline: CueTimeline, started_at: f64) -> SessionId {
        let id = self.ids.alloc_session();
        log::debug!(
            "lip sync session {:?} armed with {} cues",
            id,
            timeline.len()
        );
        self.events.push(SyncEvent::PlaybackStarted {
            session: id,
            cue_count: timeline.len(),
        });
        self.session = Some(PlaybackSession::begin(id, timeline, started_at));
        id
    }

    /// Resolve cues for an audio clip and arm a session in one step. Loader
    /// failures degrade to the fallback timeline, so this cannot fail.
    pub fn begin_for(&mut self, source: &dyn CueSource, audio: &str) -> SessionId {
        let timeline = load_cues(source, audio, &self.cfg);
        self.begin(timeline)
    }

    /// Per-frame step: look up the active cue and write its weights.
    ///
    /// Returns the active viseme, or `None` on a timeline gap or while idle.
    /// On a gap the previously applied expression is deliberately left as-is.
    pub fn update(&mut self, sink: &mut dyn MorphSink) -> Option<VisemeId> {
        let now = self.clock.now();
        self.update_at(sink, now)
    }

    /// Per-frame step with an explicit timestamp.
    pub fn update_at(&mut self, sink: &mut dyn MorphSink, now: f64) -> Option<VisemeId> {
        let viseme = self.session.as_ref().and_then(|s| s.tick(now));
        if let Some(id) = viseme {
            self.apply(sink, id);
        }
        viseme
    }

    /// Disarm the session and reset the face to the silence viseme.
    pub fn end(&mut self, sink: &mut dyn MorphSink) {
        if let Some(mut session) = self.session.take() {
            session.end();
            log::debug!("lip sync session {:?} ended", session.id);
            self.events.push(SyncEvent::PlaybackEnded {
                session: session.id,
            });
        }
        self.apply(sink, VisemeId::silence());
    }

    /// Write one viseme's weights to the sink.
    ///
    /// Every channel the previous viseme drove non-zero is first reset to 0,
    /// then each resolved weight is written. A missing table entry is a
    /// reported no-op; a missing sink channel is reported and skipped while
    /// the remaining channels still apply.
    pub fn apply(&mut self, sink: &mut dyn MorphSink, id: VisemeId) {
        let Some(weights) = self.table.get(id) else {
            log::warn!("viseme {id} has no table entry, frame left unchanged");
            self.events.push(SyncEvent::MissingViseme { id });
            return;
        };

        for channel in self.hot_channels.drain(..) {
            sink.set_weight(&channel, 0.0);
        }
        for (channel, weight) in weights.iter() {
            if sink.set_weight(channel, weight) {
                if weight > 0.0 {
                    self.hot_channels.push(channel.to_string());
                }
            } else {
                log::warn!("morph channel '{channel}' not found on model");
                self.events.push(SyncEvent::MissingTarget {
                    channel: channel.to_string(),
                });
            }
        }
        self.applied = Some(id);
    }
}
