use std::rc::Rc;

use lipsync_core::{
    Config, Cue, CueSource, CueTimeline, LipSync, LipSyncError, ManualClock, MorphTargetSet,
    SyncEvent, VisemeId,
};

fn rig() -> MorphTargetSet {
    MorphTargetSet::with_channels([
        "viseme_aa",
        "viseme_I",
        "viseme_E",
        "viseme_O",
        "viseme_U",
        "viseme_PP",
        "viseme_FF",
        "viseme_TH",
        "viseme_DD",
        "viseme_kk",
        "viseme_CH",
        "viseme_SS",
        "viseme_nn",
        "viseme_RR",
    ])
}

fn engine_with_clock() -> (LipSync, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new());
    let engine = LipSync::with_clock(Config::default(), Box::new(Rc::clone(&clock)));
    (engine, clock)
}

/// it should walk the fallback triple frame by frame and reset on end
#[test]
fn full_playback_run() {
    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(3.0);
    engine.begin(CueTimeline::fallback());
    assert!(engine.is_active());

    clock.set(3.05);
    assert_eq!(engine.update(&mut rig), Some(VisemeId::B));
    assert_eq!(rig.weight("viseme_PP"), Some(1.0));

    clock.set(3.15);
    assert_eq!(engine.update(&mut rig), Some(VisemeId::A));
    assert_eq!(rig.weight("viseme_aa"), Some(1.0));
    assert_eq!(rig.weight("viseme_PP"), Some(0.0));

    // Past every cue: no match, last expression holds.
    clock.set(3.35);
    assert_eq!(engine.update(&mut rig), None);
    assert_eq!(rig.weight("viseme_aa"), Some(1.0));

    engine.end(&mut rig);
    assert!(rig.active_channels().is_empty());
    assert_eq!(engine.applied_viseme(), Some(VisemeId::X));
}

/// it should return the same viseme for repeated ticks at one instant
#[test]
fn tick_idempotent_within_cue_window() {
    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(0.0);
    engine.begin(CueTimeline::fallback());

    clock.set(0.12);
    let first = engine.update(&mut rig);
    let second = engine.update(&mut rig);
    assert_eq!(first, Some(VisemeId::A));
    assert_eq!(first, second);
    assert_eq!(rig.weight("viseme_aa"), Some(1.0));
}

/// it should let the earlier-listed cue win when two cues overlap
#[test]
fn overlapping_cues_first_listed_wins() {
    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(0.0);
    engine.begin(CueTimeline::new(vec![
        Cue::new(0.0, 0.5, VisemeId::E),
        Cue::new(0.2, 0.8, VisemeId::U),
    ]));

    clock.set(0.3);
    assert_eq!(engine.update(&mut rig), Some(VisemeId::E));

    clock.set(0.6);
    assert_eq!(engine.update(&mut rig), Some(VisemeId::U));
}

/// it should clear blended weights when moving between diphthong visemes
#[test]
fn diphthong_blend_transition_clears_stale_channels() {
    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(0.0);
    engine.begin(CueTimeline::new(vec![
        Cue::new(0.0, 0.2, VisemeId::Ai),
        Cue::new(0.3, 0.5, VisemeId::Oi),
    ]));

    clock.set(0.1);
    engine.update(&mut rig);
    assert_eq!(rig.weight("viseme_aa"), Some(0.7));
    assert_eq!(rig.weight("viseme_I"), Some(0.3));

    clock.set(0.4);
    engine.update(&mut rig);
    assert_eq!(rig.weight("viseme_aa"), Some(0.0));
    assert_eq!(rig.weight("viseme_O"), Some(0.7));
    assert_eq!(rig.weight("viseme_I"), Some(0.3));
}

/// it should emit started/ended events across a session
#[test]
fn event_sequence_over_session() {
    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(1.0);
    let id = engine.begin(CueTimeline::fallback());
    engine.end(&mut rig);

    assert_eq!(
        engine.take_events(),
        vec![
            SyncEvent::PlaybackStarted {
                session: id,
                cue_count: 3,
            },
            SyncEvent::PlaybackEnded { session: id },
        ]
    );
    assert!(engine.take_events().is_empty());
}

/// it should keep ticking from the fallback cues when the resource is down
#[test]
fn degraded_playback_from_failed_load() {
    struct DownSource;
    impl CueSource for DownSource {
        fn fetch(&self, _id: &str) -> lipsync_core::Result<String> {
            Err(LipSyncError::ResourceUnavailable {
                reason: "503".into(),
            })
        }
    }

    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(10.0);
    engine.begin_for(&DownSource, "/audio/reply.wav");

    clock.set(10.05);
    assert_eq!(engine.update(&mut rig), Some(VisemeId::B));
    assert_eq!(rig.weight("viseme_PP"), Some(1.0));
}

/// it should stop driving the rig once a fresh session supersedes the old one
#[test]
fn supersession_never_reads_stale_timeline() {
    let (mut engine, clock) = engine_with_clock();
    let mut rig = rig();

    clock.set(0.0);
    engine.begin(CueTimeline::new(vec![Cue::new(0.0, 10.0, VisemeId::R)]));

    clock.set(1.0);
    engine.begin(CueTimeline::new(vec![Cue::new(0.0, 0.5, VisemeId::K)]));

    clock.set(1.25);
    // Elapsed 0.25 into the new session; the old all-covering cue is gone.
    assert_eq!(engine.update(&mut rig), Some(VisemeId::K));

    clock.set(2.0);
    assert_eq!(engine.update(&mut rig), None);
}
