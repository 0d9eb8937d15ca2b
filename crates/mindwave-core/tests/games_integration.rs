//! Cross-engine integration and property tests.
//!
//! Exercises the three engines through the public API only, including the
//! property-style invariants: pacer progress bounds and cycle accounting,
//! sequence length/level coupling and mismatch resets, reflex scoring
//! clamps.

use proptest::prelude::*;

use mindwave_core::{
    Config, Event, GameInput, ManualClock, MiniGame, PacerEngine, ReflexEngine, ReflexMode,
    ScriptedRandom, SequenceEngine, SequenceMode,
};

fn started_pacer() -> PacerEngine {
    let mut engine = PacerEngine::new(&Config::default().pacer);
    engine.start();
    engine
}

fn started_sequence(script: Vec<u32>) -> (SequenceEngine, ManualClock) {
    let clock = ManualClock::new(0);
    let mut engine = SequenceEngine::with_clock(
        Config::default().sequence,
        Box::new(ScriptedRandom::new(script)),
        Box::new(clock.clone()),
    );
    engine.start();
    (engine, clock)
}

fn started_reflex(script: Vec<u32>) -> (ReflexEngine, ManualClock) {
    let clock = ManualClock::new(0);
    let mut engine = ReflexEngine::with_clock(
        Config::default().reflex,
        Box::new(ScriptedRandom::new(script)),
        Box::new(clock.clone()),
    );
    engine.start();
    (engine, clock)
}

/// Tick until playback ends and the engine accepts input.
fn await_input(engine: &mut SequenceEngine, clock: &ManualClock) {
    for _ in 0..500 {
        if engine.mode() == SequenceMode::AwaitingInput {
            return;
        }
        clock.advance(100);
        engine.tick();
    }
    panic!("playback never finished");
}

/// Clear the current level with correct inputs and let the next one begin.
fn clear_level(engine: &mut SequenceEngine, clock: &ManualClock, sequence: &[u8]) {
    await_input(engine, clock);
    for &symbol in sequence {
        engine.input(GameInput::Symbol(symbol));
    }
    clock.advance(1_000);
    engine.tick();
}

proptest! {
    /// For any number of ticks, pacer progress stays in [0, 100), the
    /// phase index stays valid, and cycles match elapsed time within one
    /// phase: ticks x interval ~ cycles x sum(durations).
    #[test]
    fn pacer_invariants_hold_for_any_tick_count(ticks in 0usize..2_000) {
        let mut engine = started_pacer();
        for _ in 0..ticks {
            engine.tick();
            prop_assert!((0.0..100.0).contains(&engine.progress_pct()));
            prop_assert!(engine.phase_index() < 3);
        }
        // 11_000 ms per 3-phase lap at 100 ms ticks.
        let elapsed_ms = ticks as u64 * 100;
        let laps = (elapsed_ms / 11_000) as u32;
        prop_assert!(engine.cycles() >= laps * 3);
        prop_assert!(engine.cycles() <= laps * 3 + 3);
    }

    /// A mismatch at any position of any level resets level to 1 and
    /// score to 0.
    #[test]
    fn sequence_mismatch_resets_regardless_of_position(
        script in proptest::collection::vec(0u32..4, 10),
        fail_at in 0usize..3,
    ) {
        let (mut engine, clock) = started_sequence(script.clone());

        // Clear levels 1 and 2 so level 3 is in play.
        clear_level(&mut engine, &clock, &[script[0] as u8]);
        clear_level(&mut engine, &clock, &[script[1] as u8, script[2] as u8]);
        prop_assert_eq!(engine.level(), 3);
        prop_assert_eq!(engine.score(), 30);
        await_input(&mut engine, &clock);

        let sequence: Vec<u8> = script[3..6].iter().map(|&v| v as u8).collect();
        for &symbol in &sequence[..fail_at] {
            prop_assert!(engine.input(GameInput::Symbol(symbol)).is_none());
        }
        let wrong = (sequence[fail_at] + 1) % 4;
        let failed = engine.input(GameInput::Symbol(wrong));
        prop_assert!(
            matches!(failed, Some(Event::SequenceFailed { .. })),
            "expected Some(Event::SequenceFailed {{ .. }}), got {:?}",
            failed
        );

        prop_assert_eq!(engine.level(), 1);
        prop_assert_eq!(engine.score(), 0);
        prop_assert_eq!(engine.sequence_len(), 1);
    }

    /// Completing a sequence of length L adds exactly L x 10.
    #[test]
    fn sequence_completion_adds_level_times_ten(script in proptest::collection::vec(0u32..4, 15)) {
        let (mut engine, clock) = started_sequence(script.clone());
        let mut expected_score = 0;
        let mut drawn = 0usize;
        for level in 1u32..=4 {
            let sequence: Vec<u8> = script[drawn..drawn + level as usize]
                .iter()
                .map(|&v| v as u8)
                .collect();
            drawn += level as usize;
            clear_level(&mut engine, &clock, &sequence);
            expected_score += level * 10;
            prop_assert_eq!(engine.score(), expected_score);
        }
        prop_assert_eq!(engine.level(), 5);
    }

    /// Reflex points are always max(0, 1000 - latency) and latency is
    /// non-negative by construction.
    #[test]
    fn reflex_points_clamp_at_zero(latency in 0u64..3_000) {
        let (mut engine, clock) = started_reflex(vec![0]);
        clock.advance(2_000);
        engine.tick();
        clock.advance(latency);
        match engine.input(GameInput::Press) {
            Some(Event::ReflexScored { latency_ms, points, .. }) => {
                prop_assert_eq!(latency_ms, latency);
                prop_assert_eq!(points as u64, 1_000u64.saturating_sub(latency));
            }
            other => prop_assert!(false, "expected ReflexScored, got {:?}", other),
        }
    }
}

#[test]
fn pacer_scenario_full_breath_in_110_ticks() {
    let mut engine = started_pacer();
    for _ in 0..110 {
        engine.tick();
    }
    assert_eq!(engine.cycles(), 3);
    assert_eq!(engine.phase_index(), 0);
}

#[test]
fn sequence_scenario_level_one_advance() {
    let (mut engine, clock) = started_sequence(vec![2, 1, 3]);
    await_input(&mut engine, &clock);

    let completed = engine.input(GameInput::Symbol(2));
    assert!(matches!(
        completed,
        Some(Event::SequenceCompleted { level: 1, points: 10, score: 10, .. })
    ));
    assert_eq!(engine.mode(), SequenceMode::AdvancePending);

    clock.advance(1_000);
    engine.tick();
    assert_eq!(engine.level(), 2);
    assert_eq!(engine.sequence_len(), 2);
}

#[test]
fn reflex_scenario_early_then_same_round() {
    let (mut engine, clock) = started_reflex(vec![0]);
    assert_eq!(engine.round(), 1);

    engine.input(GameInput::Press);
    assert_eq!(engine.mode(), ReflexMode::Cooldown);
    assert_eq!(engine.score(), 0);

    clock.advance(1_500);
    engine.tick();
    assert_eq!(engine.mode(), ReflexMode::Waiting);
    assert_eq!(engine.round(), 1);
}

#[test]
fn reflex_scenario_scored_press_advances_round() {
    let (mut engine, clock) = started_reflex(vec![0]);
    clock.advance(2_000);
    engine.tick();

    clock.advance(237);
    engine.input(GameInput::Press);
    assert_eq!(engine.last_latency_ms(), Some(237));
    assert_eq!(engine.score(), 763);

    clock.advance(1_500);
    engine.tick();
    assert_eq!(engine.round(), 2);
}

#[test]
fn engines_share_no_state() {
    let (mut sequence, seq_clock) = started_sequence(vec![2]);
    let (mut reflex, reflex_clock) = started_reflex(vec![0]);

    await_input(&mut sequence, &seq_clock);
    sequence.input(GameInput::Symbol(2));

    reflex_clock.advance(2_000);
    reflex.tick();
    reflex_clock.advance(100);
    reflex.input(GameInput::Press);

    assert_eq!(sequence.score(), 10);
    assert_eq!(reflex.score(), 900);

    sequence.reset();
    assert_eq!(sequence.score(), 0);
    assert_eq!(reflex.score(), 900);
}

#[test]
fn double_stop_is_a_no_op_everywhere() {
    let mut pacer = started_pacer();
    let (mut sequence, _c1) = started_sequence(vec![0]);
    let (mut reflex, _c2) = started_reflex(vec![0]);

    for game in [&mut pacer as &mut dyn MiniGame, &mut sequence, &mut reflex] {
        assert!(game.stop().is_some());
        assert!(game.stop().is_none());
    }
}
