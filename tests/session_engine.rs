use stillwater::{Pattern, Phase, SessionEngine, SessionEvent};
use std::time::Duration;

fn run(engine: &mut SessionEngine, ticks: usize) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        engine.tick(&mut events);
    }
    events
}

fn pulses(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::HapticPulse(_)))
        .count()
}

fn completions(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| **e == SessionEvent::Complete)
        .count()
}

#[test]
fn test_box_two_minutes_completes_at_tick_1200() {
    let mut engine = SessionEngine::new();
    engine.start(Pattern::BOX, 2.0).unwrap();

    let events = run(&mut engine, 1199);
    assert!(engine.is_active());
    assert_eq!(completions(&events), 0);
    assert!((engine.seconds_remaining() - 0.1).abs() < 1e-9);

    let last = run(&mut engine, 1);
    assert_eq!(completions(&last), 1);
    assert!(!engine.is_active());
    assert_eq!(engine.seconds_remaining(), 0.0);

    // One transition every 40 ticks; the last one lands on the final tick.
    assert_eq!(pulses(&events), 29);
    assert_eq!(pulses(&last), 1);
    assert_eq!(engine.phase(), Phase::Exhale);

    assert!(run(&mut engine, 10).is_empty());
}

#[test]
fn test_each_phase_lasts_exactly_its_tick_count() {
    let pattern = Pattern::new(1.5, 0.3, 2.0, 0.7);
    let mut engine = SessionEngine::new();
    engine.start(pattern, 1.0).unwrap();

    for phase in Phase::ORDER {
        assert_eq!(engine.phase(), phase);
        let ticks = pattern.ticks(phase) as usize;
        let before = run(&mut engine, ticks - 1);
        assert_eq!(pulses(&before), 0, "{phase} advanced early");
        assert_eq!(engine.phase(), phase);

        let edge = run(&mut engine, 1);
        assert_eq!(pulses(&edge), 1);
        assert_eq!(engine.phase_progress(), 0.0);
    }
}

#[test]
fn test_long_exhale_never_rests() {
    let mut engine = SessionEngine::new();
    engine.start(Pattern::LONG_EXHALE, 2.0).unwrap();

    let events = run(&mut engine, 1200);
    let mut order = Vec::new();
    for event in &events {
        if let SessionEvent::PhaseChange { phase, .. } = event {
            assert_ne!(*phase, Phase::HoldOut);
            if order.last() != Some(phase) {
                order.push(*phase);
            }
        }
    }
    assert_eq!(
        &order[..4],
        &[Phase::Inhale, Phase::HoldIn, Phase::Exhale, Phase::Inhale]
    );
}

#[test]
fn test_remaining_time_never_increases() {
    let mut engine = SessionEngine::new();
    engine.start(Pattern::new(2.0, 0.0, 3.0, 1.0), 0.5).unwrap();

    let initial = engine.seconds_remaining();
    let mut previous = initial;
    let mut n = 0;
    let mut events = Vec::new();
    while engine.is_active() {
        engine.tick(&mut events);
        n += 1;
        let now = engine.seconds_remaining();
        assert!(now <= previous);
        assert!((now - (initial - n as f64 * 0.1).max(0.0)).abs() < 1e-9);
        previous = now;
    }
    assert_eq!(n, 300);
    assert_eq!(completions(&events), 1);
}

#[test]
fn test_progress_stays_below_one_hundred() {
    let mut engine = SessionEngine::new();
    engine.start(Pattern::new(0.3, 0.7, 1.1, 0.0), 1.0).unwrap();
    for event in run(&mut engine, 600) {
        if let SessionEvent::PhaseChange { progress, .. } = event {
            assert!((0.0..100.0).contains(&progress));
        }
    }
}

#[test]
fn test_update_matches_manual_ticks() {
    let mut by_update = SessionEngine::new();
    let mut by_tick = SessionEngine::new();
    by_update.start(Pattern::BOX, 2.0).unwrap();
    by_tick.start(Pattern::BOX, 2.0).unwrap();

    let mut from_update = Vec::new();
    for _ in 0..37 {
        by_update.update(Duration::from_millis(33), &mut from_update);
    }
    let from_tick = run(&mut by_tick, 12);

    assert_eq!(from_update, from_tick);
    assert_eq!(by_update.state(), by_tick.state());
}

#[test]
fn test_pause_then_start_resumes_without_losing_time() {
    let mut engine = SessionEngine::new();
    engine.start(Pattern::BOX, 2.0).unwrap();
    let mut events = Vec::new();
    engine.update(Duration::from_millis(2550), &mut events);
    engine.pause();
    engine.update(Duration::from_secs(30), &mut events);
    assert!((engine.seconds_remaining() - 117.5).abs() < 1e-9);

    engine.start(Pattern::BOX, 2.0).unwrap();
    engine.update(Duration::from_millis(50), &mut events);
    assert!((engine.seconds_remaining() - 117.5).abs() < 1e-9);
}
