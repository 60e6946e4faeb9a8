#![forbid(unsafe_code)]

//! End-to-end roll scenarios driven through the widget and event loop.
//!
//! Run:
//!   cargo test -p rollword-runtime --test e2e_roll_scenarios

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rollword_core::{ConfigError, EmptyWordsPolicy, ListRegistry};
use rollword_runtime::{
    Clock, EventLoop, LoopExit, ManualClock, RecordingSurface, RollingWord, RunState, SharedLists,
    StartOutcome,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn seeded(seed: u64) -> RollingWord<RecordingSurface> {
    RollingWord::new(RecordingSurface::new()).with_rng(SmallRng::seed_from_u64(seed))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn ok_scenario_three_ticks_then_word() {
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(1)
        .inline_words(["OK"])
        .attribute("speed", "10")
        .attribute("duration", "30")
        .attribute("alphabet", "X")
        .attribute("length", "3");

    assert_eq!(w.on_mount(event_loop.now()), Ok(StartOutcome::Started));
    assert_eq!(event_loop.run_until_idle(&mut [&mut w]), LoopExit::Idle);
    assert_eq!(w.surface().frames(), ["XXX", "XXX", "XXX", "OK"]);
    assert_eq!(w.state(), RunState::Idle);
}

#[test]
fn defaults_produce_ten_character_frames() {
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(2).inline_words(["ALPHA", "BETA"]);
    w.on_mount(ms(0)).expect("mount");
    event_loop.run_until_idle(&mut [&mut w]);

    let frames = w.surface().frames();
    assert_eq!(frames.len(), 11);
    for frame in &frames[..10] {
        assert_eq!(frame.chars().count(), 10);
        assert!(
            frame
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == ' ')
        );
    }
    assert!(["ALPHA", "BETA"].contains(&frames[10].as_str()));
}

#[test]
fn strict_mount_with_no_words_reports_error_and_renders_nothing() {
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(3).attribute("list", "missing");

    let err = w.on_mount(ms(0)).expect_err("no words");
    assert_eq!(
        err,
        ConfigError::NoWords {
            list: Some("missing".to_string())
        }
    );
    assert!(err.to_string().contains("missing"));
    assert_eq!(event_loop.run_until_idle(&mut [&mut w]), LoopExit::Idle);
    assert!(w.surface().is_empty());
}

#[test]
fn permissive_mount_with_no_words_stays_blank() {
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(4).empty_words(EmptyWordsPolicy::Permissive);

    assert_eq!(w.on_mount(ms(0)), Ok(StartOutcome::Deferred));
    assert_eq!(event_loop.run_until_idle(&mut [&mut w]), LoopExit::Idle);
    assert!(w.surface().is_empty());
}

#[test]
fn external_list_wins_over_inline_words() {
    let lists: SharedLists = Arc::new(ListRegistry::new().with_list("fruit", ["APPLE", "PEAR"]));
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(5)
        .lists(lists)
        .inline_words(["INLINE"])
        .attribute("list", "fruit")
        .attribute("duration", "50");

    w.on_mount(event_loop.now()).expect("mount");
    for _ in 0..20 {
        event_loop.run_until_idle(&mut [&mut w]);
        let last = w.surface().last().expect("settled");
        assert!(last == "APPLE" || last == "PEAR", "got {last}");
        w.roll(event_loop.now()).expect("roll");
    }
}

#[test]
fn empty_external_list_falls_back_to_inline_words() {
    let lists: SharedLists = Arc::new(ListRegistry::new().with_list("blank", ["", "  "]));
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(6)
        .lists(lists)
        .inline_words(["INLINE"])
        .attribute("list", "blank");

    w.on_mount(ms(0)).expect("mount");
    event_loop.run_until_idle(&mut [&mut w]);
    assert_eq!(w.surface().last(), Some("INLINE"));
}

#[test]
fn fractional_speed_is_truncated() {
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(7)
        .inline_words(["W"])
        .attribute("speed", "25.9")
        .attribute("duration", "100");
    w.on_mount(ms(0)).expect("mount");
    event_loop.run_until_idle(&mut [&mut w]);
    assert_eq!(w.surface().len(), 5);
}

#[test]
fn roll_again_after_settle_starts_a_new_run() {
    let clock = ManualClock::new();
    let mut event_loop = EventLoop::with_clock(clock.clone());
    let mut w = seeded(8).inline_words(["A", "B"]).attribute("duration", "200");

    w.on_mount(clock.now()).expect("mount");
    event_loop.run_until_idle(&mut [&mut w]);
    clock.advance(ms(500));
    assert_eq!(w.roll(clock.now()), Ok(StartOutcome::Started));
    event_loop.run_until_idle(&mut [&mut w]);

    assert_eq!(w.runs(), 2);
    assert_eq!(clock.now(), ms(900));
}

#[test]
fn shutdown_mid_roll_leaves_no_settled_word() {
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(9).inline_words(["NEVER"]);
    w.on_mount(ms(0)).expect("mount");
    w.poll(ms(250));
    event_loop.shutdown_handle().trigger();

    assert_eq!(event_loop.run_until_idle(&mut [&mut w]), LoopExit::Shutdown);
    assert_eq!(w.surface().len(), 2);
    assert_ne!(w.surface().last(), Some("NEVER"));
    assert_eq!(w.runs(), 0);
}

// ============================================================================
// Distribution
// ============================================================================

/// Settling draws uniformly: each of three words lands near one third.
#[test]
fn settled_words_are_uniform() {
    const ROLLS: usize = 6_000;
    let words = ["RED", "GREEN", "BLUE"];
    let mut event_loop = EventLoop::with_clock(ManualClock::new());
    let mut w = seeded(0x5eed)
        .inline_words(words)
        .attribute("speed", "50")
        .attribute("duration", "50")
        .attribute("length", "0");
    w.on_mount(ms(0)).expect("mount");

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..ROLLS {
        event_loop.run_until_idle(&mut [&mut w]);
        let word = w.surface().last().expect("settled").to_string();
        *counts.entry(word).or_default() += 1;
        w.surface_mut().clear();
        w.roll(event_loop.now()).expect("roll");
    }

    assert_eq!(counts.len(), 3);
    for word in words {
        let share = counts[word] as f64 / ROLLS as f64;
        assert!(
            (share - 1.0 / 3.0).abs() < 0.04,
            "{word} settled with share {share:.3}"
        );
    }
}
