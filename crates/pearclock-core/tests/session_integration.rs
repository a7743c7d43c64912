//! Integration tests for the focus session state machine.
//!
//! Drives a `Session` with a `ManualClock` through full work/break/record
//! cycles without any real waiting.

use std::time::Duration;

use pearclock_core::timer::SessionClock;
use pearclock_core::{
    make_entry, ColorState, CoreError, Cue, Effect, ManualClock, Mode, Session, TimeScale,
};

fn session() -> (Session<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (Session::with_clock(clock.clone(), TimeScale::default()), clock)
}

fn mins(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

/// Advance one simulated second at a time, ticking after each step.
fn run_ticks(session: &mut Session<ManualClock>, clock: &ManualClock, seconds: u64) -> Vec<Effect> {
    let mut effects = Vec::new();
    for _ in 0..seconds {
        clock.advance(Duration::from_secs(1));
        effects.extend(session.tick());
    }
    effects
}

#[test]
fn test_repeated_start_keeps_accumulated_time() {
    let (mut s, clock) = session();
    s.start();
    clock.advance(Duration::from_secs(10));

    let main_before = s.main_clock().accumulated();
    let continuous_before = s.continuous_clock().accumulated();
    s.start();
    s.start();

    assert_eq!(s.main_clock().accumulated(), main_before);
    assert_eq!(s.continuous_clock().accumulated(), continuous_before);
    assert_eq!(s.continuous_elapsed(), Duration::from_secs(10));

    clock.advance(Duration::from_secs(5));
    assert_eq!(s.main_elapsed(), Duration::from_secs(15));
    assert_eq!(s.continuous_elapsed(), Duration::from_secs(15));
}

#[test]
fn test_pause_and_resume_do_not_drift() {
    let (mut s, clock) = session();
    s.start();
    // No ticks at all while working: elapsed time must not depend on them.
    clock.advance(mins(7) + Duration::from_millis(300));
    let before_pause = s.main_elapsed();
    s.pause();

    // A long gap, break expiry, then resume.
    clock.advance(mins(6));
    s.tick();
    assert_eq!(s.mode(), Mode::Idle);
    clock.advance(mins(90));
    s.start();

    assert_eq!(s.main_elapsed(), before_pause);
    clock.advance(Duration::from_secs(2));
    assert_eq!(s.main_elapsed(), before_pause + Duration::from_secs(2));
}

#[test]
fn test_thresholds_fire_once_per_streak() {
    let (mut s, clock) = session();
    s.start();

    let mut colors = vec![s.color()];
    let mut effects = Vec::new();
    for _ in 0..(60 * 60) {
        clock.advance(Duration::from_secs(1));
        effects.extend(s.tick());
        colors.push(s.color());
    }

    let count = |wanted: &Effect| effects.iter().filter(|e| *e == wanted).count();
    assert_eq!(count(&Effect::PlayCue { cue: Cue::Yellow }), 1);
    assert_eq!(count(&Effect::PlayCue { cue: Cue::Red }), 1);
    assert_eq!(count(&Effect::PlayCue { cue: Cue::Cancel }), 1);
    assert_eq!(count(&Effect::TriggerAutoRecord), 1);

    assert!(colors.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(s.color(), ColorState::Red);
}

#[test]
fn test_latches_reset_with_new_streak() {
    let (mut s, clock) = session();
    s.start();
    let first = run_ticks(&mut s, &clock, 26 * 60);
    assert!(first.contains(&Effect::PlayCue { cue: Cue::Yellow }));

    s.pause();
    clock.advance(mins(11));
    s.tick();
    assert_eq!(s.color(), ColorState::Green);

    s.start();
    let second = run_ticks(&mut s, &clock, 26 * 60);
    assert!(second.contains(&Effect::PlayCue { cue: Cue::Yellow }));
}

fn break_after_streak(minutes: u64) -> Duration {
    let (mut s, clock) = session();
    s.start();
    clock.advance(mins(minutes));
    s.tick();
    s.pause();
    s.break_remaining().expect("on break")
}

#[test]
fn test_green_streak_earns_short_break() {
    assert_eq!(break_after_streak(10), mins(5));
}

#[test]
fn test_yellow_streak_earns_medium_break() {
    assert_eq!(break_after_streak(30), mins(10));
}

#[test]
fn test_red_streak_earns_long_break() {
    assert_eq!(break_after_streak(45), mins(15));
}

#[test]
fn test_break_length_follows_accelerated_scale() {
    let clock = ManualClock::new();
    let mut s = Session::with_clock(clock.clone(), TimeScale::new(60));
    s.start();
    clock.advance(Duration::from_secs(41));
    s.tick();
    s.pause();
    assert_eq!(s.break_remaining(), Some(Duration::from_secs(15)));
}

#[test]
fn test_record_rejects_empty_session() {
    let (mut s, _clock) = session();
    let before = s.snapshot();
    let err = s.record().unwrap_err();
    assert!(matches!(err, CoreError::InvalidRecord));
    assert_eq!(s.snapshot(), before);
}

#[test]
fn test_record_rejects_zero_elapsed_without_stopping() {
    let (mut s, _clock) = session();
    s.set_reference("keep me");
    s.start();
    assert!(matches!(s.record(), Err(CoreError::InvalidRecord)));
    assert_eq!(s.mode(), Mode::Running);
    assert!(s.main_clock().is_running());
    assert_eq!(s.reference(), "keep me");
}

#[test]
fn test_entry_digest_is_pinned() {
    for _ in 0..3 {
        assert_eq!(make_entry("00:00:05", "ref", "00:00:05").id, "1ff4278d");
    }
}

#[test]
fn test_watermark_survives_shorter_later_streaks() {
    let (mut s, clock) = session();
    s.start();
    clock.advance(mins(20));
    s.pause();
    clock.advance(mins(5));
    s.tick();
    assert_eq!(s.mode(), Mode::Idle);
    assert_eq!(s.max_focus_time(), mins(20));

    s.start();
    clock.advance(mins(5));
    s.tick();
    let recorded = s.record().unwrap();
    assert_eq!(recorded.entry.total_task_time, "00:25:00");
    assert_eq!(recorded.entry.max_focus_time, "00:20:00");
}

#[test]
fn test_watermark_picks_up_longer_final_streak() {
    let (mut s, clock) = session();
    s.start();
    clock.advance(mins(3));
    s.pause();
    clock.advance(mins(5));
    s.tick();

    s.start();
    clock.advance(mins(12));
    // Recorded mid-streak, no tick since the resume.
    let recorded = s.record().unwrap();
    assert_eq!(recorded.entry.total_task_time, "00:15:00");
    assert_eq!(recorded.entry.max_focus_time, "00:12:00");
}

#[test]
fn test_cancel_restores_idle_defaults() {
    let (mut s, clock) = session();
    s.set_reference("ticket");
    s.start();
    run_ticks(&mut s, &clock, 45 * 60);
    assert_eq!(s.color(), ColorState::Red);
    s.pause();

    s.cancel();
    assert_eq!(s.mode(), Mode::Idle);
    assert_eq!(*s.main_clock(), SessionClock::default());
    assert_eq!(*s.continuous_clock(), SessionClock::default());
    assert_eq!(s.max_focus_time(), Duration::ZERO);
    assert_eq!(s.color(), ColorState::Green);
    assert!(!s.latches().auto_recorded);
    assert_eq!(s.break_remaining(), None);
    assert_eq!(s.reference(), "");
    assert!(!s.can_resume());
}

#[test]
fn test_record_then_fresh_session() {
    let (mut s, clock) = session();
    s.start();
    clock.advance(mins(1));
    s.record().unwrap();

    s.start();
    clock.advance(Duration::from_secs(30));
    let recorded = s.record().unwrap();
    assert_eq!(recorded.entry.total_task_time, "00:00:30");
    assert_eq!(recorded.entry.max_focus_time, "00:00:30");
}
