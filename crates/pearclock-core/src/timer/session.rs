//! Focus session state machine.
//!
//! Two stopwatches run side by side: the main clock measures the whole task
//! and survives breaks, the continuous clock measures the current streak and
//! drives escalation. Pausing banks both and starts a break whose length
//! depends on how far the streak escalated.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> OnBreak --(break runs out)--> Idle (resumable)
//!   ^                |                  |
//!   +--cancel/record-+------------------+
//! ```
//!
//! The machine performs no I/O. Every operation returns the [`Effect`]s the
//! caller should carry out, and `tick()` must be called periodically (once
//! per simulated second) while the session is not idle.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::clock::{Clock, MonotonicClock};
use super::scale::TimeScale;
use super::session_clock::SessionClock;
use super::threshold::{self, ColorState, Latches, Thresholds};
use crate::effects::{DisplayTarget, Effect};
use crate::entry::{make_entry, Entry};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    Running,
    OnBreak,
}

/// Outcome of a successful `record()`.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub entry: Entry,
    /// Effects of the reset that follows the record.
    pub effects: Vec<Effect>,
}

/// Serializable view of a session for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub color: ColorState,
    pub main: String,
    pub continuous: String,
    pub max_focus: String,
    pub break_remaining: Option<String>,
    pub reference: String,
    pub can_resume: bool,
}

pub struct Session<C: Clock = MonotonicClock> {
    clock: C,
    scale: TimeScale,
    thresholds: Thresholds,
    main: SessionClock,
    continuous: SessionClock,
    /// Longest streak seen since the last record/cancel.
    max_focus: Duration,
    latches: Latches,
    mode: Mode,
    /// Set iff `mode == OnBreak`.
    break_deadline: Option<Instant>,
    reference: String,
}

impl Session<MonotonicClock> {
    pub fn new(scale: TimeScale) -> Self {
        Self::with_clock(MonotonicClock, scale)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C, scale: TimeScale) -> Self {
        Self {
            clock,
            scale,
            thresholds: Thresholds::scaled(&scale),
            main: SessionClock::default(),
            continuous: SessionClock::default(),
            max_focus: Duration::ZERO,
            latches: Latches::default(),
            mode: Mode::Idle,
            break_deadline: None,
            reference: String::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Escalation reached by the current streak.
    pub fn color(&self) -> ColorState {
        self.latches.color
    }

    /// What the pear should look like: always green during a break.
    pub fn visible_color(&self) -> ColorState {
        match self.mode {
            Mode::OnBreak => ColorState::Green,
            _ => self.latches.color,
        }
    }

    pub fn latches(&self) -> Latches {
        self.latches
    }

    pub fn main_clock(&self) -> &SessionClock {
        &self.main
    }

    pub fn continuous_clock(&self) -> &SessionClock {
        &self.continuous
    }

    pub fn main_elapsed(&self) -> Duration {
        self.main.elapsed(self.clock.now())
    }

    pub fn continuous_elapsed(&self) -> Duration {
        self.continuous.elapsed(self.clock.now())
    }

    /// Watermark including the streak in progress.
    pub fn max_focus_time(&self) -> Duration {
        self.max_focus.max(self.continuous_elapsed())
    }

    /// Remaining break time, `None` unless on a break.
    pub fn break_remaining(&self) -> Option<Duration> {
        self.break_deadline
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    /// Idle with banked task time: the next `start()` resumes the task.
    pub fn can_resume(&self) -> bool {
        self.mode == Mode::Idle && !self.main.accumulated().is_zero()
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = reference.into();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let break_remaining = self.break_remaining();
        let continuous = break_remaining.unwrap_or_else(|| self.continuous_elapsed());
        SessionSnapshot {
            mode: self.mode,
            color: self.visible_color(),
            main: self.scale.format(self.main_elapsed()),
            continuous: self.scale.format(continuous),
            max_focus: self.scale.format(self.max_focus_time()),
            break_remaining: break_remaining.map(|d| self.scale.format(d)),
            reference: self.reference.clone(),
            can_resume: self.can_resume(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume both clocks. A no-op while already running, and
    /// ignored during a break.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.mode == Mode::OnBreak {
            debug!("start ignored during break");
            return Vec::new();
        }
        let now = self.clock.now();
        self.main.resume(now);
        self.continuous.resume(now);

        let mut effects = Vec::new();
        if self.mode != Mode::Running {
            debug!(resumed = self.can_resume(), "session running");
            self.mode = Mode::Running;
            effects.push(Effect::ShowPhase { mode: Mode::Running });
        }
        effects.push(self.render(DisplayTarget::Main, self.main.elapsed(now)));
        effects.push(self.render(DisplayTarget::Continuous, self.continuous.elapsed(now)));
        effects
    }

    /// Bank both clocks and begin a break sized by the streak's escalation.
    pub fn pause(&mut self) -> Vec<Effect> {
        if self.mode != Mode::Running {
            return Vec::new();
        }
        let now = self.clock.now();
        self.continuous.stop(now);
        self.main.stop(now);
        self.max_focus = self.max_focus.max(self.continuous.accumulated());

        // Sized from the streak that just ended, before anything is reset.
        let length = self.thresholds.break_for(self.latches.color);
        self.break_deadline = Some(now + length);
        self.mode = Mode::OnBreak;
        debug!(color = ?self.latches.color, break_secs = length.as_secs(), "break started");

        vec![
            Effect::ShowPhase { mode: Mode::OnBreak },
            Effect::ShowColor {
                color: ColorState::Green,
            },
            self.render(DisplayTarget::Main, self.main.accumulated()),
            self.render(DisplayTarget::Continuous, length),
        ]
    }

    /// Recompute everything from the current time.
    ///
    /// While running this also applies the escalation rules; a returned
    /// [`Effect::TriggerAutoRecord`] means the caller should `record()` now.
    pub fn tick(&mut self) -> Vec<Effect> {
        let now = self.clock.now();
        match self.mode {
            Mode::Idle => Vec::new(),
            Mode::Running => {
                let continuous = self.continuous.elapsed(now);
                let mut effects = vec![self.render(DisplayTarget::Continuous, continuous)];
                if self.main.is_running() {
                    effects.push(self.render(DisplayTarget::Main, self.main.elapsed(now)));
                }
                self.max_focus = self.max_focus.max(continuous);

                let (latches, fired) = threshold::evaluate(continuous, self.latches, &self.thresholds);
                if latches != self.latches {
                    debug!(?latches, "escalation latches changed");
                }
                self.latches = latches;
                effects.extend(fired);
                effects
            }
            Mode::OnBreak => {
                let remaining = self
                    .break_deadline
                    .map(|deadline| deadline.saturating_duration_since(now))
                    .unwrap_or_default();
                let mut effects = vec![self.render(DisplayTarget::Continuous, remaining)];
                if remaining.is_zero() {
                    effects.extend(self.expire_break());
                }
                effects
            }
        }
    }

    /// Drop everything back to idle defaults without recording.
    pub fn cancel(&mut self) -> Vec<Effect> {
        self.main.reset();
        self.reset_streak();
        self.max_focus = Duration::ZERO;
        self.reference.clear();
        self.mode = Mode::Idle;
        debug!("session reset");

        vec![
            Effect::ShowPhase { mode: Mode::Idle },
            Effect::ShowColor {
                color: ColorState::Green,
            },
            self.render(DisplayTarget::Main, Duration::ZERO),
            self.render(DisplayTarget::Continuous, Duration::ZERO),
        ]
    }

    /// Close the session into an [`Entry`] and reset.
    ///
    /// # Errors
    /// [`CoreError::InvalidRecord`] if no task time has been tracked; the
    /// session is left untouched.
    pub fn record(&mut self) -> Result<Recorded> {
        let entry = self.finalize()?;
        info!(
            id = %entry.id,
            total = %entry.total_task_time,
            max_focus = %entry.max_focus_time,
            "session recorded"
        );
        let effects = self.cancel();
        Ok(Recorded { entry, effects })
    }

    /// Build the entry `record()` would produce without touching the session.
    ///
    /// Lets a caller persist the entry first and only `cancel()` once it is
    /// safely stored.
    ///
    /// # Errors
    /// [`CoreError::InvalidRecord`] if no task time has been tracked.
    pub fn finalize(&self) -> Result<Entry> {
        let now = self.clock.now();
        let total = self.main.elapsed(now);
        if total.is_zero() {
            return Err(CoreError::InvalidRecord);
        }
        let max_focus = self.max_focus.max(self.continuous.elapsed(now));

        let entry = make_entry(
            &self.scale.format(total),
            &self.reference,
            &self.scale.format(max_focus),
        );
        debug!(id = %entry.id, "entry finalized");
        Ok(entry)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Break over: new streak, same task. The user resumes with `start()`.
    fn expire_break(&mut self) -> Vec<Effect> {
        self.reset_streak();
        self.mode = Mode::Idle;
        debug!("break finished");
        vec![
            Effect::ShowColor {
                color: ColorState::Green,
            },
            Effect::ShowPhase { mode: Mode::Idle },
        ]
    }

    fn reset_streak(&mut self) {
        self.continuous.reset();
        self.latches = Latches::default();
        self.break_deadline = None;
    }

    fn render(&self, target: DisplayTarget, elapsed: Duration) -> Effect {
        Effect::Render {
            target,
            text: self.scale.format(elapsed),
        }
    }
}
