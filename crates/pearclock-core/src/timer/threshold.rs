//! Streak escalation.
//!
//! As the continuous focus streak grows, the pear turns from green to yellow
//! to red, each change announced by a cue, and at the ceiling the session is
//! recorded automatically. Every trigger is latched so it fires once per
//! streak; the latches only clear when the continuous clock is reset.
//!
//! | Simulated minutes | Effect                          | Break if paused |
//! |-------------------|---------------------------------|-----------------|
//! | 0                 | Green                           | 5 min           |
//! | 25                | Yellow + yellow cue             | 10 min          |
//! | 40                | Red + red cue                   | 15 min          |
//! | 50                | cancel cue + automatic record   | -               |

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::scale::TimeScale;
use crate::effects::{Cue, Effect};

pub const YELLOW_MINUTES: u32 = 25;
pub const RED_MINUTES: u32 = 40;
pub const AUTO_RECORD_MINUTES: u32 = 50;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const YELLOW_BREAK_MINUTES: u32 = 10;
pub const RED_BREAK_MINUTES: u32 = 15;

/// Escalation level of the current streak. Ordered, only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorState {
    #[default]
    Green,
    Yellow,
    Red,
}

/// One-shot state for a single streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latches {
    pub color: ColorState,
    pub auto_recorded: bool,
}

/// Thresholds and break lengths in real time for a given [`TimeScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub yellow: Duration,
    pub red: Duration,
    pub auto_record: Duration,
    pub default_break: Duration,
    pub yellow_break: Duration,
    pub red_break: Duration,
}

impl Thresholds {
    pub fn scaled(scale: &TimeScale) -> Self {
        Self {
            yellow: scale.minutes(YELLOW_MINUTES),
            red: scale.minutes(RED_MINUTES),
            auto_record: scale.minutes(AUTO_RECORD_MINUTES),
            default_break: scale.minutes(DEFAULT_BREAK_MINUTES),
            yellow_break: scale.minutes(YELLOW_BREAK_MINUTES),
            red_break: scale.minutes(RED_BREAK_MINUTES),
        }
    }

    /// Break earned by a streak that reached `color`.
    pub fn break_for(&self, color: ColorState) -> Duration {
        match color {
            ColorState::Red => self.red_break,
            ColorState::Yellow => self.yellow_break,
            ColorState::Green => self.default_break,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::scaled(&TimeScale::default())
    }
}

/// Apply the escalation rules to `continuous_elapsed`.
///
/// Rules run in a fixed order (yellow, red, auto-record) and are independent,
/// so a single late tick can fire several of them at once.
pub fn evaluate(
    continuous_elapsed: Duration,
    latches: Latches,
    thresholds: &Thresholds,
) -> (Latches, Vec<Effect>) {
    let mut next = latches;
    let mut effects = Vec::new();

    if continuous_elapsed >= thresholds.yellow && next.color < ColorState::Yellow {
        next.color = ColorState::Yellow;
        effects.push(Effect::ShowColor {
            color: ColorState::Yellow,
        });
        effects.push(Effect::PlayCue { cue: Cue::Yellow });
    }

    if continuous_elapsed >= thresholds.red && next.color < ColorState::Red {
        next.color = ColorState::Red;
        effects.push(Effect::ShowColor {
            color: ColorState::Red,
        });
        effects.push(Effect::PlayCue { cue: Cue::Red });
    }

    if continuous_elapsed >= thresholds.auto_record && !next.auto_recorded {
        next.auto_recorded = true;
        effects.push(Effect::PlayCue { cue: Cue::Cancel });
        effects.push(Effect::TriggerAutoRecord);
    }

    (next, effects)
}
