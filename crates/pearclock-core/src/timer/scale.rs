//! Simulated time.
//!
//! A time accelerator `F` makes one simulated second last `1000 / F` real
//! milliseconds. The tick period is one simulated second, and every
//! threshold and break length is expressed in simulated minutes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fastest supported accelerator: one simulated second per real millisecond.
pub const MAX_ACCELERATOR: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeScale {
    accelerator: u32,
}

impl TimeScale {
    /// `accelerator` is clamped to `1..=MAX_ACCELERATOR`, which keeps the
    /// tick period at one millisecond or more.
    pub fn new(accelerator: u32) -> Self {
        Self {
            accelerator: accelerator.clamp(1, MAX_ACCELERATOR),
        }
    }

    pub fn accelerator(&self) -> u32 {
        self.accelerator
    }

    /// Real duration of one simulated second.
    pub fn unit(&self) -> Duration {
        Duration::from_secs(1) / self.accelerator
    }

    pub fn tick_period(&self) -> Duration {
        self.unit()
    }

    pub fn minutes(&self, minutes: u32) -> Duration {
        Duration::from_secs(60 * u64::from(minutes)) / self.accelerator
    }

    /// Whole simulated seconds contained in `elapsed`.
    pub fn whole_seconds(&self, elapsed: Duration) -> u64 {
        let simulated_ns = elapsed.as_nanos() * u128::from(self.accelerator);
        u64::try_from(simulated_ns / 1_000_000_000).unwrap_or(u64::MAX)
    }

    /// `HH:MM:SS`, hours unbounded.
    pub fn format(&self, elapsed: Duration) -> String {
        let total = self.whole_seconds(elapsed);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_time_scale() {
        let scale = TimeScale::default();
        assert_eq!(scale.tick_period(), Duration::from_millis(1000));
        assert_eq!(scale.minutes(25), Duration::from_secs(25 * 60));
        assert_eq!(scale.format(Duration::ZERO), "00:00:00");
        assert_eq!(scale.format(Duration::from_millis(5_999)), "00:00:05");
        assert_eq!(scale.format(Duration::from_secs(3_725)), "01:02:05");
    }

    #[test]
    fn hours_do_not_wrap_at_a_day() {
        let scale = TimeScale::default();
        assert_eq!(scale.format(Duration::from_secs(100 * 3600 + 59)), "100:00:59");
    }

    #[test]
    fn accelerated_scale_shrinks_the_unit() {
        let scale = TimeScale::new(60);
        assert_eq!(scale.minutes(1), Duration::from_secs(1));
        assert_eq!(scale.format(Duration::from_secs(1)), "00:01:00");
        assert_eq!(scale.format(Duration::from_secs(60)), "01:00:00");
    }

    #[test]
    fn zero_accelerator_is_clamped() {
        assert_eq!(TimeScale::new(0).accelerator(), 1);
    }

    #[test]
    fn huge_accelerator_keeps_a_nonzero_tick() {
        let scale = TimeScale::new(u32::MAX);
        assert_eq!(scale.accelerator(), MAX_ACCELERATOR);
        assert_eq!(scale.tick_period(), Duration::from_millis(1));
    }

    #[test]
    fn whole_seconds_saturate_instead_of_wrapping() {
        let scale = TimeScale::new(MAX_ACCELERATOR);
        assert_eq!(scale.whole_seconds(Duration::MAX), u64::MAX);
    }
}
