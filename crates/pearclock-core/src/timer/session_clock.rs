use std::time::{Duration, Instant};

/// A stopwatch made of banked time plus an optional running segment.
///
/// Elapsed time is always recomputed from `now - segment_start`; nothing is
/// accumulated per tick, so late or skipped ticks cannot introduce drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClock {
    accumulated: Duration,
    /// `Some` iff the clock is running.
    segment_start: Option<Instant>,
}

impl SessionClock {
    pub fn is_running(&self) -> bool {
        self.segment_start.is_some()
    }

    /// Time banked from completed segments.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.segment_start {
            Some(start) => self.accumulated + now.saturating_duration_since(start),
            None => self.accumulated,
        }
    }

    /// Open a new segment at `now`, keeping banked time. No-op while running.
    pub fn resume(&mut self, now: Instant) {
        if self.segment_start.is_none() {
            self.segment_start = Some(now);
        }
    }

    /// Bank the running segment and stop. No-op while stopped.
    pub fn stop(&mut self, now: Instant) {
        if let Some(start) = self.segment_start.take() {
            self.accumulated += now.saturating_duration_since(start);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
