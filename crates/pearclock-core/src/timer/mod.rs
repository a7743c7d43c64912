mod clock;
mod scale;
mod session;
mod session_clock;
mod threshold;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use scale::{TimeScale, MAX_ACCELERATOR};
pub use session::{Mode, Recorded, Session, SessionSnapshot};
pub use session_clock::SessionClock;
pub use threshold::{
    evaluate, ColorState, Latches, Thresholds, AUTO_RECORD_MINUTES, DEFAULT_BREAK_MINUTES,
    RED_BREAK_MINUTES, RED_MINUTES, YELLOW_BREAK_MINUTES, YELLOW_MINUTES,
};
