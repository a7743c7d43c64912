use serde::{Deserialize, Serialize};

use crate::timer::{ColorState, Mode};

/// Which of the two timer faces a value belongs to. During a break the
/// continuous face shows the break countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTarget {
    Main,
    Continuous,
}

/// Audible cues. Yellow and red announce escalation, cancel announces the
/// automatic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Yellow,
    Red,
    Cancel,
}

/// Something a state transition wants done outside the state machine.
///
/// Session operations return these instead of touching the display or the
/// speaker; the controller hands them to the collaborator sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Render { target: DisplayTarget, text: String },
    ShowColor { color: ColorState },
    ShowPhase { mode: Mode },
    PlayCue { cue: Cue },
    /// The streak hit the ceiling; the controller records immediately.
    TriggerAutoRecord,
}
