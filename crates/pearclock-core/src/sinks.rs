//! Collaborator interfaces the engine drives.
//!
//! The engine decides what should be shown or heard; these traits are where
//! that reaches an actual screen, speaker, or dialog.

use std::future::Future;

use crate::effects::{Cue, DisplayTarget, Effect};
use crate::timer::{ColorState, Mode};

pub trait DisplaySink: Send {
    fn render(&mut self, target: DisplayTarget, text: &str);

    fn show_color(&mut self, _color: ColorState) {}

    fn show_phase(&mut self, _mode: Mode) {}
}

/// Fire-and-forget audio.
pub trait CueSink: Send {
    fn play(&mut self, cue: Cue);
}

/// A yes/no question put to the user.
pub trait Confirm {
    fn confirm(&self, title: &str, message: &str) -> impl Future<Output = bool> + Send;
}

/// Forward display and audio effects. `TriggerAutoRecord` is not a sink
/// concern and is skipped here.
pub fn dispatch(effects: &[Effect], display: &mut dyn DisplaySink, cues: &mut dyn CueSink) {
    for effect in effects {
        match effect {
            Effect::Render { target, text } => display.render(*target, text),
            Effect::ShowColor { color } => display.show_color(*color),
            Effect::ShowPhase { mode } => display.show_phase(*mode),
            Effect::PlayCue { cue } => cues.play(*cue),
            Effect::TriggerAutoRecord => {}
        }
    }
}

/// Sinks that remember what they were given. Handy for tests and for
/// headless status output.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub main: String,
    pub continuous: String,
    pub color: ColorState,
    pub phase: Mode,
    pub cues: Vec<Cue>,
    pub renders: usize,
}

impl DisplaySink for RecordingSink {
    fn render(&mut self, target: DisplayTarget, text: &str) {
        self.renders += 1;
        match target {
            DisplayTarget::Main => self.main = text.to_string(),
            DisplayTarget::Continuous => self.continuous = text.to_string(),
        }
    }

    fn show_color(&mut self, color: ColorState) {
        self.color = color;
    }

    fn show_phase(&mut self, mode: Mode) {
        self.phase = mode;
    }
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_routes_each_effect() {
        let mut display = RecordingSink::default();
        let mut cues = RecordingSink::default();
        let effects = vec![
            Effect::Render {
                target: DisplayTarget::Main,
                text: "00:00:03".into(),
            },
            Effect::Render {
                target: DisplayTarget::Continuous,
                text: "00:00:02".into(),
            },
            Effect::ShowColor {
                color: ColorState::Yellow,
            },
            Effect::ShowPhase { mode: Mode::OnBreak },
            Effect::PlayCue { cue: Cue::Yellow },
            Effect::TriggerAutoRecord,
        ];
        dispatch(&effects, &mut display, &mut cues);

        assert_eq!(display.main, "00:00:03");
        assert_eq!(display.continuous, "00:00:02");
        assert_eq!(display.color, ColorState::Yellow);
        assert_eq!(display.phase, Mode::OnBreak);
        assert_eq!(cues.cues, vec![Cue::Yellow]);
        assert!(display.cues.is_empty());
    }
}
