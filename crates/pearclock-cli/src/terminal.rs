//! Terminal implementations of the engine's sinks.

use std::future::Future;
use std::io::Write;

use pearclock_core::{ColorState, Confirm, Cue, CueSink, DisplaySink, DisplayTarget, Mode};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// A single status line redrawn in place on every change.
pub struct TerminalDisplay {
    main: String,
    continuous: String,
    color: ColorState,
    mode: Mode,
    dark_mode: bool,
}

impl TerminalDisplay {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            main: "00:00:00".into(),
            continuous: "00:00:00".into(),
            color: ColorState::Green,
            mode: Mode::Idle,
            dark_mode,
        }
    }

    fn ansi_color(&self) -> &'static str {
        match (self.color, self.dark_mode) {
            (ColorState::Green, false) => "\x1b[32m",
            (ColorState::Yellow, false) => "\x1b[33m",
            (ColorState::Red, false) => "\x1b[31m",
            (ColorState::Green, true) => "\x1b[92m",
            (ColorState::Yellow, true) => "\x1b[93m",
            (ColorState::Red, true) => "\x1b[91m",
        }
    }

    pub fn status_line(&self) -> String {
        let (phase, second_label) = match self.mode {
            Mode::Idle => ("idle", "focus"),
            Mode::Running => ("focus", "focus"),
            Mode::OnBreak => ("break", "break left"),
        };
        format!(
            "[{phase:<5}] task {}  {second_label} {}",
            self.main, self.continuous
        )
    }

    fn redraw(&self) {
        let mut out = std::io::stdout().lock();
        // A broken stdout leaves nothing sensible to report to.
        let _ = write!(
            out,
            "\r\x1b[2K{}\u{1f350} {}\x1b[0m",
            self.ansi_color(),
            self.status_line()
        );
        let _ = out.flush();
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, target: DisplayTarget, text: &str) {
        match target {
            DisplayTarget::Main => self.main = text.to_string(),
            DisplayTarget::Continuous => self.continuous = text.to_string(),
        }
        self.redraw();
    }

    fn show_color(&mut self, color: ColorState) {
        self.color = color;
        self.redraw();
    }

    fn show_phase(&mut self, mode: Mode) {
        self.mode = mode;
        self.redraw();
    }
}

/// Rings the terminal bell for escalation cues.
pub struct TerminalCues {
    sound_enabled: bool,
}

impl TerminalCues {
    pub fn new(sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }
}

impl CueSink for TerminalCues {
    fn play(&mut self, cue: Cue) {
        tracing::debug!(?cue, "cue");
        if !self.sound_enabled {
            return;
        }
        let bells = match cue {
            Cue::Yellow => 1,
            Cue::Red => 2,
            Cue::Cancel => 3,
        };
        let mut out = std::io::stdout().lock();
        let _ = out.write_all("\x07".repeat(bells).as_bytes());
        let _ = out.flush();
    }
}

/// Asks on stdout and reads the answer from stdin. Anything but `y`/`yes`
/// counts as no.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, title: &str, message: &str) -> impl Future<Output = bool> + Send {
        let prompt = format!("{title}\n{message} [y/N] ");
        async move {
            let mut stdout = tokio::io::stdout();
            if stdout.write_all(prompt.as_bytes()).await.is_err() {
                return false;
            }
            let _ = stdout.flush().await;

            let mut line = String::new();
            let mut reader = BufReader::new(tokio::io::stdin());
            match reader.read_line(&mut line).await {
                Ok(_) => is_yes(&line),
                Err(_) => false,
            }
        }
    }
}

/// `--yes` on the command line.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _title: &str, _message: &str) -> impl Future<Output = bool> + Send {
        std::future::ready(true)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
