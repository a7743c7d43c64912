use clap::Args;
use pearclock_core::storage::Database;
use pearclock_core::{
    Config, CoreError, FocusController, MemoryEntryLog, Session, SessionSnapshot, TimeScale,
    MAX_ACCELERATOR,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::terminal::{TerminalCues, TerminalDisplay};

const EMPTY_RECORD: &str =
    "Cannot Record: the timer is at 00:00:00. Please start the timer before recording.";

const HELP: &str = "commands: start | pause | cancel | record | ref <text> | status | help | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Override timer.time_accelerator for this session
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_ACCELERATOR)))]
    accelerator: Option<u32>,
    /// Reference attached to the recorded entry
    #[arg(long)]
    reference: Option<String>,
    /// Keep entries in memory only
    #[arg(long)]
    ephemeral: bool,
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Cancel,
    Record,
    Reference(String),
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" | "s" => Command::Start,
        "pause" | "p" => Command::Pause,
        "cancel" | "c" => Command::Cancel,
        "record" | "r" => Command::Record,
        "ref" | "reference" => Command::Reference(rest.to_string()),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

fn print_status(snap: &SessionSnapshot) {
    println!();
    println!("mode:       {:?}", snap.mode);
    println!("color:      {:?}", snap.color);
    println!("task time:  {}", snap.main);
    println!("focus:      {}", snap.continuous);
    println!("max focus:  {}", snap.max_focus);
    if let Some(remaining) = &snap.break_remaining {
        println!("break left: {remaining}");
    }
    if !snap.reference.is_empty() {
        println!("reference:  {}", snap.reference);
    }
    if snap.can_resume {
        println!("(start to resume the current task)");
    }
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let scale = args
        .accelerator
        .map_or_else(|| config.time_scale(), TimeScale::new);

    let session = Session::new(scale);
    let display = TerminalDisplay::new(config.ui.dark_mode);
    let cues = TerminalCues::new(config.notifications.sound_enabled);
    let controller = if args.ephemeral {
        FocusController::new(session, MemoryEntryLog::new(), display, cues)
    } else {
        FocusController::new(session, Database::open()?, display, cues)
    };
    if let Some(reference) = args.reference {
        controller.set_reference(reference).await;
    }

    info!(accelerator = scale.accelerator(), "interactive session");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("\n{e}\n{HELP}");
                continue;
            }
        };

        match command {
            Command::Start => {
                controller.start().await;
            }
            Command::Pause => {
                controller.pause().await;
            }
            Command::Cancel => {
                controller.cancel().await;
            }
            Command::Record => match controller.record().await {
                Ok(entry) => println!(
                    "\nrecorded {}  task {}  max focus {}  {}",
                    entry.id, entry.total_task_time, entry.max_focus_time, entry.reference
                ),
                Err(CoreError::InvalidRecord) => println!("\n{EMPTY_RECORD}"),
                // The session is untouched, so the user can retry.
                Err(e) => {
                    warn!("record failed: {e}");
                    println!("\nCould not record: {e}");
                }
            },
            Command::Reference(text) => controller.set_reference(text).await,
            Command::Status => print_status(&controller.snapshot().await),
            Command::Help => println!("\n{HELP}"),
            Command::Quit => break,
        }
    }

    // Unrecorded time is dropped on the way out.
    controller.cancel().await;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(parse_command("start"), Ok(Some(Command::Start)));
        assert_eq!(parse_command("  PAUSE \n"), Ok(Some(Command::Pause)));
        assert_eq!(parse_command("r"), Ok(Some(Command::Record)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \n"), Ok(None));
    }

    #[test]
    fn reference_keeps_inner_spacing() {
        assert_eq!(
            parse_command("ref  JIRA-12 fix  login "),
            Ok(Some(Command::Reference("JIRA-12 fix  login".into())))
        );
        assert_eq!(parse_command("ref"), Ok(Some(Command::Reference(String::new()))));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_command("launch").is_err());
    }
}
