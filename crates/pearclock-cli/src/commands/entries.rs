use clap::Subcommand;
use pearclock_core::storage::Database;
use pearclock_core::{clear_entries, export_tsv, ClearOutcome, Entry, EntryLog};

use crate::terminal::{AssumeYes, StdinConfirm};

#[derive(Subcommand)]
pub enum EntriesAction {
    /// List recorded entries, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print entries as tab-separated values for pasting elsewhere
    Export,
    /// Delete every recorded entry
    Clear {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn print_table(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries recorded.");
        return;
    }
    println!(
        "{:<8}  {:<15}  {:<14}  Reference",
        "ID", "Total Task Time", "Max Focus Time"
    );
    for entry in entries {
        println!(
            "{:<8}  {:<15}  {:<14}  {}",
            entry.id, entry.total_task_time, entry.max_focus_time, entry.reference
        );
    }
}

pub async fn run(action: EntriesAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        EntriesAction::List { json } => {
            let entries = db.all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_table(&entries);
            }
        }
        EntriesAction::Export => {
            print!("{}", export_tsv(&db.all()?));
        }
        EntriesAction::Clear { yes } => {
            let outcome = if yes {
                clear_entries(&mut db, &AssumeYes).await?
            } else {
                clear_entries(&mut db, &StdinConfirm).await?
            };
            match outcome {
                ClearOutcome::AlreadyEmpty => println!("The table is already empty."),
                ClearOutcome::Cleared => println!("entries cleared"),
                ClearOutcome::Declined => println!("entries kept"),
            }
        }
    }
    Ok(())
}
