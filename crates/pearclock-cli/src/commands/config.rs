use clap::Subcommand;
use pearclock_core::{Config, TimeScale};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-path key, e.g. "timer.time_accelerator" or "ui.dark_mode"
        key: String,
    },
    /// Change one setting and save it
    Set {
        key: String,
        value: String,
    },
    /// Print every setting as `key = value`
    List {
        /// Print the whole config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Write the default settings back to disk
    Reset,
}

/// Human reading of the accelerator, shown after it changes.
fn describe_scale(scale: TimeScale) -> String {
    if scale.accelerator() == 1 {
        "real time".to_string()
    } else {
        format!(
            "one simulated minute every {} ms",
            scale.minutes(1).as_millis()
        )
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    // Reset must work even when the file on disk no longer parses.
    if let ConfigAction::Reset = action {
        let config = Config::default();
        config.save()?;
        for (key, value) in config.entries() {
            println!("{key} = {value}");
        }
        return Ok(());
    }

    let mut config = Config::load()?;
    match action {
        ConfigAction::Get { key } => {
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            // Echo what was stored, not what was typed.
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
            if key == "timer.time_accelerator" {
                println!("({})", describe_scale(config.time_scale()));
            }
        }
        ConfigAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in config.entries() {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {}
    }
    Ok(())
}
