//! Config command - show and change settings.json

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use orphancare_core::config::Config;
use orphancare_core::services::LogEvent;

use super::{get_data_dir, get_logger, log_event};
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Point the client at another API deployment
    SetUrl {
        /// Base URL of the API functions
        url: String,
    },
    /// Show demo statistics when live statistics cannot be loaded
    Fallback {
        #[arg(value_enum)]
        state: Toggle,
    },
}

impl ConfigCommands {
    pub fn json(&self) -> bool {
        matches!(self, ConfigCommands::Show { json: true })
    }
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir();
    let mut config = Config::load(&data_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "api_base_url": config.api_base_url,
                        "anon_key_set": config.anon_key.is_some(),
                        "timeout_secs": config.timeout_secs,
                        "demo_fallback": config.demo_fallback,
                        "data_dir": data_dir.to_string_lossy(),
                    })
                );
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["API URL".to_string(), config.api_base_url.clone()]);
            table.add_row(vec![
                "Anon key".to_string(),
                if config.anon_key.is_some() { "set" } else { "not set" }.to_string(),
            ]);
            table.add_row(vec![
                "Timeout".to_string(),
                format!("{}s", config.timeout_secs),
            ]);
            table.add_row(vec![
                "Demo fallback".to_string(),
                if config.demo_fallback { "on" } else { "off" }.to_string(),
            ]);
            table.add_row(vec![
                "Data directory".to_string(),
                data_dir.display().to_string(),
            ]);
            println!("{}", "Settings".bold());
            println!("{}", table);
        }
        ConfigCommands::SetUrl { url } => {
            config.set_api_base_url(&url)?;
            config.save(&data_dir)?;
            log_event(&get_logger(), LogEvent::new("config_changed").with_command("config set-url"));
            output::success(&format!("API URL set to {}", config.api_base_url));
            output::info("Stored sessions belong to the previous API. Run `oc login` again.");
        }
        ConfigCommands::Fallback { state } => {
            config.demo_fallback = matches!(state, Toggle::On);
            config.save(&data_dir)?;
            log_event(&get_logger(), LogEvent::new("config_changed").with_command("config fallback"));
            if config.demo_fallback {
                output::success("Demo fallback enabled.");
            } else {
                output::success("Demo fallback disabled. Dashboard errors will be shown as-is.");
            }
        }
    }

    Ok(())
}
