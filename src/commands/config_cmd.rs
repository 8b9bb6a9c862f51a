use clap::{Args, Subcommand};
use serde_json::json;

use crate::config::Config;

use super::OutputFormat;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        // The token value is never printed, only whether
                        // one is configured and where it came from.
                        let value = json!({
                            "config_file": config.config_file,
                            "api_url": {
                                "value": config.api_url.value,
                                "source": config.api_url.source,
                            },
                            "api_token": {
                                "set": config.api_token.is_some(),
                                "source": config.api_token.as_ref().map(|t| t.source),
                            },
                            "base_id": {
                                "value": config.base_id.as_ref().map(|b| b.value.clone()),
                                "source": config.base_id.as_ref().map(|b| b.source),
                            },
                            "tasks_table": {
                                "value": config.tasks_table.value,
                                "source": config.tasks_table.source,
                            },
                            "journal_table": {
                                "value": config.journal_table.value,
                                "source": config.journal_table.source,
                            },
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("api_url: {}", config.api_url.value);
                        println!("  source: {}", config.api_url.source);
                        println!();

                        match &config.api_token {
                            Some(token) => {
                                println!("api_token: (set)");
                                println!("  source: {}", token.source);
                            }
                            None => println!("api_token: (not set)"),
                        }
                        println!();

                        match &config.base_id {
                            Some(base) => {
                                println!("base_id: {}", base.value);
                                println!("  source: {}", base.source);
                            }
                            None => println!("base_id: (not set)"),
                        }
                        println!();

                        println!("tasks_table: {}", config.tasks_table.value);
                        println!("  source: {}", config.tasks_table.source);
                        println!();

                        println!("journal_table: {}", config.journal_table.value);
                        println!("  source: {}", config.journal_table.source);
                    }
                }
                Ok(())
            }
        }
    }
}
