use clap::{Args, Subcommand};
use std::io::{self, Write};

use crate::models::JournalEntry;
use crate::session::Session;
use crate::store::TableStore;

use super::OutputFormat;

#[derive(Args)]
pub struct JournalCommand {
    #[command(subcommand)]
    pub command: JournalSubcommand,
}

#[derive(Subcommand)]
pub enum JournalSubcommand {
    /// Save a journal entry
    Add {
        /// Entry text
        text: String,
    },

    /// List saved entries
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rewrite the entry at a given list position
    Edit {
        /// Position in the list (as shown by `journal list`)
        index: usize,

        /// New entry text
        text: String,
    },

    /// Delete the entry at a given list position
    Delete {
        /// Position in the list (as shown by `journal list`)
        index: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl JournalCommand {
    pub async fn run<S: TableStore + Clone>(
        &self,
        session: &mut Session<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            JournalSubcommand::Add { text } => {
                if text.trim().is_empty() {
                    return Err("Journal entry cannot be empty".into());
                }

                session.journal.add(JournalEntry::new(text.clone())).await?;
                println!("Saved entry.");
                Ok(())
            }

            JournalSubcommand::List { format } => {
                if session.journal.is_empty() {
                    println!("No journal entries yet. Add one with 'journal add'!");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let entries: Vec<&JournalEntry> = session.journal.values().collect();
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    }
                    OutputFormat::Text => {
                        println!("🗂️ Saved Entries");
                        for (index, entry) in session.journal.values().enumerate() {
                            println!("\nEntry {}", index + 1);
                            for line in entry.text.lines() {
                                println!("  {}", line);
                            }
                        }
                    }
                }
                Ok(())
            }

            JournalSubcommand::Edit { index, text } => {
                if text.trim().is_empty() {
                    return Err("Journal entry cannot be empty".into());
                }
                if session.journal.get(*index).is_none() {
                    return Err(format!("No journal entry at position {}", index).into());
                }

                session
                    .journal
                    .edit(*index, JournalEntry::new(text.clone()))
                    .await?;
                println!("Updated entry {}.", index + 1);
                Ok(())
            }

            JournalSubcommand::Delete { index, force } => {
                if session.journal.get(*index).is_none() {
                    return Err(format!("No journal entry at position {}", index).into());
                }

                if !force {
                    print!("Delete entry {}? [y/N] ", index + 1);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                session.journal.remove(*index).await?;
                println!("Deleted entry {}.", index + 1);
                Ok(())
            }
        }
    }
}
