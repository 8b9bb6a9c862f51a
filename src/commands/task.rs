use clap::{Args, Subcommand};
use std::io::{self, Write};

use crate::models::{Category, Horizon, Priority, Task};
use crate::session::Session;
use crate::store::TableStore;

use super::OutputFormat;

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task / responsibility / wish / goal
    Add {
        /// Title of the item
        title: String,

        /// Category: task, responsibility, wish, goal
        #[arg(long)]
        category: Option<Category>,

        /// Time horizon: short, long
        #[arg(long)]
        horizon: Option<Horizon>,

        /// Priority: urgent, important, defer, wish
        #[arg(long, short)]
        priority: Option<Priority>,

        /// Notes (optional)
        #[arg(long, short)]
        notes: Option<String>,
    },

    /// List all tasks
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show tasks with this priority
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// Edit the task at a given list position
    Edit {
        /// Position in the list (as shown by `task list`)
        index: usize,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<Category>,

        /// New horizon
        #[arg(long)]
        horizon: Option<Horizon>,

        /// New priority
        #[arg(long)]
        priority: Option<Priority>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete the task at a given list position
    Delete {
        /// Position in the list (as shown by `task list`)
        index: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl TaskCommand {
    pub async fn run<S: TableStore + Clone>(
        &self,
        session: &mut Session<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            TaskSubcommand::Add {
                title,
                category,
                horizon,
                priority,
                notes,
            } => {
                if title.trim().is_empty() {
                    return Err("Task title cannot be empty".into());
                }

                let mut task = Task::new(title.trim());
                if let Some(category) = category {
                    task = task.with_category(*category);
                }
                if let Some(horizon) = horizon {
                    task = task.with_horizon(*horizon);
                }
                if let Some(priority) = priority {
                    task = task.with_priority(*priority);
                }
                if let Some(notes) = notes {
                    task = task.with_notes(notes.clone());
                }

                session.tasks.add(task.clone()).await?;
                println!("Added:");
                println!("{}", task);
                Ok(())
            }

            TaskSubcommand::List { format, priority } => {
                let tasks: Vec<(usize, &Task)> = session
                    .tasks
                    .values()
                    .enumerate()
                    .filter(|(_, t)| priority.map_or(true, |p| t.priority == p))
                    .collect();

                if tasks.is_empty() && priority.is_none() {
                    println!("No items yet. Add something with 'task add'!");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let values: Vec<&Task> = tasks.iter().map(|(_, t)| *t).collect();
                        println!("{}", serde_json::to_string_pretty(&values)?);
                    }
                    OutputFormat::Text => {
                        println!("📋 Task List");
                        for (index, task) in &tasks {
                            println!("{:>3}  {}", index, task);
                        }
                        println!("\nTotal: {} task(s)", tasks.len());
                    }
                }
                Ok(())
            }

            TaskSubcommand::Edit {
                index,
                title,
                category,
                horizon,
                priority,
                notes,
            } => {
                let has_updates = title.is_some()
                    || category.is_some()
                    || horizon.is_some()
                    || priority.is_some()
                    || notes.is_some();
                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut task = match session.tasks.get(*index) {
                    Some(task) => task.clone(),
                    None => return Err(format!("No task at position {}", index).into()),
                };

                if let Some(new_title) = title {
                    task.title = new_title.clone();
                }
                if let Some(new_category) = category {
                    task.category = *new_category;
                }
                if let Some(new_horizon) = horizon {
                    task.horizon = *new_horizon;
                }
                if let Some(new_priority) = priority {
                    task.priority = *new_priority;
                }
                if let Some(new_notes) = notes {
                    task.notes = new_notes.clone();
                }

                session.tasks.edit(*index, task.clone()).await?;
                println!("Updated:");
                println!("{}", task);
                Ok(())
            }

            TaskSubcommand::Delete { index, force } => {
                let task = match session.tasks.get(*index) {
                    Some(task) => task.clone(),
                    None => return Err(format!("No task at position {}", index).into()),
                };

                if !force {
                    print!("Delete '{}'? [y/N] ", task.title);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                session.tasks.remove(*index).await?;
                println!("Deleted: {}", task.title);
                Ok(())
            }
        }
    }
}
