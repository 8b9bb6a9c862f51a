mod config_cmd;
mod journal;
mod summary;
mod task;

pub use config_cmd::ConfigCommand;
pub use journal::JournalCommand;
pub use summary::SummaryCommand;
pub use task::TaskCommand;

use clap::ValueEnum;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
