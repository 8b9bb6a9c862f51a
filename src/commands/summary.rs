use clap::Args;

use crate::session::Session;
use crate::store::TableStore;

use super::OutputFormat;

/// Print task counts by priority.
#[derive(Args)]
pub struct SummaryCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SummaryCommand {
    pub fn run<S: TableStore + Clone>(
        &self,
        session: &Session<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let summary = session.priority_summary();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                println!("📊 Priority Counts");
                for (priority, count) in summary.entries() {
                    println!("{} {}: {}", priority.icon(), priority, count);
                }
                println!("\nTotal: {} task(s)", summary.total());
            }
        }
        Ok(())
    }
}
