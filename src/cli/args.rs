//! CLI argument definitions and validation into run options.

use clap::Parser;

use crate::error::AppError;
use crate::pipeline::RunOptions;
use crate::utils::parse_date;

use super::commands::Commands;

#[derive(Parser)]
#[command(name = "storecalc")]
#[command(about = "Recompute and reconcile store performance reports", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Start of the date range (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) from: Option<String>,

    /// End of the date range (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) to: Option<String>,

    /// Single store to process
    #[arg(short, long, global = true, conflicts_with = "stores")]
    pub(crate) store: Option<String>,

    /// Comma-separated stores to process
    #[arg(long, global = true, value_delimiter = ',')]
    pub(crate) stores: Vec<String>,

    /// Compute and print the diff without writing anything
    #[arg(long, global = true)]
    pub(crate) dry_run: bool,
}

impl Cli {
    /// Validate the invocation before any pipeline starts.
    pub(crate) fn run_options(&self) -> Result<RunOptions, AppError> {
        let from = parse_date(
            self.from
                .as_deref()
                .ok_or(AppError::MissingArgument { name: "from" })?,
        )?;
        let to = parse_date(
            self.to
                .as_deref()
                .ok_or(AppError::MissingArgument { name: "to" })?,
        )?;
        if from > to {
            return Err(AppError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let stores: Vec<String> = match &self.store {
            Some(store) => vec![store.clone()],
            None => self
                .stores
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };
        if stores.is_empty() {
            return Err(AppError::NoStores);
        }

        Ok(RunOptions {
            period: self.command.period(),
            from,
            to,
            stores,
            dry_run: self.dry_run,
        })
    }
}
