//! CLI subcommand definitions.

use clap::Subcommand;

use crate::core::PeriodType;

#[derive(Debug, Clone, Copy, Subcommand)]
pub(crate) enum Commands {
    /// Recompute day reports
    Daily,
    /// Recompute ISO-week reports
    Weekly,
    /// Recompute calendar-month reports
    Monthly,
}

impl Commands {
    pub(crate) fn period(self) -> PeriodType {
        match self {
            Commands::Daily => PeriodType::Day,
            Commands::Weekly => PeriodType::Week,
            Commands::Monthly => PeriodType::Month,
        }
    }
}
