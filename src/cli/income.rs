//! Income CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_income_list;
use crate::error::EnvelopeResult;
use crate::services::PeriodResolver;
use crate::storage::Storage;

use super::plan::resolve_today;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// List income plans with their amount for a month
    List {
        /// Month to show amounts for (YYYY-MM or a month name, defaults to this month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> EnvelopeResult<()> {
    match cmd {
        IncomeCommands::List { month } => {
            let resolver = PeriodResolver::new(resolve_today(None)?);
            let month = match month {
                Some(m) => resolver.month(&m)?,
                None => resolver.current_month(),
            };
            let plans = storage.income.get_all()?;
            print!(
                "{}",
                format_income_list(&plans, month, &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
