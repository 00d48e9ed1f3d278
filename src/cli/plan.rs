//! Expense plan CLI commands
//!
//! Implements CLI commands for listing and inspecting expense plans and
//! keeping their cached schedule fields current.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_plan_details, format_plan_list, format_upcoming};
use crate::engine::funding_status;
use crate::error::EnvelopeResult;
use crate::services::{PeriodResolver, PlanService};
use crate::storage::Storage;

/// Plan subcommands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// List expense plans
    List {
        /// Include inactive plans
        #[arg(short, long)]
        all: bool,
    },
    /// Show a plan's details and funding status
    Show {
        /// Plan name or ID
        plan: String,
        /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List upcoming due dates, soonest first
    #[command(alias = "due")]
    NextDue {
        /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Recompute cached due dates and calculated contributions
    Refresh {
        /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Resolve an optional `--date` argument, defaulting to today
pub(crate) fn resolve_today(date: Option<&str>) -> EnvelopeResult<NaiveDate> {
    let resolver = PeriodResolver::new(Local::now().date_naive());
    match date {
        Some(s) => resolver.date(s),
        None => Ok(resolver.today()),
    }
}

/// Handle a plan command
pub fn handle_plan_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PlanCommands,
) -> EnvelopeResult<()> {
    let service = PlanService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        PlanCommands::List { all } => {
            let plans = service.list(all)?;
            println!("{}", format_plan_list(&plans, symbol));
        }
        PlanCommands::Show { plan, date } => {
            let today = resolve_today(date.as_deref())?;
            let mut plan = service.get(&plan)?;
            let status = if plan.validate().is_ok() {
                PlanService::refresh_plan(&mut plan, today);
                Some(funding_status(&plan, today))
            } else {
                None
            };
            print!(
                "{}",
                format_plan_details(&plan, status.as_ref(), symbol, &settings.date_format)
            );
            if status.is_none() {
                println!("\nThis plan is invalid and is left out of all reports.");
            }
        }
        PlanCommands::NextDue { date } => {
            let today = resolve_today(date.as_deref())?;
            let upcoming = service.upcoming(today)?;
            println!(
                "{}",
                format_upcoming(&upcoming, today, symbol, &settings.date_format)
            );
        }
        PlanCommands::Refresh { date } => {
            let today = resolve_today(date.as_deref())?;
            let summary = service.refresh_all(today)?;
            println!(
                "Refreshed {} plan(s): {} due date(s) and {} contribution(s) updated.",
                summary.plans_checked, summary.due_dates_updated, summary.contributions_updated
            );
        }
    }

    Ok(())
}
