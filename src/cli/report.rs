//! CLI commands for reports
//!
//! Funding status, account coverage, envelope balances and the cash flow
//! forecast. Every report prints as a terminal table by default and as JSON
//! with `--json`.

use clap::Args;
use serde::Serialize;

use crate::config::settings::Settings;
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::reports::{CoverageReport, EnvelopeReport, ForecastReport, FundingReport};
use crate::services::PeriodResolver;
use crate::storage::Storage;

use super::plan::resolve_today;

/// Arguments for `status`
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `coverage`
#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Period name (this_month, next_30_days, YYYY-MM, YYYY-MM-DD..YYYY-MM-DD)
    #[arg(short, long)]
    pub period: Option<String>,
    /// Evaluate as of this date and resolve relative period names against it (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `envelope`
#[derive(Args, Debug)]
pub struct EnvelopeArgs {
    /// Plan name or ID
    pub plan: String,
    /// Month to show (YYYY-MM, defaults to this month)
    #[arg(short, long)]
    pub month: Option<String>,
    /// Also show this many preceding months
    #[arg(long, default_value = "0")]
    pub history: u32,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `forecast`
#[derive(Args, Debug)]
pub struct ForecastArgs {
    /// Number of months to forecast (defaults to the configured horizon)
    #[arg(short, long)]
    pub months: Option<u32>,
    /// First forecast month (YYYY-MM, defaults to this month)
    #[arg(short, long)]
    pub from: Option<String>,
    /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn print_json<T: Serialize>(report: &T) -> EnvelopeResult<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Handle the funding status report
pub fn handle_status_command(
    storage: &Storage,
    settings: &Settings,
    args: StatusArgs,
) -> EnvelopeResult<()> {
    let today = resolve_today(args.date.as_deref())?;
    let report = FundingReport::generate(storage, today)?;

    if args.json {
        return print_json(&report);
    }
    print!(
        "{}",
        report.format_terminal(&settings.currency_symbol, &settings.date_format)
    );
    Ok(())
}

/// Handle the account coverage report
pub fn handle_coverage_command(
    storage: &Storage,
    settings: &Settings,
    args: CoverageArgs,
) -> EnvelopeResult<()> {
    let today = resolve_today(args.date.as_deref())?;
    let period_name = args.period.as_deref().unwrap_or(&settings.default_period);
    let period = PeriodResolver::new(today).resolve(period_name)?;
    let report = CoverageReport::generate(storage, period, today)?;

    if args.json {
        return print_json(&report);
    }
    print!(
        "{}",
        report.format_terminal(&settings.currency_symbol, &settings.date_format)
    );
    Ok(())
}

/// Handle the envelope balance report
pub fn handle_envelope_command(
    storage: &Storage,
    settings: &Settings,
    args: EnvelopeArgs,
) -> EnvelopeResult<()> {
    let resolver = PeriodResolver::new(resolve_today(None)?);
    let month = match args.month.as_deref() {
        Some(m) => resolver.month(m)?,
        None => resolver.current_month(),
    };
    let report = EnvelopeReport::generate(storage, &args.plan, month, args.history)?;

    if args.json {
        return print_json(&report);
    }
    print!("{}", report.format_terminal(&settings.currency_symbol));
    Ok(())
}

/// Handle the cash flow forecast
pub fn handle_forecast_command(
    storage: &Storage,
    settings: &Settings,
    args: ForecastArgs,
) -> EnvelopeResult<()> {
    let today = resolve_today(args.date.as_deref())?;
    let resolver = PeriodResolver::new(today);
    let start = match args.from.as_deref() {
        Some(m) => resolver.month(m)?,
        None => resolver.current_month(),
    };
    let months = args.months.unwrap_or(settings.forecast_months);
    if months == 0 {
        return Err(EnvelopeError::Validation(
            "--months must be at least 1".into(),
        ));
    }

    let report = ForecastReport::generate(storage, today, start, months, settings.history_months)?;

    if args.json {
        return print_json(&report);
    }
    print!("{}", report.format_terminal(&settings.currency_symbol));
    Ok(())
}
