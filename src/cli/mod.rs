//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod income;
pub mod plan;
pub mod report;

pub use income::{handle_income_command, IncomeCommands};
pub use plan::{handle_plan_command, PlanCommands};
pub use report::{
    handle_coverage_command, handle_envelope_command, handle_forecast_command,
    handle_status_command, CoverageArgs, EnvelopeArgs, ForecastArgs, StatusArgs,
};
