//! envelope-planner - expense plan funding and cash flow forecasting
//!
//! Expense plans are virtual envelopes: a yearly insurance premium, a
//! seasonal camp fee, a monthly internet bill. This library works out when
//! each plan next falls due, how much should have been set aside by now,
//! what part of a plan's cost lands in a given period, how much each
//! envelope holds month to month, and where the balance is heading.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: `tracing` subscriber setup
//! - `models`: Core data models (plans, income plans, accounts, payments)
//! - `engine`: The pure calculation core
//! - `storage`: JSON file storage layer
//! - `services`: Plan lookup, schedule refresh and period resolution
//! - `reports`: Funding status, coverage, envelope and forecast reports
//! - `display`: Terminal table formatting
//! - `cli`: Command handlers for the `envelope-plan` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_planner::config::paths::PlannerPaths;
//! use envelope_planner::reports::FundingReport;
//! use envelope_planner::storage::Storage;
//!
//! let storage = Storage::new(PlannerPaths::new()?)?;
//! storage.load_all()?;
//! let report = FundingReport::generate(&storage, chrono::Local::now().date_naive())?;
//! print!("{}", report.format_terminal("$", "%Y-%m-%d"));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{EnvelopeError, EnvelopeResult};
