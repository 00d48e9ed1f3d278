//! Reports for the envelope planner
//!
//! Each report gathers what it needs from storage, runs the engine and
//! formats the result for the terminal. Reports are `Serialize` so the CLI
//! can also emit them as JSON.

pub mod coverage;
pub mod envelope;
pub mod forecast;
pub mod status;

pub use coverage::{AccountCoverage, CoverageLine, CoverageReport};
pub use envelope::EnvelopeReport;
pub use forecast::ForecastReport;
pub use status::FundingReport;
