//! Display formatting for terminal output
//!
//! Provides utilities for formatting plans, income and reports for terminal
//! display. Tables are rendered with `tabled`.

pub mod income;
pub mod plan;
pub mod report;
pub mod table;

pub use income::format_income_list;
pub use plan::{format_plan_details, format_plan_list, format_upcoming};
pub use table::render_table;
