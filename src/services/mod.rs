//! Service layer for the envelope planner
//!
//! Services sit on top of the storage layer. They resolve user-facing names
//! (plan names, period names) into the values the engine works with and
//! reject invalid input before the engine ever sees it.

pub mod period;
pub mod plan;

pub use period::PeriodResolver;
pub use plan::{PlanService, RefreshSummary, UpcomingDue};
