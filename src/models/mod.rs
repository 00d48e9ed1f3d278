//! Core data models for the envelope planner
//!
//! Expense plans and their recurrences, income plans, accounts, and the
//! ledger/history rows the engine reads.

pub mod account;
pub mod ids;
pub mod income;
pub mod ledger;
pub mod money;
pub mod period;
pub mod plan;

pub use account::{on_budget_total, Account, AccountType};
pub use ids::{AccountId, CategoryId, IncomePlanId, PaymentId, PlanId};
pub use income::{IncomePlan, IncomeReliability, IncomeValidationError, MonthlyAmounts};
pub use ledger::{CategoryAverage, CategorySpend, MonthTotalsRecord, MonthlyTotals, Payment};
pub use money::Money;
pub use period::{MonthPeriod, Period, PeriodParseError};
pub use plan::{
    ContributionSource, ExpensePlan, PlanPurpose, PlanType, PlanValidationError, Recurrence,
};
