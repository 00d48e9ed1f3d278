//! Funding and forecasting engine
//!
//! Everything in here is synchronous, deterministic arithmetic over plans
//! that have already been loaded. Missing schedule fields degrade to `None`
//! or zero instead of failing. The only I/O happens through the
//! [`SpendingLedger`] and [`HistoryAggregator`] traits, which the storage
//! layer implements.

pub mod contribution;
pub mod envelope;
pub mod forecast;
pub mod funding;
pub mod obligation;
pub mod schedule;

pub use contribution::{effective_target, implied_monthly_contribution};
pub use envelope::{EnvelopeBalance, EnvelopeCalculator, EnvelopeStatus, SpendingLedger};
pub use forecast::{
    CashFlowForecast, CashFlowForecaster, ForecastMonth, HistoryAggregator, IncomeSource,
};
pub use funding::{expected_funded_by_now, funding_status, FundingStatus, PlanFundingStatus};
pub use obligation::{obligation_in_period, Obligation};
pub use schedule::{fractional_months_between, months_between, next_due_date};
