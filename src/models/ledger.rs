//! Ledger and history records read by the engine
//!
//! `Payment` is a spending entry linked to a plan; entries flagged `unlinked`
//! stay in the ledger for audit but no longer count against the envelope.
//! The history rows are per-month aggregates the persistence layer keeps so
//! the forecaster can fall back to trailing averages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, PaymentId, PlanId};
use super::money::Money;
use super::period::MonthPeriod;

/// A payment made out of a plan's envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub plan_id: PlanId,
    pub date: NaiveDate,
    /// Amount spent, positive
    pub amount: Money,
    #[serde(default)]
    pub unlinked: bool,
    #[serde(default)]
    pub memo: String,
}

impl Payment {
    pub fn new(plan_id: PlanId, date: NaiveDate, amount: Money) -> Self {
        Self {
            id: PaymentId::new(),
            plan_id,
            date,
            amount,
            unlinked: false,
            memo: String::new(),
        }
    }

    pub fn unlink(mut self) -> Self {
        self.unlinked = true;
        self
    }
}

/// Spending recorded against a category in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpend {
    pub month: MonthPeriod,
    pub category_id: CategoryId,
    pub amount: Money,
}

/// Income and expense totals for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: Money,
    pub expense: Money,
}

impl MonthlyTotals {
    pub fn has_activity(&self) -> bool {
        !self.income.is_zero() || !self.expense.is_zero()
    }
}

/// A stored `MonthlyTotals` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthTotalsRecord {
    pub month: MonthPeriod,
    #[serde(flatten)]
    pub totals: MonthlyTotals,
}

/// Trailing monthly average spend for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category_id: CategoryId,
    pub amount: Money,
}
