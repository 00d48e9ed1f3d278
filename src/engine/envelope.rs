//! Envelope balance rollover
//!
//! A plan's envelope in month M holds what rolled over from M-1 plus this
//! month's allocation, minus what was spent. Balances are computed by
//! iterating forward from the plan's creation month and memoizing each
//! monthly snapshot, so looking up month N costs at most N ledger reads the
//! first time and none afterwards.
//!
//! A calculator assumes neither the plans nor the ledger change while it is
//! alive; build a new one per report.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::EnvelopeResult;
use crate::models::{ExpensePlan, Money, MonthPeriod, PlanId};

/// Utilization at or above this percentage counts as on budget
pub const ON_BUDGET_PERCENT: f64 = 90.0;

/// Read access to spending linked to plans
pub trait SpendingLedger {
    /// Total linked spending for a plan in one month, excluding entries
    /// flagged as unlinked
    fn sum_linked_payments(&self, plan_id: PlanId, month: MonthPeriod) -> EnvelopeResult<Money>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    UnderBudget,
    OnBudget,
    OverBudget,
}

impl EnvelopeStatus {
    pub fn from_utilization(percent: f64) -> Self {
        if percent > 100.0 {
            Self::OverBudget
        } else if percent >= ON_BUDGET_PERCENT {
            Self::OnBudget
        } else {
            Self::UnderBudget
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderBudget => write!(f, "Under budget"),
            Self::OnBudget => write!(f, "On budget"),
            Self::OverBudget => write!(f, "Over budget"),
        }
    }
}

/// One plan's envelope for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeBalance {
    pub plan_id: PlanId,
    pub month: MonthPeriod,
    pub previous_balance: Money,
    pub monthly_allocation: Money,
    pub actual_spending: Money,
    pub current_balance: Money,
    pub utilization_percent: f64,
    pub status: EnvelopeStatus,
}

impl EnvelopeBalance {
    fn compute(
        plan: &ExpensePlan,
        month: MonthPeriod,
        previous_balance: Money,
        actual_spending: Money,
    ) -> Self {
        let monthly_allocation = plan.monthly_contribution;
        let utilization_percent = actual_spending.percent_of(monthly_allocation);

        Self {
            plan_id: plan.id,
            month,
            previous_balance,
            monthly_allocation,
            actual_spending,
            current_balance: previous_balance + monthly_allocation - actual_spending,
            utilization_percent,
            status: EnvelopeStatus::from_utilization(utilization_percent),
        }
    }
}

/// Computes envelope balances over a spending ledger
pub struct EnvelopeCalculator<'a, L: SpendingLedger + ?Sized> {
    ledger: &'a L,
    /// Snapshots per plan, indexed by months since the creation month
    snapshots: HashMap<PlanId, Vec<EnvelopeBalance>>,
}

impl<'a, L: SpendingLedger + ?Sized> EnvelopeCalculator<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            snapshots: HashMap::new(),
        }
    }

    /// The envelope for `plan` in `month`
    ///
    /// Months before the plan was created have nothing to roll over from and
    /// are computed on their own.
    pub fn balance(&mut self, plan: &ExpensePlan, month: MonthPeriod) -> EnvelopeResult<EnvelopeBalance> {
        let created = MonthPeriod::containing(plan.created_at);
        let offset = created.months_until(month);
        if offset < 0 {
            let spending = self.ledger.sum_linked_payments(plan.id, month)?;
            return Ok(EnvelopeBalance::compute(plan, month, Money::zero(), spending));
        }

        let offset = offset as usize;
        let snapshots = self.snapshots.entry(plan.id).or_default();

        while snapshots.len() <= offset {
            let this_month = created.offset(snapshots.len() as i32);
            let previous = match snapshots.last() {
                Some(prior) if plan.rolls_over() => prior.current_balance.non_negative(),
                _ => Money::zero(),
            };
            let spending = self.ledger.sum_linked_payments(plan.id, this_month)?;
            snapshots.push(EnvelopeBalance::compute(plan, this_month, previous, spending));
        }

        Ok(snapshots[offset].clone())
    }

    /// Envelopes for every month from `from` through `to`, in order
    pub fn history(
        &mut self,
        plan: &ExpensePlan,
        from: MonthPeriod,
        to: MonthPeriod,
    ) -> EnvelopeResult<Vec<EnvelopeBalance>> {
        let mut months = Vec::new();
        let mut month = from;
        while month <= to {
            months.push(self.balance(plan, month)?);
            month = month.next();
        }
        Ok(months)
    }
}
