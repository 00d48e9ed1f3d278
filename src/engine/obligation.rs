//! Period obligation decomposition
//!
//! Splits a plan's cost into the part that falls due inside an arbitrary
//! window. Coverage reports call this once per plan for the reporting period
//! and the forecaster calls it once per plan per forecast month, so this
//! branch table decides "how much is due when" for both.

use chrono::Datelike;
use serde::Serialize;

use crate::models::{ExpensePlan, Money, MonthPeriod, Period, PlanType, Recurrence};

use super::contribution::effective_target_cents;
use super::schedule::{due_day_occurrences, months_touched};

/// The share of one plan's cost that falls inside a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Obligation {
    pub amount: Money,
    pub has_obligation: bool,
    pub occurrences: u32,
}

impl Obligation {
    pub fn none() -> Self {
        Self::default()
    }

    fn recurring(each: Money, occurrences: u32) -> Self {
        Self {
            amount: each * occurrences,
            has_obligation: occurrences > 0,
            occurrences,
        }
    }

    /// A lump amount that is either inside the window or not
    fn lump(amount: Money, in_window: bool) -> Self {
        if in_window {
            Self::recurring(amount, 1)
        } else {
            Self::none()
        }
    }
}

/// How much of `plan` falls due within `period`
pub fn obligation_in_period(plan: &ExpensePlan, period: &Period) -> Obligation {
    match plan.plan_type {
        PlanType::FixedMonthly => match plan.recurrence.due_day() {
            Some(day) => {
                Obligation::recurring(plan.monthly_contribution, due_day_occurrences(day, period))
            }
            None => Obligation::none(),
        },
        PlanType::YearlyFixed | PlanType::YearlyVariable => {
            if plan.is_sinking_fund() {
                Obligation::lump(plan.target_amount, yearly_due_in(plan, period))
            } else if plan.monthly_contribution.is_zero() {
                Obligation::none()
            } else {
                // Ongoing monthly cost, at most once per window
                Obligation::recurring(plan.monthly_contribution, 1)
            }
        }
        PlanType::MultiYear => {
            let due = plan.recurrence.target_date().or(plan.next_due_date);
            Obligation::lump(plan.target_amount, due.is_some_and(|d| period.contains(d)))
        }
        PlanType::Seasonal => seasonal_obligation(plan, period),
        PlanType::EmergencyFund => Obligation::none(),
        PlanType::Goal => Obligation::recurring(plan.monthly_contribution, months_touched(period)),
        PlanType::OneTime => {
            let due = plan.next_due_date.or_else(|| plan.recurrence.target_date());
            Obligation::lump(plan.target_amount, due.is_some_and(|d| period.contains(d)))
        }
    }
}

/// Whether a yearly sinking fund falls due in the window: the cached due date
/// when there is one, else the recurrence's month/day in any year the window
/// spans
fn yearly_due_in(plan: &ExpensePlan, period: &Period) -> bool {
    if let Some(due) = plan.next_due_date {
        return period.contains(due);
    }

    let Recurrence::Yearly {
        due_month: Some(month),
        due_day: Some(day),
    } = &plan.recurrence
    else {
        return false;
    };

    (period.start.year()..=period.end.year())
        .map(|year| MonthPeriod::new(year, *month).day(*day))
        .any(|date| period.contains(date))
}

fn seasonal_obligation(plan: &ExpensePlan, period: &Period) -> Obligation {
    let months = plan.recurrence.seasonal_months();
    if months.is_empty() {
        return Obligation::none();
    }

    let occurrences = period
        .months()
        .filter(|m| months.contains(&m.month))
        .count() as u32;

    let total = effective_target_cents(plan) * f64::from(occurrences);
    Obligation {
        amount: Money::from_cents_f64(total),
        has_obligation: occurrences > 0,
        occurrences,
    }
}
