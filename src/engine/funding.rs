//! Expected-funded projection and funding status
//!
//! The projector does not know a plan's real balance. It assumes a saver who
//! started putting the declared monthly contribution aside exactly early
//! enough to reach the effective target on the due date, and reports what
//! that saver would hold today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ExpensePlan, Money, MonthPeriod, PlanId, PlanPurpose, PlanType};

use super::contribution::effective_target_cents;
use super::schedule::{fractional_months_between, sub_months};

/// Expected funding at or above this share of the target is "almost ready"
pub const ALMOST_READY_RATIO: f64 = 0.8;

/// Contributions may fall this far short of the required rate and still
/// count as on track
pub const CONTRIBUTION_TOLERANCE: f64 = 0.9;

/// Where a plan stands against its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingStatus {
    Funded,
    AlmostReady,
    OnTrack,
    Behind,
}

impl fmt::Display for FundingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funded => write!(f, "Funded"),
            Self::AlmostReady => write!(f, "Almost ready"),
            Self::OnTrack => write!(f, "On track"),
            Self::Behind => write!(f, "Behind"),
        }
    }
}

/// Funding status record for one plan
#[derive(Debug, Clone, Serialize)]
pub struct PlanFundingStatus {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub plan_type: PlanType,
    pub purpose: PlanPurpose,
    pub status: FundingStatus,
    pub effective_target: Money,
    pub monthly_contribution: Money,
    pub expected_funded: Money,
    /// Effective target minus expected funded, never negative; always zero
    /// for spending budgets
    pub shortfall: Money,
    pub progress_percent: f64,
    pub next_due_date: Option<NaiveDate>,
    pub months_until_due: Option<f64>,
    pub required_monthly: Option<Money>,
    /// Fixed monthly plans only: the due day has been reached this month
    pub current_month_payment_made: bool,
}

/// The due date funding math runs against: the cached next due date, else
/// the recurrence's own target date
pub fn resolved_due_date(plan: &ExpensePlan) -> Option<NaiveDate> {
    plan.next_due_date.or_else(|| plan.recurrence.target_date())
}

/// What a disciplined saver would have set aside for this plan by `today`
///
/// Zero for spending budgets, for plans without a positive contribution or
/// target, for plans with no resolvable due date, and before the date saving
/// needed to start. Never exceeds the effective target.
pub fn expected_funded_by_now(plan: &ExpensePlan, today: NaiveDate) -> Money {
    Money::from_cents_f64(expected_funded_cents(plan, today))
}

fn expected_funded_cents(plan: &ExpensePlan, today: NaiveDate) -> f64 {
    if !plan.is_sinking_fund() {
        return 0.0;
    }

    let monthly = plan.monthly_contribution.cents_f64();
    let target = effective_target_cents(plan);
    if monthly <= 0.0 || target <= 0.0 {
        return 0.0;
    }

    let Some(due) = resolved_due_date(plan) else {
        return 0.0;
    };

    let months_needed = (target / monthly).ceil() as u32;
    let saving_start = sub_months(due, months_needed);
    if today < saving_start {
        return 0.0;
    }

    let elapsed = fractional_months_between(saving_start, today);
    (elapsed * monthly).min(target)
}

/// Classify a plan and assemble its funding status record
pub fn funding_status(plan: &ExpensePlan, today: NaiveDate) -> PlanFundingStatus {
    let target_cents = effective_target_cents(plan);
    let expected_cents = expected_funded_cents(plan, today);
    let due = resolved_due_date(plan);
    let months_until_due = due.map(|d| fractional_months_between(today, d));

    let mut required_monthly = None;
    let mut current_month_payment_made = false;

    let status = if plan.plan_type == PlanType::FixedMonthly {
        current_month_payment_made = due_day_reached(plan, today);
        if current_month_payment_made {
            FundingStatus::Funded
        } else {
            FundingStatus::OnTrack
        }
    } else if !plan.is_sinking_fund() {
        FundingStatus::OnTrack
    } else {
        match months_until_due {
            None => FundingStatus::OnTrack,
            Some(months) => {
                if months > 1.0 {
                    required_monthly = Some(Money::from_cents_f64(target_cents / months));
                }
                classify(
                    months,
                    expected_cents,
                    target_cents,
                    plan.monthly_contribution.cents_f64(),
                )
            }
        }
    };

    let effective_target = Money::from_cents_f64(target_cents);
    let expected_funded = Money::from_cents_f64(expected_cents);
    let shortfall = if plan.is_sinking_fund() {
        (effective_target - expected_funded).non_negative()
    } else {
        Money::zero()
    };

    PlanFundingStatus {
        plan_id: plan.id,
        plan_name: plan.name.clone(),
        plan_type: plan.plan_type,
        purpose: plan.purpose,
        status,
        effective_target,
        monthly_contribution: plan.monthly_contribution,
        expected_funded,
        shortfall,
        progress_percent: expected_funded.percent_of(effective_target),
        next_due_date: due,
        months_until_due,
        required_monthly,
        current_month_payment_made,
    }
}

/// Time-based classification for sinking funds with a due date
fn classify(months_until_due: f64, expected: f64, target: f64, monthly: f64) -> FundingStatus {
    if months_until_due <= 1.0 {
        return if expected >= target {
            FundingStatus::Funded
        } else if expected >= ALMOST_READY_RATIO * target {
            FundingStatus::AlmostReady
        } else {
            FundingStatus::Behind
        };
    }

    let required = target / months_until_due;
    if monthly >= CONTRIBUTION_TOLERANCE * required {
        if expected >= ALMOST_READY_RATIO * target {
            FundingStatus::AlmostReady
        } else {
            FundingStatus::OnTrack
        }
    } else {
        FundingStatus::Behind
    }
}

/// A monthly bill counts as paid once its due day this month has arrived
fn due_day_reached(plan: &ExpensePlan, today: NaiveDate) -> bool {
    plan.recurrence
        .due_day()
        .is_some_and(|day| today >= MonthPeriod::containing(today).day(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn yearly_fund(target: i64, monthly: i64, due: NaiveDate) -> ExpensePlan {
        ExpensePlan::yearly("Insurance", Money::from_cents(target), due.month(), 1)
            .with_monthly_contribution(Money::from_cents(monthly))
            .with_next_due_date(due)
    }

    // ============================================
    // Expected Funded Tests
    // ============================================

    #[test]
    fn test_expected_before_saving_start_is_zero() {
        // 1200 at 100/mo needs 12 months; due in 18 months
        let plan = yearly_fund(120000, 10000, date(2026, 7, 10));
        assert_eq!(expected_funded_by_now(&plan, date(2025, 1, 10)), Money::zero());
    }

    #[test]
    fn test_expected_accumulates_linearly() {
        // Saving started 2024-04-10; nine months elapsed
        let plan = yearly_fund(120000, 10000, date(2025, 4, 10));
        assert_eq!(expected_funded_by_now(&plan, date(2025, 1, 10)).cents(), 90000);

        // Half a month later (15 of 30 days)
        assert_eq!(expected_funded_by_now(&plan, date(2025, 1, 25)).cents(), 95000);
    }

    #[test]
    fn test_expected_is_capped_at_effective_target() {
        let plan = yearly_fund(120000, 10000, date(2025, 4, 10));
        assert_eq!(expected_funded_by_now(&plan, date(2025, 9, 1)).cents(), 120000);
    }

    #[test]
    fn test_expected_uses_seasonal_per_occurrence_target() {
        let plan = ExpensePlan::seasonal("Camp", Money::from_cents(90000), [6, 7, 8])
            .with_monthly_contribution(Money::from_cents(7500))
            .with_next_due_date(date(2025, 6, 1));
        // Per-occurrence target 300 / 75 = 4 months, start 2025-02-01
        assert_eq!(expected_funded_by_now(&plan, date(2025, 4, 1)).cents(), 15000);
        assert_eq!(expected_funded_by_now(&plan, date(2025, 8, 1)).cents(), 30000);
    }

    #[test]
    fn test_expected_falls_back_to_target_date() {
        let plan = ExpensePlan::one_time("Laptop", Money::from_cents(60000), date(2025, 7, 1))
            .with_monthly_contribution(Money::from_cents(10000));
        // 6 months needed, start 2025-01-01, 3 months elapsed
        assert_eq!(expected_funded_by_now(&plan, date(2025, 4, 1)).cents(), 30000);
    }

    #[test]
    fn test_expected_zero_guards() {
        let no_contribution = yearly_fund(120000, 0, date(2025, 4, 10));
        assert_eq!(expected_funded_by_now(&no_contribution, date(2025, 1, 10)), Money::zero());

        let no_target = yearly_fund(0, 10000, date(2025, 4, 10));
        assert_eq!(expected_funded_by_now(&no_target, date(2025, 1, 10)), Money::zero());

        let no_due = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 4, 10)
            .with_monthly_contribution(Money::from_cents(10000));
        assert_eq!(expected_funded_by_now(&no_due, date(2025, 1, 10)), Money::zero());

        let budget = yearly_fund(120000, 10000, date(2025, 4, 10))
            .with_purpose(PlanPurpose::SpendingBudget);
        assert_eq!(expected_funded_by_now(&budget, date(2025, 1, 10)), Money::zero());
    }

    #[test]
    fn test_expected_is_monotonic_and_bounded() {
        let plan = yearly_fund(100000, 7000, date(2025, 11, 30));
        let target = effective_target_cents(&plan) as i64;
        let mut previous = Money::zero();
        let start = date(2024, 6, 1);

        for offset in 0..700 {
            let today = start + Duration::days(offset);
            let expected = expected_funded_by_now(&plan, today);
            assert!(expected >= previous, "decreased on {}", today);
            assert!(expected.cents() <= target);
            previous = expected;
        }
        assert_eq!(previous.cents(), target);
    }

    // ============================================
    // Status Classification Tests
    // ============================================

    #[test]
    fn test_yearly_fund_due_in_three_months_is_behind() {
        let plan = yearly_fund(120000, 10000, date(2025, 4, 10));
        let status = funding_status(&plan, date(2025, 1, 10));

        assert_eq!(status.status, FundingStatus::Behind);
        assert_eq!(status.expected_funded.cents(), 90000);
        assert_eq!(status.shortfall.cents(), 30000);
        assert_eq!(status.required_monthly.unwrap().cents(), 40000);
        assert_eq!(status.progress_percent, 75.0);
    }

    #[test]
    fn test_fixed_monthly_due_day_passed_is_funded() {
        let plan = ExpensePlan::fixed_monthly("Internet", Money::from_cents(7207), 5);
        let status = funding_status(&plan, date(2025, 1, 10));

        assert_eq!(status.status, FundingStatus::Funded);
        assert!(status.current_month_payment_made);
        assert_eq!(status.monthly_contribution.cents(), 7207);
    }

    #[test]
    fn test_fixed_monthly_before_due_day_is_on_track() {
        let plan = ExpensePlan::fixed_monthly("Internet", Money::from_cents(7207), 20);
        let status = funding_status(&plan, date(2025, 1, 10));

        assert_eq!(status.status, FundingStatus::OnTrack);
        assert!(!status.current_month_payment_made);
    }

    #[test]
    fn test_fixed_monthly_due_today_counts_as_paid() {
        let plan = ExpensePlan::fixed_monthly("Rent", Money::from_cents(150000), 10);
        assert!(funding_status(&plan, date(2025, 1, 10)).current_month_payment_made);
    }

    #[test]
    fn test_no_due_date_is_on_track() {
        let plan = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 4, 10)
            .with_monthly_contribution(Money::from_cents(100));
        let status = funding_status(&plan, date(2025, 1, 10));
        assert_eq!(status.status, FundingStatus::OnTrack);
        assert!(status.next_due_date.is_none());
    }

    #[test]
    fn test_spending_budget_is_on_track() {
        let plan = yearly_fund(120000, 100, date(2025, 1, 20))
            .with_purpose(PlanPurpose::SpendingBudget);
        let status = funding_status(&plan, date(2025, 1, 10));
        assert_eq!(status.status, FundingStatus::OnTrack);
        assert_eq!(status.shortfall, Money::zero());
    }

    #[test]
    fn test_due_date_reached_with_full_savings_is_funded() {
        let plan = yearly_fund(120000, 10000, date(2025, 4, 10));
        assert_eq!(
            funding_status(&plan, date(2025, 4, 10)).status,
            FundingStatus::Funded
        );
    }

    #[test]
    fn test_within_a_month_and_not_started_is_behind() {
        // 1200 at 2000/mo needs a single month; saving starts today
        let plan = yearly_fund(120000, 200000, date(2025, 2, 10));
        let status = funding_status(&plan, date(2025, 1, 10));
        assert_eq!(status.expected_funded, Money::zero());
        assert_eq!(status.status, FundingStatus::Behind);
    }

    #[test]
    fn test_long_horizon_with_adequate_contribution_is_on_track() {
        let plan = yearly_fund(120000, 10000, date(2026, 1, 10));
        assert_eq!(
            funding_status(&plan, date(2025, 1, 10)).status,
            FundingStatus::OnTrack
        );
    }

    #[test]
    fn test_classify_thresholds() {
        // Within a month
        assert_eq!(classify(0.5, 1000.0, 1000.0, 100.0), FundingStatus::Funded);
        assert_eq!(classify(1.0, 800.0, 1000.0, 100.0), FundingStatus::AlmostReady);
        assert_eq!(classify(0.2, 799.0, 1000.0, 100.0), FundingStatus::Behind);

        // Longer horizon: required 1000 / 4 = 250, tolerance floor 225
        assert_eq!(classify(4.0, 0.0, 1000.0, 225.0), FundingStatus::OnTrack);
        assert_eq!(classify(4.0, 850.0, 1000.0, 225.0), FundingStatus::AlmostReady);
        assert_eq!(classify(4.0, 850.0, 1000.0, 224.0), FundingStatus::Behind);
    }
}
