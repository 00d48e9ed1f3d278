//! Implied monthly contribution and effective target
//!
//! These figures depend only on a plan's configuration, never on what has
//! actually been saved.

use chrono::NaiveDate;

use crate::models::{ContributionSource, ExpensePlan, Money, Recurrence};

use super::schedule::months_between;

/// The per-occurrence target that funding progress is measured against
///
/// Seasonal plans store the total for the whole season in `target_amount`
/// but fall due once per listed month, so progress is tracked against
/// `target_amount / |seasonal_months|`. Every other plan uses its target
/// unchanged.
pub fn effective_target(plan: &ExpensePlan) -> Money {
    Money::from_cents_f64(effective_target_cents(plan))
}

pub(crate) fn effective_target_cents(plan: &ExpensePlan) -> f64 {
    match plan.recurrence.seasonal_months().len() {
        0 => plan.target_amount.cents_f64(),
        n => plan.target_amount.div_f64(n as f64),
    }
}

/// The monthly set-aside a plan implies
///
/// Manual contributions are returned untouched. Calculated ones spread the
/// target over the recurrence's cycle; `today` only matters for one-time
/// plans, which spread what is left over the months remaining.
pub fn implied_monthly_contribution(plan: &ExpensePlan, today: NaiveDate) -> Money {
    if plan.contribution_source == ContributionSource::Manual {
        return plan.monthly_contribution;
    }

    Money::from_cents_f64(implied_monthly_cents(plan, today))
}

fn implied_monthly_cents(plan: &ExpensePlan, today: NaiveDate) -> f64 {
    let target = plan.target_amount;

    match &plan.recurrence {
        Recurrence::Monthly { .. } => target.cents_f64(),
        Recurrence::Quarterly { .. } => target.div_f64(3.0),
        Recurrence::Yearly { .. } => target.div_f64(12.0),
        Recurrence::MultiYear {
            frequency_years, ..
        } => {
            let years = frequency_years.unwrap_or(1).max(1);
            target.div_f64(f64::from(years) * 12.0)
        }
        Recurrence::Seasonal {
            seasonal_months, ..
        } => {
            // Saving happens in the months outside the season
            let off_season = 12usize.saturating_sub(seasonal_months.len());
            if seasonal_months.is_empty() || off_season == 0 {
                target.div_f64(12.0)
            } else {
                target.div_f64(off_season as f64)
            }
        }
        Recurrence::OneTime { target_date } => match target_date {
            Some(date) => {
                let remaining = months_between(today, *date).max(1);
                target.div_f64(f64::from(remaining)).max(0.0)
            }
            None => target.div_f64(12.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanPurpose, PlanType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calculated(recurrence: Recurrence, plan_type: PlanType, target: i64) -> ExpensePlan {
        ExpensePlan::new(
            "Plan",
            PlanPurpose::SinkingFund,
            plan_type,
            recurrence,
            Money::from_cents(target),
        )
    }

    fn today() -> NaiveDate {
        date(2025, 1, 10)
    }

    #[test]
    fn test_manual_contribution_is_returned_unchanged() {
        let plan = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 6, 1)
            .with_monthly_contribution(Money::from_cents(2500));
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 2500);
    }

    #[test]
    fn test_contribution_reconstructs_target_per_cycle() {
        let cases = [
            (Recurrence::monthly(1), PlanType::FixedMonthly, 1),
            (Recurrence::quarterly(1), PlanType::YearlyVariable, 3),
            (Recurrence::yearly(6, 1), PlanType::YearlyFixed, 12),
            (Recurrence::multi_year(3, None), PlanType::MultiYear, 36),
            (Recurrence::seasonal([6, 7, 8], None), PlanType::Seasonal, 9),
        ];

        for (recurrence, plan_type, cycle_months) in cases {
            let plan = calculated(recurrence, plan_type, 100_000);
            let monthly = implied_monthly_contribution(&plan, today());
            let rebuilt = monthly.cents() * cycle_months;
            assert!(
                (rebuilt - 100_000).abs() <= cycle_months,
                "{:?}: {} x {} = {}",
                plan.recurrence,
                monthly,
                cycle_months,
                rebuilt
            );
        }
    }

    #[test]
    fn test_multi_year_defaults_to_one_year() {
        let plan = calculated(
            Recurrence::MultiYear {
                frequency_years: None,
                target_date: None,
            },
            PlanType::MultiYear,
            120000,
        );
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 10000);
    }

    #[test]
    fn test_huge_multi_year_interval_rounds_to_zero() {
        let plan = calculated(
            Recurrence::multi_year(400_000_000, None),
            PlanType::MultiYear,
            120000,
        );
        assert!(plan.validate().is_ok());
        assert!(implied_monthly_contribution(&plan, today()).is_zero());
    }

    #[test]
    fn test_seasonal_without_months_spreads_over_year() {
        let plan = calculated(Recurrence::seasonal([], None), PlanType::Seasonal, 120000);
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 10000);
    }

    #[test]
    fn test_seasonal_every_month_does_not_divide_by_zero() {
        let plan = calculated(Recurrence::seasonal(1..=12, None), PlanType::Seasonal, 120000);
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 10000);
    }

    #[test]
    fn test_one_time_spreads_over_remaining_months() {
        let plan = ExpensePlan::one_time("Laptop", Money::from_cents(120000), date(2025, 7, 10));
        // Jan 10 -> Jul 10 is six whole months
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 20000);
    }

    #[test]
    fn test_one_time_floors_remaining_months_at_one() {
        let plan = ExpensePlan::one_time("Laptop", Money::from_cents(120000), date(2025, 1, 20));
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 120000);

        let overdue = ExpensePlan::one_time("Laptop", Money::from_cents(120000), date(2024, 1, 20));
        assert_eq!(implied_monthly_contribution(&overdue, today()).cents(), 120000);
    }

    #[test]
    fn test_one_time_without_date_assumes_a_year() {
        let plan = calculated(
            Recurrence::OneTime { target_date: None },
            PlanType::OneTime,
            60000,
        );
        assert_eq!(implied_monthly_contribution(&plan, today()).cents(), 5000);
    }

    #[test]
    fn test_effective_target() {
        let seasonal = ExpensePlan::seasonal("Summer camp", Money::from_cents(90000), [6, 7, 8]);
        assert_eq!(effective_target(&seasonal).cents(), 30000);

        let yearly = ExpensePlan::yearly("Insurance", Money::from_cents(90000), 6, 1);
        assert_eq!(effective_target(&yearly).cents(), 90000);

        let empty = ExpensePlan::seasonal("Nothing", Money::from_cents(90000), []);
        assert_eq!(effective_target(&empty).cents(), 90000);
    }
}
