//! Multi-month cash flow forecast
//!
//! Each forecast month combines three sources:
//! - planned expenses: the obligation of every active scheduled plan in that
//!   month (emergency funds and goals are buffers, not bills, and are left out)
//! - historical expenses: the trailing average of every spending category no
//!   active plan covers
//! - income: the active income plans' amounts for that calendar month, or the
//!   trailing historical income average when there are no income plans
//!
//! The running balance starts from the on-budget account total.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{
    CategoryAverage, CategoryId, ExpensePlan, IncomePlan, Money, MonthPeriod, MonthlyTotals,
    Period,
};

use super::obligation::obligation_in_period;

/// Read access to aggregated transaction history
pub trait HistoryAggregator {
    /// Average monthly spend per category over the `months_back` months
    /// preceding `before`
    fn monthly_average_by_category(
        &self,
        months_back: u32,
        before: MonthPeriod,
    ) -> EnvelopeResult<Vec<CategoryAverage>>;

    /// Income and expense totals recorded for one month
    fn monthly_totals(&self, month: MonthPeriod) -> EnvelopeResult<MonthlyTotals>;
}

/// Where the forecast's income figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    IncomePlans,
    History,
}

/// One month of the forecast
#[derive(Debug, Clone, Serialize)]
pub struct ForecastMonth {
    pub month: MonthPeriod,
    pub label: String,
    pub income: Money,
    pub expenses: Money,
    pub planned_expenses: Money,
    pub historical_expenses: Money,
    pub net: Money,
    pub projected_balance: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowForecast {
    pub starting_balance: Money,
    pub income_source: IncomeSource,
    /// Categories whose trailing average was added to every month
    pub uncovered_categories: Vec<CategoryAverage>,
    pub months: Vec<ForecastMonth>,
}

impl CashFlowForecast {
    pub fn total_income(&self) -> Money {
        self.months.iter().map(|m| m.income).sum()
    }

    pub fn total_expenses(&self) -> Money {
        self.months.iter().map(|m| m.expenses).sum()
    }

    pub fn ending_balance(&self) -> Money {
        self.months
            .last()
            .map(|m| m.projected_balance)
            .unwrap_or(self.starting_balance)
    }

    /// The month with the lowest projected balance (earliest on ties)
    pub fn lowest_balance(&self) -> Option<&ForecastMonth> {
        self.months.iter().reduce(|lowest, month| {
            if month.projected_balance < lowest.projected_balance {
                month
            } else {
                lowest
            }
        })
    }
}

/// Projects income, expenses and balance month by month
pub struct CashFlowForecaster<'a, H: HistoryAggregator + ?Sized> {
    history: &'a H,
    history_months: u32,
}

impl<'a, H: HistoryAggregator + ?Sized> CashFlowForecaster<'a, H> {
    pub fn new(history: &'a H, history_months: u32) -> Self {
        Self {
            history,
            history_months,
        }
    }

    /// Forecast `months` months starting at `start`
    pub fn forecast(
        &self,
        plans: &[ExpensePlan],
        income_plans: &[IncomePlan],
        starting_balance: Money,
        start: MonthPeriod,
        months: u32,
    ) -> EnvelopeResult<CashFlowForecast> {
        if months == 0 {
            return Err(EnvelopeError::Forecast(
                "forecast horizon must be at least one month".into(),
            ));
        }

        let active_plans: Vec<&ExpensePlan> = plans.iter().filter(|p| p.active).collect();
        let scheduled: Vec<&ExpensePlan> = active_plans
            .iter()
            .copied()
            .filter(|p| !p.plan_type.is_unscheduled())
            .collect();

        let uncovered_categories = self.uncovered_category_averages(&active_plans, start)?;
        let historical_expenses: Money = uncovered_categories.iter().map(|c| c.amount).sum();

        let active_income: Vec<&IncomePlan> = income_plans.iter().filter(|p| p.active).collect();
        let (income_source, historical_income) = if active_income.is_empty() {
            (IncomeSource::History, self.historical_income_average(start)?)
        } else {
            (IncomeSource::IncomePlans, Money::zero())
        };

        let mut balance = starting_balance;
        let mut forecast_months = Vec::with_capacity(months as usize);

        for i in 0..months {
            let month = start.offset(i as i32);
            let window = Period::from(month);

            let planned_expenses: Money = scheduled
                .iter()
                .map(|plan| obligation_in_period(plan, &window).amount)
                .sum();

            let income = match income_source {
                IncomeSource::IncomePlans => active_income
                    .iter()
                    .map(|p| p.amount_for_month(month.month))
                    .sum(),
                IncomeSource::History => historical_income,
            };

            let expenses = planned_expenses + historical_expenses;
            let net = income - expenses;
            balance += net;

            forecast_months.push(ForecastMonth {
                month,
                label: month.label(),
                income,
                expenses,
                planned_expenses,
                historical_expenses,
                net,
                projected_balance: balance,
            });
        }

        Ok(CashFlowForecast {
            starting_balance,
            income_source,
            uncovered_categories,
            months: forecast_months,
        })
    }

    /// Trailing category averages for categories no active plan covers
    fn uncovered_category_averages(
        &self,
        active_plans: &[&ExpensePlan],
        before: MonthPeriod,
    ) -> EnvelopeResult<Vec<CategoryAverage>> {
        let covered: HashSet<CategoryId> =
            active_plans.iter().filter_map(|p| p.category_id).collect();

        let mut averages: Vec<CategoryAverage> = self
            .history
            .monthly_average_by_category(self.history_months, before)?
            .into_iter()
            .filter(|avg| !covered.contains(&avg.category_id) && avg.amount.is_positive())
            .collect();

        averages.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(averages)
    }

    /// Mean income over the trailing months that recorded any activity
    fn historical_income_average(&self, before: MonthPeriod) -> EnvelopeResult<Money> {
        let mut total = Money::zero();
        let mut counted = 0u32;

        for back in 1..=self.history_months {
            let totals = self.history.monthly_totals(before.offset(-(back as i32)))?;
            if totals.has_activity() {
                total += totals.income;
                counted += 1;
            }
        }

        Ok(Money::from_cents_f64(total.div_f64(f64::from(counted))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanPurpose, PlanType, Recurrence};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Default)]
    struct FixedHistory {
        averages: Vec<CategoryAverage>,
        totals: HashMap<MonthPeriod, MonthlyTotals>,
    }

    impl HistoryAggregator for FixedHistory {
        fn monthly_average_by_category(
            &self,
            _months_back: u32,
            _before: MonthPeriod,
        ) -> EnvelopeResult<Vec<CategoryAverage>> {
            Ok(self.averages.clone())
        }

        fn monthly_totals(&self, month: MonthPeriod) -> EnvelopeResult<MonthlyTotals> {
            Ok(self.totals.get(&month).copied().unwrap_or_default())
        }
    }

    fn totals(income: i64, expense: i64) -> MonthlyTotals {
        MonthlyTotals {
            income: Money::from_cents(income),
            expense: Money::from_cents(expense),
        }
    }

    #[test]
    fn test_single_yearly_fund_produces_one_expense_month() {
        let history = FixedHistory::default();
        let plan = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 5, 15)
            .with_monthly_contribution(Money::from_cents(10000))
            .with_next_due_date(date(2025, 5, 15));

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[plan], &[], Money::zero(), MonthPeriod::new(2025, 1), 12)
            .unwrap();

        assert_eq!(forecast.months.len(), 12);
        let non_zero: Vec<_> = forecast
            .months
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.expenses.is_zero())
            .collect();
        assert_eq!(non_zero.len(), 1);
        assert_eq!(non_zero[0].0, 4);
        assert_eq!(non_zero[0].1.expenses.cents(), 120000);
    }

    #[test]
    fn test_running_balance_and_month_order() {
        let history = FixedHistory::default();
        let rent = ExpensePlan::fixed_monthly("Rent", Money::from_cents(150000), 1);
        let salary = IncomePlan::monthly("Salary", Money::from_cents(400000))
            .with_month(12, Money::from_cents(600000));

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(
                &[rent],
                &[salary],
                Money::from_cents(100000),
                MonthPeriod::new(2025, 11),
                3,
            )
            .unwrap();

        let labels: Vec<_> = forecast.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov 2025", "Dec 2025", "Jan 2026"]);

        let balances: Vec<_> = forecast
            .months
            .iter()
            .map(|m| m.projected_balance.cents())
            .collect();
        assert_eq!(balances, vec![350000, 800000, 1050000]);
        assert_eq!(forecast.income_source, IncomeSource::IncomePlans);
        assert_eq!(forecast.ending_balance().cents(), 1050000);
        assert_eq!(forecast.total_income().cents(), 1400000);
        assert_eq!(forecast.total_expenses().cents(), 450000);
    }

    #[test]
    fn test_emergency_fund_and_goal_are_skipped() {
        let history = FixedHistory::default();
        let emergency = ExpensePlan::new(
            "Rainy day",
            PlanPurpose::SinkingFund,
            PlanType::EmergencyFund,
            Recurrence::monthly(1),
            Money::from_cents(1000000),
        )
        .with_monthly_contribution(Money::from_cents(20000));
        let goal = ExpensePlan::new(
            "Vacation",
            PlanPurpose::SinkingFund,
            PlanType::Goal,
            Recurrence::OneTime { target_date: None },
            Money::from_cents(300000),
        )
        .with_monthly_contribution(Money::from_cents(25000));

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[emergency, goal], &[], Money::zero(), MonthPeriod::new(2025, 1), 6)
            .unwrap();

        assert!(forecast.total_expenses().is_zero());
    }

    #[test]
    fn test_inactive_plans_are_ignored() {
        let history = FixedHistory::default();
        let mut rent = ExpensePlan::fixed_monthly("Rent", Money::from_cents(150000), 1);
        rent.active = false;

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[rent], &[], Money::zero(), MonthPeriod::new(2025, 1), 3)
            .unwrap();
        assert!(forecast.total_expenses().is_zero());
    }

    #[test]
    fn test_uncovered_categories_fall_back_to_history() {
        let groceries = CategoryId::new();
        let dining = CategoryId::new();
        let history = FixedHistory {
            averages: vec![
                CategoryAverage {
                    category_id: groceries,
                    amount: Money::from_cents(60000),
                },
                CategoryAverage {
                    category_id: dining,
                    amount: Money::from_cents(15000),
                },
            ],
            ..Default::default()
        };
        let plan = ExpensePlan::fixed_monthly("Groceries", Money::from_cents(50000), 1)
            .with_category(groceries);

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[plan], &[], Money::zero(), MonthPeriod::new(2025, 1), 2)
            .unwrap();

        assert_eq!(forecast.uncovered_categories.len(), 1);
        assert_eq!(forecast.uncovered_categories[0].category_id, dining);
        for month in &forecast.months {
            assert_eq!(month.planned_expenses.cents(), 50000);
            assert_eq!(month.historical_expenses.cents(), 15000);
            assert_eq!(month.expenses.cents(), 65000);
        }
    }

    #[test]
    fn test_historical_income_used_without_income_plans() {
        let mut history = FixedHistory::default();
        history.totals.insert(MonthPeriod::new(2024, 12), totals(300000, 100000));
        history.totals.insert(MonthPeriod::new(2024, 11), totals(500000, 100000));
        // Quiet month: no activity, not averaged
        history.totals.insert(MonthPeriod::new(2024, 10), totals(0, 0));

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[], &[], Money::zero(), MonthPeriod::new(2025, 1), 2)
            .unwrap();

        assert_eq!(forecast.income_source, IncomeSource::History);
        assert_eq!(forecast.months[0].income.cents(), 400000);
        assert_eq!(forecast.months[1].projected_balance.cents(), 800000);
    }

    #[test]
    fn test_income_plans_replace_history() {
        let mut history = FixedHistory::default();
        history.totals.insert(MonthPeriod::new(2024, 12), totals(900000, 0));
        let salary = IncomePlan::monthly("Salary", Money::from_cents(400000));

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[], &[salary], Money::zero(), MonthPeriod::new(2025, 1), 1)
            .unwrap();
        assert_eq!(forecast.months[0].income.cents(), 400000);
    }

    #[test]
    fn test_no_history_means_zero_income() {
        let history = FixedHistory::default();
        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[], &[], Money::from_cents(5000), MonthPeriod::new(2025, 1), 3)
            .unwrap();
        assert!(forecast.total_income().is_zero());
        assert_eq!(forecast.ending_balance().cents(), 5000);
    }

    #[test]
    fn test_lowest_balance_month() {
        let history = FixedHistory::default();
        let camp = ExpensePlan::seasonal("Camp", Money::from_cents(90000), [6, 7, 8]);
        let salary = IncomePlan::monthly("Salary", Money::from_cents(20000));

        let forecast = CashFlowForecaster::new(&history, 6)
            .forecast(&[camp], &[salary], Money::from_cents(50000), MonthPeriod::new(2025, 5), 6)
            .unwrap();

        // May +200, Jun -100, Jul -100, Aug -100, then recovering
        let lowest = forecast.lowest_balance().unwrap();
        assert_eq!(lowest.month, MonthPeriod::new(2025, 8));
        assert_eq!(lowest.projected_balance.cents(), 40000);
    }

    #[test]
    fn test_zero_months_is_an_error() {
        let history = FixedHistory::default();
        let result = CashFlowForecaster::new(&history, 6).forecast(
            &[],
            &[],
            Money::zero(),
            MonthPeriod::new(2025, 1),
            0,
        );
        assert!(matches!(result, Err(EnvelopeError::Forecast(_))));
    }
}
