//! Cash Flow Forecast Report
//!
//! Month-by-month projection of income, expenses and the running balance,
//! seeded with today's on-budget account total.

use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::display::report::{format_money, format_signed, report_title};
use crate::display::render_table;
use crate::engine::{CashFlowForecast, CashFlowForecaster, IncomeSource};
use crate::error::EnvelopeResult;
use crate::models::{Money, MonthPeriod};
use crate::services::PlanService;
use crate::storage::Storage;

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Historical")]
    historical: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Cash flow forecast report
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub generated_on: NaiveDate,
    pub forecast: CashFlowForecast,
}

impl ForecastReport {
    /// Forecast `months` months from `start`
    ///
    /// `history_months` is how far back trailing averages look.
    pub fn generate(
        storage: &Storage,
        today: NaiveDate,
        start: MonthPeriod,
        months: u32,
        history_months: u32,
    ) -> EnvelopeResult<Self> {
        let plans = PlanService::new(storage).refreshed_active(today)?;
        let income_plans = storage.income.get_active()?;
        let starting_balance = storage.accounts.on_budget_balance()?;

        let forecast = CashFlowForecaster::new(&storage.history, history_months).forecast(
            &plans,
            &income_plans,
            starting_balance,
            start,
            months,
        )?;

        debug!(
            months,
            %start,
            ending_balance = %forecast.ending_balance(),
            "generated cash flow forecast"
        );
        Ok(Self {
            generated_on: today,
            forecast,
        })
    }

    /// Months whose projected balance drops below zero
    pub fn negative_months(&self) -> Vec<MonthPeriod> {
        self.forecast
            .months
            .iter()
            .filter(|m| m.projected_balance.is_negative())
            .map(|m| m.month)
            .collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let forecast = &self.forecast;
        let subtitle = match (forecast.months.first(), forecast.months.last()) {
            (Some(first), Some(last)) => format!("{} to {}", first.label, last.label),
            _ => String::new(),
        };
        let mut output = report_title("CASH FLOW FORECAST", &subtitle);

        output.push_str(&format!(
            "Starting balance: {}\n",
            format_money(forecast.starting_balance, symbol)
        ));
        output.push_str(match forecast.income_source {
            IncomeSource::IncomePlans => "Income source:    income plans\n",
            IncomeSource::History => "Income source:    historical average\n",
        });
        output.push('\n');

        let rows = forecast
            .months
            .iter()
            .map(|m| ForecastRow {
                month: m.label.clone(),
                income: format_money(m.income, symbol),
                planned: format_money(m.planned_expenses, symbol),
                historical: format_money(m.historical_expenses, symbol),
                net: format_signed(m.net, symbol),
                balance: format_money(m.projected_balance, symbol),
            })
            .collect();
        output.push_str(&render_table(rows, 1..6));
        output.push_str("\n\n");

        output.push_str(&format!(
            "Total income:     {}\n",
            format_money(forecast.total_income(), symbol)
        ));
        output.push_str(&format!(
            "Total expenses:   {}\n",
            format_money(forecast.total_expenses(), symbol)
        ));
        output.push_str(&format!(
            "Ending balance:   {}\n",
            format_money(forecast.ending_balance(), symbol)
        ));
        if let Some(lowest) = forecast.lowest_balance() {
            output.push_str(&format!(
                "Lowest balance:   {} ({})\n",
                format_money(lowest.projected_balance, symbol),
                lowest.label
            ));
        }

        if !forecast.uncovered_categories.is_empty() {
            let total: Money = forecast.uncovered_categories.iter().map(|c| c.amount).sum();
            output.push_str(&format!(
                "\n{} unplanned spending categories add {}/month from history\n",
                forecast.uncovered_categories.len(),
                format_money(total, symbol)
            ));
        }

        let negative = self.negative_months();
        if let Some(first) = negative.first() {
            output.push_str(&format!(
                "\nWarning: balance goes negative in {} month(s), starting {}\n",
                negative.len(),
                first.label()
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{Account, AccountType, CategoryId, ExpensePlan, IncomePlan, MonthlyTotals};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(PlannerPaths::with_base_dir(temp_dir.path())).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_forecast_with_income_plans() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .accounts
            .upsert(Account::new("Checking", AccountType::Checking, Money::from_cents(100000)))
            .unwrap();
        storage
            .income
            .upsert(IncomePlan::monthly("Salary", Money::from_cents(300000)))
            .unwrap();
        storage
            .plans
            .upsert(ExpensePlan::fixed_monthly("Rent", Money::from_cents(150000), 1))
            .unwrap();
        storage
            .plans
            .upsert(ExpensePlan::yearly("Insurance", Money::from_cents(120000), 5, 15))
            .unwrap();

        let report =
            ForecastReport::generate(&storage, today(), MonthPeriod::new(2025, 1), 12, 6).unwrap();
        let months = &report.forecast.months;

        assert_eq!(months.len(), 12);
        assert_eq!(report.forecast.income_source, IncomeSource::IncomePlans);
        assert_eq!(months[0].planned_expenses.cents(), 150000);
        assert_eq!(months[4].planned_expenses.cents(), 270000);
        assert_eq!(months[0].projected_balance.cents(), 250000);
        // 12 x (3000 - 1500) - 1200 on top of the starting 1000
        assert_eq!(report.forecast.ending_balance().cents(), 100000 + 1800000 - 120000);
        assert!(report.negative_months().is_empty());
    }

    #[test]
    fn test_forecast_falls_back_to_history() {
        let (_temp_dir, storage) = create_test_storage();
        let groceries = CategoryId::new();
        for back in 1..=6 {
            let month = MonthPeriod::new(2025, 1).offset(-back);
            storage
                .history
                .record_category_spend(month, groceries, Money::from_cents(60000))
                .unwrap();
            storage
                .history
                .record_totals(
                    month,
                    MonthlyTotals {
                        income: Money::from_cents(50000),
                        expense: Money::from_cents(60000),
                    },
                )
                .unwrap();
        }

        let report =
            ForecastReport::generate(&storage, today(), MonthPeriod::new(2025, 1), 3, 6).unwrap();

        assert_eq!(report.forecast.income_source, IncomeSource::History);
        assert_eq!(report.forecast.months[0].income.cents(), 50000);
        assert_eq!(report.forecast.months[0].historical_expenses.cents(), 60000);
        assert_eq!(report.negative_months().len(), 3);

        let output = report.format_terminal("$");
        assert!(output.contains("historical average"));
        assert!(output.contains("1 unplanned spending categories add $600.00/month"));
        assert!(output.contains("Warning: balance goes negative in 3 month(s), starting Jan 2025"));
    }

    #[test]
    fn test_yearly_fund_paid_this_year_is_not_charged_again() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .plans
            .upsert(ExpensePlan::yearly("Insurance", Money::from_cents(120000), 5, 15))
            .unwrap();

        // Due day has passed; the next payment is May 2026, past the horizon
        let after_due = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        let report =
            ForecastReport::generate(&storage, after_due, MonthPeriod::new(2025, 5), 12, 6)
                .unwrap();

        assert!(report.forecast.total_expenses().is_zero());
        assert!(report
            .forecast
            .months
            .iter()
            .all(|m| m.planned_expenses.is_zero()));
    }

    #[test]
    fn test_zero_month_forecast_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        assert!(
            ForecastReport::generate(&storage, today(), MonthPeriod::new(2025, 1), 0, 6).is_err()
        );
    }

    #[test]
    fn test_terminal_format() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .income
            .upsert(IncomePlan::monthly("Salary", Money::from_cents(300000)))
            .unwrap();

        let output = ForecastReport::generate(&storage, today(), MonthPeriod::new(2025, 1), 2, 6)
            .unwrap()
            .format_terminal("$");

        assert!(output.contains("CASH FLOW FORECAST"));
        assert!(output.contains("Jan 2025 to Feb 2025"));
        assert!(output.contains("+$3000.00"));
        assert!(output.contains("Ending balance:   $6000.00"));
    }
}
