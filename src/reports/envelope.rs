//! Envelope Report
//!
//! One plan's envelope for a month: what rolled over, what was allocated,
//! what was spent and what is left, optionally with the months leading up
//! to it.

use serde::Serialize;
use tabled::Tabled;

use crate::display::report::{format_money, format_percentage, report_title};
use crate::display::render_table;
use crate::engine::{EnvelopeBalance, EnvelopeCalculator};
use crate::error::EnvelopeResult;
use crate::models::{MonthPeriod, PlanId};
use crate::services::PlanService;
use crate::storage::Storage;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Rolled Over")]
    previous: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Used")]
    used: String,
}

/// Envelope balance report for a single plan
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeReport {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub rolls_over: bool,
    pub current: EnvelopeBalance,
    /// Earlier months in calendar order, ending with the month before
    /// `current`
    pub history: Vec<EnvelopeBalance>,
}

impl EnvelopeReport {
    /// Generate the envelope for `month`, with `history_months` prior months
    pub fn generate(
        storage: &Storage,
        plan_identifier: &str,
        month: MonthPeriod,
        history_months: u32,
    ) -> EnvelopeResult<Self> {
        let plan = PlanService::new(storage).get_valid(plan_identifier)?;
        let mut calculator = EnvelopeCalculator::new(&storage.payments);

        let current = calculator.balance(&plan, month)?;
        let history = if history_months > 0 {
            calculator.history(&plan, month.offset(-(history_months as i32)), month.prev())?
        } else {
            Vec::new()
        };

        Ok(Self {
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            rolls_over: plan.rolls_over(),
            current,
            history,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let current = &self.current;
        let mut output = report_title(
            &format!("ENVELOPE: {}", self.plan_name.to_uppercase()),
            &current.month.label(),
        );

        output.push_str(&format!(
            "  Rolled over:   {:>14}\n",
            format_money(current.previous_balance, symbol)
        ));
        output.push_str(&format!(
            "  Allocated:   + {:>14}\n",
            format_money(current.monthly_allocation, symbol)
        ));
        output.push_str(&format!(
            "  Spent:       - {:>14}\n",
            format_money(current.actual_spending, symbol)
        ));
        output.push_str(&format!("  {}\n", "─".repeat(30)));
        output.push_str(&format!(
            "  Balance:       {:>14}\n",
            format_money(current.current_balance, symbol)
        ));
        output.push('\n');
        output.push_str(&format!(
            "  Status: {} ({} of allocation used)\n",
            current.status,
            format_percentage(current.utilization_percent)
        ));
        if !self.rolls_over {
            output.push_str("  Unspent allocation does not carry into next month.\n");
        }

        if !self.history.is_empty() {
            output.push_str("\nHistory:\n");
            let rows = self
                .history
                .iter()
                .chain(std::iter::once(current))
                .map(|b| HistoryRow {
                    month: b.month.label(),
                    previous: format_money(b.previous_balance, symbol),
                    allocated: format_money(b.monthly_allocation, symbol),
                    spent: format_money(b.actual_spending, symbol),
                    balance: format_money(b.current_balance, symbol),
                    used: format_percentage(b.utilization_percent),
                })
                .collect();
            output.push_str(&render_table(rows, 1..6));
            output.push('\n');
        }

        output
    }
}
