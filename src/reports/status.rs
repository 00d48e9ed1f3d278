//! Funding Status Report
//!
//! Shows every active plan's funding status as of a given day, with the
//! expected savings, shortfall and the monthly amount needed to catch up.

use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

use crate::display::report::{
    format_bar, format_date, format_money, format_percentage, report_title, truncate,
};
use crate::display::render_table;
use crate::engine::{FundingStatus, PlanFundingStatus};
use crate::error::EnvelopeResult;
use crate::models::Money;
use crate::services::PlanService;
use crate::storage::Storage;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Plan")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Next Due")]
    next_due: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Shortfall")]
    shortfall: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

/// Funding status report
#[derive(Debug, Clone, Serialize)]
pub struct FundingReport {
    pub as_of: NaiveDate,
    pub plans: Vec<PlanFundingStatus>,
}

impl FundingReport {
    /// Generate the report for all active plans
    pub fn generate(storage: &Storage, as_of: NaiveDate) -> EnvelopeResult<Self> {
        let plans = PlanService::new(storage).funding_statuses(as_of)?;
        Ok(Self { as_of, plans })
    }

    pub fn count(&self, status: FundingStatus) -> usize {
        self.plans.iter().filter(|p| p.status == status).count()
    }

    /// Plans that need attention, largest shortfall first
    pub fn behind(&self) -> Vec<&PlanFundingStatus> {
        let mut behind: Vec<_> = self
            .plans
            .iter()
            .filter(|p| p.status == FundingStatus::Behind)
            .collect();
        behind.sort_by(|a, b| b.shortfall.cmp(&a.shortfall));
        behind
    }

    pub fn total_shortfall(&self) -> Money {
        self.plans.iter().map(|p| p.shortfall).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str, date_format: &str) -> String {
        let mut output = report_title(
            "FUNDING STATUS",
            &format!("As of {}", self.as_of.format(date_format)),
        );

        if self.plans.is_empty() {
            output.push_str("No active expense plans.\n");
            return output;
        }

        let rows = self
            .plans
            .iter()
            .map(|p| StatusRow {
                name: truncate(&p.plan_name, 28),
                status: p.status.to_string(),
                next_due: format_date(p.next_due_date, date_format),
                target: format_money(p.effective_target, symbol),
                expected: format_money(p.expected_funded, symbol),
                shortfall: format_money(p.shortfall, symbol),
                progress: format!(
                    "{} {}",
                    format_bar(p.progress_percent, 100.0, 10),
                    format_percentage(p.progress_percent)
                ),
            })
            .collect();
        output.push_str(&render_table(rows, 3..6));
        output.push_str("\n\n");

        output.push_str(&format!(
            "Funded: {}  Almost ready: {}  On track: {}  Behind: {}\n",
            self.count(FundingStatus::Funded),
            self.count(FundingStatus::AlmostReady),
            self.count(FundingStatus::OnTrack),
            self.count(FundingStatus::Behind),
        ));
        output.push_str(&format!(
            "Total shortfall: {}\n",
            format_money(self.total_shortfall(), symbol)
        ));

        let behind = self.behind();
        if !behind.is_empty() {
            output.push_str("\nNeeds attention:\n");
            for plan in behind {
                match plan.required_monthly {
                    Some(required) => output.push_str(&format!(
                        "  {} needs {}/month (currently {})\n",
                        plan.plan_name,
                        format_money(required, symbol),
                        format_money(plan.monthly_contribution, symbol)
                    )),
                    None => output.push_str(&format!(
                        "  {} is due with {} still missing\n",
                        plan.plan_name,
                        format_money(plan.shortfall, symbol)
                    )),
                }
            }
        }

        output
    }
}
