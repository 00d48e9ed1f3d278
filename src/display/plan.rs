//! Expense plan display formatting
//!
//! Formats plans for terminal output in table and detail views.

use chrono::NaiveDate;
use tabled::Tabled;

use crate::engine::PlanFundingStatus;
use crate::models::{ContributionSource, ExpensePlan};
use crate::services::UpcomingDue;

use super::report::{format_date, format_money, format_percentage, truncate};
use super::table::render_table;

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    plan_type: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

/// Format a list of plans as a table
pub fn format_plan_list(plans: &[ExpensePlan], symbol: &str) -> String {
    if plans.is_empty() {
        return "No expense plans found.".to_string();
    }

    let rows = plans
        .iter()
        .map(|plan| PlanRow {
            id: plan.id.to_string(),
            name: if plan.active {
                truncate(&plan.name, 30)
            } else {
                format!("{} (inactive)", truncate(&plan.name, 30))
            },
            plan_type: plan.plan_type.to_string(),
            schedule: plan.recurrence.to_string(),
            target: format_money(plan.target_amount, symbol),
            monthly: format_money(plan.monthly_contribution, symbol),
        })
        .collect();

    render_table(rows, 4..6)
}

/// Format a single plan's details, with its funding status when known
pub fn format_plan_details(
    plan: &ExpensePlan,
    status: Option<&PlanFundingStatus>,
    symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Plan: {}\n", plan.name));
    output.push_str(&format!("  ID:             {}\n", plan.id));
    output.push_str(&format!("  Type:           {}\n", plan.plan_type));
    output.push_str(&format!("  Purpose:        {}\n", plan.purpose));
    output.push_str(&format!("  Schedule:       {}\n", plan.recurrence));
    output.push_str(&format!(
        "  Active:         {}\n",
        if plan.active { "Yes" } else { "No" }
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Target:         {}\n",
        format_money(plan.target_amount, symbol)
    ));
    let source = match plan.contribution_source {
        ContributionSource::Manual => "manual",
        ContributionSource::Calculated => "calculated",
    };
    output.push_str(&format!(
        "  Monthly:        {} ({})\n",
        format_money(plan.monthly_contribution, symbol),
        source
    ));
    output.push_str(&format!(
        "  Next due:       {}\n",
        format_date(plan.next_due_date, date_format)
    ));
    if plan.rollover_surplus {
        output.push_str("  Rollover:       surplus carries forward\n");
    }

    if let Some(status) = status {
        output.push('\n');
        output.push_str(&format!("  Status:         {}\n", status.status));
        output.push_str(&format!(
            "  Expected saved: {} of {} ({})\n",
            format_money(status.expected_funded, symbol),
            format_money(status.effective_target, symbol),
            format_percentage(status.progress_percent)
        ));
        if status.shortfall.is_positive() {
            output.push_str(&format!(
                "  Shortfall:      {}\n",
                format_money(status.shortfall, symbol)
            ));
        }
        if let Some(required) = status.required_monthly {
            output.push_str(&format!(
                "  Needed/month:   {}\n",
                format_money(required, symbol)
            ));
        }
    }

    if !plan.notes.is_empty() {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", plan.notes));
    }

    output.push('\n');
    output.push_str(&format!("  Created:  {}\n", plan.created_at.format(date_format)));

    output
}

#[derive(Tabled)]
struct UpcomingRow {
    #[tabled(rename = "Plan")]
    name: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Next Due")]
    next_due: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Target")]
    target: String,
}

/// Format upcoming due dates, soonest first
pub fn format_upcoming(
    upcoming: &[UpcomingDue],
    today: NaiveDate,
    symbol: &str,
    date_format: &str,
) -> String {
    if upcoming.is_empty() {
        return "No active expense plans.".to_string();
    }

    let rows = upcoming
        .iter()
        .map(|u| UpcomingRow {
            name: truncate(&u.plan.name, 30),
            schedule: u.plan.recurrence.to_string(),
            next_due: format_date(u.next_due, date_format),
            days: u
                .next_due
                .map(|d| (d - today).num_days().to_string())
                .unwrap_or_else(|| "-".to_string()),
            target: format_money(u.plan.target_amount, symbol),
        })
        .collect();

    render_table(rows, 3..5)
}
