//! Income plan display formatting

use tabled::Tabled;

use crate::models::{IncomePlan, Money, MonthPeriod};

use super::report::{format_money, truncate};
use super::table::render_table;

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Reliability")]
    reliability: String,
    #[tabled(rename = "This Month")]
    this_month: String,
    #[tabled(rename = "Annual")]
    annual: String,
}

/// Format income plans with this month's amount and the annual total
pub fn format_income_list(plans: &[IncomePlan], month: MonthPeriod, symbol: &str) -> String {
    if plans.is_empty() {
        return "No income plans found.".to_string();
    }

    let rows = plans
        .iter()
        .map(|plan| IncomeRow {
            name: if plan.active {
                truncate(&plan.name, 30)
            } else {
                format!("{} (inactive)", truncate(&plan.name, 30))
            },
            reliability: plan.reliability.to_string(),
            this_month: format_money(plan.amount_for_month(month.month), symbol),
            annual: format_money(plan.amounts.annual_total(), symbol),
        })
        .collect();

    let mut output = render_table(rows, 2..4);

    let monthly_total: Money = plans
        .iter()
        .filter(|p| p.active)
        .map(|p| p.amount_for_month(month.month))
        .sum();
    output.push_str(&format!(
        "\nActive income for {}: {}\n",
        month.label(),
        format_money(monthly_total, symbol)
    ));
    output
}
