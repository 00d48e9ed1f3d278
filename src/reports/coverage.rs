//! Account Coverage Report
//!
//! For a period, sums each plan's obligation by the account that funds it
//! and compares the total with that account's balance. Plans without a
//! funding account, or pointing at an account that no longer exists, are
//! grouped as unassigned with no balance to cover them.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, warn};

use crate::display::report::{format_money, report_title, truncate};
use crate::display::render_table;
use crate::engine::{obligation_in_period, Obligation};
use crate::error::EnvelopeResult;
use crate::models::{AccountId, Money, Period, PlanId};
use crate::services::PlanService;
use crate::storage::Storage;

/// One plan's share of an account's obligations
#[derive(Debug, Clone, Serialize)]
pub struct CoverageLine {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub obligation: Obligation,
}

/// Obligations funded from one account within the period
#[derive(Debug, Clone, Serialize)]
pub struct AccountCoverage {
    /// `None` for the unassigned group
    pub account_id: Option<AccountId>,
    pub account_name: String,
    pub balance: Money,
    pub obligations: Money,
    /// Obligations the balance cannot cover
    pub shortfall: Money,
    /// Balance left once every obligation is paid
    pub surplus: Money,
    pub lines: Vec<CoverageLine>,
}

impl AccountCoverage {
    fn new(account_id: Option<AccountId>, account_name: String, balance: Money) -> Self {
        Self {
            account_id,
            account_name,
            balance,
            obligations: Money::zero(),
            shortfall: Money::zero(),
            surplus: balance.non_negative(),
            lines: Vec::new(),
        }
    }

    fn add_line(&mut self, line: CoverageLine) {
        self.obligations += line.obligation.amount;
        self.shortfall = (self.obligations - self.balance).non_negative();
        self.surplus = (self.balance - self.obligations).non_negative();
        self.lines.push(line);
    }

    pub fn is_covered(&self) -> bool {
        self.shortfall.is_zero()
    }
}

#[derive(Tabled)]
struct CoverageRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Obligations")]
    obligations: String,
    #[tabled(rename = "Shortfall")]
    shortfall: String,
    #[tabled(rename = "Surplus")]
    surplus: String,
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Coverage of plan obligations by account balances
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub period: Period,
    pub accounts: Vec<AccountCoverage>,
}

impl CoverageReport {
    /// Generate coverage for the given period
    ///
    /// Every account is listed, even with nothing due, so idle balances show
    /// up as surplus. Plans with no obligation in the period are left out.
    /// Cached due dates are refreshed against `today` first.
    pub fn generate(storage: &Storage, period: Period, today: NaiveDate) -> EnvelopeResult<Self> {
        let mut accounts: Vec<AccountCoverage> = storage
            .accounts
            .get_all()?
            .into_iter()
            .map(|a| AccountCoverage::new(Some(a.id), a.name, a.balance))
            .collect();
        let index: HashMap<AccountId, usize> = accounts
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.account_id.map(|id| (id, i)))
            .collect();
        let mut unassigned = AccountCoverage::new(None, "Unassigned".to_string(), Money::zero());

        for plan in PlanService::new(storage).refreshed_active(today)? {
            let obligation = obligation_in_period(&plan, &period);
            if !obligation.has_obligation {
                continue;
            }

            let line = CoverageLine {
                plan_id: plan.id,
                plan_name: plan.name.clone(),
                obligation,
            };
            match plan.account_id.and_then(|id| index.get(&id)) {
                Some(&i) => accounts[i].add_line(line),
                None => {
                    if let Some(id) = plan.account_id {
                        warn!(plan = %plan.name, account = %id, "plan references unknown account");
                    }
                    unassigned.add_line(line);
                }
            }
        }

        if !unassigned.lines.is_empty() {
            accounts.push(unassigned);
        }

        debug!(accounts = accounts.len(), %period, "computed coverage");
        Ok(Self { period, accounts })
    }

    pub fn total_obligations(&self) -> Money {
        self.accounts.iter().map(|a| a.obligations).sum()
    }

    pub fn total_shortfall(&self) -> Money {
        self.accounts.iter().map(|a| a.shortfall).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str, date_format: &str) -> String {
        let mut output = report_title(
            "ACCOUNT COVERAGE",
            &format!(
                "{} to {}",
                self.period.start.format(date_format),
                self.period.end.format(date_format)
            ),
        );

        if self.accounts.is_empty() {
            output.push_str("No accounts or obligations in this period.\n");
            return output;
        }

        let rows = self
            .accounts
            .iter()
            .map(|a| CoverageRow {
                account: truncate(&a.account_name, 28),
                balance: format_money(a.balance, symbol),
                obligations: format_money(a.obligations, symbol),
                shortfall: format_money(a.shortfall, symbol),
                surplus: format_money(a.surplus, symbol),
            })
            .collect();
        output.push_str(&render_table(rows, 1..5));
        output.push('\n');

        for account in self.accounts.iter().filter(|a| !a.lines.is_empty()) {
            output.push_str(&format!("\n{}\n", account.account_name));
            let rows = account
                .lines
                .iter()
                .map(|l| LineRow {
                    plan: truncate(&l.plan_name, 32),
                    due: if l.obligation.occurrences > 1 {
                        format!("{}x", l.obligation.occurrences)
                    } else {
                        "once".to_string()
                    },
                    amount: format_money(l.obligation.amount, symbol),
                })
                .collect();
            output.push_str(&render_table(rows, 2..3));
            output.push('\n');
        }

        output.push_str(&format!(
            "\nTotal obligations: {}\n",
            format_money(self.total_obligations(), symbol)
        ));
        if self.accounts.iter().all(AccountCoverage::is_covered) {
            output.push_str("All obligations are covered.\n");
        } else {
            output.push_str(&format!(
                "Uncovered:         {}\n",
                format_money(self.total_shortfall(), symbol)
            ));
        }

        output
    }
}
