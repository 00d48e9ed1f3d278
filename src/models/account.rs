//! Account model
//!
//! Accounts are loaded with their current balance already computed by the
//! persistence layer. The forecast seeds its projection with the on-budget
//! total, and coverage compares each account's balance against the
//! obligations of the plans funded from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    Credit,
    Cash,
    Other,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::Credit => write!(f, "Credit Card"),
            Self::Cash => write!(f, "Cash"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A financial account with its current balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    /// Off-budget accounts (investments, loans) do not seed the forecast
    #[serde(default = "default_on_budget")]
    pub on_budget: bool,
    pub balance: Money,
}

fn default_on_budget() -> bool {
    true
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: AccountType, balance: Money) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
            on_budget: true,
            balance,
        }
    }

    pub fn off_budget(mut self) -> Self {
        self.on_budget = false;
        self
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.account_type, self.balance)
    }
}

/// Sum of balances across on-budget accounts
pub fn on_budget_total(accounts: &[Account]) -> Money {
    accounts
        .iter()
        .filter(|a| a.on_budget)
        .map(|a| a.balance)
        .sum()
}
