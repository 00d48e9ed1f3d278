//! Income plan model
//!
//! An income plan is a recurring income source with its own amount for each
//! calendar month, so a bonus month or seasonal work can be expressed
//! directly. The engine only reads income plans.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::IncomePlanId;
use super::money::Money;

/// How certain an income source is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeReliability {
    #[default]
    Guaranteed,
    Expected,
}

impl fmt::Display for IncomeReliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guaranteed => write!(f, "Guaranteed"),
            Self::Expected => write!(f, "Expected"),
        }
    }
}

/// One amount per calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyAmounts {
    pub january: Money,
    pub february: Money,
    pub march: Money,
    pub april: Money,
    pub may: Money,
    pub june: Money,
    pub july: Money,
    pub august: Money,
    pub september: Money,
    pub october: Money,
    pub november: Money,
    pub december: Money,
}

impl MonthlyAmounts {
    /// The same amount every month
    pub fn uniform(amount: Money) -> Self {
        Self {
            january: amount,
            february: amount,
            march: amount,
            april: amount,
            may: amount,
            june: amount,
            july: amount,
            august: amount,
            september: amount,
            october: amount,
            november: amount,
            december: amount,
        }
    }

    /// Amount for a month number (1-12); zero outside that range
    pub fn for_month(&self, month: u32) -> Money {
        match month {
            1 => self.january,
            2 => self.february,
            3 => self.march,
            4 => self.april,
            5 => self.may,
            6 => self.june,
            7 => self.july,
            8 => self.august,
            9 => self.september,
            10 => self.october,
            11 => self.november,
            12 => self.december,
            _ => Money::zero(),
        }
    }

    /// Mutable slot for a month number (1-12)
    pub fn month_mut(&mut self, month: u32) -> Option<&mut Money> {
        match month {
            1 => Some(&mut self.january),
            2 => Some(&mut self.february),
            3 => Some(&mut self.march),
            4 => Some(&mut self.april),
            5 => Some(&mut self.may),
            6 => Some(&mut self.june),
            7 => Some(&mut self.july),
            8 => Some(&mut self.august),
            9 => Some(&mut self.september),
            10 => Some(&mut self.october),
            11 => Some(&mut self.november),
            12 => Some(&mut self.december),
            _ => None,
        }
    }

    pub fn annual_total(&self) -> Money {
        (1..=12).map(|m| self.for_month(m)).sum()
    }
}

/// Validation errors for income plans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    EmptyName,
    NegativeAmount(u32),
}

impl fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Income plan name cannot be empty"),
            Self::NegativeAmount(month) => {
                write!(f, "Income for month {} cannot be negative", month)
            }
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// A recurring income source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomePlan {
    pub id: IncomePlanId,
    pub name: String,
    #[serde(default)]
    pub reliability: IncomeReliability,
    pub amounts: MonthlyAmounts,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl IncomePlan {
    pub fn new(name: impl Into<String>, amounts: MonthlyAmounts) -> Self {
        Self {
            id: IncomePlanId::new(),
            name: name.into(),
            reliability: IncomeReliability::Guaranteed,
            amounts,
            active: true,
        }
    }

    /// Income of the same amount every month
    pub fn monthly(name: impl Into<String>, amount: Money) -> Self {
        Self::new(name, MonthlyAmounts::uniform(amount))
    }

    /// Override a single month, e.g. a bonus month
    pub fn with_month(mut self, month: u32, amount: Money) -> Self {
        if let Some(slot) = self.amounts.month_mut(month) {
            *slot = amount;
        }
        self
    }

    pub fn amount_for_month(&self, month: u32) -> Money {
        self.amounts.for_month(month)
    }

    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.name.trim().is_empty() {
            return Err(IncomeValidationError::EmptyName);
        }

        if let Some(month) = (1..=12).find(|&m| self.amounts.for_month(m).is_negative()) {
            return Err(IncomeValidationError::NegativeAmount(month));
        }

        Ok(())
    }
}
