//! Expense plan model
//!
//! An expense plan is a virtual envelope for a recurring or one-off
//! obligation. How often it falls due lives in [`Recurrence`], a tagged union
//! carrying only the schedule fields that make sense for its frequency; what
//! kind of obligation it is lives in [`PlanType`] and [`PlanPurpose`].
//!
//! On disk the recurrence is flattened into the plan with a `frequency` tag,
//! so a stored plan reads like:
//!
//! ```json
//! { "name": "Car insurance", "frequency": "yearly", "due_month": 3, "due_day": 15, ... }
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, PlanId};
use super::money::Money;

/// Whether a plan saves toward a lump payment or caps ongoing spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPurpose {
    SinkingFund,
    SpendingBudget,
}

impl fmt::Display for PlanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinkingFund => write!(f, "Sinking fund"),
            Self::SpendingBudget => write!(f, "Spending budget"),
        }
    }
}

/// The kind of obligation a plan represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    FixedMonthly,
    YearlyFixed,
    YearlyVariable,
    MultiYear,
    Seasonal,
    EmergencyFund,
    Goal,
    OneTime,
}

impl PlanType {
    pub fn description(&self) -> &'static str {
        match self {
            Self::FixedMonthly => "Fixed monthly",
            Self::YearlyFixed => "Yearly (fixed)",
            Self::YearlyVariable => "Yearly (variable)",
            Self::MultiYear => "Multi-year",
            Self::Seasonal => "Seasonal",
            Self::EmergencyFund => "Emergency fund",
            Self::Goal => "Goal",
            Self::OneTime => "One-time",
        }
    }

    /// Plan types that never produce a scheduled cash outflow in a forecast
    pub fn is_unscheduled(&self) -> bool {
        matches!(self, Self::EmergencyFund | Self::Goal)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Where a plan's monthly contribution comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    /// Entered by the user; never re-derived
    Manual,
    /// Derived from the target and recurrence
    #[default]
    Calculated,
}

/// How often a plan falls due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum Recurrence {
    Monthly {
        #[serde(default)]
        due_day: Option<u32>,
    },
    Quarterly {
        #[serde(default)]
        due_day: Option<u32>,
    },
    Yearly {
        #[serde(default)]
        due_month: Option<u32>,
        #[serde(default)]
        due_day: Option<u32>,
    },
    MultiYear {
        #[serde(default)]
        frequency_years: Option<u32>,
        #[serde(default)]
        target_date: Option<NaiveDate>,
    },
    Seasonal {
        #[serde(default)]
        seasonal_months: Vec<u32>,
        #[serde(default)]
        due_day: Option<u32>,
    },
    OneTime {
        #[serde(default)]
        target_date: Option<NaiveDate>,
    },
}

impl Recurrence {
    pub fn monthly(due_day: u32) -> Self {
        Self::Monthly {
            due_day: Some(due_day),
        }
    }

    pub fn quarterly(due_day: u32) -> Self {
        Self::Quarterly {
            due_day: Some(due_day),
        }
    }

    pub fn yearly(due_month: u32, due_day: u32) -> Self {
        Self::Yearly {
            due_month: Some(due_month),
            due_day: Some(due_day),
        }
    }

    pub fn multi_year(frequency_years: u32, target_date: Option<NaiveDate>) -> Self {
        Self::MultiYear {
            frequency_years: Some(frequency_years),
            target_date,
        }
    }

    /// Seasonal recurrence; months are stored sorted and deduplicated
    pub fn seasonal(months: impl IntoIterator<Item = u32>, due_day: Option<u32>) -> Self {
        let mut seasonal_months: Vec<u32> = months.into_iter().collect();
        seasonal_months.sort_unstable();
        seasonal_months.dedup();
        Self::Seasonal {
            seasonal_months,
            due_day,
        }
    }

    pub fn one_time(target_date: NaiveDate) -> Self {
        Self::OneTime {
            target_date: Some(target_date),
        }
    }

    /// The configured due day, where the frequency has one
    pub fn due_day(&self) -> Option<u32> {
        match self {
            Self::Monthly { due_day }
            | Self::Quarterly { due_day }
            | Self::Yearly { due_day, .. }
            | Self::Seasonal { due_day, .. } => *due_day,
            Self::MultiYear { .. } | Self::OneTime { .. } => None,
        }
    }

    pub fn due_month(&self) -> Option<u32> {
        match self {
            Self::Yearly { due_month, .. } => *due_month,
            _ => None,
        }
    }

    pub fn target_date(&self) -> Option<NaiveDate> {
        match self {
            Self::MultiYear { target_date, .. } | Self::OneTime { target_date } => *target_date,
            _ => None,
        }
    }

    /// Seasonal months (empty for every other frequency)
    pub fn seasonal_months(&self) -> &[u32] {
        match self {
            Self::Seasonal {
                seasonal_months, ..
            } => seasonal_months,
            _ => &[],
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Monthly { due_day: Some(d) } => format!("Monthly on day {}", d),
            Self::Monthly { due_day: None } => "Monthly".to_string(),
            Self::Quarterly { due_day: Some(d) } => format!("Quarterly on day {}", d),
            Self::Quarterly { due_day: None } => "Quarterly".to_string(),
            Self::Yearly {
                due_month: Some(m),
                due_day: Some(d),
            } => format!("Yearly on {:02}-{:02}", m, d),
            Self::Yearly { .. } => "Yearly".to_string(),
            Self::MultiYear {
                frequency_years,
                target_date,
            } => {
                let years = frequency_years.unwrap_or(1);
                match target_date {
                    Some(date) => format!("Every {} years, next {}", years, date.format("%Y-%m-%d")),
                    None => format!("Every {} years", years),
                }
            }
            Self::Seasonal {
                seasonal_months, ..
            } => {
                let months: Vec<String> = seasonal_months.iter().map(|m| m.to_string()).collect();
                format!("Seasonal (months {})", months.join(","))
            }
            Self::OneTime {
                target_date: Some(date),
            } => format!("By {}", date.format("%Y-%m-%d")),
            Self::OneTime { target_date: None } => "One-time".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if let Some(day) = self.due_day() {
            if !(1..=31).contains(&day) {
                return Err(PlanValidationError::InvalidDueDay(day));
            }
        }

        if let Some(month) = self.due_month() {
            if !(1..=12).contains(&month) {
                return Err(PlanValidationError::InvalidMonth(month));
            }
        }

        if let Some(&month) = self
            .seasonal_months()
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(PlanValidationError::InvalidMonth(month));
        }

        let months = self.seasonal_months();
        if let Some(month) = months
            .iter()
            .enumerate()
            .find_map(|(i, m)| months[..i].contains(m).then_some(*m))
        {
            return Err(PlanValidationError::DuplicateSeasonalMonth(month));
        }

        if let Self::MultiYear {
            frequency_years: Some(0),
            ..
        } = self
        {
            return Err(PlanValidationError::InvalidFrequencyYears);
        }

        Ok(())
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A virtual envelope for one recurring or one-off obligation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpensePlan {
    pub id: PlanId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Account the plan is funded from, used by coverage reporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub purpose: PlanPurpose,
    pub plan_type: PlanType,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    /// Aggregate amount per cycle (per year for seasonal plans)
    pub target_amount: Money,
    #[serde(default)]
    pub monthly_contribution: Money,
    #[serde(default)]
    pub contribution_source: ContributionSource,
    /// Cached next due date, refreshed by the plan service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub rollover_surplus: bool,
    pub created_at: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_active() -> bool {
    true
}

impl ExpensePlan {
    pub fn new(
        name: impl Into<String>,
        purpose: PlanPurpose,
        plan_type: PlanType,
        recurrence: Recurrence,
        target_amount: Money,
    ) -> Self {
        Self {
            id: PlanId::new(),
            name: name.into(),
            category_id: None,
            account_id: None,
            purpose,
            plan_type,
            recurrence,
            target_amount,
            monthly_contribution: Money::zero(),
            contribution_source: ContributionSource::Calculated,
            next_due_date: None,
            rollover_surplus: false,
            created_at: Local::now().date_naive(),
            active: true,
            notes: String::new(),
        }
    }

    /// A monthly bill paid on `due_day`, budgeted at `amount` per month
    pub fn fixed_monthly(name: impl Into<String>, amount: Money, due_day: u32) -> Self {
        Self::new(
            name,
            PlanPurpose::SpendingBudget,
            PlanType::FixedMonthly,
            Recurrence::monthly(due_day),
            amount,
        )
        .with_monthly_contribution(amount)
    }

    /// A yearly sinking fund due on the given month/day
    pub fn yearly(name: impl Into<String>, target: Money, due_month: u32, due_day: u32) -> Self {
        Self::new(
            name,
            PlanPurpose::SinkingFund,
            PlanType::YearlyFixed,
            Recurrence::yearly(due_month, due_day),
            target,
        )
    }

    /// A seasonal sinking fund; `target` is the total across all listed months
    pub fn seasonal(
        name: impl Into<String>,
        target: Money,
        months: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self::new(
            name,
            PlanPurpose::SinkingFund,
            PlanType::Seasonal,
            Recurrence::seasonal(months, None),
            target,
        )
    }

    pub fn one_time(name: impl Into<String>, target: Money, target_date: NaiveDate) -> Self {
        Self::new(
            name,
            PlanPurpose::SinkingFund,
            PlanType::OneTime,
            Recurrence::one_time(target_date),
            target,
        )
    }

    /// Set a declared monthly contribution (marks the source as manual)
    pub fn with_monthly_contribution(mut self, amount: Money) -> Self {
        self.monthly_contribution = amount;
        self.contribution_source = ContributionSource::Manual;
        self
    }

    pub fn with_purpose(mut self, purpose: PlanPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_next_due_date(mut self, date: NaiveDate) -> Self {
        self.next_due_date = Some(date);
        self
    }

    pub fn with_rollover_surplus(mut self, rollover: bool) -> Self {
        self.rollover_surplus = rollover;
        self
    }

    pub fn created_on(mut self, date: NaiveDate) -> Self {
        self.created_at = date;
        self
    }

    pub fn is_sinking_fund(&self) -> bool {
        self.purpose == PlanPurpose::SinkingFund
    }

    /// Sinking funds always carry their balance forward; spending budgets
    /// only when the plan opts in
    pub fn rolls_over(&self) -> bool {
        self.is_sinking_fund() || self.rollover_surplus
    }

    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.name.trim().is_empty() {
            return Err(PlanValidationError::EmptyName);
        }

        if self.target_amount.is_negative() {
            return Err(PlanValidationError::NegativeTarget);
        }

        if self.monthly_contribution.is_negative() {
            return Err(PlanValidationError::NegativeContribution);
        }

        self.recurrence.validate()
    }
}

impl fmt::Display for ExpensePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.target_amount, self.recurrence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    EmptyName,
    NegativeTarget,
    NegativeContribution,
    InvalidDueDay(u32),
    InvalidMonth(u32),
    InvalidFrequencyYears,
    DuplicateSeasonalMonth(u32),
}

impl fmt::Display for PlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Plan name cannot be empty"),
            Self::NegativeTarget => write!(f, "Target amount cannot be negative"),
            Self::NegativeContribution => write!(f, "Monthly contribution cannot be negative"),
            Self::InvalidDueDay(d) => write!(f, "Due day must be between 1 and 31, got {}", d),
            Self::InvalidMonth(m) => write!(f, "Month must be between 1 and 12, got {}", m),
            Self::InvalidFrequencyYears => write!(f, "Multi-year interval must be at least 1 year"),
            Self::DuplicateSeasonalMonth(m) => write!(f, "Seasonal month {} is listed twice", m),
        }
    }
}

impl std::error::Error for PlanValidationError {}
