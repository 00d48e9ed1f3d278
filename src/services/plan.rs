//! Expense plan service
//!
//! Sits between storage and the engine: resolves plans by name or ID, keeps
//! the cached due dates and calculated contributions current, and computes
//! funding status for active plans.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::engine::{funding_status, implied_monthly_contribution, next_due_date, PlanFundingStatus};
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{ContributionSource, ExpensePlan};
use crate::storage::Storage;

/// What a refresh changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub plans_checked: usize,
    pub due_dates_updated: usize,
    pub contributions_updated: usize,
}

impl RefreshSummary {
    pub fn changed(&self) -> bool {
        self.due_dates_updated > 0 || self.contributions_updated > 0
    }
}

/// A plan with its freshly resolved next due date
#[derive(Debug, Clone)]
pub struct UpcomingDue {
    pub plan: ExpensePlan,
    pub next_due: Option<NaiveDate>,
}

/// Service for expense plan operations
pub struct PlanService<'a> {
    storage: &'a Storage,
}

impl<'a> PlanService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Look a plan up by ID or name, failing if it does not exist
    pub fn get(&self, identifier: &str) -> EnvelopeResult<ExpensePlan> {
        self.storage
            .plans
            .find(identifier)?
            .ok_or_else(|| EnvelopeError::plan_not_found(identifier))
    }

    /// Look a plan up and make sure it can be handed to the engine
    pub fn get_valid(&self, identifier: &str) -> EnvelopeResult<ExpensePlan> {
        let plan = self.get(identifier)?;
        plan.validate()
            .map_err(|e| EnvelopeError::Validation(format!("{}: {}", plan.name, e)))?;
        Ok(plan)
    }

    pub fn list(&self, include_inactive: bool) -> EnvelopeResult<Vec<ExpensePlan>> {
        if include_inactive {
            self.storage.plans.get_all()
        } else {
            self.storage.plans.get_active()
        }
    }

    /// Bring one plan's cached schedule fields up to date
    ///
    /// The cached due date is replaced when missing or no longer in the
    /// future (a date due today has passed). Calculated contributions are
    /// re-derived. Returns which of the two changed.
    pub fn refresh_plan(plan: &mut ExpensePlan, today: NaiveDate) -> (bool, bool) {
        let mut due_changed = false;
        let stale = plan.next_due_date.map_or(true, |d| d <= today);
        if stale {
            let resolved = next_due_date(&plan.recurrence, today);
            if resolved.is_some() && resolved != plan.next_due_date {
                plan.next_due_date = resolved;
                due_changed = true;
            }
        }

        let mut contribution_changed = false;
        if plan.contribution_source == ContributionSource::Calculated {
            let implied = implied_monthly_contribution(plan, today);
            if implied != plan.monthly_contribution {
                plan.monthly_contribution = implied;
                contribution_changed = true;
            }
        }

        (due_changed, contribution_changed)
    }

    /// Refresh every valid plan and persist the changes
    pub fn refresh_all(&self, today: NaiveDate) -> EnvelopeResult<RefreshSummary> {
        let mut summary = RefreshSummary::default();

        for mut plan in self.storage.plans.get_all()? {
            if plan.validate().is_err() {
                continue;
            }
            summary.plans_checked += 1;

            let (due_changed, contribution_changed) = Self::refresh_plan(&mut plan, today);
            if due_changed {
                debug!(plan = %plan.name, next_due = ?plan.next_due_date, "updated due date");
                summary.due_dates_updated += 1;
            }
            if contribution_changed {
                debug!(plan = %plan.name, monthly = %plan.monthly_contribution, "updated contribution");
                summary.contributions_updated += 1;
            }
            if due_changed || contribution_changed {
                self.storage.plans.upsert(plan)?;
            }
        }

        if summary.changed() {
            self.storage.plans.save()?;
        }

        info!(
            checked = summary.plans_checked,
            due_dates = summary.due_dates_updated,
            contributions = summary.contributions_updated,
            %today,
            "refreshed plan schedules"
        );
        Ok(summary)
    }

    /// Active plans with their schedule fields refreshed in memory
    ///
    /// Nothing is written back; reports use this so a stale cache never
    /// skews a result.
    pub fn refreshed_active(&self, today: NaiveDate) -> EnvelopeResult<Vec<ExpensePlan>> {
        let mut plans = self.storage.plans.get_active()?;
        for plan in &mut plans {
            Self::refresh_plan(plan, today);
        }
        Ok(plans)
    }

    /// Funding status for every active plan, in plan name order
    pub fn funding_statuses(&self, today: NaiveDate) -> EnvelopeResult<Vec<PlanFundingStatus>> {
        let statuses: Vec<_> = self
            .refreshed_active(today)?
            .iter()
            .map(|plan| funding_status(plan, today))
            .collect();

        debug!(plans = statuses.len(), %today, "computed funding statuses");
        Ok(statuses)
    }

    /// Next due date for every active plan, soonest first, undated last
    pub fn upcoming(&self, today: NaiveDate) -> EnvelopeResult<Vec<UpcomingDue>> {
        let mut upcoming: Vec<_> = self
            .refreshed_active(today)?
            .into_iter()
            .map(|plan| UpcomingDue {
                next_due: plan.next_due_date,
                plan,
            })
            .collect();

        upcoming.sort_by_key(|u| (u.next_due.is_none(), u.next_due));
        Ok(upcoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::engine::FundingStatus;
    use crate::models::{Money, PlanPurpose, PlanType, Recurrence};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(PlannerPaths::with_base_dir(temp_dir.path())).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_get_missing_plan_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let err = PlanService::new(&storage).get("Nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_refresh_sets_missing_due_date_and_contribution() {
        let mut plan = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 3, 15);
        let (due, contribution) = PlanService::refresh_plan(&mut plan, date(2025, 1, 10));

        assert!(due && contribution);
        assert_eq!(plan.next_due_date, Some(date(2025, 3, 15)));
        assert_eq!(plan.monthly_contribution.cents(), 10000);
    }

    #[test]
    fn test_refresh_rolls_over_on_due_day() {
        let mut plan = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 3, 15)
            .with_next_due_date(date(2025, 3, 15));
        PlanService::refresh_plan(&mut plan, date(2025, 3, 15));
        assert_eq!(plan.next_due_date, Some(date(2026, 3, 15)));
    }

    #[test]
    fn test_refresh_keeps_future_cache_and_manual_contribution() {
        let mut plan = ExpensePlan::yearly("Insurance", Money::from_cents(120000), 3, 15)
            .with_monthly_contribution(Money::from_cents(5000))
            .with_next_due_date(date(2025, 6, 1));
        let changed = PlanService::refresh_plan(&mut plan, date(2025, 1, 10));

        assert_eq!(changed, (false, false));
        assert_eq!(plan.next_due_date, Some(date(2025, 6, 1)));
        assert_eq!(plan.monthly_contribution.cents(), 5000);
    }

    #[test]
    fn test_refresh_all_persists_changes() {
        let (temp_dir, storage) = create_test_storage();
        storage
            .plans
            .upsert(ExpensePlan::yearly("Insurance", Money::from_cents(120000), 3, 15))
            .unwrap();

        let summary = PlanService::new(&storage)
            .refresh_all(date(2025, 1, 10))
            .unwrap();
        assert_eq!(summary.plans_checked, 1);
        assert_eq!(summary.due_dates_updated, 1);
        assert_eq!(summary.contributions_updated, 1);

        let reopened = Storage::new(PlannerPaths::with_base_dir(temp_dir.path())).unwrap();
        reopened.load_all().unwrap();
        let plan = reopened.plans.find("insurance").unwrap().unwrap();
        assert_eq!(plan.next_due_date, Some(date(2025, 3, 15)));

        // Second run has nothing to do
        let again = PlanService::new(&reopened)
            .refresh_all(date(2025, 1, 10))
            .unwrap();
        assert!(!again.changed());
    }

    #[test]
    fn test_funding_statuses_for_active_plans() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .plans
            .upsert(
                ExpensePlan::yearly("Insurance", Money::from_cents(120000), 4, 10)
                    .with_monthly_contribution(Money::from_cents(10000)),
            )
            .unwrap();
        storage
            .plans
            .upsert(ExpensePlan::fixed_monthly("Internet", Money::from_cents(7207), 5))
            .unwrap();

        let statuses = PlanService::new(&storage)
            .funding_statuses(date(2025, 1, 10))
            .unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].plan_name, "Insurance");
        assert_eq!(statuses[0].status, FundingStatus::Behind);
        assert_eq!(statuses[1].status, FundingStatus::Funded);
        assert!(statuses[1].current_month_payment_made);
    }

    #[test]
    fn test_upcoming_sorts_undated_last() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .plans
            .upsert(ExpensePlan::yearly("Insurance", Money::from_cents(120000), 9, 1))
            .unwrap();
        storage
            .plans
            .upsert(ExpensePlan::fixed_monthly("Internet", Money::from_cents(7207), 20))
            .unwrap();
        storage
            .plans
            .upsert(ExpensePlan::new(
                "Rainy day",
                PlanPurpose::SinkingFund,
                PlanType::EmergencyFund,
                Recurrence::OneTime { target_date: None },
                Money::from_cents(500000),
            ))
            .unwrap();

        let upcoming = PlanService::new(&storage)
            .upcoming(date(2025, 1, 10))
            .unwrap();
        let names: Vec<_> = upcoming.iter().map(|u| u.plan.name.as_str()).collect();
        assert_eq!(names, vec!["Internet", "Insurance", "Rainy day"]);
        assert_eq!(upcoming[0].next_due, Some(date(2025, 1, 20)));
    }
}
