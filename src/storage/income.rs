//! Income plan repository
//!
//! Handles persistence of income plans to income_plans.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{info, warn};

use crate::error::EnvelopeError;
use crate::models::{IncomePlan, IncomePlanId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct IncomeData {
    #[serde(default)]
    income_plans: Vec<IncomePlan>,
}

/// Repository for income plans
pub struct IncomeRepository {
    path: PathBuf,
    plans: RwLock<HashMap<IncomePlanId, IncomePlan>>,
}

impl IncomeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Load income plans from disk
    pub fn load(&self) -> Result<(), EnvelopeError> {
        let file_data: IncomeData = read_json(&self.path)?;

        let mut plans = self.plans.write().map_err(lock_error)?;
        plans.clear();
        for plan in file_data.income_plans {
            if let Err(e) = plan.validate() {
                warn!(income_plan = %plan.name, error = %e, "income plan failed validation");
            }
            plans.insert(plan.id, plan);
        }

        Ok(())
    }

    /// Save income plans to disk
    pub fn save(&self) -> Result<(), EnvelopeError> {
        let income_plans = self.get_all()?;
        let count = income_plans.len();

        write_json_atomic(&self.path, &IncomeData { income_plans })?;
        info!(count, "saved income plans");
        Ok(())
    }

    /// All income plans ordered by name
    pub fn get_all(&self) -> Result<Vec<IncomePlan>, EnvelopeError> {
        let plans = self.plans.read().map_err(lock_error)?;

        let mut list: Vec<_> = plans.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Active income plans with valid amounts
    pub fn get_active(&self) -> Result<Vec<IncomePlan>, EnvelopeError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| p.active && p.validate().is_ok())
            .collect())
    }

    /// Insert or update an income plan
    pub fn upsert(&self, plan: IncomePlan) -> Result<(), EnvelopeError> {
        plan.validate()
            .map_err(|e| EnvelopeError::Validation(format!("{}: {}", plan.name, e)))?;

        let mut plans = self.plans.write().map_err(lock_error)?;
        plans.insert(plan.id, plan);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, IncomeRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = IncomeRepository::new(temp_dir.path().join("income_plans.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_save_and_reload_keeps_monthly_amounts() {
        let (temp_dir, repo) = create_test_repo();
        let plan = IncomePlan::monthly("Salary", Money::from_cents(400000))
            .with_month(12, Money::from_cents(650000));

        repo.upsert(plan).unwrap();
        repo.save().unwrap();

        let repo2 = IncomeRepository::new(temp_dir.path().join("income_plans.json"));
        repo2.load().unwrap();

        let loaded = repo2.get_all().unwrap().remove(0);
        assert_eq!(loaded.amount_for_month(11).cents(), 400000);
        assert_eq!(loaded.amount_for_month(12).cents(), 650000);
    }

    #[test]
    fn test_get_active_skips_inactive() {
        let (_temp_dir, repo) = create_test_repo();
        let mut side_gig = IncomePlan::monthly("Side gig", Money::from_cents(50000));
        side_gig.active = false;

        repo.upsert(side_gig).unwrap();
        repo.upsert(IncomePlan::monthly("Salary", Money::from_cents(400000)))
            .unwrap();

        let active = repo.get_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Salary");
    }

    #[test]
    fn test_upsert_rejects_negative_amounts() {
        let (_temp_dir, repo) = create_test_repo();
        let plan = IncomePlan::monthly("Refund", Money::from_cents(100))
            .with_month(3, Money::from_cents(-100));

        assert!(repo.upsert(plan).unwrap_err().is_validation());
    }
}
