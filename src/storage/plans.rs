//! Expense plan repository for JSON storage
//!
//! Manages loading and saving plans to plans.json. Plans that fail
//! validation on load are kept (so a save never drops them) but are left out
//! of [`PlanRepository::get_active`], so the engine only ever sees valid
//! plans.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{info, warn};

use crate::error::EnvelopeError;
use crate::models::{ExpensePlan, PlanId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PlanData {
    #[serde(default)]
    plans: Vec<ExpensePlan>,
}

/// Repository for expense plan persistence
pub struct PlanRepository {
    path: PathBuf,
    data: RwLock<HashMap<PlanId, ExpensePlan>>,
    /// Plans that failed validation on load
    invalid: RwLock<HashSet<PlanId>>,
}

impl PlanRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            invalid: RwLock::new(HashSet::new()),
        }
    }

    /// Load plans from disk
    pub fn load(&self) -> Result<(), EnvelopeError> {
        let file_data: PlanData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut invalid = self.invalid.write().map_err(lock_error)?;

        data.clear();
        invalid.clear();
        for plan in file_data.plans {
            if let Err(e) = plan.validate() {
                warn!(plan = %plan.name, error = %e, "skipping invalid expense plan");
                invalid.insert(plan.id);
            }
            data.insert(plan.id, plan);
        }

        Ok(())
    }

    /// Save plans to disk, ordered by name
    pub fn save(&self) -> Result<(), EnvelopeError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut plans: Vec<_> = data.values().cloned().collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        let count = plans.len();

        write_json_atomic(&self.path, &PlanData { plans })?;
        info!(count, "saved expense plans");
        Ok(())
    }

    pub fn get(&self, id: PlanId) -> Result<Option<ExpensePlan>, EnvelopeError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All plans ordered by name, including inactive and invalid ones
    pub fn get_all(&self) -> Result<Vec<ExpensePlan>, EnvelopeError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut plans: Vec<_> = data.values().cloned().collect();
        plans.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(plans)
    }

    /// Active plans that passed validation
    pub fn get_active(&self) -> Result<Vec<ExpensePlan>, EnvelopeError> {
        let invalid = self.invalid.read().map_err(lock_error)?;
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| p.active && !invalid.contains(&p.id))
            .collect())
    }

    /// Find a plan by full UUID, short display ID (`pln-1a2b3c4d`) or
    /// case-insensitive name
    pub fn find(&self, identifier: &str) -> Result<Option<ExpensePlan>, EnvelopeError> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<PlanId>() {
            if let Some(plan) = self.get(id)? {
                return Ok(Some(plan));
            }
        }

        let data = self.data.read().map_err(lock_error)?;
        let wanted = identifier.to_lowercase();
        Ok(data
            .values()
            .find(|p| p.id.to_string() == wanted || p.name.to_lowercase() == wanted)
            .cloned())
    }

    /// Insert or update a plan after validating it
    pub fn upsert(&self, plan: ExpensePlan) -> Result<(), EnvelopeError> {
        plan.validate()
            .map_err(|e| EnvelopeError::Validation(format!("{}: {}", plan.name, e)))?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut invalid = self.invalid.write().map_err(lock_error)?;

        invalid.remove(&plan.id);
        data.insert(plan.id, plan);
        Ok(())
    }

}
