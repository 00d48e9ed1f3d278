//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json. Balances are stored
//! as already computed figures.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::info;

use crate::error::EnvelopeError;
use crate::models::{on_budget_total, Account, AccountId, Money};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    #[serde(default)]
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), EnvelopeError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), EnvelopeError> {
        let accounts = self.get_all()?;
        let count = accounts.len();

        write_json_atomic(&self.path, &AccountData { accounts })?;
        info!(count, "saved accounts");
        Ok(())
    }

    /// All accounts ordered by name
    pub fn get_all(&self) -> Result<Vec<Account>, EnvelopeError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    /// Sum of on-budget balances, the forecast's starting point
    pub fn on_budget_balance(&self) -> Result<Money, EnvelopeError> {
        Ok(on_budget_total(&self.get_all()?))
    }

    pub fn upsert(&self, account: Account) -> Result<(), EnvelopeError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(account.id, account);
        Ok(())
    }
}
