//! Storage layer for the envelope planner
//!
//! JSON file repositories with atomic writes. The payment and history
//! repositories implement the engine's [`SpendingLedger`] and
//! [`HistoryAggregator`] traits.
//!
//! [`SpendingLedger`]: crate::engine::SpendingLedger
//! [`HistoryAggregator`]: crate::engine::HistoryAggregator

pub mod accounts;
pub mod file_io;
pub mod history;
pub mod income;
pub mod init;
pub mod payments;
pub mod plans;

pub use accounts::AccountRepository;
pub use file_io::{read_json, write_json_atomic};
pub use history::HistoryRepository;
pub use income::IncomeRepository;
pub use init::initialize_storage;
pub use payments::PaymentRepository;
pub use plans::PlanRepository;

use crate::config::paths::PlannerPaths;
use crate::error::EnvelopeError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    pub plans: PlanRepository,
    pub income: IncomeRepository,
    pub accounts: AccountRepository,
    pub payments: PaymentRepository,
    pub history: HistoryRepository,
}

impl Storage {
    /// Create a storage instance, ensuring the data directory exists
    pub fn new(paths: PlannerPaths) -> Result<Self, EnvelopeError> {
        paths.ensure_directories()?;

        Ok(Self {
            plans: PlanRepository::new(paths.plans_file()),
            income: IncomeRepository::new(paths.income_plans_file()),
            accounts: AccountRepository::new(paths.accounts_file()),
            payments: PaymentRepository::new(paths.payments_file()),
            history: HistoryRepository::new(paths.history_file()),
        })
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), EnvelopeError> {
        self.plans.load()?;
        self.income.load()?;
        self.accounts.load()?;
        self.payments.load()?;
        self.history.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), EnvelopeError> {
        self.plans.save()?;
        self.income.save()?;
        self.accounts.save()?;
        self.payments.save()?;
        self.history.save()?;
        Ok(())
    }
}
