//! Plan payment ledger for JSON storage
//!
//! Payments are spending entries linked to a plan. Unlinking keeps the entry
//! on disk but stops it counting against the plan's envelope.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::info;

use crate::engine::SpendingLedger;
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{Money, MonthPeriod, Payment, PaymentId, PlanId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PaymentData {
    #[serde(default)]
    payments: Vec<Payment>,
}

/// Repository for plan payments, indexed by plan
pub struct PaymentRepository {
    path: PathBuf,
    data: RwLock<HashMap<PaymentId, Payment>>,
    /// Index: plan_id -> payment_ids
    by_plan: RwLock<HashMap<PlanId, Vec<PaymentId>>>,
}

impl PaymentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_plan: RwLock::new(HashMap::new()),
        }
    }

    /// Load payments from disk and build the plan index
    pub fn load(&self) -> Result<(), EnvelopeError> {
        let file_data: PaymentData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_plan = self.by_plan.write().map_err(lock_error)?;

        data.clear();
        by_plan.clear();
        for payment in file_data.payments {
            by_plan.entry(payment.plan_id).or_default().push(payment.id);
            data.insert(payment.id, payment);
        }

        Ok(())
    }

    /// Save payments to disk, newest first
    pub fn save(&self) -> Result<(), EnvelopeError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut payments: Vec<_> = data.values().cloned().collect();
        payments.sort_by(|a, b| b.date.cmp(&a.date));
        let count = payments.len();

        write_json_atomic(&self.path, &PaymentData { payments })?;
        info!(count, "saved plan payments");
        Ok(())
    }

    /// Record a payment against its plan
    pub fn add(&self, payment: Payment) -> Result<(), EnvelopeError> {
        if payment.amount.is_negative() {
            return Err(EnvelopeError::Validation(
                "Payment amount cannot be negative".into(),
            ));
        }

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_plan = self.by_plan.write().map_err(lock_error)?;

        if !data.contains_key(&payment.id) {
            by_plan.entry(payment.plan_id).or_default().push(payment.id);
        }
        data.insert(payment.id, payment);
        Ok(())
    }

}

impl SpendingLedger for PaymentRepository {
    fn sum_linked_payments(&self, plan_id: PlanId, month: MonthPeriod) -> EnvelopeResult<Money> {
        let data = self.data.read().map_err(lock_error)?;
        let by_plan = self.by_plan.read().map_err(lock_error)?;

        Ok(by_plan
            .get(&plan_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.get(id))
            .filter(|p| !p.unlinked && month.contains(p.date))
            .map(|p| p.amount)
            .sum())
    }
}
