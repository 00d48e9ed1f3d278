//! Historical aggregates for JSON storage
//!
//! history.json keeps per-month spend per category and per-month income and
//! expense totals. The forecaster reads trailing averages from here for
//! spending no plan covers, and for income when there are no income plans.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{debug, info};

use crate::engine::HistoryAggregator;
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{
    CategoryAverage, CategoryId, CategorySpend, Money, MonthPeriod, MonthTotalsRecord,
    MonthlyTotals,
};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct HistoryData {
    #[serde(default)]
    category_spend: Vec<CategorySpend>,
    #[serde(default)]
    monthly_totals: Vec<MonthTotalsRecord>,
}

#[derive(Default)]
struct HistoryIndex {
    spend: HashMap<(MonthPeriod, CategoryId), Money>,
    totals: BTreeMap<MonthPeriod, MonthlyTotals>,
}

/// Repository for per-month history rows
pub struct HistoryRepository {
    path: PathBuf,
    index: RwLock<HistoryIndex>,
}

impl HistoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            index: RwLock::new(HistoryIndex::default()),
        }
    }

    /// Load history from disk; repeated rows for the same key are summed
    pub fn load(&self) -> Result<(), EnvelopeError> {
        let file_data: HistoryData = read_json(&self.path)?;

        let mut index = self.index.write().map_err(lock_error)?;
        *index = HistoryIndex::default();

        for row in file_data.category_spend {
            *index.spend.entry((row.month, row.category_id)).or_default() += row.amount;
        }
        for row in file_data.monthly_totals {
            let totals = index.totals.entry(row.month).or_default();
            totals.income += row.totals.income;
            totals.expense += row.totals.expense;
        }

        Ok(())
    }

    /// Save history to disk, ordered by month
    pub fn save(&self) -> Result<(), EnvelopeError> {
        let index = self.index.read().map_err(lock_error)?;

        let mut category_spend: Vec<_> = index
            .spend
            .iter()
            .map(|(&(month, category_id), &amount)| CategorySpend {
                month,
                category_id,
                amount,
            })
            .collect();
        category_spend.sort_by(|a, b| a.month.cmp(&b.month).then(b.amount.cmp(&a.amount)));

        let monthly_totals: Vec<_> = index
            .totals
            .iter()
            .map(|(&month, &totals)| MonthTotalsRecord { month, totals })
            .collect();

        let rows = category_spend.len() + monthly_totals.len();
        write_json_atomic(
            &self.path,
            &HistoryData {
                category_spend,
                monthly_totals,
            },
        )?;
        info!(rows, "saved history");
        Ok(())
    }

    /// Set the spend recorded for a category in a month
    pub fn record_category_spend(
        &self,
        month: MonthPeriod,
        category_id: CategoryId,
        amount: Money,
    ) -> Result<(), EnvelopeError> {
        let mut index = self.index.write().map_err(lock_error)?;
        index.spend.insert((month, category_id), amount);
        Ok(())
    }

    /// Set the income and expense totals for a month
    pub fn record_totals(&self, month: MonthPeriod, totals: MonthlyTotals) -> Result<(), EnvelopeError> {
        let mut index = self.index.write().map_err(lock_error)?;
        index.totals.insert(month, totals);
        Ok(())
    }
}

impl HistoryAggregator for HistoryRepository {
    /// Spend per category summed over the window and divided by its length,
    /// so months without spend count as zero
    fn monthly_average_by_category(
        &self,
        months_back: u32,
        before: MonthPeriod,
    ) -> EnvelopeResult<Vec<CategoryAverage>> {
        if months_back == 0 {
            return Ok(Vec::new());
        }

        let index = self.index.read().map_err(lock_error)?;
        let first = before.offset(-(months_back as i32));

        let mut sums: HashMap<CategoryId, Money> = HashMap::new();
        for (&(month, category_id), &amount) in &index.spend {
            if month >= first && month < before {
                *sums.entry(category_id).or_default() += amount;
            }
        }

        let mut averages: Vec<_> = sums
            .into_iter()
            .map(|(category_id, total)| CategoryAverage {
                category_id,
                amount: Money::from_cents_f64(total.div_f64(f64::from(months_back))),
            })
            .collect();
        averages.sort_by(|a, b| b.amount.cmp(&a.amount));

        debug!(
            categories = averages.len(),
            months_back,
            %before,
            "computed category averages"
        );
        Ok(averages)
    }

    fn monthly_totals(&self, month: MonthPeriod) -> EnvelopeResult<MonthlyTotals> {
        let index = self.index.read().map_err(lock_error)?;
        Ok(index.totals.get(&month).copied().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, HistoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = HistoryRepository::new(temp_dir.path().join("history.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_average_over_trailing_window() {
        let (_temp_dir, repo) = create_test_repo();
        let groceries = CategoryId::new();

        // Inside a 3-month window before 2025-04
        repo.record_category_spend(MonthPeriod::new(2025, 1), groceries, Money::from_cents(30000))
            .unwrap();
        repo.record_category_spend(MonthPeriod::new(2025, 3), groceries, Money::from_cents(60000))
            .unwrap();
        // Outside: too old, and the forecast month itself
        repo.record_category_spend(MonthPeriod::new(2024, 12), groceries, Money::from_cents(99999))
            .unwrap();
        repo.record_category_spend(MonthPeriod::new(2025, 4), groceries, Money::from_cents(99999))
            .unwrap();

        let averages = repo
            .monthly_average_by_category(3, MonthPeriod::new(2025, 4))
            .unwrap();
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].category_id, groceries);
        assert_eq!(averages[0].amount.cents(), 30000);
    }

    #[test]
    fn test_zero_window_is_empty() {
        let (_temp_dir, repo) = create_test_repo();
        repo.record_category_spend(MonthPeriod::new(2025, 1), CategoryId::new(), Money::from_cents(1))
            .unwrap();
        assert!(repo
            .monthly_average_by_category(0, MonthPeriod::new(2025, 2))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_totals_default_to_zero() {
        let (_temp_dir, repo) = create_test_repo();
        let totals = repo.monthly_totals(MonthPeriod::new(2025, 1)).unwrap();
        assert!(!totals.has_activity());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let dining = CategoryId::new();
        let march = MonthPeriod::new(2025, 3);

        repo.record_category_spend(march, dining, Money::from_cents(12000))
            .unwrap();
        repo.record_totals(
            march,
            MonthlyTotals {
                income: Money::from_cents(400000),
                expense: Money::from_cents(310000),
            },
        )
        .unwrap();
        repo.save().unwrap();

        let repo2 = HistoryRepository::new(temp_dir.path().join("history.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.monthly_totals(march).unwrap().income.cents(), 400000);
        let averages = repo2
            .monthly_average_by_category(1, MonthPeriod::new(2025, 4))
            .unwrap();
        assert_eq!(averages[0].amount.cents(), 12000);
    }

    #[test]
    fn test_duplicate_rows_are_summed_on_load() {
        let (temp_dir, repo) = create_test_repo();
        let month = MonthPeriod::new(2025, 1);
        let rows = HistoryData {
            category_spend: vec![],
            monthly_totals: vec![
                MonthTotalsRecord {
                    month,
                    totals: MonthlyTotals {
                        income: Money::from_cents(100),
                        expense: Money::zero(),
                    },
                },
                MonthTotalsRecord {
                    month,
                    totals: MonthlyTotals {
                        income: Money::from_cents(250),
                        expense: Money::from_cents(50),
                    },
                },
            ],
        };
        write_json_atomic(temp_dir.path().join("history.json"), &rows).unwrap();

        repo.load().unwrap();
        let totals = repo.monthly_totals(month).unwrap();
        assert_eq!(totals.income.cents(), 350);
        assert_eq!(totals.expense.cents(), 50);
    }
}
