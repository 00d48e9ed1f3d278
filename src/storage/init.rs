//! Storage initialization
//!
//! First-run setup: directories plus empty data files, so a fresh data
//! directory is self-describing before any plan is added.

use serde_json::json;
use tracing::info;

use crate::config::paths::PlannerPaths;
use crate::error::EnvelopeError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh data directory
///
/// Existing files are never overwritten. Returns the number of files created.
pub fn initialize_storage(paths: &PlannerPaths) -> Result<usize, EnvelopeError> {
    paths.ensure_directories()?;

    let files = [
        (paths.plans_file(), json!({ "plans": [] })),
        (paths.income_plans_file(), json!({ "income_plans": [] })),
        (paths.accounts_file(), json!({ "accounts": [] })),
        (paths.payments_file(), json!({ "payments": [] })),
        (
            paths.history_file(),
            json!({ "category_spend": [], "monthly_totals": [] }),
        ),
    ];

    let mut created = 0;
    for (path, empty) in files {
        if !path.exists() {
            write_json_atomic(&path, &empty)?;
            created += 1;
        }
    }

    info!(created, data_dir = %paths.data_dir().display(), "initialized storage");
    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PlannerPaths) -> bool {
    !paths.plans_file().exists()
}
