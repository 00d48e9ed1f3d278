//! User settings for the envelope planner
//!
//! Display preferences, forecast defaults and the log filter. Every field has
//! a default so older or hand-edited `config.json` files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::PlannerPaths;
use crate::error::EnvelopeError;

/// User settings stored in `config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Months covered by `forecast` when `--months` is not given
    #[serde(default = "default_forecast_months")]
    pub forecast_months: u32,

    /// Trailing months averaged for historical spending and income
    #[serde(default = "default_history_months")]
    pub history_months: u32,

    /// Period used by `coverage` when `--period` is not given
    #[serde(default = "default_period")]
    pub default_period: String,

    /// `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_forecast_months() -> u32 {
    12
}

fn default_history_months() -> u32 {
    6
}

fn default_period() -> String {
    "this_month".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            forecast_months: default_forecast_months(),
            history_months: default_history_months(),
            default_period: default_period(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PlannerPaths) -> Result<Self, EnvelopeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                EnvelopeError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                EnvelopeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PlannerPaths) -> Result<(), EnvelopeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            EnvelopeError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| EnvelopeError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.forecast_months == 0 {
            return Err(EnvelopeError::Config(
                "forecast_months must be at least 1".into(),
            ));
        }
        if self.history_months == 0 {
            return Err(EnvelopeError::Config(
                "history_months must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
