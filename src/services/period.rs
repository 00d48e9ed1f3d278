//! Period resolution
//!
//! Turns the period names users type (`this_month`, `next_30_days`, `2025-06`,
//! `2025-01-01..2025-03-31`) into concrete `Period` windows. The engine only
//! ever sees the resulting dates.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{MonthPeriod, Period};

const MONTH_NAMES: [(&str, u32); 24] = [
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Resolves period names relative to a fixed "today"
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    today: NaiveDate,
}

impl PeriodResolver {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_month(&self) -> MonthPeriod {
        MonthPeriod::containing(self.today)
    }

    /// Resolve a period name into a date window
    ///
    /// Accepted forms:
    /// - `this_month`, `next_month`, `last_month`
    /// - `next_30_days`, `next_90_days` (today inclusive)
    /// - `this_quarter`, `this_year`
    /// - `YYYY-MM`, or a month name with optional year (`june`, `Jun 2026`)
    /// - `YYYY-MM-DD..YYYY-MM-DD`
    pub fn resolve(&self, name: &str) -> EnvelopeResult<Period> {
        let key = name.trim().to_lowercase().replace(['-', ' '], "_");
        let this_month = self.current_month();

        let period = match key.as_str() {
            "this_month" | "current" | "month" => this_month.into(),
            "next_month" | "next" => this_month.next().into(),
            "last_month" | "last" | "previous" => this_month.prev().into(),
            "next_30_days" => self.days_ahead(30),
            "next_90_days" => self.days_ahead(90),
            "this_quarter" | "quarter" => {
                let first = MonthPeriod::new(self.today.year(), (self.today.month() - 1) / 3 * 3 + 1);
                Period::new(first.start_date(), first.offset(2).end_date())
            }
            "this_year" | "year" => Period::new(
                MonthPeriod::new(self.today.year(), 1).start_date(),
                MonthPeriod::new(self.today.year(), 12).end_date(),
            ),
            _ => return self.resolve_explicit(name.trim()),
        };

        Ok(period)
    }

    /// Resolve a single month: `YYYY-MM`, a month name, or a relative name
    pub fn month(&self, name: &str) -> EnvelopeResult<MonthPeriod> {
        let trimmed = name.trim();
        if let Ok(month) = MonthPeriod::parse(trimmed) {
            return Ok(month);
        }
        if let Some(month) = self.parse_month_name(&trimmed.to_lowercase()) {
            return Ok(month);
        }

        match trimmed.to_lowercase().replace(['-', ' '], "_").as_str() {
            "this_month" | "current" => Ok(self.current_month()),
            "next_month" | "next" => Ok(self.current_month().next()),
            "last_month" | "last" | "previous" => Ok(self.current_month().prev()),
            _ => Err(EnvelopeError::Validation(format!(
                "Invalid month: {} (expected YYYY-MM)",
                name
            ))),
        }
    }

    /// Parse a `YYYY-MM-DD` date
    pub fn date(&self, s: &str) -> EnvelopeResult<NaiveDate> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(self.today),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
                EnvelopeError::Validation(format!("Invalid date: {} (expected YYYY-MM-DD)", s))
            }),
        }
    }

    fn days_ahead(&self, days: i64) -> Period {
        Period::new(self.today, self.today + Duration::days(days - 1))
    }

    fn resolve_explicit(&self, s: &str) -> EnvelopeResult<Period> {
        if s.contains("..") {
            return Period::parse(s)
                .map_err(|e| EnvelopeError::Validation(format!("Invalid period: {}", e)));
        }

        self.month(s)
            .map(Period::from)
            .map_err(|_| EnvelopeError::Validation(format!("Unknown period: {}", s)))
    }

    /// Month names without a year mean the next time that month comes round
    fn parse_month_name(&self, s: &str) -> Option<MonthPeriod> {
        for (name, month) in MONTH_NAMES {
            if let Some(rest) = s.strip_prefix(name) {
                let rest = rest.trim();
                let year = if rest.is_empty() {
                    if month < self.today.month() {
                        self.today.year() + 1
                    } else {
                        self.today.year()
                    }
                } else {
                    rest.parse().ok()?
                };
                return Some(MonthPeriod::new(year, month));
            }
        }

        None
    }
}
