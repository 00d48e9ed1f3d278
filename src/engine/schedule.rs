//! Schedule resolution
//!
//! Computes when a plan next falls due and the month arithmetic every other
//! calculator relies on. A date that falls due *today* counts as already
//! passed: monthly, yearly and seasonal schedules roll over to the next
//! cycle on their due day.
//!
//! Due days past the end of a short month clamp to that month's last day
//! (day 31 in February resolves to the 28th or 29th).

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{MonthPeriod, Period, Recurrence};

/// Divisor for the day-of-month fraction in [`fractional_months_between`]
pub const DAYS_PER_MONTH: f64 = 30.0;

/// The next date strictly after `today` on which a recurrence falls due
///
/// Returns `None` when the recurrence lacks the fields its frequency needs
/// (a monthly plan with no due day, a multi-year plan with no anchor date).
pub fn next_due_date(recurrence: &Recurrence, today: NaiveDate) -> Option<NaiveDate> {
    let this_month = MonthPeriod::containing(today);

    match recurrence {
        Recurrence::OneTime { target_date } => *target_date,
        Recurrence::MultiYear { target_date, .. } => *target_date,
        Recurrence::Monthly { due_day } => {
            let day = (*due_day)?;
            let candidate = this_month.day(day);
            if candidate > today {
                Some(candidate)
            } else {
                Some(this_month.next().day(day))
            }
        }
        Recurrence::Quarterly { due_day } => {
            let day = (*due_day)?;
            // First month of the quarter after the current one
            let quarter = (today.month() - 1) / 3;
            let next_quarter_start = MonthPeriod::new(today.year(), 1).offset((quarter * 3 + 3) as i32);
            Some(next_quarter_start.day(day))
        }
        Recurrence::Yearly { due_month, due_day } => {
            let (month, day) = ((*due_month)?, (*due_day)?);
            let candidate = MonthPeriod::new(today.year(), month).day(day);
            if candidate > today {
                Some(candidate)
            } else {
                Some(MonthPeriod::new(today.year() + 1, month).day(day))
            }
        }
        Recurrence::Seasonal {
            seasonal_months,
            due_day,
        } => {
            let day = due_day.unwrap_or(1);
            let months = || {
                seasonal_months
                    .iter()
                    .copied()
                    .filter(|m| (1..=12).contains(m))
            };

            months()
                .map(|m| MonthPeriod::new(today.year(), m).day(day))
                .filter(|date| *date > today)
                .min()
                .or_else(|| {
                    months()
                        .min()
                        .map(|m| MonthPeriod::new(today.year() + 1, m).day(day))
                })
        }
    }
}

/// Whole calendar months from `from` to `to`
///
/// A month only counts once its day-of-month has been reached, so
/// Jan 15 → Feb 14 is 0 months and Jan 15 → Feb 15 is 1. Never negative.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }

    let mut months = calendar_month_diff(from, to);
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Months from `from` to `to` with a day fraction over a fixed 30-day month
///
/// This is whole calendar months plus `(to.day - from.day) / 30`; it is an
/// approximation, not calendar-day precision, and every forecast boundary
/// depends on it staying that way. Never negative.
pub fn fractional_months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    if to <= from {
        return 0.0;
    }

    let whole = calendar_month_diff(from, to) as f64;
    let day_fraction = (to.day() as f64 - from.day() as f64) / DAYS_PER_MONTH;
    (whole + day_fraction).max(0.0)
}

fn calendar_month_diff(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// `date` moved back by `months`, clamping the day to the target month's end
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Number of calendar months a period touches, counting partial months
pub fn months_touched(period: &Period) -> u32 {
    let first = MonthPeriod::containing(period.start);
    let last = MonthPeriod::containing(period.end);
    (first.months_until(last) + 1).max(0) as u32
}

/// How many times a day-of-month due date lands inside the period
pub fn due_day_occurrences(due_day: u32, period: &Period) -> u32 {
    period
        .months()
        .filter(|month| period.contains(month.day(due_day)))
        .count() as u32
}
