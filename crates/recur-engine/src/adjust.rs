//! Date arithmetic for a single recurrence step.
//!
//! All functions are pure: the caller supplies the base date, and the
//! result depends on nothing else. Business-day stepping skips Saturdays and
//! Sundays only; there is no holiday table.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::RecurError;
use crate::rule::Unit;

// ── Month-end policy ────────────────────────────────────────────────────────

/// How a month step treats days that may not exist in the target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthEnd {
    /// Any day-of-month above 28 becomes 28, whatever the target month's length.
    ///
    /// `2021-01-31 + 1m` is `2021-02-28`, and `2021-01-31 + 2m` is `2021-03-28`.
    #[default]
    Fixed28,
    /// Clamp to the target month's real last day.
    ///
    /// `2021-01-31 + 2m` is `2021-03-31`, and `2021-01-30 + 1m` is `2021-02-28`.
    LastDay,
}

/// Options for [`adjust_with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdjustOptions {
    pub month_end: MonthEnd,
}

// ── adjust ──────────────────────────────────────────────────────────────────

/// Move `base` forward by `magnitude` units with default options.
///
/// See [`adjust_with_options`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use recur_engine::adjust::adjust;
/// use recur_engine::rule::Unit;
///
/// let base = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
/// let next = adjust(base, Unit::Month, 1).unwrap();
/// assert_eq!(next, NaiveDate::from_ymd_opt(2021, 2, 28).unwrap());
/// ```
pub fn adjust(base: NaiveDate, unit: Unit, magnitude: u32) -> Result<NaiveDate, RecurError> {
    adjust_with_options(base, unit, magnitude, &AdjustOptions::default())
}

/// Move `base` forward by `magnitude` units.
///
/// - [`Unit::Day`]: `magnitude` calendar days.
/// - [`Unit::Week`]: `magnitude * 7` calendar days.
/// - [`Unit::BusinessDay`]: the `magnitude`-th Monday–Friday after `base`.
/// - [`Unit::Month`]: month field plus `magnitude`, carrying into the year,
///   with the day clamped per [`AdjustOptions::month_end`].
/// - [`Unit::Year`]: year field plus `magnitude`. February 29 becomes
///   February 28 when the target year is not a leap year.
///
/// # Errors
///
/// Returns [`RecurError::DateOutOfRange`] if the result falls outside the
/// range chrono can represent.
pub fn adjust_with_options(
    base: NaiveDate,
    unit: Unit,
    magnitude: u32,
    options: &AdjustOptions,
) -> Result<NaiveDate, RecurError> {
    let adjusted = match unit {
        Unit::Day => base.checked_add_days(Days::new(u64::from(magnitude))),
        Unit::Week => base.checked_add_days(Days::new(u64::from(magnitude) * 7)),
        Unit::BusinessDay => add_business_days(base, magnitude),
        Unit::Month => add_months(base, magnitude, options.month_end),
        Unit::Year => add_years(base, magnitude),
    };

    adjusted.ok_or_else(|| {
        RecurError::DateOutOfRange(format!("{base} + {magnitude}{}", unit.suffix()))
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Step one day at a time, counting only weekdays.
///
/// Whole weeks are skipped in one jump: from a weekday, five business days
/// always land on the same weekday seven days later. A weekend base behaves
/// exactly like the Friday before it.
fn add_business_days(base: NaiveDate, magnitude: u32) -> Option<NaiveDate> {
    if magnitude == 0 {
        return Some(base);
    }

    let mut date = base;
    while is_weekend(date) {
        date = date.pred_opt()?;
    }

    let whole_weeks = u64::from((magnitude - 1) / 5);
    let mut remaining = magnitude - (magnitude - 1) / 5 * 5;
    date = date.checked_add_days(Days::new(whole_weeks * 7))?;

    while remaining > 0 {
        date = date.succ_opt()?;
        if !is_weekend(date) {
            remaining -= 1;
        }
    }
    Some(date)
}

fn add_months(base: NaiveDate, magnitude: u32, month_end: MonthEnd) -> Option<NaiveDate> {
    let month0 = i64::from(base.month0()) + i64::from(magnitude);
    let year = i32::try_from(i64::from(base.year()) + month0 / 12).ok()?;
    let month = (month0 % 12) as u32 + 1;

    let ceiling = match month_end {
        MonthEnd::Fixed28 => 28,
        MonthEnd::LastDay => days_in_month(year, month)?,
    };
    NaiveDate::from_ymd_opt(year, month, base.day().min(ceiling))
}

fn add_years(base: NaiveDate, magnitude: u32) -> Option<NaiveDate> {
    let year = base.year().checked_add(i32::try_from(magnitude).ok()?)?;
    NaiveDate::from_ymd_opt(year, base.month(), base.day()).or_else(|| {
        // Only February 29 can fail here.
        NaiveDate::from_ymd_opt(year, base.month(), 28)
    })
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some(last.day())
}
