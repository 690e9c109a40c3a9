//! Next-occurrence dates for a recurring task.
//!
//! The policy is a table over two tagged variants:
//!
//! | [`Shape`] \ [`Anchor`] | `Strict` (`rec:+…`)        | `Normal` (`rec:…`)                     |
//! |------------------------|----------------------------|----------------------------------------|
//! | `NoDates`              | unchanged                  | unchanged                              |
//! | `StartOnly`/`DueOnly`  | that date + step           | today + step                           |
//! | `Both`                 | each date + step           | start = today + step, due keeps offset |
//!
//! "Today" is always supplied by the caller; nothing here reads the clock.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use tracing::{debug, warn};

use crate::adjust::{adjust_with_options, AdjustOptions};
use crate::error::RecurError;
use crate::rule::RecurrenceSpec;

/// The recurrence-relevant dates of a task: `t:` and `due:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskDates {
    /// Threshold date, from `t:`.
    pub start: Option<NaiveDate>,
    /// From `due:`.
    pub due: Option<NaiveDate>,
}

impl TaskDates {
    pub fn new(start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        Self { start, due }
    }

    pub fn shape(&self) -> Shape {
        match (self.start, self.due) {
            (None, None) => Shape::NoDates,
            (Some(start), None) => Shape::StartOnly(start),
            (None, Some(due)) => Shape::DueOnly(due),
            (Some(start), Some(due)) => Shape::Both { start, due },
        }
    }

    /// `t:` value as `YYYY-MM-DD`.
    pub fn format_start(&self) -> Option<String> {
        self.start.map(format_date)
    }

    /// `due:` value as `YYYY-MM-DD`.
    pub fn format_due(&self) -> Option<String> {
        self.due.map(format_date)
    }
}

/// Which dates a task carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    NoDates,
    StartOnly(NaiveDate),
    DueOnly(NaiveDate),
    Both { start: NaiveDate, due: NaiveDate },
}

/// What the next occurrence is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// The task's own declared dates (rent is due on the 1st however late it was paid).
    Strict,
    /// The completion date (water the flowers five days after they were last watered).
    Normal,
}

impl From<&RecurrenceSpec> for Anchor {
    fn from(spec: &RecurrenceSpec) -> Self {
        if spec.strict {
            Anchor::Strict
        } else {
            Anchor::Normal
        }
    }
}

/// Compute the next occurrence's dates with default adjust options.
///
/// See [`resolve_with_options`].
pub fn resolve(
    dates: TaskDates,
    spec: &RecurrenceSpec,
    today: NaiveDate,
) -> Result<TaskDates, RecurError> {
    resolve_with_options(dates, spec, today, &AdjustOptions::default())
}

/// Compute the next occurrence's dates.
///
/// # Arguments
///
/// * `dates`: the completed task's `t:` and `due:` dates
/// * `spec`: the parsed `rec:` value
/// * `today`: the completion date
/// * `options`: passed through to the date adjuster
///
/// # Errors
///
/// Returns [`RecurError::DateOutOfRange`] if a computed date cannot be
/// represented.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use recur_engine::resolve::{resolve, TaskDates};
///
/// let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let spec = "2w".parse().unwrap();
/// let dates = TaskDates::new(Some(ymd(2021, 1, 1)), Some(ymd(2021, 1, 8)));
///
/// let next = resolve(dates, &spec, ymd(2021, 1, 3)).unwrap();
/// assert_eq!(next, TaskDates::new(Some(ymd(2021, 1, 17)), Some(ymd(2021, 1, 24))));
/// ```
pub fn resolve_with_options(
    dates: TaskDates,
    spec: &RecurrenceSpec,
    today: NaiveDate,
    options: &AdjustOptions,
) -> Result<TaskDates, RecurError> {
    let step = |base: NaiveDate| adjust_with_options(base, spec.unit, spec.magnitude, options);
    let anchor = Anchor::from(spec);
    let shape = dates.shape();
    debug!(?anchor, ?shape, rec = %spec, %today, "resolving next occurrence");

    let next = match (anchor, shape) {
        (_, Shape::NoDates) => dates,

        (Anchor::Strict, Shape::StartOnly(start)) => TaskDates::new(Some(step(start)?), None),
        (Anchor::Strict, Shape::DueOnly(due)) => TaskDates::new(None, Some(step(due)?)),
        (Anchor::Normal, Shape::StartOnly(_)) => TaskDates::new(Some(step(today)?), None),
        (Anchor::Normal, Shape::DueOnly(_)) => TaskDates::new(None, Some(step(today)?)),

        (Anchor::Strict, Shape::Both { start, due }) => {
            TaskDates::new(Some(step(start)?), Some(step(due)?))
        }
        (Anchor::Normal, Shape::Both { start, due }) => {
            let lead = due.signed_duration_since(start);
            if lead < TimeDelta::zero() {
                warn!(%start, %due, "due date precedes start date; keeping negative offset");
            }
            let new_start = step(today)?;
            let new_due = new_start.checked_add_signed(lead).ok_or_else(|| {
                RecurError::DateOutOfRange(format!("{new_start} + {} days", lead.num_days()))
            })?;
            TaskDates::new(Some(new_start), Some(new_due))
        }
    };

    debug!(start = ?next.start, due = ?next.due, "next occurrence resolved");
    Ok(next)
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
