//! From raw task tags to the next occurrence.
//!
//! This is the boundary the todo.txt add-on talks to: it hands over the raw
//! `rec:`, `t:` and `due:` strings (or a whole task line) plus today's date,
//! and learns whether to only complete the task or also add a new one.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::adjust::AdjustOptions;
use crate::error::RecurError;
use crate::resolve::{resolve_with_options, TaskDates};
use crate::rule::parse_recurrence;
use crate::tags::{get_key_value, parse_date, set_key_value, strip_creation_date};

pub const REC_KEY: &str = "rec";
pub const START_KEY: &str = "t";
pub const DUE_KEY: &str = "due";

/// What completing a task should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextOccurrence {
    /// No `rec:` tag: mark the task done and add nothing.
    CompleteOnly,
    /// Mark the task done and add a copy carrying these dates.
    Recur(TaskDates),
}

/// Raw tag values read from one task line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTags<'a> {
    pub rec: Option<&'a str>,
    pub start: Option<&'a str>,
    pub due: Option<&'a str>,
}

impl<'a> RawTags<'a> {
    /// Extract `rec:`, `t:` and `due:` from `line`.
    ///
    /// Without a `rec:` tag the other two are left unread, so a task that
    /// does not recur never fails here because of its dates.
    ///
    /// # Errors
    ///
    /// Returns [`RecurError::DuplicateKey`] if any of them appears twice.
    pub fn from_line(line: &'a str) -> Result<Self, RecurError> {
        let Some(rec) = get_key_value(line, REC_KEY)? else {
            return Ok(Self::default());
        };
        Ok(Self {
            rec: Some(rec),
            start: get_key_value(line, START_KEY)?,
            due: get_key_value(line, DUE_KEY)?,
        })
    }
}

/// Decide what completing a task produces, with default adjust options.
///
/// See [`next_occurrence_with_options`].
pub fn next_occurrence(tags: RawTags<'_>, today: NaiveDate) -> Result<NextOccurrence, RecurError> {
    next_occurrence_with_options(tags, today, &AdjustOptions::default())
}

/// Decide what completing a task produces.
///
/// A missing `rec:` short-circuits to [`NextOccurrence::CompleteOnly`]
/// without looking at the other tags.
///
/// # Errors
///
/// Returns [`RecurError::InvalidRecurrenceFormat`] for a bad `rec:` value,
/// [`RecurError::InvalidDateFormat`] for a bad `t:`/`due:` value, and
/// [`RecurError::DateOutOfRange`] if the new dates cannot be represented.
pub fn next_occurrence_with_options(
    tags: RawTags<'_>,
    today: NaiveDate,
    options: &AdjustOptions,
) -> Result<NextOccurrence, RecurError> {
    let Some(rec) = tags.rec else {
        debug!("no `rec:` tag, completing only");
        return Ok(NextOccurrence::CompleteOnly);
    };

    let spec = parse_recurrence(rec)?;
    let dates = TaskDates::new(
        tags.start.map(|value| parse_date(START_KEY, value)).transpose()?,
        tags.due.map(|value| parse_date(DUE_KEY, value)).transpose()?,
    );

    resolve_with_options(dates, &spec, today, options).map(NextOccurrence::Recur)
}

/// Build the line for the next occurrence of `line`.
///
/// Returns `Ok(None)` when the task has no `rec:` tag. Otherwise the result is
/// `line` with its `t:`/`due:` values replaced and its creation date removed;
/// tags the task did not have are not added.
///
/// # Errors
///
/// Propagates every error of [`RawTags::from_line`] and
/// [`next_occurrence_with_options`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use recur_engine::adjust::AdjustOptions;
/// use recur_engine::task::make_new_task;
///
/// let today = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
/// let options = AdjustOptions::default();
///
/// let next = make_new_task("Water flowers t:2021-01-01 rec:5d", today, &options).unwrap();
/// assert_eq!(next.as_deref(), Some("Water flowers t:2021-01-07 rec:5d"));
/// assert_eq!(make_new_task("Fix lamp", today, &options).unwrap(), None);
/// ```
pub fn make_new_task(
    line: &str,
    today: NaiveDate,
    options: &AdjustOptions,
) -> Result<Option<String>, RecurError> {
    let tags = RawTags::from_line(line)?;
    let dates = match next_occurrence_with_options(tags, today, options)? {
        NextOccurrence::CompleteOnly => return Ok(None),
        NextOccurrence::Recur(dates) => dates,
    };

    let mut next = strip_creation_date(line);
    if let Some(start) = dates.format_start() {
        next = set_key_value(&next, START_KEY, Some(&start));
    }
    if let Some(due) = dates.format_due() {
        next = set_key_value(&next, DUE_KEY, Some(&due));
    }
    Ok(Some(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn next_line(line: &str, today: NaiveDate) -> Option<String> {
        make_new_task(line, today, &AdjustOptions::default()).unwrap()
    }

    // ── next_occurrence ─────────────────────────────────────────────────

    #[test]
    fn test_next_occurrence_without_rec_completes_only() {
        // Malformed dates are not inspected when there is nothing to recur.
        let tags = RawTags {
            rec: None,
            start: Some("garbage"),
            due: None,
        };
        assert_eq!(
            next_occurrence(tags, d(2021, 1, 1)).unwrap(),
            NextOccurrence::CompleteOnly
        );
    }

    #[test]
    fn test_next_occurrence_from_raw_strings() {
        let tags = RawTags {
            rec: Some("+1m"),
            start: Some("2021-01-28"),
            due: Some("2021-02-01"),
        };
        let next = next_occurrence(tags, d(2021, 2, 3)).unwrap();
        assert_eq!(
            next,
            NextOccurrence::Recur(TaskDates::new(Some(d(2021, 2, 28)), Some(d(2021, 3, 1))))
        );
    }

    #[test]
    fn test_next_occurrence_invalid_rec() {
        let tags = RawTags {
            rec: Some("0d"),
            ..Default::default()
        };
        let err = next_occurrence(tags, d(2021, 1, 1)).unwrap_err();
        assert!(matches!(err, RecurError::InvalidRecurrenceFormat(_)));
    }

    #[test]
    fn test_next_occurrence_invalid_due() {
        let tags = RawTags {
            rec: Some("1w"),
            start: Some("2021-01-01"),
            due: Some("next week"),
        };
        let err = next_occurrence(tags, d(2021, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            RecurError::InvalidDateFormat {
                key: "due".to_string(),
                value: "next week".to_string(),
            }
        );
    }

    #[test]
    fn test_from_line_without_rec_skips_dates() {
        let tags = RawTags::from_line("Task t:2021-01-01 t:2021-01-02 due:soon").unwrap();
        assert_eq!(tags, RawTags::default());
    }

    #[test]
    fn test_from_line_with_rec_reports_duplicate_dates() {
        let err = RawTags::from_line("Task t:2021-01-01 t:2021-01-02 rec:1").unwrap_err();
        assert_eq!(err, RecurError::DuplicateKey("t".to_string()));
    }

    #[test]
    fn test_from_line_reads_all_tags() {
        let tags = RawTags::from_line("Pay rent t:2021-01-28 due:2021-02-01 rec:+1m").unwrap();
        assert_eq!(
            tags,
            RawTags {
                rec: Some("+1m"),
                start: Some("2021-01-28"),
                due: Some("2021-02-01"),
            }
        );
    }

    #[test]
    fn test_next_occurrence_serializes_action() {
        let json = serde_json::to_value(NextOccurrence::CompleteOnly).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "complete_only" }));
    }

    // ── make_new_task ───────────────────────────────────────────────────

    #[test]
    fn test_make_new_task_no_rec() {
        let now = d(1970, 1, 3);
        assert_eq!(next_line("Test task", now), None);
        assert_eq!(next_line("Fix lamp", now), None);
    }

    #[test]
    fn test_make_new_task_no_rec_ignores_other_tags() {
        let now = d(1970, 1, 3);
        assert_eq!(next_line("Test task t:1970-01-01 t:1970-01-02 due:soon", now), None);
    }

    #[test]
    fn test_make_new_task_rec_without_dates() {
        let now = d(1970, 1, 3);
        assert_eq!(next_line("Test task rec:3d", now).as_deref(), Some("Test task rec:3d"));
        assert_eq!(next_line("Test task rec:+3d", now).as_deref(), Some("Test task rec:+3d"));
        assert_eq!(
            next_line("Meet friend for tea rec:1", now).as_deref(),
            Some("Meet friend for tea rec:1")
        );
    }

    #[test]
    fn test_make_new_task_strips_creation_date() {
        let now = d(1970, 1, 3);
        assert_eq!(
            next_line("1970-01-01 Test task rec:3d", now).as_deref(),
            Some("Test task rec:3d")
        );
        assert_eq!(
            next_line("(A) 1970-01-01 Test task rec:3d", now).as_deref(),
            Some("(A) Test task rec:3d")
        );
    }

    #[test]
    fn test_make_new_task_single_date() {
        let now = d(1970, 1, 3);
        let cases = [
            ("Test task t:1970-01-01 rec:3d", "Test task t:1970-01-06 rec:3d"),
            ("Test task t:1970-01-01 rec:+3d", "Test task t:1970-01-04 rec:+3d"),
            ("Test task due:1970-01-01 rec:3d", "Test task due:1970-01-06 rec:3d"),
            ("Test task due:1970-01-01 rec:+3d", "Test task due:1970-01-04 rec:+3d"),
        ];
        for (line, expected) in cases {
            assert_eq!(next_line(line, now).as_deref(), Some(expected), "line: {line}");
        }
    }

    #[test]
    fn test_make_new_task_both_dates() {
        let now = d(1970, 1, 3);
        assert_eq!(
            next_line("Test task t:1970-01-01 due:1970-01-05 rec:3d", now).as_deref(),
            Some("Test task t:1970-01-06 due:1970-01-10 rec:3d")
        );
        assert_eq!(
            next_line("Test task t:1970-01-01 due:1970-01-05 rec:+3d", now).as_deref(),
            Some("Test task t:1970-01-04 due:1970-01-08 rec:+3d")
        );
    }

    #[test]
    fn test_make_new_task_readme_examples() {
        assert_eq!(
            next_line("Water flowers t:2021-01-01 rec:5d", d(2021, 1, 2)).as_deref(),
            Some("Water flowers t:2021-01-07 rec:5d")
        );
        assert_eq!(
            next_line("Send birthday greeting to friend t:2021-04-04 rec:+1y", d(2021, 4, 5))
                .as_deref(),
            Some("Send birthday greeting to friend t:2022-04-04 rec:+1y")
        );
        assert_eq!(
            next_line("Pay rent t:2021-01-28 due:2021-02-01 rec:+1m", d(2021, 2, 1)).as_deref(),
            Some("Pay rent t:2021-02-28 due:2021-03-01 rec:+1m")
        );
        assert_eq!(
            next_line("Do offline backup t:2021-01-01 due:2021-01-08 rec:2w", d(2021, 1, 3))
                .as_deref(),
            Some("Do offline backup t:2021-01-17 due:2021-01-24 rec:2w")
        );
        assert_eq!(
            next_line("Get groceries t:2021-01-14 rec:1m", d(2021, 1, 31)).as_deref(),
            Some("Get groceries t:2021-02-28 rec:1m")
        );
        assert_eq!(
            next_line("Pay rent t:2021-01-31 due:2021-02-01 rec:+1m", d(2021, 2, 1)).as_deref(),
            Some("Pay rent t:2021-02-28 due:2021-03-01 rec:+1m")
        );
    }

    #[test]
    fn test_make_new_task_duplicate_keys() {
        let now = d(1970, 1, 3);
        let options = AdjustOptions::default();
        let cases = [
            ("Test task rec:1 rec:2", "rec"),
            ("Test task t:1970-01-01 t:1970-01-02, rec:1m", "t"),
            ("Test task due:1970-01-01 due:1970-01-02 rec:1", "due"),
        ];
        for (line, key) in cases {
            let err = make_new_task(line, now, &options).unwrap_err();
            assert_eq!(err, RecurError::DuplicateKey(key.to_string()), "line: {line}");
        }
    }

    #[test]
    fn test_make_new_task_malformed_values() {
        let now = d(1970, 1, 3);
        let options = AdjustOptions::default();
        assert!(matches!(
            make_new_task("Test task rec:abc", now, &options),
            Err(RecurError::InvalidRecurrenceFormat(_))
        ));
        assert!(matches!(
            make_new_task("Test task t:tomorrow rec:1", now, &options),
            Err(RecurError::InvalidDateFormat { .. })
        ));
    }
}
