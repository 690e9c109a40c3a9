//! `key:value` tags on a todo.txt task line.
//!
//! A tag starts at the beginning of the line or right after a space, and its
//! value runs up to the next space. Only the tags this crate cares about
//! (`rec:`, `t:`, `due:`) are ever read or written; everything else on the
//! line is carried through untouched.

use chrono::NaiveDate;

use crate::error::RecurError;
use crate::resolve::format_date;

/// The value of `key:` on `line`, or `None` if the tag is absent.
///
/// # Errors
///
/// Returns [`RecurError::DuplicateKey`] if the tag appears more than once.
///
/// # Examples
///
/// ```
/// use recur_engine::tags::get_key_value;
///
/// assert_eq!(get_key_value("(A) Test task rec:3d", "rec").unwrap(), Some("3d"));
/// assert_eq!(get_key_value("Test task", "rec").unwrap(), None);
/// assert!(get_key_value("Test task rec:1 rec:2", "rec").is_err());
/// ```
pub fn get_key_value<'a>(line: &'a str, key: &str) -> Result<Option<&'a str>, RecurError> {
    let prefix = format!("{key}:");
    let mut values = line.split(' ').filter_map(|word| word.strip_prefix(prefix.as_str()));

    match (values.next(), values.next()) {
        (None, _) => Ok(None),
        (Some(value), None) => Ok(Some(value)),
        (Some(_), Some(_)) => Err(RecurError::DuplicateKey(key.to_string())),
    }
}

/// The date stored in `key:` on `line`, or `None` if the tag is absent.
///
/// # Errors
///
/// Returns [`RecurError::DuplicateKey`] if the tag appears more than once, or
/// [`RecurError::InvalidDateFormat`] if its value is not a `YYYY-MM-DD` date.
pub fn get_date(line: &str, key: &str) -> Result<Option<NaiveDate>, RecurError> {
    get_key_value(line, key)?
        .map(|value| parse_date(key, value))
        .transpose()
}

/// Parse a strict `YYYY-MM-DD` tag value.
///
/// # Errors
///
/// Returns [`RecurError::InvalidDateFormat`] naming `key` for anything else,
/// including unpadded months and days.
pub fn parse_date(key: &str, value: &str) -> Result<NaiveDate, RecurError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .filter(|date| format_date(*date) == value)
        .ok_or_else(|| RecurError::InvalidDateFormat {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Set `key:` to `value` and return the new line.
///
/// Every existing occurrence is replaced in place. If the tag is absent it is
/// appended. `None` removes the tag along with its separating space.
///
/// # Examples
///
/// ```
/// use recur_engine::tags::set_key_value;
///
/// assert_eq!(set_key_value("Test task", "key", Some("val")), "Test task key:val");
/// assert_eq!(
///     set_key_value("Test task key:val1 b key2:val2", "key", Some("val")),
///     "Test task key:val b key2:val2"
/// );
/// assert_eq!(set_key_value("Test task key:val", "key", None), "Test task");
/// ```
pub fn set_key_value(line: &str, key: &str, value: Option<&str>) -> String {
    let prefix = format!("{key}:");
    let is_tag = |word: &str| word.starts_with(prefix.as_str());

    match value {
        Some(value) => {
            let replacement = format!("{prefix}{value}");
            let mut found = false;
            let words: Vec<&str> = line
                .split(' ')
                .map(|word| {
                    if is_tag(word) {
                        found = true;
                        replacement.as_str()
                    } else {
                        word
                    }
                })
                .collect();
            let mut rewritten = words.join(" ");
            if !found {
                rewritten.push(' ');
                rewritten.push_str(&replacement);
            }
            rewritten
        }
        None => line
            .split(' ')
            .filter(|word| !is_tag(word))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Remove the creation date that follows the optional priority.
///
/// `(A) 1970-01-01 Test task` becomes `(A) Test task`. Lines without a
/// creation date are returned unchanged.
pub fn strip_creation_date(line: &str) -> String {
    let (priority, rest) = split_priority(line);

    match rest.split_once(' ') {
        Some((first, description)) if parse_date("created", first).is_ok() => {
            format!("{priority}{description}")
        }
        _ => line.to_string(),
    }
}

/// Split a leading `(X) ` priority off `line`.
fn split_priority(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let has_priority = bytes.len() >= 4
        && bytes[0] == b'('
        && bytes[1].is_ascii_uppercase()
        && bytes[2] == b')'
        && bytes[3] == b' ';

    if has_priority {
        line.split_at(4)
    } else {
        ("", line)
    }
}
