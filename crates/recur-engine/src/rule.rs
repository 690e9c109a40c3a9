//! Parsing of `rec:` tag values.
//!
//! Grammar: `(+)?N(d|b|w|m|y)?` where `N` is a decimal integer greater than
//! zero. A leading `+` marks strict recurrence; the suffix picks the unit and
//! defaults to days.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RecurError;

/// The calendar unit a recurrence steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Calendar days (`d`, or no suffix).
    #[default]
    Day,
    /// Monday through Friday only (`b`).
    BusinessDay,
    /// Seven calendar days (`w`).
    Week,
    /// Calendar months (`m`).
    Month,
    /// Calendar years (`y`).
    Year,
}

impl Unit {
    /// The suffix letter used in the `rec:` grammar.
    pub fn suffix(self) -> char {
        match self {
            Unit::Day => 'd',
            Unit::BusinessDay => 'b',
            Unit::Week => 'w',
            Unit::Month => 'm',
            Unit::Year => 'y',
        }
    }

    fn from_suffix(ch: char) -> Option<Unit> {
        match ch {
            'd' => Some(Unit::Day),
            'b' => Some(Unit::BusinessDay),
            'w' => Some(Unit::Week),
            'm' => Some(Unit::Month),
            'y' => Some(Unit::Year),
            _ => None,
        }
    }
}

/// A parsed `rec:` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecurrenceSpec {
    /// `true` when the tag carried a `+` prefix.
    pub strict: bool,
    /// How many units to step. Always greater than zero.
    pub magnitude: u32,
    pub unit: Unit,
}

impl RecurrenceSpec {
    pub fn new(strict: bool, magnitude: u32, unit: Unit) -> Result<Self, RecurError> {
        if magnitude == 0 {
            return Err(RecurError::InvalidRecurrenceFormat(
                "magnitude must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            strict,
            magnitude,
            unit,
        })
    }
}

impl fmt::Display for RecurrenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            f.write_str("+")?;
        }
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

impl FromStr for RecurrenceSpec {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_recurrence(s)
    }
}

/// Parse a `rec:` tag value into a [`RecurrenceSpec`].
///
/// # Errors
///
/// Returns [`RecurError::InvalidRecurrenceFormat`] when the value does not
/// match `(+)?N(d|b|w|m|y)?`, when `N` is zero, or when `N` does not fit in a
/// `u32`.
///
/// # Examples
///
/// ```
/// use recur_engine::rule::{parse_recurrence, Unit};
///
/// let spec = parse_recurrence("+1m").unwrap();
/// assert!(spec.strict);
/// assert_eq!(spec.magnitude, 1);
/// assert_eq!(spec.unit, Unit::Month);
/// ```
pub fn parse_recurrence(value: &str) -> Result<RecurrenceSpec, RecurError> {
    let malformed =
        || RecurError::InvalidRecurrenceFormat(format!("malformed `rec:` value '{value}'"));

    let (strict, rest) = match value.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, suffix) = rest.split_at(digits_end);
    if digits.is_empty() {
        return Err(malformed());
    }

    let mut suffix_chars = suffix.chars();
    let unit = match (suffix_chars.next(), suffix_chars.next()) {
        (None, _) => Unit::Day,
        (Some(ch), None) => Unit::from_suffix(ch).ok_or_else(malformed)?,
        (Some(_), Some(_)) => return Err(malformed()),
    };

    let magnitude: u32 = digits.parse().map_err(|_| malformed())?;
    if magnitude == 0 {
        return Err(RecurError::InvalidRecurrenceFormat(format!(
            "`rec:` value '{value}' must recur by at least one unit"
        )));
    }

    Ok(RecurrenceSpec {
        strict,
        magnitude,
        unit,
    })
}
