//! # recur-engine
//!
//! Deterministic next-occurrence computation for recurring todo.txt tasks.
//!
//! A task opts into recurrence with a `rec:` tag such as `rec:5d` (normal:
//! measured from the day the task is completed) or `rec:+1m` (strict:
//! measured from the task's own `t:`/`due:` dates). When such a task is
//! completed, this crate computes the dates of the copy that replaces it.
//!
//! Every function is pure. The completion date is always an argument, so
//! results never depend on the system clock.
//!
//! ## Modules
//!
//! - [`rule`]: `rec:` value → [`RecurrenceSpec`]
//! - [`adjust`]: Step a date by days, business days, weeks, months or years
//! - [`resolve`]: Normal vs. strict policy over a task's `t:`/`due:` dates
//! - [`tags`]: Read and rewrite `key:value` tags on a task line
//! - [`task`]: Raw tags or a whole line → [`NextOccurrence`]
//! - [`error`]: Error types

pub mod adjust;
pub mod error;
pub mod resolve;
pub mod rule;
pub mod tags;
pub mod task;

pub use adjust::{adjust, adjust_with_options, AdjustOptions, MonthEnd};
pub use error::RecurError;
pub use resolve::{resolve, resolve_with_options, Anchor, Shape, TaskDates};
pub use rule::{parse_recurrence, RecurrenceSpec, Unit};
pub use tags::{get_date, get_key_value, parse_date, set_key_value, strip_creation_date};
pub use task::{
    make_new_task, next_occurrence, next_occurrence_with_options, NextOccurrence, RawTags,
};
