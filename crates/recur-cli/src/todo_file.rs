//! Read access to the todo.txt file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Return line `item` (1-based) of the todo file, without its line ending.
pub fn get_line(path: &Path, item: usize) -> Result<String> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading todo file {}", path.display()))?;

    match item.checked_sub(1).and_then(|index| contents.lines().nth(index)) {
        Some(line) => Ok(line.to_string()),
        None => bail!("Task {item} does not exist"),
    }
}
