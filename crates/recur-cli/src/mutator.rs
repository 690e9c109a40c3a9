//! Completing and adding tasks through todo.txt-cli.
//!
//! The add-on never edits the todo file itself. todo.txt-cli exports
//! `TODO_FULL_SH` to its add-ons, and the built-in `do` and `add` actions run
//! through it so that hooks, auto-archive and date-on-add keep working.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Applies the outcome of completing a task.
pub trait TaskMutator {
    /// Mark task `item` (1-based line number) as done.
    fn mark_done(&mut self, item: usize) -> Result<()>;

    /// Append `line` as a new task.
    fn add(&mut self, line: &str) -> Result<()>;
}

/// Runs `$TODO_FULL_SH command <action> ...`.
#[derive(Debug, Clone)]
pub struct TodoSh {
    program: PathBuf,
}

impl TodoSh {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        info!(program = %self.program.display(), ?args, "running todo.sh");
        let status = Command::new(&self.program)
            .arg("command")
            .args(args)
            .status()
            .with_context(|| format!("running {}", self.program.display()))?;

        if !status.success() {
            bail!(
                "`{} command {}` failed with {status}",
                self.program.display(),
                args.join(" ")
            );
        }
        Ok(())
    }
}

impl TaskMutator for TodoSh {
    fn mark_done(&mut self, item: usize) -> Result<()> {
        self.run(&["do", &item.to_string()])
    }

    fn add(&mut self, line: &str) -> Result<()> {
        self.run(&["add", line])
    }
}

/// Prints the actions instead of running them.
#[derive(Debug)]
pub struct DryRun<W> {
    out: W,
}

impl<W: Write> DryRun<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TaskMutator for DryRun<W> {
    fn mark_done(&mut self, item: usize) -> Result<()> {
        writeln!(self.out, "do {item}")?;
        Ok(())
    }

    fn add(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "add {line}")?;
        Ok(())
    }
}
