//! `dorecur`: a todo.txt-cli add-on for recurring tasks.
//!
//! Installed as the `do` action, it marks tasks done and, for tasks carrying a
//! `rec:` tag, adds the next occurrence with updated `t:`/`due:` dates.

mod logging;
mod mutator;
mod todo_file;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use recur_engine::{
    make_new_task, next_occurrence_with_options, AdjustOptions, MonthEnd, RawTags,
};
use tracing::debug;

use crate::mutator::{DryRun, TaskMutator, TodoSh};

const USAGE: &str = "    do ITEM#[, ITEM#, ITEM#, ...]
      Mark ITEM# as complete. If `rec:` is set, add a new task, updating
      any start/due dates based on the value of `rec:`.
";

#[derive(Parser)]
#[command(
    name = "dorecur",
    version,
    about = "Mark todo.txt tasks done, adding the next occurrence of recurring ones"
)]
struct Cli {
    /// Completion date used for normal recurrence [default: today]
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// How month steps treat days past the 28th
    #[arg(long, global = true, value_enum, default_value_t = MonthEndArg::Fixed28)]
    month_end: MonthEndArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the usage block shown by `todo.sh help`
    Usage,

    /// Mark tasks done, adding the next occurrence of recurring ones
    Do {
        /// Task line numbers
        #[arg(value_name = "ITEM#", required = true)]
        items: Vec<usize>,

        /// Print the todo.sh actions instead of running them
        #[arg(long)]
        dry_run: bool,

        #[arg(long, env = "TODO_FILE", hide_env_values = true)]
        todo_file: PathBuf,

        #[arg(long, env = "TODO_FULL_SH", hide_env_values = true)]
        todo_sh: Option<PathBuf>,
    },

    /// Print the next occurrence of a task line without touching any file
    Next {
        line: String,

        /// Print the computed dates as JSON instead of a task line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MonthEndArg {
    /// Days 29-31 always become 28
    #[value(name = "fixed28")]
    Fixed28,
    /// Days past the target month's end become its last day
    LastDay,
}

impl From<MonthEndArg> for MonthEnd {
    fn from(arg: MonthEndArg) -> Self {
        match arg {
            MonthEndArg::Fixed28 => MonthEnd::Fixed28,
            MonthEndArg::LastDay => MonthEnd::LastDay,
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let options = AdjustOptions {
        month_end: cli.month_end.into(),
    };
    debug!(%today, ?options, "starting");

    match cli.command {
        Command::Usage => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Do {
            items,
            dry_run,
            todo_file,
            todo_sh,
        } => {
            if dry_run {
                let mut mutator = DryRun::new(io::stdout().lock());
                complete_tasks(&items, &todo_file, &mut mutator, today, &options)
            } else {
                let todo_sh = todo_sh.context(
                    "TODO_FULL_SH is not set; run this add-on through todo.sh or pass --todo-sh",
                )?;
                complete_tasks(&items, &todo_file, &mut TodoSh::new(todo_sh), today, &options)
            }
        }
        Command::Next { line, json } => print_next(&line, json, today, &options),
    }
}

/// Complete each task in order, adding its next occurrence when it recurs.
///
/// The new line is computed before the task is marked done, so a malformed
/// task stops the run with the todo file untouched. Item numbers refer to the
/// file as it was when the command started; if todo.sh renumbers it midway
/// (auto-archive), later items may point at different tasks.
fn complete_tasks(
    items: &[usize],
    todo_file: &Path,
    mutator: &mut impl TaskMutator,
    today: NaiveDate,
    options: &AdjustOptions,
) -> Result<()> {
    for &item in items {
        let old_task = todo_file::get_line(todo_file, item)?;
        let new_task = make_new_task(&old_task, today, options)
            .with_context(|| format!("task {item}: {old_task}"))?;

        mutator.mark_done(item)?;
        if let Some(new_task) = new_task {
            mutator.add(&new_task)?;
        }
    }
    Ok(())
}

fn print_next(line: &str, json: bool, today: NaiveDate, options: &AdjustOptions) -> Result<()> {
    if json {
        let tags = RawTags::from_line(line)?;
        let next = next_occurrence_with_options(tags, today, options)?;
        println!("{}", serde_json::to_string(&next)?);
    } else if let Some(new_task) = make_new_task(line, today, options)? {
        println!("{new_task}");
    }
    Ok(())
}
