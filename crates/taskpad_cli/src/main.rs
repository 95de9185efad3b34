//! Terminal front end for the taskpad core.
//!
//! # Responsibility
//! - Bootstrap a task store over a SQLite slot and run one command.
//! - Act as the display surface and delete-confirmation prompt.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use taskpad_core::db::open_db;
use taskpad_core::{
    default_log_level, init_logging, DefaultSeed, MutationOutcome, PersistenceSlot, Priority,
    SqliteSlot, StoreConfig, Task, TaskDraft, TaskId, TaskPatch, TaskRow, TaskStore,
};

#[derive(Debug, Parser)]
#[command(name = "taskpad", version, about = "Local task list editor")]
struct Cli {
    /// SQLite database holding the task slot.
    #[arg(long, default_value = "taskpad.sqlite3")]
    db: PathBuf,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    /// JSON store config (`slot_key`, `id_base`).
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show tasks, incomplete first, then by priority.
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    /// Mark a task complete, or undo completion.
    Toggle { id: u64 },
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    Ping,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    if let Command::Ping = cli.command {
        println!("taskpad_core ping={}", taskpad_core::ping());
        println!("taskpad_core version={}", taskpad_core::core_version());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => StoreConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => StoreConfig::default(),
    };
    let slot = SqliteSlot::new(open_db(&cli.db)?);
    let mut store = TaskStore::with_config(slot, config);
    store.bootstrap(&DefaultSeed)?;

    match cli.command {
        Command::List { search } => {
            store.set_search_text(search);
            print_rows(&store.rows());
        }
        Command::Add {
            title,
            description,
            priority,
        } => {
            let mut draft = TaskDraft {
                title,
                description,
                priority,
            };
            let id = store.add(&mut draft)?;
            println!("added task {id}");
        }
        Command::Toggle { id } => report(id, store.toggle_complete(id)?),
        Command::Edit {
            id,
            title,
            description,
            priority,
        } => {
            let patch = TaskPatch {
                title,
                description,
                priority,
            };
            report(id, edit_task(&mut store, id, &patch)?);
        }
        Command::Delete { id, yes } => {
            let outcome = store.delete_task(id, |task| yes || confirm_delete(task))?;
            report(id, outcome);
        }
        Command::Ping => {}
    }
    Ok(())
}

/// Runs one full edit: open the buffer, merge `patch`, save.
fn edit_task<S: PersistenceSlot>(
    store: &mut TaskStore<S>,
    id: TaskId,
    patch: &TaskPatch,
) -> Result<MutationOutcome, Box<dyn Error>> {
    if patch.is_empty() {
        return Err("edit needs at least one of --title, --description, --priority".into());
    }
    if store.start_edit(id)? == MutationOutcome::NoOp {
        return Ok(MutationOutcome::NoOp);
    }
    store.update_edit_buffer(patch);
    Ok(store.save_edit()?)
}

fn confirm_delete(task: &Task) -> bool {
    print!(
        "Are you sure you want to delete this task? \"{}\" [y/N] ",
        task.title
    );
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

/// Only an explicit `y`/`yes` confirms; anything else declines.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report(id: u64, outcome: MutationOutcome) {
    match outcome {
        MutationOutcome::Applied => println!("task {id} updated"),
        MutationOutcome::NoOp => println!("task {id} not found"),
        MutationOutcome::Declined => println!("task {id} kept"),
    }
}

fn print_rows(rows: &[TaskRow]) {
    if rows.is_empty() {
        println!("no tasks");
        return;
    }
    for row in rows {
        println!("{}", format_row(row));
    }
}

fn format_row(row: &TaskRow) -> String {
    let task = &row.task;
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {:>4}  {:<6}  {}  ({})",
        task.id, task.priority, task.title, row.toggle_label
    );
    if !task.description.is_empty() {
        line.push_str("\n            ");
        line.push_str(&task.description);
    }
    line
}
