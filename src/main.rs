use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::path::PathBuf;
use todostore::due::parse_due;
use todostore::{Config, Locale, Priority, Task, TaskRow, TaskUpdate, ViewFilter, snapshot};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Priority to-do list with remaining-time labels")]
#[command(version)]
struct Cli {
    /// Directory holding todos.json (overrides config and TODOSTORE_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Label language: vi or en (overrides config and TODOSTORE_LOCALE)
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    /// Config file (default: <config dir>/todostore/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        name: String,

        /// low, medium, high or 1-3
        #[arg(short, long, default_value = "high")]
        priority: Priority,

        /// Due date: RFC 3339, DD-MM-YYYY [HH:MM] or +<n><s|m|h|d> (default: +1d)
        #[arg(short = 'D', long)]
        due: Option<String>,
    },

    /// List tasks, highest priority first
    List {
        #[arg(long, conflicts_with = "completed")]
        active: bool,

        #[arg(long)]
        completed: bool,
    },

    /// Toggle a task's completed flag
    Complete { id: i64 },

    /// Toggle a task's editing flag
    Edit { id: i64 },

    /// Change a task's fields and close its editor
    Update {
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short = 'D', long)]
        due: Option<String>,

        /// Mark completed
        #[arg(long, conflicts_with = "not_completed")]
        completed: bool,

        /// Mark not completed
        #[arg(long)]
        not_completed: bool,
    },

    /// Delete a task
    Delete { id: i64 },
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    debug!(?config, "Using config");

    let path = config.snapshot_path();
    // Held until exit so concurrent invocations cannot interleave load and save
    let _lock = snapshot::SnapshotLock::acquire(&path)?;
    let mut store = snapshot::load(&path)?;
    let now = Utc::now();

    let changed = match cli.command {
        Commands::Add { name, priority, due } => {
            Task::validate_name(&name)?;
            let date = match due {
                Some(d) => parse_due(&d, now)?,
                None => now + Duration::days(1),
            };
            let id = store.add(name, priority, date);
            println!("Added task {}", id.to_string().bold());
            true
        }
        Commands::List { active, completed } => {
            let filter = if active {
                ViewFilter::Active
            } else if completed {
                ViewFilter::Completed
            } else {
                ViewFilter::All
            };
            print_rows(&todostore::view::rows(store.tasks(), filter, now, config.locale));
            false
        }
        Commands::Complete { id } => report("Toggled completion of", id, store.complete(id)),
        Commands::Edit { id } => report("Toggled editing of", id, store.edit(id)),
        Commands::Update {
            id,
            name,
            priority,
            due,
            completed,
            not_completed,
        } => {
            let mut data = TaskUpdate::new(id);
            if let Some(name) = name {
                Task::validate_name(&name)?;
                data = data.name(name);
            }
            if let Some(priority) = priority {
                data = data.priority(priority);
            }
            if let Some(due) = due {
                data = data.date(parse_due(&due, now)?);
            }
            if completed || not_completed {
                data = data.completed(completed);
            }
            report("Updated", id, store.update(data))
        }
        Commands::Delete { id } => report("Deleted", id, store.delete(id)),
    };

    if changed {
        snapshot::save(&path, &store)?;
    }

    Ok(())
}

fn report(verb: &str, id: i64, matched: bool) -> bool {
    let message = outcome_message(verb, id, matched);
    if matched {
        println!("{}", message.as_str().bold());
    } else {
        println!("{}", message.as_str().yellow());
    }
    matched
}

fn outcome_message(verb: &str, id: i64, matched: bool) -> String {
    if matched {
        format!("{} task {}", verb, id)
    } else {
        format!("No task with id {}", id)
    }
}

fn print_rows(rows: &[TaskRow]) {
    if rows.is_empty() {
        println!("{}", "No tasks".dimmed());
        return;
    }

    for row in rows {
        let mark = if row.is_completed { "[x]" } else { "[ ]" };
        let name: ColoredString = if row.is_completed {
            row.name.as_str().strikethrough().dimmed()
        } else {
            row.name.as_str().normal()
        };
        let priority = match row.priority {
            Priority::High => row.priority_label.red(),
            Priority::Medium => row.priority_label.yellow(),
            Priority::Low => row.priority_label.green(),
        };
        let remaining = if row.remaining.is_expired() {
            row.remaining_label.as_str().red()
        } else {
            row.remaining_label.as_str().normal()
        };
        let editing = if row.is_editing { " (editing)".cyan() } else { "".normal() };

        println!("{} {} {}{}  {}  {}", row.id.to_string().dimmed(), mark, name, editing, priority, remaining);
    }
}
