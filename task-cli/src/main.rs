use anyhow::Context;
use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use task_cli::config::Config;
use task_cli::{Status, StatusFilter, Task, TaskService, TaskStore};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(version, about = "Track tasks in a local JSON file")]
struct Cli {
    /// Task file to use instead of the configured one
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Log what the tool does to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Add a new task
    Add { description: String },
    /// Change the description of a task
    Update { id: u32, description: String },
    /// Delete a task
    Delete { id: u32 },
    /// Set the status of a task (todo, in-progress, done)
    Mark { id: u32, status: Status },
    /// Mark a task as todo
    MarkTodo { id: u32 },
    /// Mark a task as in progress
    MarkInProgress { id: u32 },
    /// Mark a task as done
    MarkDone { id: u32 },
    /// List tasks, optionally filtered (todo, in-progress, done, not-done)
    List { filter: Option<StatusFilter> },
    /// Show a single task
    Show { id: u32 },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let tasks_file = match args.file {
        Some(file) => file,
        None => Config::new().context("cannot load configuration")?.tasks_file,
    };
    let service = TaskService::new(TaskStore::new(tasks_file));

    match args.command {
        Commands::Add { description } => {
            let task = service.add(&description)?;
            println!("Task added successfully (ID: {})", task.id());
        }
        Commands::Update { id, description } => {
            let task = service.update(id, &description)?;
            println!("Task {} updated", task.id());
        }
        Commands::Delete { id } => {
            let task = service.delete(id)?;
            println!("Task {} deleted", task.id());
        }
        Commands::Mark { id, status } => mark(&service, id, status)?,
        Commands::MarkTodo { id } => mark(&service, id, Status::Todo)?,
        Commands::MarkInProgress { id } => mark(&service, id, Status::InProgress)?,
        Commands::MarkDone { id } => mark(&service, id, Status::Done)?,
        Commands::List { filter } => {
            let tasks = service.list(filter)?;
            if tasks.is_empty() {
                println!("No tasks found");
            }
            for task in &tasks {
                println!("{}", summary_line(task));
            }
        }
        Commands::Show { id } => {
            let task = service.get(id)?;
            println!("{}", summary_line(&task));
            println!(
                "  created: {}",
                task.created_at().to_rfc3339_opts(SecondsFormat::Secs, false)
            );
            println!(
                "  updated: {}",
                task.updated_at().to_rfc3339_opts(SecondsFormat::Secs, false)
            );
        }
    };

    Ok(())
}

fn mark(service: &TaskService, id: u32, status: Status) -> anyhow::Result<()> {
    let task = service.mark(id, status)?;
    println!("Task {} marked as {}", task.id(), task.status());
    Ok(())
}

fn summary_line(task: &Task) -> String {
    format!(
        "{:>4}  {:<11}  {}",
        task.id(),
        format!("[{}]", task.status()),
        task.description()
    )
}
