//! Task management commands for CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a pending task at the end of the list
    Add {
        /// Task title
        title: String,
    },
    /// List tasks in order
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Mark a task completed
    Done {
        /// Task ID
        id: String,
    },
    /// Mark a task pending again
    Undo {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: String,
    },
}

pub fn run(file: Option<PathBuf>, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::task_store(file)?;

    match action {
        TaskAction::Add { title } => {
            let task = store.add(&title)?;
            println!("Task created: {}", task.id);
        }
        TaskAction::List { json } => {
            let tasks = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {}  {}", task.id, task.title);
                }
            }
        }
        TaskAction::Done { id } => {
            let task = store.set_completed(&id, true)?;
            println!("Completed: {}", task.title);
        }
        TaskAction::Undo { id } => {
            let task = store.set_completed(&id, false)?;
            println!("Pending: {}", task.title);
        }
        TaskAction::Remove { id } => {
            let task = store.remove(&id)?;
            println!("Removed: {}", task.title);
        }
    }
    Ok(())
}
