use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "focusloop", version, about = "Pomodoro timer tied to your task list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive timer session
    Run(commands::run::RunArgs),
    /// Print the initial timer state as JSON
    Status {
        /// Task file (defaults to tasks.json in the data directory)
        #[arg(long)]
        tasks: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Task list management
    Task {
        /// Task file (defaults to tasks.json in the data directory)
        #[arg(long, global = true)]
        file: Option<PathBuf>,
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSLOOP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Status { tasks } => commands::status::run(tasks),
        Commands::Config { action } => commands::config::run(action),
        Commands::Task { file, action } => commands::task::run(file, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
