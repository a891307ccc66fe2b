//! Interactive timer session.
//!
//! Ticks once per second, re-reads the task file every tick and executes
//! commands typed on stdin.

use clap::Args;
use focusloop_core::{
    AudioBackend, Config, Controller, Event, Mode, NoTitle, SilentBackend, Task, TaskStore,
    TitleSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::warn;

use crate::terminal::{spawn_stdin_reader, TerminalBell, TerminalNotifier, TerminalTitle};

const TICK: Duration = Duration::from_secs(1);
const HELP: &str = "commands: start, pause, reset, work, short, long, status, apply, help, quit";

#[derive(Args)]
pub struct RunArgs {
    /// Task file (defaults to tasks.json in the data directory)
    #[arg(long)]
    tasks: Option<PathBuf>,
    /// Print events as JSON lines instead of a status line
    #[arg(long)]
    json: bool,
    /// Never touch the terminal title
    #[arg(long)]
    no_title: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Start,
    Pause,
    Reset,
    Switch(Mode),
    Status,
    Apply,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let word = line.trim();
    let command = match word {
        "" => return Ok(None),
        "start" | "s" => SessionCommand::Start,
        "pause" | "p" => SessionCommand::Pause,
        "reset" | "r" => SessionCommand::Reset,
        "status" => SessionCommand::Status,
        "apply" => SessionCommand::Apply,
        "help" | "?" => SessionCommand::Help,
        "quit" | "q" | "exit" => SessionCommand::Quit,
        other => SessionCommand::Switch(
            other
                .parse::<Mode>()
                .map_err(|_| format!("unknown command: {other} ({HELP})"))?,
        ),
    };
    Ok(Some(command))
}

/// Renders controller output after every loop iteration.
struct View {
    json: bool,
    last_line: Option<String>,
}

impl View {
    fn render(
        &mut self,
        controller: &Controller,
        events: &[Event],
    ) -> Result<(), serde_json::Error> {
        if self.json {
            for event in events {
                println!("{}", serde_json::to_string(event)?);
            }
            return Ok(());
        }

        let line = controller.display().line();
        if self.last_line.as_deref() != Some(line.as_str()) {
            println!("{line}");
            self.last_line = Some(line);
        }
        Ok(())
    }
}

fn load_tasks(store: &TaskStore) -> Option<Vec<Task>> {
    match store.load() {
        Ok(tasks) => Some(tasks),
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "could not read task file");
            None
        }
    }
}

/// One interactive session: the controller, its task file and the
/// one-second ticker that drives it.
///
/// Every step returns the events it produced. Whenever an interval starts
/// the ticker is realigned, so the first second of an interval is never
/// shortened by a tick that was already due.
struct Session {
    controller: Controller,
    store: TaskStore,
    ticker: Interval,
}

impl Session {
    fn new(controller: Controller, store: TaskStore) -> Self {
        let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            controller,
            store,
            ticker,
        }
    }

    async fn reload_tasks(&mut self) {
        if let Some(tasks) = load_tasks(&self.store) {
            self.controller.tasks_changed(tasks).await;
        }
    }

    async fn on_tick(&mut self) -> Vec<Event> {
        self.reload_tasks().await;
        self.controller.tick().await;
        self.settle()
    }

    async fn on_command(
        &mut self,
        command: SessionCommand,
    ) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
        let controller = &mut self.controller;
        match command {
            SessionCommand::Start => controller.start().await,
            SessionCommand::Pause => controller.pause(),
            SessionCommand::Reset => controller.reset().await,
            SessionCommand::Switch(mode) => controller.switch_mode(mode).await,
            SessionCommand::Status => {
                println!("{}", serde_json::to_string_pretty(&controller.timer().snapshot())?);
            }
            SessionCommand::Apply => {
                let config = Config::load()?;
                if let Err(e) = controller.apply_settings(config.schedule).await {
                    eprintln!("settings rejected: {e}");
                }
            }
            SessionCommand::Help => eprintln!("{HELP}"),
            SessionCommand::Quit => controller.pause(),
        }
        Ok(self.settle())
    }

    fn settle(&mut self) -> Vec<Event> {
        let events = self.controller.drain_events();
        if events
            .iter()
            .any(|e| matches!(e, Event::TimerStarted { .. }))
        {
            self.ticker.reset();
        }
        events
    }
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = super::task_store(args.tasks)?;

    let audio: Arc<dyn AudioBackend> = if config.sounds.enabled {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentBackend)
    };
    let title: Arc<dyn TitleSink> = if args.no_title {
        Arc::new(NoTitle)
    } else {
        Arc::new(TerminalTitle)
    };
    let (mut lines, acknowledger) = spawn_stdin_reader();
    let notifier = Arc::new(TerminalNotifier::new(
        acknowledger,
        config.notifications.confirm_transitions,
    ));

    let controller = Controller::new(config.schedule, audio, title, notifier);
    let mut session = Session::new(controller, store);
    session.reload_tasks().await;

    let mut view = View {
        json: args.json,
        last_line: None,
    };
    eprintln!("{HELP}");
    let events = session.settle();
    view.render(&session.controller, &events)?;

    loop {
        let events = tokio::select! {
            _ = session.ticker.tick() => session.on_tick().await,
            line = lines.recv() => {
                let Some(line) = line else { break };
                match parse_command(&line) {
                    Ok(Some(SessionCommand::Quit)) => break,
                    Ok(Some(command)) => session.on_command(command).await?,
                    Ok(None) => Vec::new(),
                    Err(msg) => {
                        eprintln!("{msg}");
                        Vec::new()
                    }
                }
            }
        };
        view.render(&session.controller, &events)?;
    }

    let events = session.on_command(SessionCommand::Quit).await?;
    view.render(&session.controller, &events)?;
    Ok(())
}
