use focusloop_core::{Config, PomodoroTimer};
use std::path::PathBuf;

/// Print the state a fresh session would start in.
pub fn run(tasks: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = super::task_store(tasks)?;

    let mut timer = PomodoroTimer::new(config.schedule);
    timer.tasks_changed(store.load()?);
    println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
    Ok(())
}
