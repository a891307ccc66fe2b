pub mod config;
pub mod run;
pub mod status;
pub mod task;

use focusloop_core::TaskStore;
use std::path::PathBuf;

/// Task store at `path`, or the default one in the data directory.
pub(crate) fn task_store(path: Option<PathBuf>) -> Result<TaskStore, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(TaskStore::at(path)),
        None => Ok(TaskStore::open_default()?),
    }
}
