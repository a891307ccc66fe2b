mod config;
mod tasks;

pub use config::{Config, NotificationsConfig, ScheduleConfig, SoundsConfig};
pub use tasks::TaskStore;

use std::path::PathBuf;

/// Returns the data directory, creating it when missing.
///
/// `FOCUSLOOP_HOME` wins when set. Otherwise `~/.config/focusloop`, or
/// `~/.config/focusloop-dev` with `FOCUSLOOP_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSLOOP_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSLOOP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusloop-dev")
            } else {
                base_dir.join("focusloop")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
