//! Pure projections of the timer state for presentation layers.

use serde::Serialize;

use super::mode::Mode;
use crate::task::Task;

/// `MM:SS`, both parts zero-padded to two digits.
///
/// Minutes are not capped, so 6000 seconds renders as `100:00`.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Everything a view needs to draw the timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    pub mode: Mode,
    pub label: &'static str,
    pub icon: &'static str,
    pub formatted_time: String,
    pub remaining_secs: u64,
    pub is_running: bool,
    pub completed_focus_blocks: u32,
    pub current_task: Option<Task>,
}

impl DisplayState {
    pub fn new(
        mode: Mode,
        remaining_secs: u64,
        is_running: bool,
        completed_focus_blocks: u32,
        current_task: Option<Task>,
    ) -> Self {
        Self {
            mode,
            label: mode.label(),
            icon: mode.icon(),
            formatted_time: format_time(remaining_secs),
            remaining_secs,
            is_running,
            completed_focus_blocks,
            current_task,
        }
    }

    /// Single-line rendering used by terminal front ends.
    pub fn line(&self) -> String {
        let mut line = format!("[{}] {} {}", self.icon, self.label, self.formatted_time);
        if let Some(task) = &self.current_task {
            line.push_str(&format!(" - {}", task.title));
        }
        if !self.is_running {
            line.push_str(" (paused)");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_known_values() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(1499), "24:59");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn display_state_follows_mode() {
        let state = DisplayState::new(Mode::LongBreak, 900, false, 0, None);
        assert_eq!(state.label, "Long break");
        assert_eq!(state.icon, "cup-hot");
        assert_eq!(state.formatted_time, "15:00");
        assert_eq!(state.line(), "[cup-hot] Long break 15:00 (paused)");
    }

    #[test]
    fn line_includes_current_task() {
        let task = Task::new("t1", "Write report");
        let state = DisplayState::new(Mode::Work, 61, true, 1, Some(task));
        assert_eq!(state.line(), "[briefcase] Focus 01:01 - Write report");
    }

    proptest! {
        #[test]
        fn format_time_matches_floor_and_mod(secs in 0u64..1_000_000) {
            let text = format_time(secs);
            let (mins, rest) = text.split_once(':').unwrap();
            prop_assert_eq!(mins.parse::<u64>().unwrap(), secs / 60);
            prop_assert_eq!(rest.parse::<u64>().unwrap(), secs % 60);
            prop_assert_eq!(rest.len(), 2);
            prop_assert!(mins.len() >= 2);
        }
    }
}
