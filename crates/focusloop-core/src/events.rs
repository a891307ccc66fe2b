use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::timer::{DisplayState, Mode};

/// Every state change in the system produces an Event.
/// Front ends poll for events; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        /// Task being worked on; always `None` for breaks.
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// `start` was refused because work mode has nothing to work on.
    StartRefused {
        reason: String,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: Mode,
        to: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown hit zero. The timer is stopped, the mode not yet changed.
    IntervalElapsed {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// Alarm playback settled.
    AlarmRaised {
        audible: bool,
        at: DateTime<Utc>,
    },
    /// End-of-interval transition committed.
    ModeAdvanced {
        from: Mode,
        to: Mode,
        completed_focus_blocks: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CurrentTaskChanged {
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    /// The running work interval ran out of pending tasks and was paused.
    TasksExhausted {
        at: DateTime<Utc>,
    },
    SettingsApplied {
        work_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        pomodoros_before_long_break: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: DisplayState,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Variant name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::StartRefused { .. } => "StartRefused",
            Event::ModeSwitched { .. } => "ModeSwitched",
            Event::IntervalElapsed { .. } => "IntervalElapsed",
            Event::AlarmRaised { .. } => "AlarmRaised",
            Event::ModeAdvanced { .. } => "ModeAdvanced",
            Event::CurrentTaskChanged { .. } => "CurrentTaskChanged",
            Event::TasksExhausted { .. } => "TasksExhausted",
            Event::SettingsApplied { .. } => "SettingsApplied",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
