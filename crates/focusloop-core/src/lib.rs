//! # focusloop Core Library
//!
//! Core business logic for the focusloop pomodoro timer. Every operation is
//! available to the standalone CLI binary; other front ends are expected to be
//! thin layers over the same library.
//!
//! ## Architecture
//!
//! - **Timer**: a tick-driven state machine over work/short break/long break
//!   modes. The caller invokes `tick()` once per second.
//! - **Controller**: async orchestrator that turns timer events into cues,
//!   alarms and user notifications.
//! - **Alarm**: a single-slot actor that serializes alarm playback so at most
//!   one looping alarm voice ever exists.
//! - **Storage**: TOML configuration and a JSON task file.
//!
//! ## Key Components
//!
//! - [`PomodoroTimer`]: core timer state machine
//! - [`Controller`]: side-effect orchestration around the timer
//! - [`AlarmSequencer`]: serialized alarm playback
//! - [`Config`]: application configuration management

pub mod alarm;
pub mod controller;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod task;
pub mod timer;

pub use alarm::{
    AlarmHandle, AlarmOutcome, AlarmSequencer, AlarmVoice, AudioBackend, Cue, CuePlayer, NoTitle,
    SilentBackend, TitleSink,
};
pub use controller::Controller;
pub use error::{AudioError, ConfigError, CoreError, TimerError};
pub use events::Event;
pub use notify::{Notice, Notifier};
pub use storage::{Config, ScheduleConfig, TaskStore};
pub use task::{find_pending_task, Task};
pub use timer::{format_time, DisplayState, Mode, PomodoroTimer, TaskUpdate, Transition};
