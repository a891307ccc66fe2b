//! Pomodoro timer state machine.
//!
//! The timer counts down in whole seconds. It does not use internal threads -
//! the caller is responsible for calling `tick()` once per second while the
//! timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! (Work | ShortBreak | LongBreak) x (Running | Paused)
//!
//! Work --elapsed--> ShortBreak, or LongBreak every N focus blocks
//! ShortBreak | LongBreak --elapsed--> Work
//! ```
//!
//! An elapsed interval does not change the mode by itself. The owner asks for
//! [`PomodoroTimer::next_transition`], does whatever it needs to (alarm, user
//! confirmation) and then calls [`PomodoroTimer::commit`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PomodoroTimer::new(ScheduleConfig::default());
//! timer.tasks_changed(tasks);
//! timer.start()?;
//! // Once per second:
//! if let Some(Event::IntervalElapsed { .. }) = timer.tick() {
//!     let next = timer.next_transition();
//!     timer.commit(next);
//! }
//! ```

use chrono::Utc;
use tracing::debug;

use super::display::DisplayState;
use super::mode::Mode;
use crate::error::{ConfigError, TimerError};
use crate::events::Event;
use crate::storage::ScheduleConfig;
use crate::task::{find_pending_task, Task};

/// A mode change computed at the end of an interval, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
    /// Focus block counter after the transition is committed.
    pub completed_focus_blocks: u32,
}

/// Outcome of pushing a new task snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    /// Snapshot is deep-equal to the previous one.
    Unchanged,
    /// Current task recomputed; `None` when nothing is pending.
    Reselected { task_id: Option<String> },
    /// The running work interval just lost its last pending task.
    Exhausted,
}

/// Core timer state machine.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    config: ScheduleConfig,
    mode: Mode,
    remaining_secs: u64,
    running: bool,
    completed_focus_blocks: u32,
    /// Latest snapshot of the caller's task list.
    tasks: Vec<Task>,
    /// Id of the task being worked on. Resolved against `tasks` on read.
    current_task: Option<String>,
}

impl PomodoroTimer {
    /// Create a paused timer in work mode with a full interval.
    pub fn new(config: ScheduleConfig) -> Self {
        let remaining_secs = config.duration_secs(Mode::Work);
        Self {
            config,
            mode: Mode::Work,
            remaining_secs,
            running: false,
            completed_focus_blocks: 0,
            tasks: Vec::new(),
            current_task: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_focus_blocks(&self) -> u32 {
        self.completed_focus_blocks
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The current task, if its id still resolves in the latest snapshot.
    pub fn current_task(&self) -> Option<&Task> {
        let id = self.current_task.as_deref()?;
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn display(&self) -> DisplayState {
        DisplayState::new(
            self.mode,
            self.remaining_secs,
            self.running,
            self.completed_focus_blocks,
            self.current_task().cloned(),
        )
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down.
    ///
    /// Returns `Ok(None)` when already running. Work mode needs a pending
    /// task; on refusal nothing about the timer changes.
    pub fn start(&mut self) -> Result<Option<Event>, TimerError> {
        if self.running {
            return Ok(None);
        }

        if self.mode == Mode::Work {
            let pending = find_pending_task(&self.tasks).ok_or(if self.tasks.is_empty() {
                TimerError::NoTasks
            } else {
                TimerError::NoPendingTask
            })?;
            self.current_task = Some(pending.id.clone());
        }

        if self.remaining_secs == 0 {
            self.remaining_secs = self.config.duration_secs(self.mode);
        }
        self.running = true;
        debug!(mode = %self.mode, remaining_secs = self.remaining_secs, "timer started");

        Ok(Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            task_id: match self.mode {
                Mode::Work => self.current_task.clone(),
                _ => None,
            },
            at: Utc::now(),
        }))
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and refill the current interval from the configuration.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.config.duration_secs(self.mode);
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Jump to `target` without starting it.
    pub fn switch_mode(&mut self, target: Mode) -> Event {
        let from = self.mode;
        self.running = false;
        if target == Mode::Work {
            self.current_task = find_pending_task(&self.tasks).map(|t| t.id.clone());
        }
        self.set_mode(target);
        Event::ModeSwitched {
            from,
            to: target,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Replace the durations. The caller resets the interval afterwards.
    pub fn set_config(&mut self, config: ScheduleConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Call once per second. Returns `Some(Event::IntervalElapsed)` when the
    /// countdown reaches zero; the timer is already stopped at that point.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.running = false;
        debug!(mode = %self.mode, "interval elapsed");
        Some(Event::IntervalElapsed {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// The mode that follows the current one, without applying it.
    pub fn next_transition(&self) -> Transition {
        let (to, completed_focus_blocks) = match self.mode {
            Mode::Work => {
                let done = self.completed_focus_blocks.saturating_add(1);
                if done >= self.config.pomodoros_before_long_break {
                    (Mode::LongBreak, 0)
                } else {
                    (Mode::ShortBreak, done)
                }
            }
            Mode::ShortBreak | Mode::LongBreak => (Mode::Work, self.completed_focus_blocks),
        };
        Transition {
            from: self.mode,
            to,
            completed_focus_blocks,
        }
    }

    /// Apply a transition from [`next_transition`](Self::next_transition).
    pub fn commit(&mut self, transition: Transition) -> Event {
        self.running = false;
        self.completed_focus_blocks = transition.completed_focus_blocks;
        if transition.to == Mode::Work {
            self.current_task = find_pending_task(&self.tasks).map(|t| t.id.clone());
        }
        self.set_mode(transition.to);
        Event::ModeAdvanced {
            from: transition.from,
            to: transition.to,
            completed_focus_blocks: self.completed_focus_blocks,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Replace the task snapshot and re-evaluate the current task.
    ///
    /// Outside work mode the snapshot is only stored.
    pub fn tasks_changed(&mut self, tasks: Vec<Task>) -> TaskUpdate {
        if tasks == self.tasks {
            return TaskUpdate::Unchanged;
        }
        self.tasks = tasks;

        if self.mode != Mode::Work {
            return TaskUpdate::Unchanged;
        }

        let pending = find_pending_task(&self.tasks).map(|t| t.id.clone());
        if pending.is_none() && self.running && self.current_task.is_some() {
            self.current_task = None;
            return TaskUpdate::Exhausted;
        }
        self.current_task = pending.clone();
        TaskUpdate::Reselected { task_id: pending }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.remaining_secs = self.config.duration_secs(mode);
    }
}
