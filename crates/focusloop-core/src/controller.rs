//! Side-effect orchestration around [`PomodoroTimer`].
//!
//! The timer decides *what* happens; the controller plays cues, raises and
//! silences the alarm, talks to the user and chains intervals. Every state
//! change is also queued as an [`Event`] for front ends to drain.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alarm::{AlarmHandle, AlarmSequencer, AudioBackend, Cue, CuePlayer, TitleSink};
use crate::error::ConfigError;
use crate::events::Event;
use crate::notify::{Notice, Notifier};
use crate::storage::ScheduleConfig;
use crate::task::Task;
use crate::timer::{DisplayState, Mode, PomodoroTimer, TaskUpdate};

pub struct Controller {
    timer: PomodoroTimer,
    alarm: AlarmHandle,
    cues: CuePlayer,
    notifier: Arc<dyn Notifier>,
    events: Vec<Event>,
}

impl Controller {
    /// Build a controller and spawn its alarm sequencer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: ScheduleConfig,
        audio: Arc<dyn AudioBackend>,
        title: Arc<dyn TitleSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let alarm = AlarmSequencer::spawn(audio.clone(), title);
        Self::with_parts(PomodoroTimer::new(config), alarm, CuePlayer::new(audio), notifier)
    }

    pub fn with_parts(
        timer: PomodoroTimer,
        alarm: AlarmHandle,
        cues: CuePlayer,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            timer,
            alarm,
            cues,
            notifier,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn display(&self) -> DisplayState {
        self.timer.display()
    }

    /// Take every event produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub async fn start(&mut self) {
        let had_task = self.timer.current_task().is_some();
        match self.timer.start() {
            Ok(Some(event)) => {
                if self.timer.mode().is_break() || had_task {
                    self.cues.play(Cue::Start);
                }
                info!(mode = %self.timer.mode(), "timer started");
                self.emit(event);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "start refused");
                self.emit(Event::StartRefused {
                    reason: e.to_string(),
                    at: Utc::now(),
                });
                self.notifier.alert(&Notice::from(e)).await;
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(event) = self.timer.pause() {
            self.cues.play(Cue::Stop);
            info!(remaining_secs = self.timer.remaining_secs(), "timer paused");
            self.emit(event);
        }
    }

    pub async fn reset(&mut self) {
        let event = self.timer.reset();
        self.alarm.stop().await;
        self.cues.play(Cue::Ui);
        self.emit(event);
    }

    pub async fn switch_mode(&mut self, target: Mode) {
        if self.timer.is_running() {
            self.pause();
        } else {
            self.cues.play(Cue::Ui);
        }
        self.alarm.stop().await;

        let event = self.timer.switch_mode(target);
        if target == Mode::Work
            && self.timer.current_task().is_none()
            && !self.timer.tasks().is_empty()
        {
            self.notifier.warn(&Notice::AllTasksCompleted);
        }
        info!(to = %target, "mode switched");
        self.emit(event);
    }

    /// Validate and store new durations, then reset the current interval.
    ///
    /// A rejected config changes nothing.
    pub async fn apply_settings(&mut self, config: ScheduleConfig) -> Result<(), ConfigError> {
        self.timer.set_config(config)?;
        let cfg = self.timer.config();
        let event = Event::SettingsApplied {
            work_secs: cfg.duration_secs(Mode::Work),
            short_break_secs: cfg.duration_secs(Mode::ShortBreak),
            long_break_secs: cfg.duration_secs(Mode::LongBreak),
            pomodoros_before_long_break: cfg.pomodoros_before_long_break,
            at: Utc::now(),
        };
        self.emit(event);
        self.reset().await;
        Ok(())
    }

    /// Push the latest task list. Identical snapshots are ignored.
    pub async fn tasks_changed(&mut self, tasks: Vec<Task>) {
        let before = self.timer.current_task().map(|t| t.id.clone());
        match self.timer.tasks_changed(tasks) {
            TaskUpdate::Unchanged => {}
            TaskUpdate::Reselected { task_id } => {
                if task_id != before {
                    self.emit(Event::CurrentTaskChanged {
                        task_id,
                        at: Utc::now(),
                    });
                }
            }
            TaskUpdate::Exhausted => {
                info!("no pending tasks left, pausing");
                self.emit(Event::TasksExhausted { at: Utc::now() });
                self.notifier.alert(&Notice::TasksExhausted).await;
                self.alarm.stop().await;
                self.pause();
            }
        }
    }

    /// Call once per second.
    ///
    /// When the interval runs out this raises the alarm, waits for it to
    /// settle, asks the user to acknowledge the transition and starts the
    /// next interval.
    pub async fn tick(&mut self) {
        let Some(event) = self.timer.tick() else {
            return;
        };
        self.emit(event);

        let outcome = self.alarm.trigger().await;
        self.emit(Event::AlarmRaised {
            audible: outcome.is_audible(),
            at: Utc::now(),
        });
        self.finish_interval().await;
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn finish_interval(&mut self) {
        let transition = self.timer.next_transition();
        info!(from = %transition.from, to = %transition.to, "interval finished");

        self.notifier
            .confirm(&Notice::IntervalFinished {
                from: transition.from,
                to: transition.to,
            })
            .await;
        self.alarm.stop().await;

        let event = self.timer.commit(transition);
        self.emit(event);
        self.start().await;
    }

    fn emit(&mut self, event: Event) {
        debug!(kind = event.kind(), "event");
        self.events.push(event);
    }
}
