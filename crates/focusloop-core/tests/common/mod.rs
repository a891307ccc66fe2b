//! Recording test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use focusloop_core::{
    AlarmVoice, AudioBackend, AudioError, Controller, Cue, Notice, Notifier, ScheduleConfig, Task,
    TitleSink,
};

#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<Notice>>,
    pub confirms: Mutex<Vec<Notice>>,
    pub warnings: Mutex<Vec<Notice>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn alert(&self, notice: &Notice) {
        self.alerts.lock().unwrap().push(notice.clone());
    }

    async fn confirm(&self, notice: &Notice) {
        self.confirms.lock().unwrap().push(notice.clone());
    }

    fn warn(&self, notice: &Notice) {
        self.warnings.lock().unwrap().push(notice.clone());
    }
}

#[derive(Default)]
pub struct RecordingAudio {
    pub cues: Mutex<Vec<Cue>>,
    pub alarms_opened: Mutex<usize>,
    pub fail_alarm: bool,
    pub titles: Mutex<Vec<String>>,
}

struct RecordingVoice {
    fail: bool,
}

impl AudioBackend for RecordingAudio {
    fn play_cue(&self, cue: Cue) -> Result<(), AudioError> {
        self.cues.lock().unwrap().push(cue);
        Ok(())
    }

    fn open_alarm(&self) -> Result<Box<dyn AlarmVoice>, AudioError> {
        *self.alarms_opened.lock().unwrap() += 1;
        Ok(Box::new(RecordingVoice {
            fail: self.fail_alarm,
        }))
    }
}

impl AlarmVoice for RecordingVoice {
    fn set_looping(&mut self, _looping: bool) {}

    fn play(&mut self) -> Result<(), AudioError> {
        if self.fail {
            Err(AudioError::PlaybackFailed("blocked".into()))
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {}
    fn rewind(&mut self) {}
}

impl TitleSink for RecordingAudio {
    fn set_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_string());
    }

    fn restore_title(&self) {
        self.titles.lock().unwrap().push(String::new());
    }
}

pub struct Harness {
    pub controller: Controller,
    pub notifier: Arc<RecordingNotifier>,
    pub audio: Arc<RecordingAudio>,
}

impl Harness {
    pub fn new(config: ScheduleConfig) -> Self {
        Self::with_audio(config, RecordingAudio::default())
    }

    pub fn with_audio(config: ScheduleConfig, audio: RecordingAudio) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let audio = Arc::new(audio);
        let controller = Controller::new(config, audio.clone(), audio.clone(), notifier.clone());
        Self {
            controller,
            notifier,
            audio,
        }
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.audio.cues.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<Notice> {
        self.notifier.alerts.lock().unwrap().clone()
    }

    pub async fn tick_n(&mut self, n: usize) {
        for _ in 0..n {
            self.controller.tick().await;
        }
    }
}

pub fn tasks(states: &[bool]) -> Vec<Task> {
    states
        .iter()
        .enumerate()
        .map(|(i, &completed)| Task {
            id: format!("t{i}"),
            title: format!("Task {i}"),
            completed,
        })
        .collect()
}

/// One-minute intervals, long break after two focus blocks.
pub fn short_config() -> ScheduleConfig {
    ScheduleConfig {
        focus_duration: 1,
        short_break: 1,
        long_break: 2,
        pomodoros_before_long_break: 2,
    }
}
