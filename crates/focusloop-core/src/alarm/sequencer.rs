//! Serialized alarm playback.
//!
//! An actor task owns the single alarm voice. Requests arrive over an
//! unbounded mpsc channel and are handled strictly one at a time, so a trigger
//! only tears down and recreates the voice after the previous request has
//! settled, and a stop can never be overtaken by an earlier trigger.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::{AlarmVoice, AudioBackend, TitleSink};
use crate::error::AudioError;

/// Title shown while an alarm is waiting to be acknowledged.
pub const ALARM_TITLE: &str = "Time's up! - focusloop";

/// How a trigger settled. Either way the caller may continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmOutcome {
    /// The alarm voice is looping.
    Playing,
    /// Playback failed; only the title fallback is visible.
    Silent(AudioError),
}

impl AlarmOutcome {
    pub fn is_audible(&self) -> bool {
        matches!(self, AlarmOutcome::Playing)
    }
}

enum AlarmRequest {
    Trigger(oneshot::Sender<AlarmOutcome>),
    Stop(oneshot::Sender<()>),
}

/// Cloneable handle to the sequencer actor.
#[derive(Clone)]
pub struct AlarmHandle {
    tx: mpsc::UnboundedSender<AlarmRequest>,
}

impl AlarmHandle {
    /// Start a fresh looping alarm once all earlier requests have settled.
    ///
    /// Never fails: playback errors come back as [`AlarmOutcome::Silent`].
    pub async fn trigger(&self) -> AlarmOutcome {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(AlarmRequest::Trigger(reply)).is_err() {
            return AlarmOutcome::Silent(AudioError::Unavailable("alarm sequencer stopped".into()));
        }
        rx.await.unwrap_or_else(|_| {
            AlarmOutcome::Silent(AudioError::Unavailable("alarm sequencer stopped".into()))
        })
    }

    /// Silence the alarm. Safe to call at any time, any number of times.
    pub async fn stop(&self) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(AlarmRequest::Stop(reply)).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Actor state: the only owner of the alarm voice.
pub struct AlarmSequencer {
    backend: Arc<dyn AudioBackend>,
    title: Arc<dyn TitleSink>,
    voice: Option<Box<dyn AlarmVoice>>,
    title_pending: bool,
    rx: mpsc::UnboundedReceiver<AlarmRequest>,
}

impl AlarmSequencer {
    /// Spawn the actor on the current tokio runtime.
    ///
    /// The actor exits, releasing the voice and restoring the title, once
    /// every [`AlarmHandle`] has been dropped.
    pub fn spawn(backend: Arc<dyn AudioBackend>, title: Arc<dyn TitleSink>) -> AlarmHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let sequencer = Self {
            backend,
            title,
            voice: None,
            title_pending: false,
            rx,
        };
        tokio::spawn(sequencer.run());
        AlarmHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                AlarmRequest::Trigger(reply) => {
                    let outcome = self.trigger();
                    let _ = reply.send(outcome);
                }
                AlarmRequest::Stop(reply) => {
                    self.stop();
                    let _ = reply.send(());
                }
            }
        }
        self.stop();
        self.voice = None;
        debug!("alarm sequencer stopped");
    }

    fn trigger(&mut self) -> AlarmOutcome {
        if let Some(mut leftover) = self.voice.take() {
            silence(leftover.as_mut());
        }

        self.title.set_title(ALARM_TITLE);
        self.title_pending = true;

        let played = self.backend.open_alarm().and_then(|mut voice| {
            voice.set_looping(true);
            let result = voice.play();
            self.voice = Some(voice);
            result
        });

        match played {
            Ok(()) => {
                info!("alarm playing");
                AlarmOutcome::Playing
            }
            Err(e) => {
                warn!(error = %e, "alarm playback failed, falling back to title");
                AlarmOutcome::Silent(e)
            }
        }
    }

    fn stop(&mut self) {
        if let Some(voice) = self.voice.as_mut() {
            silence(voice.as_mut());
        }
        if self.title_pending {
            self.title.restore_title();
            self.title_pending = false;
        }
    }
}

fn silence(voice: &mut dyn AlarmVoice) {
    voice.pause();
    voice.rewind();
    voice.set_looping(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Cue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
        opened: AtomicUsize,
        looping_now: AtomicUsize,
        looping_max: AtomicUsize,
        titles: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn record(&self, entry: String) {
            self.log.lock().unwrap().push(entry);
        }
    }

    struct RecordingBackend {
        recorder: Arc<Recorder>,
        fail: bool,
    }

    struct RecordingVoice {
        id: usize,
        recorder: Arc<Recorder>,
        looping: bool,
        playing: bool,
        fail: bool,
    }

    impl RecordingVoice {
        fn update(&mut self, looping: bool, playing: bool) {
            let was = self.looping && self.playing;
            self.looping = looping;
            self.playing = playing;
            let now = self.looping && self.playing;
            if now && !was {
                let n = self.recorder.looping_now.fetch_add(1, Ordering::SeqCst) + 1;
                self.recorder.looping_max.fetch_max(n, Ordering::SeqCst);
            } else if was && !now {
                self.recorder.looping_now.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    impl AudioBackend for RecordingBackend {
        fn play_cue(&self, cue: Cue) -> Result<(), AudioError> {
            self.recorder.record(format!("cue {cue:?}"));
            Ok(())
        }

        fn open_alarm(&self) -> Result<Box<dyn AlarmVoice>, AudioError> {
            let id = self.recorder.opened.fetch_add(1, Ordering::SeqCst) + 1;
            self.recorder.record(format!("open {id}"));
            Ok(Box::new(RecordingVoice {
                id,
                recorder: self.recorder.clone(),
                looping: false,
                playing: false,
                fail: self.fail,
            }))
        }
    }

    impl AlarmVoice for RecordingVoice {
        fn set_looping(&mut self, looping: bool) {
            self.update(looping, self.playing);
        }

        fn play(&mut self) -> Result<(), AudioError> {
            if self.fail {
                self.recorder.record(format!("blocked {}", self.id));
                return Err(AudioError::PlaybackFailed("autoplay blocked".into()));
            }
            self.recorder.record(format!("play {}", self.id));
            self.update(self.looping, true);
            Ok(())
        }

        fn pause(&mut self) {
            self.recorder.record(format!("pause {}", self.id));
            self.update(self.looping, false);
        }

        fn rewind(&mut self) {}
    }

    impl TitleSink for Recorder {
        fn set_title(&self, title: &str) {
            self.titles.lock().unwrap().push(title.to_string());
        }

        fn restore_title(&self) {
            self.titles.lock().unwrap().push("<restored>".to_string());
        }
    }

    fn spawn(fail: bool) -> (Arc<Recorder>, AlarmHandle) {
        let recorder = Arc::new(Recorder::default());
        let backend = Arc::new(RecordingBackend {
            recorder: recorder.clone(),
            fail,
        });
        let handle = AlarmSequencer::spawn(backend, recorder.clone());
        (recorder, handle)
    }

    #[tokio::test]
    async fn trigger_plays_looping_voice() {
        let (recorder, alarm) = spawn(false);
        assert_eq!(alarm.trigger().await, AlarmOutcome::Playing);
        assert_eq!(recorder.looping_now.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.titles.lock().unwrap().as_slice(), [ALARM_TITLE]);
    }

    #[tokio::test]
    async fn concurrent_triggers_never_overlap() {
        let (recorder, alarm) = spawn(false);
        let (a, b) = tokio::join!(alarm.trigger(), alarm.trigger());
        assert!(a.is_audible() && b.is_audible());

        assert_eq!(recorder.opened.load(Ordering::SeqCst), 2);
        assert_eq!(recorder.looping_max.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.looping_now.load(Ordering::SeqCst), 1);
        assert_eq!(
            recorder.log.lock().unwrap().as_slice(),
            ["open 1", "play 1", "pause 1", "open 2", "play 2"]
        );
    }

    #[tokio::test]
    async fn failed_playback_still_settles() {
        let (recorder, alarm) = spawn(true);
        let outcome = alarm.trigger().await;
        assert!(matches!(outcome, AlarmOutcome::Silent(AudioError::PlaybackFailed(_))));
        assert_eq!(recorder.looping_now.load(Ordering::SeqCst), 0);
        // The title is the visible fallback.
        assert_eq!(recorder.titles.lock().unwrap().as_slice(), [ALARM_TITLE]);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let (recorder, alarm) = spawn(false);
        alarm.stop().await;
        assert!(recorder.titles.lock().unwrap().is_empty());

        alarm.trigger().await;
        alarm.stop().await;
        alarm.stop().await;
        assert_eq!(recorder.looping_now.load(Ordering::SeqCst), 0);
        assert_eq!(
            recorder.titles.lock().unwrap().as_slice(),
            [ALARM_TITLE, "<restored>"]
        );
    }

    #[tokio::test]
    async fn stop_after_trigger_is_never_overtaken() {
        let (recorder, alarm) = spawn(false);
        let (_, _) = tokio::join!(alarm.trigger(), alarm.stop());
        assert_eq!(recorder.looping_now.load(Ordering::SeqCst), 0);
        assert_eq!(
            recorder.log.lock().unwrap().as_slice(),
            ["open 1", "play 1", "pause 1"]
        );
    }

    #[tokio::test]
    async fn dropping_handles_releases_voice() {
        let (recorder, alarm) = spawn(false);
        alarm.trigger().await;
        drop(alarm);
        for _ in 0..50 {
            if recorder.looping_now.load(Ordering::SeqCst) == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(recorder.looping_now.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn disabled_sounds_report_a_silent_alarm() {
        let title = Arc::new(Recorder::default());
        let alarm = AlarmSequencer::spawn(Arc::new(crate::alarm::SilentBackend), title.clone());
        let outcome = alarm.trigger().await;
        assert!(!outcome.is_audible());
        assert!(matches!(outcome, AlarmOutcome::Silent(AudioError::Unavailable(_))));
        assert_eq!(title.titles.lock().unwrap().as_slice(), [ALARM_TITLE]);
    }
}
