//! Sound output.
//!
//! Short cues are fire-and-forget. The looping alarm goes through
//! [`AlarmSequencer`], which owns the only alarm voice.

mod sequencer;

pub use sequencer::{AlarmHandle, AlarmOutcome, AlarmSequencer, ALARM_TITLE};

use std::sync::Arc;
use tracing::warn;

use crate::error::AudioError;

/// Short one-shot sounds. The alarm itself is an [`AlarmVoice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Start,
    Stop,
    Ui,
}

/// Something that can make noise.
pub trait AudioBackend: Send + Sync {
    /// Play a short, non-looping cue. Must not block.
    fn play_cue(&self, cue: Cue) -> Result<(), AudioError>;

    /// Create a new alarm voice, not yet playing.
    fn open_alarm(&self) -> Result<Box<dyn AlarmVoice>, AudioError>;
}

/// One playable alarm instance.
pub trait AlarmVoice: Send {
    fn set_looping(&mut self, looping: bool);
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Move the playback position back to the start.
    fn rewind(&mut self);
}

/// Window, tab or terminal title.
pub trait TitleSink: Send + Sync {
    fn set_title(&self, title: &str);
    fn restore_title(&self);
}

/// Fire-and-forget cue playback. Failures are logged, never returned.
#[derive(Clone)]
pub struct CuePlayer {
    backend: Arc<dyn AudioBackend>,
}

impl CuePlayer {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self { backend }
    }

    pub fn play(&self, cue: Cue) {
        if let Err(e) = self.backend.play_cue(cue) {
            warn!(?cue, error = %e, "cue playback failed");
        }
    }
}

/// Backend that plays nothing, used when sounds are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

struct SilentVoice;

impl AudioBackend for SilentBackend {
    fn play_cue(&self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }

    fn open_alarm(&self) -> Result<Box<dyn AlarmVoice>, AudioError> {
        Ok(Box::new(SilentVoice))
    }
}

impl AlarmVoice for SilentVoice {
    fn set_looping(&mut self, _looping: bool) {}
    fn play(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable("sounds disabled".into()))
    }
    fn pause(&mut self) {}
    fn rewind(&mut self) {}
}

/// Title sink for front ends without a title.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTitle;

impl TitleSink for NoTitle {
    fn set_title(&self, _title: &str) {}
    fn restore_title(&self) {}
}
