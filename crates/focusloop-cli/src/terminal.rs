//! Terminal implementations of the core's side-effect traits.
//!
//! Sound is the terminal bell, the title is set with an OSC escape sequence
//! and notices are printed to stderr. Blocking notices wait for the next
//! line typed on stdin.

use async_trait::async_trait;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use focusloop_core::{AlarmVoice, AudioBackend, AudioError, Cue, Notice, Notifier, TitleSink};

const BELL_PERIOD: Duration = Duration::from_secs(2);
const DEFAULT_TITLE: &str = "focusloop";

/// Routes the next typed line to a waiting notice instead of the command loop.
pub struct Acknowledger {
    awaiting: Arc<AtomicBool>,
    acks: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl Acknowledger {
    /// Wait for the user to press Enter. Returns at once if stdin is closed.
    pub async fn wait(&self) {
        let mut acks = self.acks.lock().await;
        self.awaiting.store(true, Ordering::SeqCst);
        let _ = acks.recv().await;
        self.awaiting.store(false, Ordering::SeqCst);
    }
}

/// Read stdin line by line on a background task.
///
/// Lines go to the returned command channel unless a notice is waiting for
/// acknowledgement, in which case the line acknowledges it.
pub fn spawn_stdin_reader() -> (mpsc::UnboundedReceiver<String>, Acknowledger) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (ack_tx, ack_rx) = mpsc::unbounded_channel();
    let awaiting = Arc::new(AtomicBool::new(false));
    let reader_awaiting = awaiting.clone();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let sent = if reader_awaiting.swap(false, Ordering::SeqCst) {
                ack_tx.send(line).is_ok()
            } else {
                command_tx.send(line).is_ok()
            };
            if !sent {
                break;
            }
        }
    });

    let acknowledger = Acknowledger {
        awaiting,
        acks: Mutex::new(ack_rx),
    };
    (command_rx, acknowledger)
}

fn ring() -> Result<(), AudioError> {
    let mut err = std::io::stderr();
    err.write_all(b"\x07")
        .and_then(|_| err.flush())
        .map_err(|e| AudioError::PlaybackFailed(e.to_string()))
}

/// Terminal bell as the audio device.
pub struct TerminalBell;

impl AudioBackend for TerminalBell {
    fn play_cue(&self, cue: Cue) -> Result<(), AudioError> {
        tracing::trace!(?cue, "cue");
        ring()
    }

    fn open_alarm(&self) -> Result<Box<dyn AlarmVoice>, AudioError> {
        let runtime = Handle::try_current().map_err(|e| AudioError::Unavailable(e.to_string()))?;
        Ok(Box::new(BellVoice {
            runtime,
            looping: false,
            task: None,
        }))
    }
}

/// Rings once on play, then every [`BELL_PERIOD`] while looping.
struct BellVoice {
    runtime: Handle,
    looping: bool,
    task: Option<JoinHandle<()>>,
}

impl BellVoice {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl AlarmVoice for BellVoice {
    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if !looping {
            self.cancel();
        }
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.cancel();
        ring()?;
        if self.looping {
            self.task = Some(self.runtime.spawn(async {
                let mut interval = tokio::time::interval(BELL_PERIOD);
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if ring().is_err() {
                        break;
                    }
                }
            }));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.cancel();
    }

    // A bell has no playback position.
    fn rewind(&mut self) {}
}

impl Drop for BellVoice {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Terminal window title via OSC 0. Does nothing when stdout is redirected.
pub struct TerminalTitle;

impl TerminalTitle {
    fn write(title: &str) {
        let mut out = std::io::stdout();
        if !out.is_terminal() {
            return;
        }
        let _ = write!(out, "\x1b]0;{title}\x07");
        let _ = out.flush();
    }
}

impl TitleSink for TerminalTitle {
    fn set_title(&self, title: &str) {
        Self::write(title);
    }

    fn restore_title(&self) {
        Self::write(DEFAULT_TITLE);
    }
}

/// Prints notices to stderr; blocking ones wait for Enter.
pub struct TerminalNotifier {
    acknowledger: Acknowledger,
    confirm_transitions: bool,
}

impl TerminalNotifier {
    pub fn new(acknowledger: Acknowledger, confirm_transitions: bool) -> Self {
        Self {
            acknowledger,
            confirm_transitions,
        }
    }

    async fn wait_for_enter(&self) {
        eprintln!("  (press Enter to continue)");
        self.acknowledger.wait().await;
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn alert(&self, notice: &Notice) {
        eprintln!("! {notice}");
        self.wait_for_enter().await;
    }

    async fn confirm(&self, notice: &Notice) {
        eprintln!("* {notice}");
        if self.confirm_transitions {
            self.wait_for_enter().await;
        }
    }

    fn warn(&self, notice: &Notice) {
        eprintln!("warning: {notice}");
    }
}
