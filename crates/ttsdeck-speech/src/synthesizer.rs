//! Process-backed implementation of the core speech ports.
//!
//! Each utterance is one engine process. Lifecycle signals are derived
//! from the process: `Started` on spawn, `Ended`/`Errored` from the
//! exit status (watched on a task), `Paused`/`Resumed` from job-control
//! signals on Unix. On platforms without job control, pause, resume,
//! and cancel degrade to logged no-ops and playback runs to completion.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::{Mutex, mpsc};
use ttsdeck_core::{
    LifecycleSignal, SpeechSynthesizerPort, SynthesizerError, UtteranceEvent, UtteranceHandle,
    UtteranceRequest, Voice, VoiceCatalogPort,
};

use crate::engine::{EngineKind, SpeechEngine};
use crate::voices::{parse_espeak_voices, parse_say_voices};

/// The utterance whose engine process is currently alive.
#[derive(Debug, Clone, Copy)]
struct CurrentUtterance {
    handle: UtteranceHandle,
    pid: Option<u32>,
}

/// Speech synthesizer and voice catalog backed by a CLI engine process.
///
/// Implements both core ports; wiring code hands one `Arc` of this to
/// the panel for each.
pub struct ProcessSynthesizer {
    engine: SpeechEngine,
    event_tx: mpsc::UnboundedSender<UtteranceEvent>,
    current: Arc<Mutex<Option<CurrentUtterance>>>,
}

impl ProcessSynthesizer {
    /// Create a synthesizer over a discovered engine.
    ///
    /// Returns the synthesizer and the receiver for [`UtteranceEvent`]
    /// lifecycle messages.
    #[must_use]
    pub fn new(engine: SpeechEngine) -> (Self, mpsc::UnboundedReceiver<UtteranceEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                engine,
                event_tx,
                current: Arc::new(Mutex::new(None)),
            },
            event_rx,
        )
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ProcessSynthesizer {
    async fn submit(
        &self,
        request: UtteranceRequest,
    ) -> Result<UtteranceHandle, SynthesizerError> {
        let args = self.engine.speak_args(&request);
        let mut child = Command::new(self.engine.bin())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SynthesizerError::SubmitFailed(format!("{}: {e}", self.engine.bin().display()))
            })?;

        let handle = UtteranceHandle::new();
        let pid = child.id();
        *self.current.lock().await = Some(CurrentUtterance { handle, pid });
        tracing::debug!(%handle, ?pid, "Speech engine spawned");

        // The engine starts producing audio as soon as it is running.
        let _ = self.event_tx.send(UtteranceEvent {
            handle,
            signal: LifecycleSignal::Started,
        });

        let current = Arc::clone(&self.current);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let status = child.wait().await;

            // A cancelled or superseded utterance reports nothing; the
            // session has already moved on.
            let mut cur = current.lock().await;
            if cur.as_ref().map(|c| c.handle) != Some(handle) {
                return;
            }
            *cur = None;
            drop(cur);

            let signal = match status {
                Ok(s) if s.success() => LifecycleSignal::Ended,
                Ok(s) => LifecycleSignal::Errored(format!("speech engine exited with {s}")),
                Err(e) => LifecycleSignal::Errored(format!("failed to reap speech engine: {e}")),
            };
            let _ = tx.send(UtteranceEvent { handle, signal });
        });

        Ok(handle)
    }

    async fn cancel_all(&self) {
        if let Some(cur) = self.current.lock().await.take() {
            tracing::debug!(handle = %cur.handle, "Cancelling utterance");
            sys::terminate(cur.pid);
        }
    }

    async fn pause(&self) {
        let cur = *self.current.lock().await;
        if let Some(cur) = cur {
            if sys::suspend(cur.pid) {
                let _ = self.event_tx.send(UtteranceEvent {
                    handle: cur.handle,
                    signal: LifecycleSignal::Paused,
                });
            }
        }
    }

    async fn resume(&self) {
        let cur = *self.current.lock().await;
        if let Some(cur) = cur {
            if sys::resume(cur.pid) {
                let _ = self.event_tx.send(UtteranceEvent {
                    handle: cur.handle,
                    signal: LifecycleSignal::Resumed,
                });
            }
        }
    }
}

#[async_trait]
impl VoiceCatalogPort for ProcessSynthesizer {
    async fn list_voices(&self) -> Vec<Voice> {
        let output = Command::new(self.engine.bin())
            .args(self.engine.voices_args())
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let listing = String::from_utf8_lossy(&out.stdout);
                match self.engine.kind() {
                    EngineKind::Say => parse_say_voices(&listing),
                    EngineKind::EspeakNg | EngineKind::Espeak => parse_espeak_voices(&listing),
                }
            }
            Ok(out) => {
                tracing::warn!(status = %out.status, "Voice enumeration failed");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Voice enumeration failed");
                Vec::new()
            }
        }
    }
}

#[cfg(unix)]
mod sys {
    //! Job-control signalling for the engine process.

    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    fn send(pid: Option<u32>, sig: Signal) -> bool {
        let Some(pid) = pid else { return false };
        let Ok(pid) = i32::try_from(pid) else {
            return false;
        };
        match signal::kill(Pid::from_raw(pid), sig) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(pid, sig = %sig, error = %e, "Failed to signal speech engine");
                false
            }
        }
    }

    pub fn terminate(pid: Option<u32>) {
        // SIGKILL also reaps a SIGSTOPped process.
        send(pid, Signal::SIGKILL);
    }

    pub fn suspend(pid: Option<u32>) -> bool {
        send(pid, Signal::SIGSTOP)
    }

    pub fn resume(pid: Option<u32>) -> bool {
        send(pid, Signal::SIGCONT)
    }
}

#[cfg(not(unix))]
mod sys {
    //! No job control: pause/resume/cancel degrade to logged no-ops.

    pub fn terminate(_pid: Option<u32>) {
        tracing::warn!("Cancelling playback is not supported on this platform");
    }

    pub fn suspend(_pid: Option<u32>) -> bool {
        tracing::warn!("Pausing playback is not supported on this platform");
        false
    }

    pub fn resume(_pid: Option<u32>) -> bool {
        false
    }
}
