//! The speech session controller.
//!
//! Owns one logical utterance at a time and exposes transport-style
//! controls over it:
//!
//! ```text
//!   Idle ──speak──▶ Speaking ──pause──▶ Paused
//!    ▲                 │  ▲              │
//!    │   end/error/stop│  └────resume────┘
//!    └─────────────────┘
//! ```
//!
//! All transitions happen on direct user-triggered calls or on
//! lifecycle signals fed in through [`SpeechSession::handle_utterance_event`];
//! the caller applies both serially, so no two transitions ever race.
//! Signals carrying a handle other than the current one are discarded,
//! which is what keeps a cancelled request's late `Ended` from
//! regressing a newer session's state.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::{SessionState, SpeechParams, UtteranceHandle, UtteranceRequest, Voice,
    VoiceSelection};
use crate::events::{CharCountTier, SessionEvent, StatusLevel};
use crate::ports::{LifecycleSignal, SpeechSynthesizerPort, SynthesizerError, UtteranceEvent,
    VoiceCatalogPort};

/// Errors surfaced by [`SpeechSession::speak`].
///
/// Both kinds also produce a user-visible error status on the event
/// channel; no failure is ever silent.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The input was empty or whitespace-only. Handled locally; the
    /// provider is never invoked and the session state is unchanged.
    #[error("text is empty or whitespace-only")]
    EmptyText,

    /// The speech provider rejected the submission.
    #[error(transparent)]
    Synthesizer(#[from] SynthesizerError),
}

/// The speech session controller.
///
/// Constructed with the two capabilities it composes with but does not
/// implement: the speech synthesizer and the voice catalog. Emits
/// [`SessionEvent`]s via a channel for the presentation layer to
/// consume.
pub struct SpeechSession {
    /// The platform speech capability.
    synth: Arc<dyn SpeechSynthesizerPort>,

    /// Voice enumeration.
    catalog: Arc<dyn VoiceCatalogPort>,

    /// Current lifecycle phase.
    state: SessionState,

    /// Handle of the outstanding utterance. `Some` iff state is not
    /// `Idle`.
    active: Option<UtteranceHandle>,

    /// Catalog as of the last refresh.
    voices: Vec<Voice>,

    /// The user's current voice choice.
    selection: VoiceSelection,

    /// Event sender channel.
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SpeechSession {
    /// Create a new session in the `Idle` state.
    ///
    /// Returns the session and the receiver for [`SessionEvent`]s.
    /// The first event on the channel is a neutral "ready" status.
    #[must_use]
    pub fn new(
        synth: Arc<dyn SpeechSynthesizerPort>,
        catalog: Arc<dyn VoiceCatalogPort>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let session = Self {
            synth,
            catalog,
            state: SessionState::Idle,
            active: None,
            voices: Vec::new(),
            selection: VoiceSelection::Unspecified,
            event_tx,
        };
        session.emit_status("Ready to convert text to speech", StatusLevel::Neutral);

        (session, event_rx)
    }

    /// Get the current session state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Get the catalog as of the last refresh.
    #[must_use]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Get the current voice selection.
    #[must_use]
    pub const fn selection(&self) -> &VoiceSelection {
        &self.selection
    }

    // ── Transport controls ─────────────────────────────────────────

    /// Submit text for playback.
    ///
    /// Empty or whitespace-only text is rejected with an error status
    /// and no provider call; the session state is unchanged. Otherwise
    /// any outstanding utterance is cancelled first, the request is
    /// submitted, and the session enters `Speaking` immediately -
    /// actual audio start is confirmed later by the `Started` signal.
    pub async fn speak(
        &mut self,
        text: &str,
        params: SpeechParams,
    ) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            self.emit_status(
                "Please enter some text to convert to speech.",
                StatusLevel::Error,
            );
            return Err(SessionError::EmptyText);
        }

        // A new request supersedes the outstanding one; no queueing.
        if self.state != SessionState::Idle {
            self.synth.cancel_all().await;
            self.active = None;
        }

        let request = UtteranceRequest {
            text: text.to_owned(),
            voice: self.selection.as_voice().cloned(),
            params,
        };

        match self.synth.submit(request).await {
            Ok(handle) => {
                tracing::info!(%handle, "Utterance submitted");
                self.active = Some(handle);
                self.set_state(SessionState::Speaking);
                Ok(())
            }
            Err(e) => {
                self.set_state(SessionState::Idle);
                self.emit_status(
                    format!("Error starting speech synthesis: {e}"),
                    StatusLevel::Error,
                );
                Err(SessionError::Synthesizer(e))
            }
        }
    }

    /// Pause playback. No-op unless the session is exactly `Speaking`.
    pub async fn pause(&mut self) {
        if self.state != SessionState::Speaking {
            return;
        }
        self.synth.pause().await;
        self.set_state(SessionState::Paused);
        self.emit_status("Speech paused", StatusLevel::Paused);
    }

    /// Resume playback. No-op unless the session is exactly `Paused`.
    pub async fn resume(&mut self) {
        if self.state != SessionState::Paused {
            return;
        }
        self.synth.resume().await;
        self.set_state(SessionState::Speaking);
        self.emit_status("Speech resumed", StatusLevel::Speaking);
    }

    /// Cancel the outstanding utterance. No-op when `Idle`.
    ///
    /// The transition to `Idle` is immediate and local; interest in
    /// any late-arriving signals from the cancelled request is
    /// discarded here.
    pub async fn stop(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.synth.cancel_all().await;
        self.active = None;
        self.set_state(SessionState::Idle);
        self.emit_status("Speech stopped", StatusLevel::Neutral);
    }

    // ── Provider lifecycle signals ─────────────────────────────────

    /// Apply one lifecycle signal from the speech provider.
    ///
    /// Signals for a superseded or cancelled handle are ignored.
    pub fn handle_utterance_event(&mut self, event: &UtteranceEvent) {
        if self.active != Some(event.handle) {
            tracing::debug!(
                handle = %event.handle,
                "Ignoring lifecycle signal for a stale utterance"
            );
            return;
        }

        match &event.signal {
            LifecycleSignal::Started => {
                self.emit_status("Speaking...", StatusLevel::Speaking);
            }
            LifecycleSignal::Paused => {
                // Engine-initiated pause; a locally initiated one has
                // already moved the state.
                if self.state == SessionState::Speaking {
                    self.set_state(SessionState::Paused);
                    self.emit_status("Speech paused", StatusLevel::Paused);
                }
            }
            LifecycleSignal::Resumed => {
                if self.state == SessionState::Paused {
                    self.set_state(SessionState::Speaking);
                    self.emit_status("Speech resumed", StatusLevel::Speaking);
                }
            }
            LifecycleSignal::Ended => {
                self.active = None;
                self.set_state(SessionState::Idle);
                self.emit_status("Speech completed successfully", StatusLevel::Success);
            }
            LifecycleSignal::Errored(reason) => {
                self.active = None;
                self.set_state(SessionState::Idle);
                self.emit_status(
                    format!("Speech synthesis error: {reason}"),
                    StatusLevel::Error,
                );
            }
        }
    }

    // ── Voice catalog ──────────────────────────────────────────────

    /// Re-enumerate the voice catalog, replacing it wholesale.
    ///
    /// The previous selection is re-established by identity if an
    /// equivalent voice is still present, otherwise it reverts to the
    /// provider default. Emits the full new list.
    pub async fn refresh_voices(&mut self) {
        let voices = self.catalog.list_voices().await;
        tracing::debug!(count = voices.len(), "Voice catalog refreshed");

        if let VoiceSelection::Voice(prev) = &self.selection {
            self.selection = voices
                .iter()
                .find(|v| v.identity() == prev.identity())
                .cloned()
                .map_or(VoiceSelection::Unspecified, VoiceSelection::Voice);
        }

        self.voices = voices;
        self.emit(SessionEvent::VoicesChanged {
            voices: self.voices.clone(),
        });
    }

    /// Select a voice by index into the current catalog, or `None` for
    /// the provider default.
    ///
    /// An index outside the catalog bounds falls back silently to the
    /// provider default. Changing the selection mid-utterance stops
    /// playback first.
    pub async fn select_voice(&mut self, index: Option<usize>) {
        if self.state != SessionState::Idle {
            self.stop().await;
        }

        self.selection = match index {
            Some(i) => self.voices.get(i).map_or_else(
                || {
                    tracing::debug!(index = i, "Voice index outside catalog; using default");
                    VoiceSelection::Unspecified
                },
                |v| VoiceSelection::Voice(v.clone()),
            ),
            None => VoiceSelection::Unspecified,
        };
    }

    // ── Ambient host signals ───────────────────────────────────────

    /// React to the host losing or regaining visibility/focus.
    ///
    /// A hidden host pauses an active utterance as a courtesy; nothing
    /// is resumed automatically on return.
    pub async fn host_visibility_changed(&mut self, visible: bool) {
        if !visible && self.state == SessionState::Speaking {
            tracing::debug!("Host hidden; pausing playback");
            self.pause().await;
        }
    }

    /// React to the raw input text changing.
    ///
    /// Emits character-count feedback; counts Unicode scalar values.
    pub fn input_changed(&self, text: &str) {
        let count = text.chars().count();
        self.emit(SessionEvent::CharCount {
            count,
            tier: CharCountTier::for_count(count),
        });
    }

    // ── Internals ──────────────────────────────────────────────────

    fn set_state(&mut self, next: SessionState) {
        if next == self.state {
            return;
        }
        let previous = std::mem::replace(&mut self.state, next);
        tracing::debug!(?previous, current = ?next, "Session state changed");
        self.emit(SessionEvent::StateChanged {
            previous,
            current: next,
        });
    }

    fn emit_status(&self, text: impl Into<String>, level: StatusLevel) {
        self.emit(SessionEvent::Status {
            text: text.into(),
            level,
        });
    }

    fn emit(&self, event: SessionEvent) {
        // A dropped receiver just means nobody is rendering anymore.
        let _ = self.event_tx.send(event);
    }
}
