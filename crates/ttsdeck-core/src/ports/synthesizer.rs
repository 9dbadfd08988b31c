//! Speech capability port - the narrow interface over the platform
//! speech subsystem.
//!
//! `submit` returns as soon as the engine has accepted the request;
//! audio start, pause, resume, completion, and failure all arrive
//! later as [`UtteranceEvent`] messages on a channel owned by the
//! adapter. The controller never blocks on audio.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{UtteranceHandle, UtteranceRequest};

/// Lifecycle signals reported by the speech engine for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleSignal {
    /// Audio playback has actually started.
    Started,
    /// Playback was paused by the engine.
    Paused,
    /// Playback resumed after a pause.
    Resumed,
    /// The utterance finished normally.
    Ended,
    /// The engine failed mid-utterance; the reason is engine-supplied.
    Errored(String),
}

/// One lifecycle message, tagged with the utterance it belongs to.
#[derive(Debug, Clone)]
pub struct UtteranceEvent {
    /// The utterance this signal is about.
    pub handle: UtteranceHandle,
    /// What happened.
    pub signal: LifecycleSignal,
}

/// Errors returned by [`SpeechSynthesizerPort::submit`].
#[derive(Debug, Error)]
pub enum SynthesizerError {
    /// The speech engine is not usable on this host.
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected or failed to start the utterance.
    #[error("failed to start utterance: {0}")]
    SubmitFailed(String),
}

/// Port trait for the platform speech capability.
///
/// `cancel_all`, `pause`, and `resume` are fire-and-forget: adapters
/// handle their own failures internally (logging them), because from
/// the controller's perspective cancellation is synchronous and a
/// failed pause is indistinguishable from an engine that ignored it.
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// Submit one utterance for playback.
    ///
    /// Returns the handle that subsequent lifecycle signals for this
    /// utterance will carry.
    async fn submit(&self, request: UtteranceRequest)
    -> Result<UtteranceHandle, SynthesizerError>;

    /// Cancel every outstanding utterance.
    async fn cancel_all(&self);

    /// Pause the outstanding utterance, if any.
    async fn pause(&self);

    /// Resume a paused utterance, if any.
    async fn resume(&self);
}

/// A no-op synthesizer for tests and wiring contexts without audio.
///
/// `submit` accepts everything and mints a handle; no lifecycle
/// signals are ever delivered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSynthesizer;

#[async_trait]
impl SpeechSynthesizerPort for NoopSynthesizer {
    async fn submit(
        &self,
        _request: UtteranceRequest,
    ) -> Result<UtteranceHandle, SynthesizerError> {
        Ok(UtteranceHandle::new())
    }

    async fn cancel_all(&self) {}

    async fn pause(&self) {}

    async fn resume(&self) {}
}
