//! Semantic error types for panel operations.
//!
//! These errors are domain-focused, not transport-focused. Adapters
//! map `PanelError` to their specific surfaces (exit codes, HTTP
//! statuses, dialog boxes).

use std::fmt;

use ttsdeck_core::{SessionError, SynthesizerError};

/// Semantic errors for panel backend operations.
#[derive(Debug, Clone)]
pub enum PanelError {
    /// The host has no speech capability at all. Startup-fatal for the
    /// interactive panel: controls must not be initialized.
    SpeechUnavailable(String),

    /// Request validation failed (empty input, bad index).
    ValidationFailed(String),

    /// The speech provider rejected or failed an operation.
    Provider(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpeechUnavailable(msg) => {
                write!(f, "text-to-speech is not available on this host: {msg}")
            }
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Provider(msg) => write!(f, "speech provider error: {msg}"),
        }
    }
}

impl std::error::Error for PanelError {}

impl From<SessionError> for PanelError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyText => Self::ValidationFailed(err.to_string()),
            SessionError::Synthesizer(SynthesizerError::Unavailable(msg)) => {
                Self::SpeechUnavailable(msg)
            }
            SessionError::Synthesizer(e) => Self::Provider(e.to_string()),
        }
    }
}
