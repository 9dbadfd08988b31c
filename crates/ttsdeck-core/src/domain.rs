//! Core domain types for the speech session.
//!
//! These are plain value types shared by ports, the session controller,
//! and adapters. None of them know anything about a concrete speech
//! engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lower bound for the rate and pitch multipliers.
pub const MIN_MULTIPLIER: f32 = 0.5;

/// Upper bound for the rate and pitch multipliers.
pub const MAX_MULTIPLIER: f32 = 2.0;

/// Playback volume is not user-configurable; every utterance is
/// submitted at full volume.
pub const FIXED_VOLUME: f32 = 1.0;

// ── Voice ──────────────────────────────────────────────────────────

/// A single voice identity enumerated from the platform catalog.
///
/// Immutable once enumerated; the catalog is replaced wholesale when
/// the provider signals an update, never diffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Engine-facing voice name (e.g. `"english"`, `"Samantha"`).
    pub name: String,
    /// Locale tag reported by the engine (e.g. `"en-GB"`).
    pub language: String,
    /// Whether the engine marks this voice as its default.
    pub is_default: bool,
}

impl Voice {
    /// Create a new voice entry.
    pub fn new(name: impl Into<String>, language: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            is_default,
        }
    }

    /// Identity used to re-select a voice after a catalog replacement.
    #[must_use]
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.language)
    }

    /// Human-readable label for list rendering.
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_default {
            format!("{} ({}) - Default", self.name, self.language)
        } else {
            format!("{} ({})", self.name, self.language)
        }
    }
}

/// The user's current voice choice.
///
/// `Unspecified` means the speech provider picks its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VoiceSelection {
    /// Use the provider's default voice.
    #[default]
    Unspecified,
    /// Use a specific voice from the current catalog.
    Voice(Voice),
}

impl VoiceSelection {
    /// The selected voice, if any.
    #[must_use]
    pub const fn as_voice(&self) -> Option<&Voice> {
        match self {
            Self::Unspecified => None,
            Self::Voice(v) => Some(v),
        }
    }
}

// ── Speech parameters ──────────────────────────────────────────────

/// Rate and pitch multipliers for one utterance.
///
/// Values outside [`MIN_MULTIPLIER`]..=[`MAX_MULTIPLIER`] are clamped
/// on construction; non-finite input falls back to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechParams {
    /// Speaking-rate multiplier (1.0 = engine default).
    pub rate: f32,
    /// Pitch multiplier (1.0 = engine default).
    pub pitch: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

impl SpeechParams {
    /// Create parameters, clamping both multipliers into bounds.
    #[must_use]
    pub fn new(rate: f32, pitch: f32) -> Self {
        Self {
            rate: clamp_multiplier(rate),
            pitch: clamp_multiplier(pitch),
        }
    }
}

fn clamp_multiplier(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    } else {
        1.0
    }
}

// ── Utterance ──────────────────────────────────────────────────────

/// One validated text-to-speech request.
///
/// Built by the session controller from trimmed, non-empty text; the
/// voice is resolved against the catalog current at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    /// Non-empty, trimmed text to speak.
    pub text: String,
    /// Resolved voice, or `None` for the provider default.
    pub voice: Option<Voice>,
    /// Rate and pitch multipliers.
    pub params: SpeechParams,
}

/// Identity of one submitted utterance.
///
/// Lifecycle signals carry the handle they belong to; signals for a
/// handle that is no longer current are discarded, so a cancelled
/// request's late events can never regress a newer session's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtteranceHandle(Uuid);

impl UtteranceHandle {
    /// Mint a fresh handle.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UtteranceHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UtteranceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Session state ──────────────────────────────────────────────────

/// The session's current lifecycle phase.
///
/// Invariant: `Idle` if and only if no utterance is outstanding.
/// `Paused` implies a previously `Speaking` request that has not
/// ended, errored, or been cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No utterance outstanding.
    Idle,
    /// An utterance has been submitted and not yet finished.
    Speaking,
    /// The outstanding utterance is paused.
    Paused,
}
