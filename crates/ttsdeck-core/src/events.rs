//! Canonical event union emitted by the session controller.
//!
//! This is the single observable surface of the session: state-change
//! notifications, status messages with a severity tag, catalog
//! replacements, and character-count feedback. Adapters (terminal,
//! web, desktop) render these; nothing else leaks out of the
//! controller.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "status", "text": "Speech completed successfully", "level": "success" }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{SessionState, Voice};

/// Character count above which input feedback turns to the warning tier.
pub const WARNING_CHARS: usize = 4000;

/// Character count above which input feedback turns to the critical tier.
pub const CRITICAL_CHARS: usize = 4500;

/// Severity tag attached to a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    /// Informational, no particular state.
    Neutral,
    /// Audio is playing.
    Speaking,
    /// Playback is paused.
    Paused,
    /// An utterance completed normally.
    Success,
    /// Something failed; the text says what.
    Error,
}

/// Visual tier for the character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharCountTier {
    /// At or below [`WARNING_CHARS`].
    Normal,
    /// Above [`WARNING_CHARS`], at or below [`CRITICAL_CHARS`].
    Warning,
    /// Above [`CRITICAL_CHARS`].
    Critical,
}

impl CharCountTier {
    /// Tier for a given character count. Boundaries are exact: a count
    /// of exactly [`WARNING_CHARS`] is still `Normal`, exactly
    /// [`CRITICAL_CHARS`] is still `Warning`.
    #[must_use]
    pub const fn for_count(count: usize) -> Self {
        if count > CRITICAL_CHARS {
            Self::Critical
        } else if count > WARNING_CHARS {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// Canonical event types emitted by the session controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session moved to a new lifecycle phase.
    StateChanged {
        /// Phase before the transition.
        previous: SessionState,
        /// Phase after the transition.
        current: SessionState,
    },

    /// A human-readable status line with a severity tag.
    Status {
        /// Message text, ready for display.
        text: String,
        /// Severity tag for presentation.
        level: StatusLevel,
    },

    /// The voice catalog was replaced wholesale.
    VoicesChanged {
        /// The full new catalog; the previous presentation is discarded.
        voices: Vec<Voice>,
    },

    /// The raw input text changed; feedback for the character counter.
    CharCount {
        /// Number of characters (Unicode scalar values) in the input.
        count: usize,
        /// Visual tier for the counter.
        tier: CharCountTier,
    },
}

impl SessionEvent {
    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "session:state_changed",
            Self::Status { .. } => "session:status",
            Self::VoicesChanged { .. } => "session:voices_changed",
            Self::CharCount { .. } => "session:char_count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(CharCountTier::for_count(0), CharCountTier::Normal);
        assert_eq!(CharCountTier::for_count(WARNING_CHARS), CharCountTier::Normal);
        assert_eq!(
            CharCountTier::for_count(WARNING_CHARS + 1),
            CharCountTier::Warning
        );
        assert_eq!(
            CharCountTier::for_count(CRITICAL_CHARS),
            CharCountTier::Warning
        );
        assert_eq!(
            CharCountTier::for_count(CRITICAL_CHARS + 1),
            CharCountTier::Critical
        );
    }

    #[test]
    fn event_serialization() {
        let event = SessionEvent::Status {
            text: "Speech completed successfully".to_string(),
            level: StatusLevel::Success,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"status\""));
        assert!(json.contains("\"level\":\"success\""));
    }

    /// Lock down wire names so frontend subscriptions cannot silently
    /// drift from backend emission.
    #[test]
    fn event_names_are_stable() {
        use crate::domain::SessionState;

        let cases = vec![
            (
                SessionEvent::StateChanged {
                    previous: SessionState::Idle,
                    current: SessionState::Speaking,
                },
                "session:state_changed",
            ),
            (
                SessionEvent::Status {
                    text: String::new(),
                    level: StatusLevel::Neutral,
                },
                "session:status",
            ),
            (
                SessionEvent::VoicesChanged { voices: vec![] },
                "session:voices_changed",
            ),
            (
                SessionEvent::CharCount {
                    count: 0,
                    tier: CharCountTier::Normal,
                },
                "session:char_count",
            ),
        ];

        for (event, expected_name) in cases {
            assert_eq!(event.event_name(), expected_name);
        }
    }
}
