//! Core domain types, port definitions, and the speech session
//! controller for ttsdeck.
//!
//! This crate is adapter-free: it knows nothing about any concrete
//! speech engine or presentation surface. Adapters implement the
//! traits in [`ports`] and render the events in [`events`].

pub mod domain;
pub mod events;
pub mod ports;
pub mod session;

// Re-export commonly used types for convenience
pub use domain::{
    FIXED_VOLUME, MAX_MULTIPLIER, MIN_MULTIPLIER, SessionState, SpeechParams, UtteranceHandle,
    UtteranceRequest, Voice, VoiceSelection,
};
pub use events::{CRITICAL_CHARS, CharCountTier, SessionEvent, StatusLevel, WARNING_CHARS};
pub use ports::{
    EmptyCatalog, LifecycleSignal, NoopSynthesizer, SpeechSynthesizerPort, SynthesizerError,
    UtteranceEvent, VoiceCatalogPort,
};
pub use session::{SessionError, SpeechSession};
