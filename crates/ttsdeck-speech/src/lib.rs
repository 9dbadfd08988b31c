//! Process-backed speech adapter for ttsdeck.
//!
//! Implements the core speech ports on top of a CLI speech engine
//! (`espeak-ng`, `espeak`, or macOS `say`). All synthesis happens in
//! the engine process; this crate only orchestrates it and translates
//! process lifecycle into utterance lifecycle signals.

mod engine;
mod synthesizer;
mod voices;

pub use engine::{EngineError, EngineKind, SpeechEngine};
pub use synthesizer::ProcessSynthesizer;
pub use voices::{parse_espeak_voices, parse_say_voices};
