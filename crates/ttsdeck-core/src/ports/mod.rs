//! Port definitions (trait abstractions) for the platform speech subsystem.
//!
//! Ports define the interfaces the session controller expects from the
//! host environment. They contain no implementation details and use
//! only domain types, so the controller has zero compile-time
//! dependency on any specific speech engine.

pub mod synthesizer;
pub mod voice_catalog;

pub use synthesizer::{
    LifecycleSignal, NoopSynthesizer, SpeechSynthesizerPort, SynthesizerError, UtteranceEvent,
};
pub use voice_catalog::{EmptyCatalog, VoiceCatalogPort};
