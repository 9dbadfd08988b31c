//! Speech engine discovery and command-line construction.
//!
//! The adapter delegates all synthesis to a CLI speech engine found on
//! `PATH`: `espeak-ng` preferred, plain `espeak` next, macOS `say`
//! last. Rate and pitch multipliers from the domain are mapped onto
//! each engine's native scales here.

use std::path::{Path, PathBuf};

use thiserror::Error;
use ttsdeck_core::{FIXED_VOLUME, UtteranceRequest};

/// espeak's default speaking rate, used as the 1.0x baseline.
const BASE_WPM: f32 = 175.0;

/// espeak's default pitch on its 0-99 scale, used as the 1.0x baseline.
const BASE_PITCH: f32 = 50.0;

/// Which CLI speech engine backs the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// `espeak-ng`.
    EspeakNg,
    /// Legacy `espeak`; same command line as espeak-ng.
    Espeak,
    /// macOS `say`.
    Say,
}

/// Errors from engine discovery.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No usable engine binary on `PATH`. Startup-fatal for the
    /// interactive panel.
    #[error("no speech engine found on PATH (looked for espeak-ng, espeak, say)")]
    NotFound,
}

/// A discovered speech engine binary.
#[derive(Debug, Clone)]
pub struct SpeechEngine {
    kind: EngineKind,
    bin: PathBuf,
}

impl SpeechEngine {
    /// Probe `PATH` for a usable engine, preferring espeak-ng.
    pub fn discover() -> Result<Self, EngineError> {
        const CANDIDATES: [(EngineKind, &str); 3] = [
            (EngineKind::EspeakNg, "espeak-ng"),
            (EngineKind::Espeak, "espeak"),
            (EngineKind::Say, "say"),
        ];

        for (kind, name) in CANDIDATES {
            if let Ok(bin) = which::which(name) {
                tracing::info!(engine = name, bin = %bin.display(), "Speech engine detected");
                return Ok(Self { kind, bin });
            }
        }
        Err(EngineError::NotFound)
    }

    /// Use an explicit engine binary, inferring the kind from its
    /// file name (unknown names are treated as espeak-compatible).
    #[must_use]
    pub fn from_path(bin: PathBuf) -> Self {
        let kind = match bin.file_stem().and_then(|s| s.to_str()) {
            Some("espeak") => EngineKind::Espeak,
            Some("say") => EngineKind::Say,
            _ => EngineKind::EspeakNg,
        };
        Self { kind, bin }
    }

    /// The engine binary path.
    #[must_use]
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// The engine kind.
    #[must_use]
    pub const fn kind(&self) -> EngineKind {
        self.kind
    }

    /// Command-line arguments to speak one utterance.
    ///
    /// The text is always the final argument.
    #[must_use]
    pub fn speak_args(&self, request: &UtteranceRequest) -> Vec<String> {
        let wpm = (BASE_WPM * request.params.rate).round().clamp(80.0, 450.0) as i32;

        let mut args = Vec::new();
        match self.kind {
            EngineKind::EspeakNg | EngineKind::Espeak => {
                let pitch = (BASE_PITCH * request.params.pitch).round().clamp(0.0, 99.0) as i32;
                let amp = (100.0 * FIXED_VOLUME).round() as i32;

                // espeak selects voices by language identifier.
                if let Some(voice) = &request.voice {
                    args.push("-v".into());
                    args.push(voice.language.clone());
                }
                args.push("-s".into());
                args.push(wpm.to_string());
                args.push("-p".into());
                args.push(pitch.to_string());
                args.push("-a".into());
                args.push(amp.to_string());
            }
            EngineKind::Say => {
                // say selects voices by display name and has no pitch flag.
                if let Some(voice) = &request.voice {
                    args.push("-v".into());
                    args.push(voice.name.clone());
                }
                args.push("-r".into());
                args.push(wpm.to_string());
            }
        }
        args.push(request.text.clone());
        args
    }

    /// Command-line arguments to enumerate voices.
    #[must_use]
    pub fn voices_args(&self) -> Vec<String> {
        match self.kind {
            EngineKind::EspeakNg | EngineKind::Espeak => vec!["--voices".into()],
            EngineKind::Say => vec!["-v".into(), "?".into()],
        }
    }
}
