//! Dependency injection for the panel.
//!
//! Capabilities are injected as trait objects so the panel stays
//! neutral about which speech engine or host environment backs it.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, mpsc};
use ttsdeck_core::{SessionEvent, SpeechSession, SpeechSynthesizerPort, VoiceCatalogPort};

use crate::error::PanelError;

/// Dependencies required to run the panel.
///
/// Construction via [`PanelDeps::initialize`] is the only entry point:
/// a host without a speech capability must not get interactive
/// controls at all, so the absent-synthesizer check happens here, once,
/// before any session exists.
pub struct PanelDeps {
    pub(crate) session: Mutex<SpeechSession>,
}

impl PanelDeps {
    /// Wire the panel to the host's capabilities.
    ///
    /// `synth` is `None` when the host has no speech subsystem; that is
    /// startup-fatal for the panel and yields
    /// [`PanelError::SpeechUnavailable`] instead of a working panel.
    ///
    /// On success, returns the deps and the receiver for
    /// [`SessionEvent`]s to render.
    pub fn initialize(
        synth: Option<Arc<dyn SpeechSynthesizerPort>>,
        catalog: Arc<dyn VoiceCatalogPort>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), PanelError> {
        let Some(synth) = synth else {
            tracing::warn!("Speech capability missing; interactive controls not initialized");
            return Err(PanelError::SpeechUnavailable(
                "no speech capability provider on this host".into(),
            ));
        };

        let (session, events) = SpeechSession::new(synth, catalog);
        Ok((
            Self {
                session: Mutex::new(session),
            },
            events,
        ))
    }

    /// Lock the underlying session.
    ///
    /// Ops structs use this; adapters should prefer the ops API.
    pub async fn session(&self) -> MutexGuard<'_, SpeechSession> {
        self.session.lock().await
    }
}
