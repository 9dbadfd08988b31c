//! Transport controls - thin delegates over the speech session plus
//! button-enablement flags for the presentation layer.

use serde::{Deserialize, Serialize};
use ttsdeck_core::{SessionState, SpeechParams, UtteranceEvent, Voice};

use crate::deps::PanelDeps;
use crate::error::PanelError;

/// Button-enablement flags, derivable purely from the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlFlags {
    /// Speak is available whenever nothing is actively playing.
    pub can_speak: bool,
    /// Pause applies only to active playback.
    pub can_pause: bool,
    /// Resume applies only to a paused utterance.
    pub can_resume: bool,
    /// Stop applies to any outstanding utterance.
    pub can_stop: bool,
}

impl ControlFlags {
    /// Flags for a given session state.
    #[must_use]
    pub const fn for_state(state: SessionState) -> Self {
        Self {
            can_speak: !matches!(state, SessionState::Speaking),
            can_pause: matches!(state, SessionState::Speaking),
            can_resume: matches!(state, SessionState::Paused),
            can_stop: !matches!(state, SessionState::Idle),
        }
    }

    /// Everything disabled - the rendering for a host without a speech
    /// capability.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            can_speak: false,
            can_pause: false,
            can_resume: false,
            can_stop: false,
        }
    }
}

/// Session operations handler - thin delegates over the session.
///
/// Borrows from [`PanelDeps`] for the duration of one UI interaction,
/// returning the fresh [`ControlFlags`] so the adapter can re-render
/// its buttons without a second lock.
pub struct SessionOps<'a> {
    deps: &'a PanelDeps,
}

impl<'a> SessionOps<'a> {
    pub const fn new(deps: &'a PanelDeps) -> Self {
        Self { deps }
    }

    /// Submit text for playback.
    pub async fn speak(
        &self,
        text: &str,
        params: SpeechParams,
    ) -> Result<ControlFlags, PanelError> {
        let mut session = self.deps.session().await;
        let outcome = session.speak(text, params).await;
        let flags = ControlFlags::for_state(session.state());
        outcome.map(|()| flags).map_err(PanelError::from)
    }

    /// Pause playback.
    pub async fn pause(&self) -> ControlFlags {
        let mut session = self.deps.session().await;
        session.pause().await;
        ControlFlags::for_state(session.state())
    }

    /// Resume playback.
    pub async fn resume(&self) -> ControlFlags {
        let mut session = self.deps.session().await;
        session.resume().await;
        ControlFlags::for_state(session.state())
    }

    /// Stop playback.
    pub async fn stop(&self) -> ControlFlags {
        let mut session = self.deps.session().await;
        session.stop().await;
        ControlFlags::for_state(session.state())
    }

    /// Apply one provider lifecycle signal.
    pub async fn apply_utterance_event(&self, event: &UtteranceEvent) -> ControlFlags {
        let mut session = self.deps.session().await;
        session.handle_utterance_event(event);
        ControlFlags::for_state(session.state())
    }

    /// Re-enumerate the voice catalog.
    pub async fn refresh_voices(&self) {
        self.deps.session().await.refresh_voices().await;
    }

    /// Select a voice by catalog index, or `None` for the default.
    pub async fn select_voice(&self, index: Option<usize>) {
        self.deps.session().await.select_voice(index).await;
    }

    /// Forward a host visibility change.
    pub async fn visibility_changed(&self, visible: bool) -> ControlFlags {
        let mut session = self.deps.session().await;
        session.host_visibility_changed(visible).await;
        ControlFlags::for_state(session.state())
    }

    /// Forward a raw input change for character-count feedback.
    pub async fn input_changed(&self, text: &str) {
        self.deps.session().await.input_changed(text);
    }

    /// Current button flags.
    pub async fn flags(&self) -> ControlFlags {
        ControlFlags::for_state(self.deps.session().await.state())
    }

    /// Current voice catalog.
    pub async fn voices(&self) -> Vec<Voice> {
        self.deps.session().await.voices().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::always;
    use ttsdeck_core::{
        EmptyCatalog, SpeechSynthesizerPort, SynthesizerError, UtteranceHandle, UtteranceRequest,
    };

    mock! {
        Synth {}

        #[async_trait]
        impl SpeechSynthesizerPort for Synth {
            async fn submit(
                &self,
                request: UtteranceRequest,
            ) -> Result<UtteranceHandle, SynthesizerError>;
            async fn cancel_all(&self);
            async fn pause(&self);
            async fn resume(&self);
        }
    }

    fn panel(synth: MockSynth) -> PanelDeps {
        let (deps, _events) =
            PanelDeps::initialize(Some(Arc::new(synth)), Arc::new(EmptyCatalog)).unwrap();
        deps
    }

    #[test]
    fn flags_follow_session_state() {
        let idle = ControlFlags::for_state(SessionState::Idle);
        assert!(idle.can_speak && !idle.can_pause && !idle.can_resume && !idle.can_stop);

        let speaking = ControlFlags::for_state(SessionState::Speaking);
        assert!(!speaking.can_speak && speaking.can_pause);
        assert!(!speaking.can_resume && speaking.can_stop);

        let paused = ControlFlags::for_state(SessionState::Paused);
        assert!(paused.can_speak && !paused.can_pause);
        assert!(paused.can_resume && paused.can_stop);
    }

    #[tokio::test]
    async fn speak_delegates_exactly_once() {
        let mut synth = MockSynth::new();
        synth
            .expect_submit()
            .with(always())
            .times(1)
            .returning(|_| Ok(UtteranceHandle::new()));

        let deps = panel(synth);
        let ops = SessionOps::new(&deps);

        let flags = ops.speak("hello", SpeechParams::default()).await.unwrap();
        assert!(!flags.can_speak);
        assert!(flags.can_pause && flags.can_stop);
    }

    #[tokio::test]
    async fn empty_input_never_submits() {
        let mut synth = MockSynth::new();
        synth.expect_submit().times(0);

        let deps = panel(synth);
        let ops = SessionOps::new(&deps);

        let err = ops.speak("   ", SpeechParams::default()).await.unwrap_err();
        assert!(matches!(err, PanelError::ValidationFailed(_)));
        assert_eq!(ops.flags().await, ControlFlags::for_state(SessionState::Idle));
    }

    #[tokio::test]
    async fn guarded_controls_never_touch_the_provider_when_idle() {
        let mut synth = MockSynth::new();
        synth.expect_pause().times(0);
        synth.expect_resume().times(0);
        synth.expect_cancel_all().times(0);

        let deps = panel(synth);
        let ops = SessionOps::new(&deps);

        assert_eq!(ops.pause().await, ControlFlags::for_state(SessionState::Idle));
        assert_eq!(ops.resume().await, ControlFlags::for_state(SessionState::Idle));
        assert_eq!(ops.stop().await, ControlFlags::for_state(SessionState::Idle));
    }
}
