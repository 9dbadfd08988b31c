//! Integration tests for the `SpeechSession` state machine.
//!
//! These tests drive the session through its transitions using a
//! scripted fake synthesizer and a fixed catalog. No real speech
//! engine or audio hardware is required; lifecycle signals are fed in
//! by hand exactly as an adapter would deliver them.
//!
//! # What is tested
//!
//! - Non-empty `speak` enters Speaking before any provider signal
//! - Empty/whitespace `speak` leaves Idle with zero submits
//! - pause/resume/stop guards and idempotence
//! - speak-while-speaking cancels before resubmitting
//! - Stale signals from a superseded handle are discarded
//! - Completion and provider-error paths and their status messages
//! - Catalog replacement re-selects by identity or reverts to default
//! - Courtesy pause when the host loses visibility

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ttsdeck_core::{
    LifecycleSignal, SessionError, SessionEvent, SessionState, SpeechParams, SpeechSession,
    SpeechSynthesizerPort, StatusLevel, SynthesizerError, UtteranceEvent, UtteranceHandle,
    UtteranceRequest, Voice, VoiceCatalogPort, VoiceSelection,
};

// ── Fake ports ─────────────────────────────────────────────────────

/// Calls recorded by the fake synthesizer, in order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Submit(String),
    CancelAll,
    Pause,
    Resume,
}

/// A synthesizer that records every call and mints handles without
/// producing audio. Lifecycle signals are the test's job.
#[derive(Default)]
struct ScriptedSynth {
    calls: Mutex<Vec<Call>>,
    last_handle: Mutex<Option<UtteranceHandle>>,
    fail_submit: bool,
}

impl ScriptedSynth {
    fn failing() -> Self {
        Self {
            fail_submit: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn last_handle(&self) -> UtteranceHandle {
        self.last_handle.lock().unwrap().expect("no submit recorded")
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ScriptedSynth {
    async fn submit(
        &self,
        request: UtteranceRequest,
    ) -> Result<UtteranceHandle, SynthesizerError> {
        self.calls.lock().unwrap().push(Call::Submit(request.text));
        if self.fail_submit {
            return Err(SynthesizerError::SubmitFailed("engine said no".into()));
        }
        let handle = UtteranceHandle::new();
        *self.last_handle.lock().unwrap() = Some(handle);
        Ok(handle)
    }

    async fn cancel_all(&self) {
        self.calls.lock().unwrap().push(Call::CancelAll);
    }

    async fn pause(&self) {
        self.calls.lock().unwrap().push(Call::Pause);
    }

    async fn resume(&self) {
        self.calls.lock().unwrap().push(Call::Resume);
    }
}

/// A catalog returning a fixed voice list.
struct FixedCatalog {
    voices: Mutex<Vec<Voice>>,
}

impl FixedCatalog {
    fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices: Mutex::new(voices),
        }
    }

    fn replace(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap() = voices;
    }
}

#[async_trait]
impl VoiceCatalogPort for FixedCatalog {
    async fn list_voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn new_session(
    synth: &Arc<ScriptedSynth>,
) -> (
    SpeechSession,
    tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
) {
    SpeechSession::new(
        Arc::clone(synth) as Arc<dyn SpeechSynthesizerPort>,
        Arc::new(ttsdeck_core::EmptyCatalog),
    )
}

/// Drain all pending events from the receiver.
fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

/// The state transitions among the drained events, as (previous, current).
fn transitions(events: &[SessionEvent]) -> Vec<(SessionState, SessionState)> {
    events
        .iter()
        .filter_map(|ev| match ev {
            SessionEvent::StateChanged { previous, current } => Some((*previous, *current)),
            _ => None,
        })
        .collect()
}

/// The last status message among the drained events.
fn last_status(events: &[SessionEvent]) -> Option<(String, StatusLevel)> {
    events
        .iter()
        .rev()
        .find_map(|ev| match ev {
            SessionEvent::Status { text, level } => Some((text.clone(), *level)),
            _ => None,
        })
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn speak_enters_speaking_before_any_signal() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, mut rx) = new_session(&synth);

    session
        .speak("Hello world", SpeechParams::default())
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Speaking);
    assert_eq!(
        transitions(&drain(&mut rx)),
        vec![(SessionState::Idle, SessionState::Speaking)]
    );
    assert_eq!(synth.calls(), vec![Call::Submit("Hello world".into())]);
}

#[tokio::test]
async fn empty_and_whitespace_input_never_reach_the_provider() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, mut rx) = new_session(&synth);
    drain(&mut rx); // discard the ready status

    for input in ["", "   ", "\n\t  "] {
        let err = session
            .speak(input, SpeechParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyText));
        assert_eq!(session.state(), SessionState::Idle);

        let events = drain(&mut rx);
        assert!(transitions(&events).is_empty());
        let (text, level) = last_status(&events).unwrap();
        assert_eq!(level, StatusLevel::Error);
        assert!(text.contains("enter some text"));
    }

    assert!(synth.calls().is_empty());
}

#[tokio::test]
async fn hello_world_round_trip() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, mut rx) = new_session(&synth);

    session
        .speak("Hello world", SpeechParams::default())
        .await
        .unwrap();
    session.handle_utterance_event(&UtteranceEvent {
        handle: synth.last_handle(),
        signal: LifecycleSignal::Ended,
    });

    assert_eq!(session.state(), SessionState::Idle);
    let events = drain(&mut rx);
    assert_eq!(
        transitions(&events),
        vec![
            (SessionState::Idle, SessionState::Speaking),
            (SessionState::Speaking, SessionState::Idle),
        ]
    );
    let (text, level) = last_status(&events).unwrap();
    assert_eq!(level, StatusLevel::Success);
    assert_eq!(text, "Speech completed successfully");
}

#[tokio::test]
async fn pause_and_resume_are_guarded_and_idempotent() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, _rx) = new_session(&synth);

    // Not speaking: both are no-ops.
    session.pause().await;
    session.resume().await;
    assert_eq!(session.state(), SessionState::Idle);
    assert!(synth.calls().is_empty());

    session
        .speak("something", SpeechParams::default())
        .await
        .unwrap();

    // resume() while Speaking is a no-op.
    session.resume().await;
    assert_eq!(session.state(), SessionState::Speaking);

    session.pause().await;
    assert_eq!(session.state(), SessionState::Paused);
    // Second pause() is a no-op.
    session.pause().await;
    assert_eq!(session.state(), SessionState::Paused);

    session.resume().await;
    assert_eq!(session.state(), SessionState::Speaking);

    assert_eq!(
        synth.calls(),
        vec![
            Call::Submit("something".into()),
            Call::Pause,
            Call::Resume,
        ]
    );
}

#[tokio::test]
async fn new_speak_cancels_outstanding_request_first() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, _rx) = new_session(&synth);

    session
        .speak("first", SpeechParams::default())
        .await
        .unwrap();
    let first = synth.last_handle();

    session
        .speak("second", SpeechParams::default())
        .await
        .unwrap();
    let second = synth.last_handle();

    assert_eq!(
        synth.calls(),
        vec![
            Call::Submit("first".into()),
            Call::CancelAll,
            Call::Submit("second".into()),
        ]
    );

    // The first utterance's late Ended must not touch the new session.
    session.handle_utterance_event(&UtteranceEvent {
        handle: first,
        signal: LifecycleSignal::Ended,
    });
    assert_eq!(session.state(), SessionState::Speaking);

    session.handle_utterance_event(&UtteranceEvent {
        handle: second,
        signal: LifecycleSignal::Ended,
    });
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn stop_is_immediate_and_stale_ended_is_ignored() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, mut rx) = new_session(&synth);

    session
        .speak("to be stopped", SpeechParams::default())
        .await
        .unwrap();
    let handle = synth.last_handle();

    session.stop().await;
    assert_eq!(session.state(), SessionState::Idle);
    let (text, level) = last_status(&drain(&mut rx)).unwrap();
    assert_eq!(level, StatusLevel::Neutral);
    assert_eq!(text, "Speech stopped");

    // The cancelled handle's Ended arrives afterwards: no state change,
    // no status.
    session.handle_utterance_event(&UtteranceEvent {
        handle,
        signal: LifecycleSignal::Ended,
    });
    assert_eq!(session.state(), SessionState::Idle);
    assert!(drain(&mut rx).is_empty());

    // stop() when already Idle is a no-op.
    session.stop().await;
    assert_eq!(
        synth.calls(),
        vec![Call::Submit("to be stopped".into()), Call::CancelAll]
    );
}

#[tokio::test]
async fn provider_error_surfaces_reason_verbatim() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, mut rx) = new_session(&synth);

    session
        .speak("doomed", SpeechParams::default())
        .await
        .unwrap();
    session.handle_utterance_event(&UtteranceEvent {
        handle: synth.last_handle(),
        signal: LifecycleSignal::Errored("audio device lost".into()),
    });

    assert_eq!(session.state(), SessionState::Idle);
    let (text, level) = last_status(&drain(&mut rx)).unwrap();
    assert_eq!(level, StatusLevel::Error);
    assert_eq!(text, "Speech synthesis error: audio device lost");
}

#[tokio::test]
async fn failed_submit_returns_to_idle_with_error_status() {
    let synth = Arc::new(ScriptedSynth::failing());
    let (mut session, mut rx) = new_session(&synth);

    let err = session
        .speak("anything", SpeechParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Synthesizer(_)));
    assert_eq!(session.state(), SessionState::Idle);

    let (text, level) = last_status(&drain(&mut rx)).unwrap();
    assert_eq!(level, StatusLevel::Error);
    assert!(text.contains("engine said no"));
}

#[tokio::test]
async fn catalog_replacement_reselects_by_identity() {
    let synth = Arc::new(ScriptedSynth::default());
    let catalog = Arc::new(FixedCatalog::new(vec![
        Voice::new("english", "en-GB", true),
        Voice::new("afrikaans", "af", false),
    ]));
    let (mut session, _rx) = SpeechSession::new(
        Arc::clone(&synth) as Arc<dyn SpeechSynthesizerPort>,
        Arc::clone(&catalog) as Arc<dyn VoiceCatalogPort>,
    );

    session.refresh_voices().await;
    session.select_voice(Some(1)).await;
    assert_eq!(
        session.selection().as_voice().map(|v| v.name.as_str()),
        Some("afrikaans")
    );

    // The selected voice survives a reordering replacement.
    catalog.replace(vec![
        Voice::new("afrikaans", "af", false),
        Voice::new("english", "en-GB", true),
    ]);
    session.refresh_voices().await;
    assert_eq!(
        session.selection().as_voice().map(|v| v.name.as_str()),
        Some("afrikaans")
    );

    // It vanishing reverts the selection to the provider default.
    catalog.replace(vec![Voice::new("english", "en-GB", true)]);
    session.refresh_voices().await;
    assert_eq!(*session.selection(), VoiceSelection::Unspecified);
}

#[tokio::test]
async fn out_of_range_voice_index_falls_back_to_default() {
    let synth = Arc::new(ScriptedSynth::default());
    let catalog = Arc::new(FixedCatalog::new(vec![Voice::new(
        "english", "en-GB", true,
    )]));
    let (mut session, _rx) = SpeechSession::new(
        Arc::clone(&synth) as Arc<dyn SpeechSynthesizerPort>,
        catalog as Arc<dyn VoiceCatalogPort>,
    );

    session.refresh_voices().await;
    session.select_voice(Some(42)).await;
    assert_eq!(*session.selection(), VoiceSelection::Unspecified);
    assert!(synth.calls().is_empty());
}

#[tokio::test]
async fn changing_voice_mid_utterance_stops_playback() {
    let synth = Arc::new(ScriptedSynth::default());
    let catalog = Arc::new(FixedCatalog::new(vec![Voice::new(
        "english", "en-GB", true,
    )]));
    let (mut session, _rx) = SpeechSession::new(
        Arc::clone(&synth) as Arc<dyn SpeechSynthesizerPort>,
        catalog as Arc<dyn VoiceCatalogPort>,
    );
    session.refresh_voices().await;

    session
        .speak("interrupted", SpeechParams::default())
        .await
        .unwrap();
    session.select_voice(Some(0)).await;

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(
        synth.calls(),
        vec![Call::Submit("interrupted".into()), Call::CancelAll]
    );
}

#[tokio::test]
async fn hidden_host_pauses_an_active_utterance() {
    let synth = Arc::new(ScriptedSynth::default());
    let (mut session, _rx) = new_session(&synth);

    // Hidden while idle: nothing happens.
    session.host_visibility_changed(false).await;
    assert_eq!(session.state(), SessionState::Idle);

    session
        .speak("background", SpeechParams::default())
        .await
        .unwrap();
    session.host_visibility_changed(false).await;
    assert_eq!(session.state(), SessionState::Paused);

    // Returning visibility does not auto-resume.
    session.host_visibility_changed(true).await;
    assert_eq!(session.state(), SessionState::Paused);
}

#[tokio::test]
async fn input_change_emits_char_count_feedback() {
    use ttsdeck_core::CharCountTier;

    let synth = Arc::new(ScriptedSynth::default());
    let (session, mut rx) = new_session(&synth);
    drain(&mut rx);

    session.input_changed(&"x".repeat(4501));
    match drain(&mut rx).as_slice() {
        [SessionEvent::CharCount { count, tier }] => {
            assert_eq!(*count, 4501);
            assert_eq!(*tier, CharCountTier::Critical);
        }
        other => panic!("unexpected events: {other:?}"),
    }
}
