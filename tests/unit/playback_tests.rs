/*!
 * Tests for the speech playback state machine
 */

use std::sync::Arc;

use wikilibs::speech::mock::{MockSpeechService, SpeechCall};
use wikilibs::speech::{PlaybackController, PlaybackState, SpeechService, UtteranceHandle, Voice};

use crate::common;

fn playback() -> (PlaybackController<MockSpeechService>, Arc<MockSpeechService>) {
    let speech = common::english_speech();
    (PlaybackController::new(Arc::clone(&speech), "en"), speech)
}

#[test]
fn test_pauseThenResume_shouldNotSynthesizeAgain() {
    let (mut playback, speech) = playback();

    assert_eq!(playback.start("A dog jumps"), PlaybackState::Speaking);
    let handle = playback.current_utterance();
    assert_eq!(playback.pause(), PlaybackState::Paused);
    assert_eq!(playback.resume(), PlaybackState::Speaking);

    assert_eq!(speech.synthesize_count(), 1);
    assert_eq!(playback.current_utterance(), handle);
}

#[test]
fn test_start_shouldPickVoiceOfConfiguredLanguage() {
    let (mut playback, speech) = playback();

    playback.start("Bonjour? No, hello");

    assert!(speech.calls().contains(&SpeechCall::Synthesize {
        text: "Bonjour? No, hello".to_string(),
        voice: Some("gmw/en".to_string()),
    }));
}

#[test]
fn test_start_withoutMatchingVoice_shouldUseServiceDefault() {
    let speech = Arc::new(MockSpeechService::with_voices(vec![Voice::new("roa/it", "Italian", "it")]));
    let mut playback = PlaybackController::new(Arc::clone(&speech), "en");

    assert_eq!(playback.start("hello"), PlaybackState::Speaking);
    assert!(speech.calls().contains(&SpeechCall::Synthesize {
        text: "hello".to_string(),
        voice: None,
    }));
}

#[test]
fn test_start_withEmptyText_shouldStayIdle() {
    let (mut playback, speech) = playback();

    assert_eq!(playback.start(""), PlaybackState::Idle);
    assert_eq!(playback.start("  \n"), PlaybackState::Idle);
    assert_eq!(speech.synthesize_count(), 0);
}

#[test]
fn test_start_whileSpeaking_shouldTearDownFirst() {
    let (mut playback, speech) = playback();

    playback.start("first");
    playback.pause();
    assert_eq!(playback.start("second"), PlaybackState::Speaking);

    assert_eq!(speech.active_count(), 1);
    let calls = speech.calls();
    let cancel = calls.iter().position(|call| *call == SpeechCall::CancelAll);
    let second = calls
        .iter()
        .position(|call| matches!(call, SpeechCall::Synthesize { text, .. } if text == "second"));
    assert!(cancel.is_some() && cancel < second);
}

#[test]
fn test_pauseAndResume_fromWrongState_shouldBeNoOps() {
    let (mut playback, speech) = playback();

    assert_eq!(playback.pause(), PlaybackState::Idle);
    assert_eq!(playback.resume(), PlaybackState::Idle);

    playback.start("text");
    assert_eq!(playback.resume(), PlaybackState::Speaking);
    playback.pause();
    assert_eq!(playback.pause(), PlaybackState::Paused);

    let pauses = speech
        .calls()
        .iter()
        .filter(|call| matches!(call, SpeechCall::Pause(_)))
        .count();
    assert_eq!(pauses, 1);
}

#[test]
fn test_naturalEnd_shouldReturnToIdle() {
    let (mut playback, speech) = playback();

    playback.start("text");
    let handle = playback.current_utterance().unwrap();
    assert!(speech.finish(handle));

    assert_eq!(playback.on_utterance_end(handle), PlaybackState::Idle);
    assert_eq!(playback.current_utterance(), None);
}

#[test]
fn test_naturalEnd_ofStaleUtterance_shouldBeIgnored() {
    let (mut playback, _speech) = playback();

    playback.start("old");
    let old = playback.current_utterance().unwrap();
    playback.start("new");

    assert_eq!(playback.on_utterance_end(old), PlaybackState::Speaking);
    assert_eq!(playback.on_utterance_end(UtteranceHandle(999)), PlaybackState::Speaking);
}

#[test]
fn test_teardown_fromAnyState_shouldCancelAndIdle() {
    let (mut playback, speech) = playback();

    assert_eq!(playback.teardown(), PlaybackState::Idle);

    playback.start("text");
    playback.pause();
    assert_eq!(playback.teardown(), PlaybackState::Idle);
    assert_eq!(speech.active_count(), 0);

    assert_eq!(playback.resume(), PlaybackState::Idle);
}

#[test]
fn test_drop_shouldSilenceService() {
    let (mut playback, speech) = playback();
    playback.start("text");

    drop(playback);

    assert_eq!(speech.active_count(), 0);
    assert_eq!(speech.calls().last(), Some(&SpeechCall::CancelAll));
}

#[test]
fn test_start_withUnavailableService_shouldStayIdle() {
    let speech = Arc::new(MockSpeechService::unavailable());
    let mut playback = PlaybackController::new(Arc::clone(&speech), "en");

    assert_eq!(playback.start("text"), PlaybackState::Idle);
    assert_eq!(playback.pause(), PlaybackState::Idle);
    assert!(speech.voices().is_empty());
}
