/*!
 * Mock speech service for testing.
 *
 * Records every call instead of producing audio:
 * - `MockSpeechService::new()` - No voices, every call succeeds
 * - `MockSpeechService::with_voices(..)` - Offers the given voices
 * - `MockSpeechService::unavailable()` - Refuses to synthesize
 */

use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::SpeechError;
use crate::speech::{SpeechService, UtteranceHandle, Voice};

/// A recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCall {
    Synthesize { text: String, voice: Option<String> },
    Pause(UtteranceHandle),
    Resume(UtteranceHandle),
    CancelAll,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<SpeechCall>,
    active: Vec<UtteranceHandle>,
    next_id: u64,
}

/// Speech service double; clones share their recording
#[derive(Debug, Clone, Default)]
pub struct MockSpeechService {
    voices: Vec<Voice>,
    unavailable: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockSpeechService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.state.lock().calls.clone()
    }

    pub fn synthesize_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, SpeechCall::Synthesize { .. }))
            .count()
    }

    /// Utterances started and neither finished nor cancelled
    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Simulate the engine reaching the end of `handle`
    pub fn finish(&self, handle: UtteranceHandle) -> bool {
        let mut state = self.state.lock();
        let before = state.active.len();
        state.active.retain(|active| *active != handle);
        state.active.len() != before
    }
}

impl SpeechService for MockSpeechService {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn synthesize(&self, text: &str, voice: Option<&Voice>) -> Result<UtteranceHandle, SpeechError> {
        let mut state = self.state.lock();
        state.calls.push(SpeechCall::Synthesize {
            text: text.to_string(),
            voice: voice.map(|voice| voice.id.clone()),
        });

        if self.unavailable {
            return Err(SpeechError::Unavailable("Simulated missing synthesizer".to_string()));
        }

        state.next_id += 1;
        let handle = UtteranceHandle(state.next_id);
        state.active.push(handle);
        Ok(handle)
    }

    fn pause(&self, handle: UtteranceHandle) -> Result<(), SpeechError> {
        let mut state = self.state.lock();
        state.calls.push(SpeechCall::Pause(handle));
        if state.active.contains(&handle) {
            Ok(())
        } else {
            Err(SpeechError::UnknownUtterance(handle.0))
        }
    }

    fn resume(&self, handle: UtteranceHandle) -> Result<(), SpeechError> {
        let mut state = self.state.lock();
        state.calls.push(SpeechCall::Resume(handle));
        if state.active.contains(&handle) {
            Ok(())
        } else {
            Err(SpeechError::UnknownUtterance(handle.0))
        }
    }

    fn cancel_all(&self) {
        let mut state = self.state.lock();
        state.calls.push(SpeechCall::CancelAll);
        state.active.clear();
    }
}
