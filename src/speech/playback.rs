/*!
 * Playback state machine over a speech service.
 *
 * | From             | Trigger           | To       |
 * |------------------|-------------------|----------|
 * | Idle             | start(text)       | Speaking |
 * | Speaking         | pause             | Paused   |
 * | Paused           | resume            | Speaking |
 * | Speaking/Paused  | utterance ended   | Idle     |
 * | any              | teardown          | Idle     |
 *
 * Any other trigger leaves the state untouched. Starting while an utterance
 * is outstanding tears it down first, so at most one utterance exists.
 */

use std::sync::Arc;

use log::{debug, info, warn};

use crate::speech::voice::select_voice;
use crate::speech::{SpeechService, UtteranceHandle};

/// Where playback currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// Drives one speech service through idle, speaking and paused
///
/// Dropping the controller cancels whatever the service is still playing.
pub struct PlaybackController<S: SpeechService> {
    service: Arc<S>,
    language: String,
    state: PlaybackState,
    current: Option<UtteranceHandle>,
}

impl<S: SpeechService> PlaybackController<S> {
    /// Create an idle controller choosing voices that speak `language`
    pub fn new(service: Arc<S>, language: impl Into<String>) -> Self {
        Self {
            service,
            language: language.into(),
            state: PlaybackState::Idle,
            current: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Handle of the outstanding utterance, if any
    pub fn current_utterance(&self) -> Option<UtteranceHandle> {
        self.current
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Start reading `text` aloud
    ///
    /// Blank text is ignored. An outstanding utterance is cancelled first.
    /// If the service refuses to start, playback stays idle.
    pub fn start(&mut self, text: &str) -> PlaybackState {
        if text.trim().is_empty() {
            debug!("Ignoring start with empty text");
            return self.state;
        }

        if self.state != PlaybackState::Idle {
            self.teardown();
        }

        let voices = self.service.voices();
        let voice = select_voice(&voices, &self.language, &mut rand::rng());
        match voice {
            Some(voice) => debug!("Speaking with voice {} ({})", voice.name, voice.language),
            None => debug!("No '{}' voice among {}, using the default voice", self.language, voices.len()),
        }

        match self.service.synthesize(text, voice) {
            Ok(handle) => {
                info!("Reading {} characters aloud ({})", text.len(), handle);
                self.current = Some(handle);
                self.state = PlaybackState::Speaking;
            }
            Err(e) => warn!("Could not start speech: {}", e),
        }
        self.state
    }

    pub fn pause(&mut self) -> PlaybackState {
        if let (PlaybackState::Speaking, Some(handle)) = (self.state, self.current) {
            match self.service.pause(handle) {
                Ok(()) => self.state = PlaybackState::Paused,
                Err(e) => warn!("Could not pause speech: {}", e),
            }
        }
        self.state
    }

    pub fn resume(&mut self) -> PlaybackState {
        if let (PlaybackState::Paused, Some(handle)) = (self.state, self.current) {
            match self.service.resume(handle) {
                Ok(()) => self.state = PlaybackState::Speaking,
                Err(e) => warn!("Could not resume speech: {}", e),
            }
        }
        self.state
    }

    /// The service reports that `handle` finished playing
    ///
    /// Reports for anything but the outstanding utterance are stale and ignored.
    pub fn on_utterance_end(&mut self, handle: UtteranceHandle) -> PlaybackState {
        if self.current == Some(handle) {
            debug!("{} finished", handle);
            self.current = None;
            self.state = PlaybackState::Idle;
        } else {
            debug!("Ignoring end of stale {}", handle);
        }
        self.state
    }

    /// Cancel everything the service has queued and return to idle
    pub fn teardown(&mut self) -> PlaybackState {
        self.service.cancel_all();
        self.current = None;
        self.state = PlaybackState::Idle;
        self.state
    }
}

impl<S: SpeechService> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
