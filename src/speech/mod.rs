/*!
 * Speech playback.
 *
 * The synthesizer is an injected capability (`SpeechService`) so playback can
 * run against a real engine or a recording double:
 * - `playback`: the idle / speaking / paused state machine
 * - `voice`: random voice choice filtered by language
 * - `espeak`: espeak-ng child processes (unix)
 * - `mock`: records every call, for tests
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SpeechError;

/// A voice offered by a speech service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Identifier passed back to the service when synthesizing
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Declared language tag, e.g. `en` or `en-US`
    pub language: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
        }
    }
}

/// Identifies one utterance handed to a speech service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceHandle(pub u64);

impl fmt::Display for UtteranceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance#{}", self.0)
    }
}

/// Notifications a speech service sends back asynchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The utterance played to its end
    Ended(UtteranceHandle),
}

/// A text-to-speech engine
///
/// Calls are fire-and-forget: `synthesize` starts audio and returns at once,
/// completion is reported later as [`SpeechEvent::Ended`] through whatever
/// channel the implementation was built with.
pub trait SpeechService: Send + Sync {
    /// Voices currently available; may be empty
    fn voices(&self) -> Vec<Voice>;

    /// Begin speaking `text`, with the default voice when `voice` is `None`
    fn synthesize(&self, text: &str, voice: Option<&Voice>) -> Result<UtteranceHandle, SpeechError>;

    fn pause(&self, handle: UtteranceHandle) -> Result<(), SpeechError>;

    fn resume(&self, handle: UtteranceHandle) -> Result<(), SpeechError>;

    /// Drop every queued or playing utterance; a no-op when nothing plays
    fn cancel_all(&self);
}

#[cfg(unix)]
pub mod espeak;
pub mod mock;
pub mod playback;
pub mod voice;

pub use playback::{PlaybackController, PlaybackState};
pub use voice::select_voice;
