use rand::Rng;
use rand::seq::IndexedRandom;

use crate::language_utils::language_codes_match;
use crate::speech::Voice;

/// Pick a voice uniformly at random among those speaking `language`
///
/// Returns `None` when no voice matches, in which case the service default is used.
pub fn select_voice<'a, R: Rng + ?Sized>(voices: &'a [Voice], language: &str, rng: &mut R) -> Option<&'a Voice> {
    let matching: Vec<&Voice> = voices
        .iter()
        .filter(|voice| language_codes_match(&voice.language, language))
        .collect();
    matching.choose(rng).copied()
}
