use std::collections::BTreeMap;

use crate::article::model::{Article, Token};
use crate::errors::SessionError;

/// Hints shown in empty blanks, cycled by token index
const PLACEHOLDERS: [&str; 3] = ["adjective", "verb", "noun"];

/// Hint for the blank at `index`
pub fn placeholder_for(index: usize) -> &'static str {
    PLACEHOLDERS[index % PLACEHOLDERS.len()]
}

/// The player's replacement text for each blank, keyed by token index
///
/// Indices are positions in the full token sequence, not blank ordinals.
/// Keys only ever name blank tokens of the article the store was filled
/// against; writes anywhere else are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlankFillStore {
    entries: BTreeMap<usize, String>,
}

impl BlankFillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text` for the blank at `index` of `tokens`
    pub fn set(&mut self, tokens: &[Token], index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        match tokens.get(index) {
            None => Err(SessionError::IndexOutOfRange {
                index,
                len: tokens.len(),
            }),
            Some(Token::Word(_)) => Err(SessionError::NotABlank { index }),
            Some(Token::Blank) => {
                self.entries.insert(index, text.into());
                Ok(())
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    /// Number of entries, including empty ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of blanks holding something other than whitespace
    pub fn filled_count(&self) -> usize {
        self.entries
            .values()
            .filter(|text| !text.trim().is_empty())
            .count()
    }

    /// Every blank of `article` has a non-empty entry
    pub fn is_complete(&self, article: &Article) -> bool {
        self.filled_count() == article.blank_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|(index, text)| (*index, text.as_str()))
    }
}
