use crate::article::blanks::BlankFillStore;
use crate::article::model::Token;

/// Merge tokens with the player's entries into the text that gets read aloud
///
/// Literal words are emitted as they are, blanks as their stored entry or an
/// empty string, all joined by single spaces.
pub fn render(tokens: &[Token], fills: &BlankFillStore) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| match token {
            Token::Word(word) => word.as_str(),
            Token::Blank => fills.get(index).unwrap_or(""),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
