/*!
 * Article transformation pipeline.
 *
 * - `model`: the `Article` value object and its `Token` sequence
 * - `tokenizer`: intro HTML to tokens, hyperlinks become blanks
 * - `source`: fetches a random article and runs it through the tokenizer
 * - `blanks`: user-supplied replacements for blank positions
 * - `assembler`: merges tokens and replacements into readable text
 */

pub mod assembler;
pub mod blanks;
pub mod model;
pub mod source;
pub mod tokenizer;

pub use assembler::render;
pub use blanks::{BlankFillStore, placeholder_for};
pub use model::{Article, Token};
pub use source::ArticleSource;
pub use tokenizer::{Tokenized, tokenize};
