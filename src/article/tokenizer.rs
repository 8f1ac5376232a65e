/*!
 * Turns an article's introductory HTML into a word sequence with blanks.
 *
 * Only `<p>` elements inside the parser output container are read. Every
 * hyperlink inside those paragraphs becomes exactly one blank, whatever the
 * length of its text. Blank positions are recorded while walking the tree, so
 * no placeholder string is ever mixed into the article text and nothing an
 * article says can be mistaken for a blank.
 */

use kuchikikiki::traits::TendrilSink;
use kuchikikiki::{NodeData, NodeRef};
use log::debug;

use crate::article::model::{Token, count_blanks};

/// Class of the element MediaWiki wraps rendered article content in
pub const CONTENT_CONTAINER_CLASS: &str = "mw-parser-output";

const PARAGRAPH_SELECTOR: &str = ".mw-parser-output p";

/// Tokenizer output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub blank_count: usize,
}

/// Tokenize intro HTML. Never fails: html5ever repairs malformed markup
/// while parsing, so broken input still yields whatever paragraphs it holds.
pub fn tokenize(html: &str) -> Tokenized {
    let document = kuchikikiki::parse_html().one(html);
    let mut builder = TokenBuilder::default();

    // the selector is a constant and always compiles
    let paragraphs: Vec<NodeRef> = document
        .select(PARAGRAPH_SELECTOR)
        .into_iter()
        .flatten()
        .map(|paragraph| paragraph.as_node().clone())
        .collect();
    debug!("Tokenizing {} paragraph(s)", paragraphs.len());

    for paragraph in &paragraphs {
        builder.walk(paragraph);
        // paragraphs never share a word
        builder.flush();
    }

    builder.finish()
}

#[derive(Default)]
struct TokenBuilder {
    tokens: Vec<Token>,
    // text seen since the last word boundary that cannot be split yet,
    // because the next text node may continue the current word
    pending: String,
}

impl TokenBuilder {
    fn walk(&mut self, node: &NodeRef) {
        for child in node.children() {
            match child.data() {
                NodeData::Text(text) => self.pending.push_str(&text.borrow()),
                NodeData::Element(element) => match &*element.name.local {
                    "a" => self.blank(),
                    "script" | "style" | "template" => {}
                    "br" => self.pending.push(' '),
                    _ => self.walk(&child),
                },
                _ => {}
            }
        }
    }

    fn blank(&mut self) {
        self.flush();
        self.tokens.push(Token::Blank);
    }

    fn flush(&mut self) {
        self.tokens
            .extend(self.pending.split_whitespace().filter_map(Token::word));
        self.pending.clear();
    }

    fn finish(mut self) -> Tokenized {
        self.flush();
        let blank_count = count_blanks(&self.tokens);
        Tokenized {
            tokens: self.tokens,
            blank_count,
        }
    }
}
