use serde::Serialize;

/// One position in an article's word sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    /// A literal word; never empty
    Word(String),
    /// A position the player has to fill in
    Blank,
}

impl Token {
    /// Create a literal token, returning `None` for text that trims to nothing
    pub fn word(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Word(trimmed.to_string()))
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// The literal text, if any
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(text) => Some(text),
            Self::Blank => None,
        }
    }
}

/// A random article turned into a fill-in-the-blank game
///
/// Built once per fetch and never mutated afterwards; a new fetch replaces it
/// wholesale. The blank count is derived from the tokens at construction so it
/// cannot drift from them. Serialize-only: an article is only ever built
/// through [`Article::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    page_id: u64,
    title: String,
    tokens: Vec<Token>,
    blank_count: usize,
    image_url: Option<String>,
}

impl Article {
    pub fn new(page_id: u64, title: impl Into<String>, tokens: Vec<Token>, image_url: Option<String>) -> Self {
        let blank_count = count_blanks(&tokens);
        Self {
            page_id,
            title: title.into(),
            tokens,
            blank_count,
            image_url,
        }
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn blank_count(&self) -> usize {
        self.blank_count
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Indices of every blank token, in order
    pub fn blank_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is_blank())
            .map(|(index, _)| index)
    }

    /// Title shown by hosts, e.g. in a window or tab caption
    pub fn display_title(&self) -> String {
        format!("{} - Wikilibs", self.title)
    }
}

/// Number of blank tokens in a sequence
pub fn count_blanks(tokens: &[Token]) -> usize {
    tokens.iter().filter(|token| token.is_blank()).count()
}
