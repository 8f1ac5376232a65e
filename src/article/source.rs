use log::{debug, info};

use crate::article::model::Article;
use crate::article::tokenizer::{Tokenized, tokenize};
use crate::errors::ArticleError;
use crate::providers::ArticleProvider;

/// Namespace holding encyclopedia articles proper (no talk pages or categories)
pub const ARTICLE_NAMESPACE: i32 = 0;

/// Fetches one random article and turns it into an [`Article`]
///
/// There are no retries here; a failed fetch is reported and the caller
/// decides whether to ask again.
#[derive(Debug)]
pub struct ArticleSource<P: ArticleProvider> {
    provider: P,
    namespace: i32,
}

impl<P: ArticleProvider> ArticleSource<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            namespace: ARTICLE_NAMESPACE,
        }
    }

    /// Draw from a different namespace
    pub fn with_namespace(mut self, namespace: i32) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn fetch_random_article(&self) -> Result<Article, ArticleError> {
        let candidate = self
            .provider
            .random_articles(self.namespace, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(ArticleError::NoArticleFound)?;
        debug!("Random article: \"{}\" ({})", candidate.title, candidate.page_id);

        let html = self
            .provider
            .intro_html(candidate.page_id)
            .await?
            .filter(|html| !html.trim().is_empty())
            .ok_or_else(|| ArticleError::ArticleContentUnavailable {
                page_id: candidate.page_id,
                title: candidate.title.clone(),
            })?;

        let Tokenized { tokens, blank_count } = tokenize(&html);
        info!(
            "Loaded \"{}\": {} words, {} blanks",
            candidate.title,
            tokens.len(),
            blank_count
        );

        Ok(Article::new(
            candidate.page_id,
            candidate.title,
            tokens,
            candidate.thumbnail.map(|thumbnail| thumbnail.source),
        ))
    }
}
