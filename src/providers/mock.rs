/*!
 * Mock article provider for testing.
 *
 * This module provides a provider that simulates the remote article service:
 * - `MockArticleProvider::working()` - Always returns the configured article
 * - `MockArticleProvider::no_candidates()` - The random generator yields nothing
 * - `MockArticleProvider::missing_content()` - A candidate without a body
 * - `MockArticleProvider::failing()` - Every request errors
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{ArticleCandidate, ArticleProvider, Thumbnail};

/// Intro HTML served by default: two paragraphs, two links, ten literal tokens
pub const SAMPLE_INTRO_HTML: &str = "<div class=\"mw-parser-output\">\
    <p>The <b>red fox</b> is a <a href=\"/wiki/Mammal\">mammal</a>.</p>\
    <p>It eats <a href=\"/wiki/Vole\">small voles</a> at night.</p>\
    </div>";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Random generator returns zero candidates
    NoCandidates,
    /// Candidate exists but the body is absent
    MissingContent,
    /// Candidate exists but the body is an empty string
    EmptyContent,
    /// Every request fails with an API error
    Failing,
    /// Succeeds after a delay (for race testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing the article pipeline
#[derive(Debug, Clone)]
pub struct MockArticleProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Candidate returned by the random generator
    candidate: ArticleCandidate,
    /// Body returned for the candidate
    html: String,
    /// Random-generator requests made, shared between clones
    random_requests: Arc<AtomicUsize>,
    /// Intro requests made, shared between clones
    intro_requests: Arc<AtomicUsize>,
}

impl MockArticleProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            candidate: ArticleCandidate {
                page_id: 4242,
                ns: 0,
                title: "Red fox".to_string(),
                thumbnail: Some(Thumbnail {
                    source: "https://upload.wikimedia.org/red_fox.jpg".to_string(),
                    width: 300,
                    height: 200,
                }),
            },
            html: SAMPLE_INTRO_HTML.to_string(),
            random_requests: Arc::new(AtomicUsize::new(0)),
            intro_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn no_candidates() -> Self {
        Self::new(MockBehavior::NoCandidates)
    }

    pub fn missing_content() -> Self {
        Self::new(MockBehavior::MissingContent)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Serve a different intro body
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Serve a different candidate
    pub fn with_candidate(mut self, page_id: u64, title: impl Into<String>, thumbnail: Option<&str>) -> Self {
        self.candidate = ArticleCandidate {
            page_id,
            ns: 0,
            title: title.into(),
            thumbnail: thumbnail.map(|source| Thumbnail {
                source: source.to_string(),
                width: 0,
                height: 0,
            }),
        };
        self
    }

    pub fn random_request_count(&self) -> usize {
        self.random_requests.load(Ordering::SeqCst)
    }

    pub fn intro_request_count(&self) -> usize {
        self.intro_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleProvider for MockArticleProvider {
    async fn random_articles(&self, namespace: i32, limit: u32) -> Result<Vec<ArticleCandidate>, ProviderError> {
        self.random_requests.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 503,
                message: "Simulated provider failure".to_string(),
            }),
            MockBehavior::NoCandidates => Ok(Vec::new()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.candidates(namespace, limit))
            }
            _ => Ok(self.candidates(namespace, limit)),
        }
    }

    async fn intro_html(&self, page_id: u64) -> Result<Option<String>, ProviderError> {
        self.intro_requests.fetch_add(1, Ordering::SeqCst);

        if page_id != self.candidate.page_id {
            return Ok(None);
        }

        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection reset".to_string())),
            MockBehavior::MissingContent => Ok(None),
            MockBehavior::EmptyContent => Ok(Some(String::new())),
            _ => Ok(Some(self.html.clone())),
        }
    }
}

impl MockArticleProvider {
    fn candidates(&self, namespace: i32, limit: u32) -> Vec<ArticleCandidate> {
        if namespace != self.candidate.ns || limit == 0 {
            return Vec::new();
        }
        vec![self.candidate.clone()]
    }
}
