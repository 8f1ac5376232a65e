/*!
 * Clients for the remote article service.
 *
 * - `wikipedia`: MediaWiki action API client
 * - `mock`: scripted provider for tests and offline runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Thumbnail metadata attached to a random article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL
    pub source: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Identifying metadata of a randomly chosen article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleCandidate {
    /// Page id used to request the article body
    #[serde(rename = "pageid")]
    pub page_id: u64,
    /// Namespace the page lives in
    #[serde(default)]
    pub ns: i32,
    /// Article title
    pub title: String,
    /// Thumbnail, when the article has a lead image
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

/// Common trait for remote article services
///
/// This trait defines the two requests the article pipeline needs, allowing
/// the live client and test doubles to be used interchangeably.
#[async_trait]
pub trait ArticleProvider: Send + Sync + Debug {
    /// Draw up to `limit` random articles from `namespace`
    ///
    /// # Returns
    /// * `Result<Vec<ArticleCandidate>, ProviderError>` - Candidates (possibly none) or an error
    async fn random_articles(&self, namespace: i32, limit: u32) -> Result<Vec<ArticleCandidate>, ProviderError>;

    /// Fetch the rendered HTML of an article's introductory section
    ///
    /// # Returns
    /// * `Result<Option<String>, ProviderError>` - The HTML, `None` when the service has no body for the page
    async fn intro_html(&self, page_id: u64) -> Result<Option<String>, ProviderError>;
}

pub mod mock;
pub mod wikipedia;
