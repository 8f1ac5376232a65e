use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::app_config::ArticleConfig;
use crate::errors::ProviderError;
use crate::providers::{ArticleCandidate, ArticleProvider};

/// Client for the MediaWiki action API
#[derive(Debug, Clone)]
pub struct Wikipedia {
    /// HTTP client for API requests
    client: Client,
    /// `api.php` endpoint
    endpoint: String,
    /// Requested thumbnail width in pixels
    thumbnail_size: u32,
}

/// Response of `action=query&generator=random`
#[derive(Debug, Deserialize)]
struct RandomQueryResponse {
    /// Absent when the generator produced nothing
    #[serde(default)]
    query: Option<RandomQuery>,
}

#[derive(Debug, Deserialize)]
struct RandomQuery {
    /// Candidates keyed by page id
    #[serde(default)]
    pages: BTreeMap<String, ArticleCandidate>,
}

/// Response of `action=parse`
#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    parse: Option<ParsedPage>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    #[serde(default)]
    text: Option<ParsedText>,
}

#[derive(Debug, Deserialize)]
struct ParsedText {
    #[serde(rename = "*")]
    html: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

impl Wikipedia {
    /// Create a new client for the given `api.php` endpoint
    pub fn new(endpoint: impl Into<String>, thumbnail_size: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            thumbnail_size,
        }
    }

    /// Create a client from configuration
    pub fn from_config(config: &ArticleConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            thumbnail_size: config.thumbnail_size,
        })
    }

    /// URL for drawing random articles with their thumbnails
    pub fn random_articles_url(&self, namespace: i32, limit: u32) -> Result<Url, ProviderError> {
        self.url(&[
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("generator", "random".to_string()),
            ("grnlimit", limit.to_string()),
            ("grnnamespace", namespace.to_string()),
            ("prop", "pageimages".to_string()),
            ("piprop", "thumbnail".to_string()),
            ("pithumbsize", self.thumbnail_size.to_string()),
        ])
    }

    /// URL for the rendered lead section of a page
    pub fn intro_html_url(&self, page_id: u64) -> Result<Url, ProviderError> {
        self.url(&[
            ("action", "parse".to_string()),
            ("format", "json".to_string()),
            ("prop", "text".to_string()),
            ("section", "0".to_string()),
            ("pageid", page_id.to_string()),
        ])
    }

    fn url(&self, params: &[(&str, String)]) -> Result<Url, ProviderError> {
        Url::parse_with_params(&self.endpoint, params)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("MediaWiki API error ({}): {}", status, body);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

/// Extract candidates from a random-generator query response body
pub fn parse_random_response(body: &str) -> Result<Vec<ArticleCandidate>, ProviderError> {
    let response: RandomQueryResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;
    Ok(candidates(response))
}

/// Extract the lead-section HTML from a parse response body
pub fn parse_intro_response(body: &str) -> Result<Option<String>, ProviderError> {
    let response: ParseResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;
    Ok(intro_html(response))
}

fn candidates(response: RandomQueryResponse) -> Vec<ArticleCandidate> {
    response
        .query
        .map(|query| query.pages.into_values().collect())
        .unwrap_or_default()
}

fn intro_html(response: ParseResponse) -> Option<String> {
    if let Some(api_error) = response.error {
        debug!("Parse request rejected: {} ({})", api_error.code, api_error.info);
        return None;
    }
    response.parse.and_then(|page| page.text).map(|text| text.html)
}

#[async_trait]
impl ArticleProvider for Wikipedia {
    async fn random_articles(&self, namespace: i32, limit: u32) -> Result<Vec<ArticleCandidate>, ProviderError> {
        let url = self.random_articles_url(namespace, limit)?;
        let response: RandomQueryResponse = self.get_json(url).await?;
        Ok(candidates(response))
    }

    async fn intro_html(&self, page_id: u64) -> Result<Option<String>, ProviderError> {
        let url = self.intro_html_url(page_id)?;
        let response: ParseResponse = self.get_json(url).await?;
        Ok(intro_html(response))
    }
}
