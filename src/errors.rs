/*!
 * Error types for the wikilibs application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the remote article service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors that can occur while turning a random article into a game
#[derive(Error, Debug)]
pub enum ArticleError {
    /// The remote service returned zero candidates
    #[error("Couldn't get a random article")]
    NoArticleFound,

    /// A candidate was found but its body could not be retrieved
    #[error("Couldn't fetch HTML for article \"{title}\" with ID {page_id}")]
    ArticleContentUnavailable {
        /// Page id of the candidate
        page_id: u64,
        /// Title of the candidate
        title: String,
    },

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ArticleError {
    /// Whether an immediate re-fetch is likely to succeed
    ///
    /// Hosts offer a re-fetch after every failure; this only decides whether
    /// that offer defaults to yes.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoArticleFound | Self::ArticleContentUnavailable { .. } => true,
            Self::Provider(ProviderError::ConnectionError(_)) => true,
            Self::Provider(ProviderError::ApiError { status_code, .. }) => {
                *status_code == 408 || *status_code == 429 || *status_code >= 500
            }
            Self::Provider(ProviderError::RequestFailed(_) | ProviderError::ParseError(_)) => false,
        }
    }
}

/// Errors reported by a speech service
#[derive(Error, Debug)]
pub enum SpeechError {
    /// The synthesizer could not be reached or started
    #[error("Speech service unavailable: {0}")]
    Unavailable(String),

    /// The synthesizer rejected an operation
    #[error("Speech operation failed: {0}")]
    Failed(String),

    /// The handle does not refer to the active utterance
    #[error("Unknown utterance: {0}")]
    UnknownUtterance(u64),
}

/// Errors from mutating the game session
#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    /// No article has been loaded yet
    #[error("No article is loaded")]
    NoArticle,

    /// The index points at a literal word, not a blank
    #[error("Token {index} is not a blank")]
    NotABlank {
        /// Offending token index
        index: usize,
    },

    /// The index lies past the end of the token sequence
    #[error("Token index {index} is out of range (article has {len} tokens)")]
    IndexOutOfRange {
        /// Offending token index
        index: usize,
        /// Number of tokens in the article
        len: usize,
    },
}
