/*!
 * Tests for error types and conversions
 */

use wikilibs::errors::{ArticleError, ProviderError, SessionError, SpeechError};

#[test]
fn test_articleError_noArticleFound_shouldDisplayCorrectly() {
    assert_eq!(ArticleError::NoArticleFound.to_string(), "Couldn't get a random article");
}

#[test]
fn test_articleError_contentUnavailable_shouldNameThePage() {
    let error = ArticleError::ArticleContentUnavailable {
        page_id: 736,
        title: "Albert Einstein".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("Albert Einstein"));
    assert!(display.contains("736"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_articleError_isRetryable_shouldClassifyCauses() {
    assert!(ArticleError::NoArticleFound.is_retryable());
    assert!(ArticleError::from(ProviderError::ConnectionError("reset".to_string())).is_retryable());
    assert!(
        ArticleError::from(ProviderError::ApiError {
            status_code: 503,
            message: "busy".to_string()
        })
        .is_retryable()
    );
    assert!(
        !ArticleError::from(ProviderError::ApiError {
            status_code: 404,
            message: "gone".to_string()
        })
        .is_retryable()
    );
    assert!(!ArticleError::from(ProviderError::ParseError("bad".to_string())).is_retryable());
}

#[test]
fn test_articleError_isRetryable_withTransientHttpStatus_shouldRetry() {
    for status_code in [408, 429, 500, 502, 503] {
        let error = ArticleError::from(ProviderError::ApiError {
            status_code,
            message: "try later".to_string(),
        });
        assert!(error.is_retryable(), "status {} should be retryable", status_code);
    }
}

#[test]
fn test_articleError_isRetryable_withInterruptedBody_shouldRetry() {
    let error = ArticleError::from(ProviderError::ConnectionError(
        "Failed to read response body: connection reset".to_string(),
    ));
    assert!(error.is_retryable());
}

#[test]
fn test_errors_shouldDisplayTheirCause() {
    assert_eq!(
        SessionError::NotABlank { index: 3 }.to_string(),
        "Token 3 is not a blank"
    );
    assert!(
        SessionError::IndexOutOfRange { index: 9, len: 4 }
            .to_string()
            .contains("4 tokens")
    );
    assert!(SpeechError::Unavailable("no espeak".to_string()).to_string().contains("no espeak"));
    assert!(SpeechError::UnknownUtterance(7).to_string().contains('7'));
}
