/*!
 * Tests for the MediaWiki client against a local canned HTTP server
 */

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use wikilibs::app_config::ArticleConfig;
use wikilibs::article::ArticleSource;
use wikilibs::errors::{ArticleError, ProviderError};
use wikilibs::providers::ArticleProvider;
use wikilibs::providers::wikipedia::Wikipedia;

use crate::common;

/// Serve `responses` in order, one per connection; returns the endpoint and
/// a handle yielding the request lines received
async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/w/api.php", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = vec![0u8; 8192];
            let read = socket.read(&mut buffer).await.unwrap();
            let request = String::from_utf8_lossy(&buffer[..read]).to_string();
            request_lines.push(request.lines().next().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        request_lines
    });

    (endpoint, handle)
}

fn client(endpoint: &str) -> Wikipedia {
    common::init_logging();
    let config = ArticleConfig {
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        ..ArticleConfig::default()
    };
    Wikipedia::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_fetchRandomArticle_overHttp_shouldBuildArticle() {
    let random = r#"{"query": {"pages": {"99": {"pageid": 99, "ns": 0, "title": "Otter",
        "thumbnail": {"source": "https://upload.example/otter.jpg", "width": 300, "height": 240}}}}}"#;
    let parse = r#"{"parse": {"pageid": 99, "text": {"*": "<div class=\"mw-parser-output\"><p>The otter eats <a href=\"/wiki/Fish\">fish</a>.</p></div>"}}}"#;
    let (endpoint, server) = serve(vec![(200, random.to_string()), (200, parse.to_string())]).await;

    let article = ArticleSource::new(client(&endpoint)).fetch_random_article().await.unwrap();

    assert_eq!(article.page_id(), 99);
    assert_eq!(article.title(), "Otter");
    assert_eq!(article.image_url(), Some("https://upload.example/otter.jpg"));
    assert_eq!(article.blank_count(), 1);
    assert_eq!(article.tokens().len(), 5);

    let requests = server.await.unwrap();
    assert!(requests[0].contains("generator=random"));
    assert!(requests[0].contains("grnnamespace=0"));
    assert!(requests[1].contains("pageid=99"));
}

#[tokio::test]
async fn test_fetchRandomArticle_withNoPages_shouldReportNoArticle() {
    let (endpoint, server) = serve(vec![(200, r#"{"batchcomplete": ""}"#.to_string())]).await;

    let result = ArticleSource::new(client(&endpoint)).fetch_random_article().await;

    assert!(matches!(result, Err(ArticleError::NoArticleFound)));
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_introHtml_withServerError_shouldReturnApiError() {
    let (endpoint, _server) = serve(vec![(503, "maintenance".to_string())]).await;

    let result = client(&endpoint).intro_html(1).await;

    match result {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_randomArticles_withInvalidJson_shouldReturnParseError() {
    let (endpoint, _server) = serve(vec![(200, "<html>not json</html>".to_string())]).await;

    let result = client(&endpoint).random_articles(0, 1).await;

    assert!(matches!(result, Err(ProviderError::ParseError(_))));
}

#[tokio::test]
async fn test_randomArticles_withClosedPort_shouldReturnConnectionError() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/w/api.php", listener.local_addr().unwrap());
    drop(listener);

    let result = client(&endpoint).random_articles(0, 1).await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

#[tokio::test]
async fn test_randomArticles_withTruncatedBody_shouldReturnRetryableConnectionError() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/w/api.php", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = vec![0u8; 8192];
        let _ = socket.read(&mut buffer).await.unwrap();
        let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 4096\r\n\r\n{\"query\":";
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    let result = client(&endpoint).random_articles(0, 1).await;

    match result {
        Err(error @ ProviderError::ConnectionError(_)) => {
            assert!(error.to_string().contains("response body"));
            assert!(ArticleError::from(error).is_retryable());
        }
        other => panic!("expected ConnectionError, got {:?}", other),
    }
}
