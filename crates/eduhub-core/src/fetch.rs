//! One-shot retrieval of remote JSON documents.
//!
//! Every fetch is a single attempt: callers turn any [`FetchError`] into a
//! "try again later" reply and move on.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading a remote document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not JSON, or not the expected shape.
    #[error("unexpected document at {url}: {message}")]
    Malformed { url: String, message: String },
}

/// A place JSON documents can be loaded from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch and parse the document at `url`.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Fetch `url` from `source` and decode it into `T`.
pub async fn fetch_as<T: DeserializeOwned>(
    source: &dyn ContentSource,
    url: &str,
) -> Result<T, FetchError> {
    let value = source.fetch_json(url).await?;
    serde_json::from_value(value).map_err(|e| FetchError::Malformed {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// [`ContentSource`] backed by HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
}

impl HttpContentSource {
    /// Create a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("eduhub-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        debug!(url = %url, "Fetching remote document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Remote document unavailable");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // raw.githubusercontent.com serves JSON as text/plain, so decode the
        // body ourselves instead of trusting the content type.
        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Quote;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source() -> HttpContentSource {
        HttpContentSource::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_typed_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quotes.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"quoteText": "Dream big.", "quoteAuthor": "Kalam"}]"#,
            ))
            .mount(&server)
            .await;

        let url = format!("{}/quotes.json", server.uri());
        let quotes: Vec<Quote> = fetch_as(&source(), &url).await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].author(), "Kalam");
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.json", server.uri());
        let err = source().fetch_json(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let err = source().fetch_json(&server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_wrong_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"quotes": []}"#))
            .mount(&server)
            .await;

        let result: Result<Vec<Quote>, _> = fetch_as(&source(), &server.uri()).await;
        assert!(matches!(result, Err(FetchError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let err = source()
            .fetch_json("http://127.0.0.1:9/exams.json")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
