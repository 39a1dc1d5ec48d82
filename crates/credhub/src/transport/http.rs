use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{ApiRequest, ApiResponse};
use crate::core::{ClientConfig, ConfigError};

/// Boxed source error
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The request never produced an HTTP response
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established
    #[error("could not connect to {url}: {source}")]
    Connect {
        /// Target URL
        url: String,
        /// Underlying error
        #[source]
        source: BoxError,
    },

    /// No response within the configured timeout
    #[error("request to {url} timed out")]
    Timeout {
        /// Target URL
        url: String,
    },

    /// Any other failure while sending or reading the response
    #[error("request to {url} failed: {source}")]
    Request {
        /// Target URL
        url: String,
        /// Underlying error
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            Self::Timeout { url }
        } else if err.is_connect() {
            Self::Connect {
                url,
                source: Box::new(err),
            }
        } else {
            Self::Request {
                url,
                source: Box::new(err),
            }
        }
    }
}

/// Sends one request and returns whatever the server answered
///
/// Implementations never interpret the status code; that is the classifier's job.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform one HTTP exchange
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest` client with the request timeout and TLS policy applied
pub(crate) fn build_reqwest_client(
    timeout: Duration,
    skip_tls_validation: bool,
) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("credhub-rs/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(skip_tls_validation)
        .build()
        .map_err(|e| ConfigError::InvalidValue {
            field: "skip_tls_validation",
            reason: e.to_string(),
        })
}

/// [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client for the configured API URL, timeout and TLS policy
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let client = build_reqwest_client(config.timeout, config.skip_tls_validation)?;
        Ok(Self { base_url, client })
    }

    /// Wrap an existing `reqwest` client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    fn url_for(&self, request: &ApiRequest) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}{}",
            self.base_url.path().trim_end_matches('/'),
            request.path
        );
        url.set_path(&path);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request);
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self
            .client
            .request(request.method, url.clone())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), e))?;

        debug!(status = status.as_u16(), bytes = body.len(), "received response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ReqwestHttpClient {
        ReqwestHttpClient::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn url_keeps_base_path_and_encodes_query() {
        let client = client("https://credhub.example.com:8844/prefix/");
        let url = client.url_for(&ApiRequest::get("/team a/secret"));
        assert_eq!(
            url.as_str(),
            "https://credhub.example.com:8844/prefix/api/v1/data?name=%2Fteam+a%2Fsecret"
        );
    }

    #[test]
    fn url_without_query_has_no_question_mark() {
        let client = client("https://credhub.example.com");
        let url = client.url_for(&ApiRequest::set(Vec::new()));
        assert_eq!(url.as_str(), "https://credhub.example.com/api/v1/data");
    }

    #[test]
    fn rejects_config_without_target() {
        assert!(matches!(
            ReqwestHttpClient::new(&ClientConfig::default()),
            Err(ConfigError::MissingRequired { field: "api_url" })
        ));
    }
}
