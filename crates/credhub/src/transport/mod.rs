//! HTTP transport with one-shot token refresh
mod http;
mod request;

use std::sync::Arc;

use tracing::warn;

pub use self::http::{BoxError, HttpClient, ReqwestHttpClient, TransportError};
pub(crate) use self::http::build_reqwest_client;
pub use self::request::{ApiRequest, ApiResponse, DATA_PATH};

use crate::auth::Authenticator;
use crate::classify;
use crate::core::Result;

/// Authorizes and sends requests
///
/// When the server answers 401, the authenticator is refreshed once and the request
/// is sent again. Whatever the second attempt returns is final.
#[derive(Clone)]
pub struct Transport {
    http: Arc<dyn HttpClient>,
    auth: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("authenticator", &self.auth.name())
            .finish()
    }
}

impl Transport {
    /// Transport over `http`, authorizing with `auth`
    pub fn new(http: Arc<dyn HttpClient>, auth: Arc<dyn Authenticator>) -> Self {
        Self { http, auth }
    }

    /// The authenticator in use
    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.auth
    }

    /// Send `request`, refreshing and retrying once on 401
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.send_authorized(request.clone()).await?;
        if !classify::needs_refresh(&response) {
            return Ok(response);
        }

        warn!(
            authenticator = self.auth.name(),
            method = %request.method,
            path = %request.path,
            "request unauthorized, refreshing token and retrying once"
        );
        self.auth.refresh().await?;
        self.send_authorized(request).await
    }

    async fn send_authorized(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request = self.auth.authorize(request).await?;
        Ok(self.http.send(request).await?)
    }
}
