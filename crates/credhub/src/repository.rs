//! Request orchestration: transport, classification, decoding

use async_trait::async_trait;

use crate::classify;
use crate::codec::{self, Decoded};
use crate::core::Result;
use crate::transport::{ApiRequest, Transport};

/// Sends one request and decodes its outcome
///
/// `identifier` names the credential the request concerns; it is used for
/// diagnostics only.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Send `request` and decode the response body
    async fn send_request(&self, request: ApiRequest, identifier: &str) -> Result<Decoded>;
}

/// [`Repository`] for `/api/v1/data`
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    transport: Transport,
}

impl CredentialRepository {
    /// Repository over `transport`
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Repository for CredentialRepository {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send_request(&self, request: ApiRequest, identifier: &str) -> Result<Decoded> {
        let response = self.transport.execute(request).await?;
        let body = classify::classify(response)?;
        Ok(codec::decode(&body)?)
    }
}
