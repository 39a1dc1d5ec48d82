//! Single-invocation entry point used by command handlers

use tracing::debug;

use crate::codec::Decoded;
use crate::core::{ClientConfig, CredHubError, Result};
use crate::repository::Repository;
use crate::transport::ApiRequest;

/// Binds a repository and the process configuration to one invocation
///
/// Holds no state of its own; build one per operation.
pub struct Action<'a, R: ?Sized> {
    repository: &'a R,
    config: &'a ClientConfig,
}

impl<'a, R: Repository + ?Sized> Action<'a, R> {
    /// Action over `repository` with `config`
    pub fn new(repository: &'a R, config: &'a ClientConfig) -> Self {
        Self { repository, config }
    }

    /// Run `request` against the configured API target
    pub async fn do_action(&self, request: ApiRequest, identifier: &str) -> Result<Decoded> {
        if !self.config.has_api_target() {
            return Err(CredHubError::NoApiTarget);
        }
        debug!(
            api_url = %self.config.api_url,
            environment = self.config.environment.as_deref().unwrap_or("default"),
            identifier,
            "running action"
        );
        self.repository.send_request(request, identifier).await
    }
}
