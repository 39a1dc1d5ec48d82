//! High-level client
//!
//! [`CredHub`] wires the default stack (reqwest transport, caller-chosen
//! authenticator, [`CredentialRepository`]) and exposes one method per operation.
//!
//! ```no_run
//! use credhub::auth::BearerTokenAuthenticator;
//! use credhub::CredHub;
//!
//! # async fn run() -> credhub::Result<()> {
//! let credhub = CredHub::builder("https://credhub.example.com:8844")
//!     .authenticator(BearerTokenAuthenticator::new("access-token"))
//!     .build()?;
//!
//! let credential = credhub.set_password("/example-password", "some-password", false).await?;
//! assert_eq!(credential.name, "/example-password");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::action::Action;
use crate::auth::Authenticator;
use crate::codec::{self, Decoded};
use crate::core::{ClientConfig, ConfigError, CredHubError, Result};
use crate::credentials::{
    CertificateValue, Credential, CredentialType, CredentialValue, GenerationParameters,
    RsaValue, SshValue, UserValue,
};
use crate::repository::{CredentialRepository, Repository};
use crate::transport::{ApiRequest, HttpClient, ReqwestHttpClient, Transport};

/// CredHub API client
#[derive(Clone)]
pub struct CredHub {
    config: ClientConfig,
    repository: Arc<dyn Repository>,
}

impl std::fmt::Debug for CredHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredHub")
            .field("config", &self.config)
            .finish()
    }
}

impl CredHub {
    /// Start building a client for `api_url`
    pub fn builder(api_url: impl Into<String>) -> CredHubBuilder {
        CredHubBuilder::new(ClientConfig::new(api_url))
    }

    /// Client over an arbitrary repository
    pub fn with_repository(config: ClientConfig, repository: Arc<dyn Repository>) -> Self {
        Self { config, repository }
    }

    /// Configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn perform(&self, request: ApiRequest, identifier: &str) -> Result<Decoded> {
        Action::new(self.repository.as_ref(), &self.config)
            .do_action(request, identifier)
            .await
    }

    /// Store `value` under `name`
    ///
    /// With `overwrite = false` an existing credential is returned unchanged.
    pub async fn set(
        &self,
        name: &str,
        value: impl Into<CredentialValue>,
        overwrite: bool,
    ) -> Result<Credential> {
        require_non_empty("name", name)?;
        let body = codec::encode_set(name, &value.into(), overwrite)
            .map_err(|source| CredHubError::Encode { source })?;
        Ok(self
            .perform(ApiRequest::set(body), name)
            .await?
            .into_credential()?)
    }

    /// Store a `password` credential
    pub async fn set_password(
        &self,
        name: &str,
        password: impl Into<String>,
        overwrite: bool,
    ) -> Result<Credential> {
        self.set(name, CredentialValue::Password(password.into()), overwrite)
            .await
    }

    /// Store a `value` credential
    pub async fn set_value(
        &self,
        name: &str,
        value: impl Into<String>,
        overwrite: bool,
    ) -> Result<Credential> {
        self.set(name, CredentialValue::Value(value.into()), overwrite)
            .await
    }

    /// Store a `json` credential
    pub async fn set_json(
        &self,
        name: &str,
        value: serde_json::Value,
        overwrite: bool,
    ) -> Result<Credential> {
        self.set(name, value, overwrite).await
    }

    /// Store a `user` credential
    pub async fn set_user(&self, name: &str, value: UserValue, overwrite: bool) -> Result<Credential> {
        self.set(name, value, overwrite).await
    }

    /// Store a `certificate` credential
    pub async fn set_certificate(
        &self,
        name: &str,
        value: CertificateValue,
        overwrite: bool,
    ) -> Result<Credential> {
        self.set(name, value, overwrite).await
    }

    /// Store an `rsa` credential
    pub async fn set_rsa(&self, name: &str, value: RsaValue, overwrite: bool) -> Result<Credential> {
        self.set(name, value, overwrite).await
    }

    /// Store an `ssh` credential
    pub async fn set_ssh(&self, name: &str, value: SshValue, overwrite: bool) -> Result<Credential> {
        self.set(name, value, overwrite).await
    }

    /// Fetch the latest version of `name`
    pub async fn get(&self, name: &str) -> Result<Credential> {
        require_non_empty("name", name)?;
        Ok(self
            .perform(ApiRequest::get(name), name)
            .await?
            .into_credential()?)
    }

    /// Fetch one version by its identifier
    pub async fn get_by_id(&self, id: &str) -> Result<Credential> {
        require_non_empty("id", id)?;
        Ok(self
            .perform(ApiRequest::get_by_id(id), id)
            .await?
            .into_credential()?)
    }

    /// Delete every version of `name`
    pub async fn delete(&self, name: &str) -> Result<()> {
        require_non_empty("name", name)?;
        self.perform(ApiRequest::delete(name), name).await?;
        Ok(())
    }

    /// Have the server generate a value of `kind` under `name`
    pub async fn generate(
        &self,
        name: &str,
        kind: CredentialType,
        parameters: &GenerationParameters,
        overwrite: bool,
    ) -> Result<Credential> {
        self.generate_with_username(name, kind, parameters, None, overwrite)
            .await
    }

    /// Generate a `user` credential, optionally with a fixed username
    pub async fn generate_user(
        &self,
        name: &str,
        username: Option<&str>,
        parameters: &GenerationParameters,
        overwrite: bool,
    ) -> Result<Credential> {
        self.generate_with_username(name, CredentialType::User, parameters, username, overwrite)
            .await
    }

    async fn generate_with_username(
        &self,
        name: &str,
        kind: CredentialType,
        parameters: &GenerationParameters,
        username: Option<&str>,
        overwrite: bool,
    ) -> Result<Credential> {
        require_non_empty("name", name)?;
        if !kind.is_generatable() {
            return Err(CredHubError::invalid_request(format!(
                "credentials of type '{kind}' cannot be generated"
            )));
        }
        let body = codec::encode_generate(name, kind, parameters, username, overwrite)
            .map_err(|source| CredHubError::Encode { source })?;
        Ok(self
            .perform(ApiRequest::generate(body), name)
            .await?
            .into_credential()?)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CredHubError::invalid_request(format!(
            "credential {field} must not be empty"
        )));
    }
    Ok(())
}

/// Builder for [`CredHub`]
pub struct CredHubBuilder {
    config: ClientConfig,
    http: Option<Arc<dyn HttpClient>>,
    auth: Option<Arc<dyn Authenticator>>,
}

impl CredHubBuilder {
    /// Builder starting from `config`
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: None,
            auth: None,
        }
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates
    pub fn skip_tls_validation(mut self, skip: bool) -> Self {
        self.config.skip_tls_validation = skip;
        self
    }

    /// Target environment identity
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.config.environment = Some(environment.into());
        self
    }

    /// Authenticator attached to every request
    pub fn authenticator(mut self, auth: impl Authenticator + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    /// Shared authenticator
    pub fn shared_authenticator(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Replace the reqwest transport
    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate the configuration and assemble the client
    ///
    /// Without a custom HTTP client an API target is required.
    pub fn build(self) -> Result<CredHub> {
        let auth = self
            .auth
            .ok_or(ConfigError::MissingRequired {
                field: "authenticator",
            })?;
        let http = match self.http {
            Some(http) => http,
            None => {
                if !self.config.has_api_target() {
                    return Err(CredHubError::NoApiTarget);
                }
                self.config.validate()?;
                Arc::new(ReqwestHttpClient::new(&self.config)?)
            }
        };
        let repository = CredentialRepository::new(Transport::new(http, auth));
        Ok(CredHub::with_repository(self.config, Arc::new(repository)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BearerTokenAuthenticator;

    #[test]
    fn build_requires_authenticator() {
        let err = CredHub::builder("https://credhub.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CredHubError::Config(ConfigError::MissingRequired {
                field: "authenticator"
            })
        ));
    }

    #[test]
    fn build_requires_target_for_default_transport() {
        let err = CredHub::builder("")
            .authenticator(BearerTokenAuthenticator::new("t"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CredHubError::NoApiTarget));
    }

    #[test]
    fn build_validates_timeout() {
        let err = CredHub::builder("https://credhub.example.com")
            .timeout(Duration::from_secs(3600))
            .authenticator(BearerTokenAuthenticator::new("t"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CredHubError::Config(ConfigError::InvalidValue {
                field: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn build_with_defaults() {
        let credhub = CredHub::builder("https://credhub.example.com")
            .environment("staging")
            .authenticator(BearerTokenAuthenticator::new("t"))
            .build()
            .unwrap();
        assert_eq!(credhub.config().environment.as_deref(), Some("staging"));
    }
}
