//! OAuth2 against a UAA token endpoint

use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use super::{AuthError, Authenticator, bearer_header};
use crate::core::{ClientConfig, ConfigError, DEFAULT_TIMEOUT, SecureString};
use crate::transport::{ApiRequest, TransportError, build_reqwest_client};

/// Maximum length for error response body to log (prevents log flooding)
const MAX_ERROR_BODY_LOG_LENGTH: usize = 500;

/// Sanitize response body for logging - truncate and remove potential secrets
fn sanitize_response_for_logging(body: &str) -> String {
    let truncated = if body.len() > MAX_ERROR_BODY_LOG_LENGTH {
        let mut cut = MAX_ERROR_BODY_LOG_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... [truncated, {} total bytes]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    if let Ok(mut json) = serde_json::from_str::<serde_json::Value>(&truncated) {
        for field in [
            "access_token",
            "refresh_token",
            "id_token",
            "token",
            "client_secret",
            "secret",
            "password",
        ] {
            if json.get(field).is_some() {
                json[field] = serde_json::json!("[REDACTED]");
            }
        }
        json.to_string()
    } else {
        truncated
    }
}

/// How a first token is obtained
#[derive(Debug, Clone)]
pub enum Grant {
    /// `client_credentials`: the client itself is the principal
    ClientCredentials,
    /// `password`: a user logs in through the client
    Password {
        /// UAA user name
        username: String,
        /// UAA user password
        password: SecureString,
    },
}

impl Grant {
    const fn grant_type(&self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::Password { .. } => "password",
        }
    }
}

/// UAA token response
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
struct TokenState {
    access_token: SecureString,
    refresh_token: Option<SecureString>,
}

/// OAuth2 authenticator backed by a UAA server
///
/// Acquires a token lazily on the first [`authorize`](Authenticator::authorize).
/// [`refresh`](Authenticator::refresh) uses the `refresh_token` grant when a
/// refresh token is held and re-runs the configured grant otherwise.
pub struct UaaAuthenticator {
    token_url: Url,
    client_id: String,
    client_secret: SecureString,
    grant: Option<Grant>,
    http: reqwest::Client,
    tokens: RwLock<Option<TokenState>>,
}

impl std::fmt::Debug for UaaAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UaaAuthenticator")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("grant", &self.grant.as_ref().map(Grant::grant_type))
            .field("has_token", &self.tokens.read().is_some())
            .finish()
    }
}

impl UaaAuthenticator {
    /// Authenticator for the UAA server at `auth_url`, identifying as the given client
    pub fn new(
        auth_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, ConfigError> {
        let base = Url::parse(auth_url).map_err(|e| ConfigError::InvalidValue {
            field: "auth_url",
            reason: e.to_string(),
        })?;
        let mut token_url = base.clone();
        token_url.set_path(&format!(
            "{}/oauth/token",
            base.path().trim_end_matches('/')
        ));
        Ok(Self {
            token_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant: None,
            http: build_reqwest_client(DEFAULT_TIMEOUT, false)?,
            tokens: RwLock::new(None),
        })
    }

    /// Grant used when no token is held
    pub fn with_grant(mut self, grant: Grant) -> Self {
        self.grant = Some(grant);
        self
    }

    /// Seed previously issued tokens
    pub fn with_tokens(
        self,
        access_token: impl Into<SecureString>,
        refresh_token: Option<SecureString>,
    ) -> Self {
        *self.tokens.write() = Some(TokenState {
            access_token: access_token.into(),
            refresh_token,
        });
        self
    }

    /// Apply the request timeout and TLS policy of `config` to token requests
    pub fn with_connection_settings(mut self, config: &ClientConfig) -> Result<Self, ConfigError> {
        self.http = build_reqwest_client(config.timeout, config.skip_tls_validation)?;
        Ok(self)
    }

    /// Use a preconfigured `reqwest` client for token requests
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Token endpoint URL
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Currently held access token
    pub fn access_token(&self) -> Option<SecureString> {
        self.tokens.read().as_ref().map(|t| t.access_token.clone())
    }

    /// Currently held refresh token
    pub fn refresh_token(&self) -> Option<SecureString> {
        self.tokens
            .read()
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    async fn run_grant(&self) -> Result<TokenState, AuthError> {
        let grant = self.grant.as_ref().ok_or(AuthError::MissingToken)?;
        let secret = self.client_secret.expose();
        let mut form = vec![
            ("grant_type", grant.grant_type()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", secret),
            ("response_type", "token"),
        ];
        if let Grant::Password { username, password } = grant {
            form.push(("username", username.as_str()));
            form.push(("password", password.expose()));
        }
        self.request_token(&form).await
    }

    async fn run_refresh_grant(&self, refresh_token: &SecureString) -> Result<TokenState, AuthError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose()),
            ("response_type", "token"),
        ];
        let mut state = self.request_token(&form).await?;
        if state.refresh_token.is_none() {
            state.refresh_token = Some(refresh_token.clone());
        }
        Ok(state)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenState, AuthError> {
        let network = |e| AuthError::Network(TransportError::from_reqwest(self.token_url.as_str(), e));

        let response = self
            .http
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if !status.is_success() {
            let sanitized_body = sanitize_response_for_logging(&body);
            error!(
                status = %status,
                body = %sanitized_body,
                "UAA token request failed"
            );
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            let sanitized_body = sanitize_response_for_logging(&body);
            error!(
                error = %e,
                body = %sanitized_body,
                "Failed to parse UAA token response"
            );
            AuthError::InvalidResponse(e)
        })?;

        Ok(TokenState {
            access_token: SecureString::new(token.access_token),
            refresh_token: token.refresh_token.map(SecureString::new),
        })
    }

    fn store(&self, state: TokenState) -> SecureString {
        let access_token = state.access_token.clone();
        *self.tokens.write() = Some(state);
        access_token
    }
}

#[async_trait]
impl Authenticator for UaaAuthenticator {
    async fn authorize(&self, mut request: ApiRequest) -> Result<ApiRequest, AuthError> {
        let token = match self.access_token() {
            Some(token) => token,
            None => {
                debug!(token_url = %self.token_url, "acquiring initial access token");
                let state = self.run_grant().await?;
                self.store(state)
            }
        };
        request.headers.insert(AUTHORIZATION, bearer_header(&token)?);
        Ok(request)
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        let state = match self.refresh_token() {
            Some(refresh_token) => {
                debug!(token_url = %self.token_url, "refreshing access token");
                self.run_refresh_grant(&refresh_token).await?
            }
            None => {
                debug!(token_url = %self.token_url, "no refresh token held, re-running grant");
                self.run_grant().await?
            }
        };
        self.store(state);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "uaa"
    }
}
