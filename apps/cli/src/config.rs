//! Layered CLI configuration
//!
//! Precedence, lowest first: built-in defaults, `~/.credhub/config.toml` (or the
//! file named by `--config`), `CREDHUB_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use credhub::auth::{Authenticator, BearerTokenAuthenticator, Grant, UaaAuthenticator};
use credhub::core::{ClientConfig, ConfigError, DEFAULT_TIMEOUT, SecureString};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// UAA client the interactive CLI identifies as
pub const DEFAULT_CLIENT_ID: &str = "credhub_cli";

/// Everything the CLI needs to build a client
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// CredHub API URL
    pub api_url: String,
    /// UAA URL; without it only a fixed access token can be used
    pub auth_url: Option<String>,
    /// Target environment identity
    pub environment: Option<String>,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub skip_tls_validation: bool,
    /// UAA client id
    pub client_id: String,
    /// UAA client secret
    pub client_secret: Option<String>,
    /// UAA user for the password grant
    pub username: Option<String>,
    /// UAA password for the password grant
    pub password: Option<String>,
    /// Previously issued access token
    pub access_token: Option<String>,
    /// Previously issued refresh token
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .field("skip_tls_validation", &self.skip_tls_validation)
            .field("client_id", &self.client_id)
            .field("has_client_secret", &self.client_secret.is_some())
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            auth_url: None,
            environment: None,
            timeout: DEFAULT_TIMEOUT,
            skip_tls_validation: false,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: None,
            username: None,
            password: None,
            access_token: None,
            refresh_token: None,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers in charge
#[derive(Debug, Default, Serialize)]
pub struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_tls_validation: Option<bool>,
}

/// `~/.credhub/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".credhub").join("config.toml"))
}

impl CliConfig {
    /// Merge every layer
    pub fn load(explicit_path: Option<&Path>, flags: FlagOverrides) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit_path {
            Some(path) => {
                anyhow::ensure!(
                    path.is_file(),
                    ConfigError::InvalidValue {
                        field: "config",
                        reason: format!("{} does not exist", path.display()),
                    }
                );
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = default_config_path() {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment
            .merge(Env::prefixed("CREDHUB_").ignore(&["log", "log_format"]))
            .merge(Serialized::defaults(flags))
            .extract()
            .context("failed to load configuration")
    }

    /// Library configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            environment: self.environment.clone(),
            timeout: self.timeout,
            skip_tls_validation: self.skip_tls_validation,
        }
    }

    /// Pick an authenticator from whatever credentials are configured
    ///
    /// With a UAA URL: seeded tokens and/or a grant (password when a username is
    /// set, client credentials when only a secret is). Without one: a fixed token.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>, ConfigError> {
        let Some(auth_url) = self.auth_url.as_deref() else {
            let token = self
                .access_token
                .as_deref()
                .ok_or(ConfigError::MissingRequired {
                    field: "access_token",
                })?;
            return Ok(Arc::new(BearerTokenAuthenticator::new(token)));
        };

        let secret = self.client_secret.clone().unwrap_or_default();
        let mut uaa = UaaAuthenticator::new(auth_url, self.client_id.clone(), secret)?
            .with_connection_settings(&self.client_config())?;

        let grant = match (&self.username, &self.password, &self.client_secret) {
            (Some(username), Some(password), _) => Some(Grant::Password {
                username: username.clone(),
                password: SecureString::new(password.clone()),
            }),
            (None, _, Some(_)) => Some(Grant::ClientCredentials),
            _ => None,
        };
        if let Some(grant) = grant {
            uaa = uaa.with_grant(grant);
        }

        match &self.access_token {
            Some(access) => {
                uaa = uaa.with_tokens(
                    access.clone(),
                    self.refresh_token.clone().map(SecureString::new),
                );
            }
            None if self.username.is_none() && self.client_secret.is_none() => {
                return Err(ConfigError::MissingRequired {
                    field: "access_token",
                });
            }
            None => {}
        }

        Ok(Arc::new(uaa))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credhub::auth::AuthError;
    use credhub::transport::ApiRequest;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn with_auth(auth_url: Option<&str>) -> CliConfig {
        CliConfig {
            api_url: "https://credhub.example.com".into(),
            auth_url: auth_url.map(str::to_string),
            ..CliConfig::default()
        }
    }

    #[test]
    fn bearer_token_without_auth_url() {
        let config = CliConfig {
            access_token: Some("t".into()),
            ..with_auth(None)
        };
        assert_eq!(config.authenticator().unwrap().name(), "bearer");
    }

    #[test]
    fn nothing_configured_is_missing_token() {
        assert_eq!(
            with_auth(None).authenticator().err(),
            Some(ConfigError::MissingRequired {
                field: "access_token"
            })
        );
        assert_eq!(
            with_auth(Some("https://uaa.example.com")).authenticator().err(),
            Some(ConfigError::MissingRequired {
                field: "access_token"
            })
        );
    }

    #[test]
    fn client_secret_selects_uaa() {
        let config = CliConfig {
            client_id: "director".into(),
            client_secret: Some("secret".into()),
            ..with_auth(Some("https://uaa.example.com"))
        };
        assert_eq!(config.authenticator().unwrap().name(), "uaa");
    }

    #[test]
    fn client_config_copies_connection_settings() {
        let config = CliConfig {
            environment: Some("prod".into()),
            skip_tls_validation: true,
            ..with_auth(None)
        };
        let client = config.client_config();
        assert_eq!(client.api_url, "https://credhub.example.com");
        assert_eq!(client.environment.as_deref(), Some("prod"));
        assert!(client.skip_tls_validation);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn file_layer_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://from-file.example.com\"\ntimeout = \"45s\"\nenvironment = \"staging\"\n",
        )
        .unwrap();

        let loaded = CliConfig::load(Some(&path), FlagOverrides::default()).unwrap();
        assert_eq!(loaded.timeout, Duration::from_secs(45));
        assert_eq!(loaded.environment.as_deref(), Some("staging"));
        assert_eq!(loaded.client_id, DEFAULT_CLIENT_ID);

        let flagged = CliConfig::load(
            Some(&path),
            FlagOverrides {
                api_url: Some("https://from-flag.example.com".into()),
                skip_tls_validation: Some(true),
            },
        )
        .unwrap();
        assert_eq!(flagged.api_url, "https://from-flag.example.com");
        assert!(flagged.skip_tls_validation);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(&dir.path().join("absent.toml")), FlagOverrides::default())
            .unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = CliConfig {
            client_secret: Some("client-secret-value".into()),
            username: Some("admin".into()),
            password: Some("password-value".into()),
            access_token: Some("access-token-value".into()),
            refresh_token: Some("refresh-token-value".into()),
            ..with_auth(Some("https://uaa.example.com"))
        };
        let debug = format!("{config:?}");
        for secret in [
            "client-secret-value",
            "password-value",
            "access-token-value",
            "refresh-token-value",
        ] {
            assert!(!debug.contains(secret), "{secret} leaked into {debug}");
        }
        assert!(debug.contains("has_access_token: true"));
        assert!(debug.contains("admin"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn token_requests_use_configured_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "access_token": "too-late",
                        "token_type": "bearer"
                    }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = CliConfig {
            timeout: Duration::from_secs(1),
            client_id: "director".into(),
            client_secret: Some("director-secret".into()),
            ..with_auth(Some(&server.uri()))
        };

        let started = std::time::Instant::now();
        let err = config
            .authenticator()
            .unwrap()
            .authorize(ApiRequest::get("/x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Network(_)), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
