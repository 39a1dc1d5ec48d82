//! Error types for CredHub operations
//!
//! [`CredHubError`] is the single error surfaced by every client operation. Lower
//! layers have their own narrower errors that convert into it:
//! - [`TransportError`]: the request never produced an HTTP response
//! - [`AuthError`]: the authenticator could not attach or refresh a token
//! - [`DecodeError`]: a success body did not describe a credential
//! - [`ConfigError`]: the client configuration is unusable
//!
//! # Conversion
//!
//! ```
//! use credhub::core::{CredHubError, DecodeError};
//!
//! let err: CredHubError = DecodeError::MissingType.into();
//! assert!(matches!(err, CredHubError::Decode { .. }));
//! ```

use thiserror::Error;

use crate::auth::AuthError;
use crate::credentials::CredentialType;
use crate::transport::TransportError;

/// Top-level CredHub error
#[derive(Debug, Error)]
pub enum CredHubError {
    /// The server could not be reached
    #[error("network error: {source}")]
    Network {
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// The server rejected the credentials, even after a token refresh
    #[error("You are not currently authenticated. Please log in to continue.")]
    Unauthorized {
        /// Refresh failure that ended the attempt, if any
        #[source]
        source: Option<AuthError>,
    },

    /// Non-2xx response carrying the server's own message
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the `error` field of the response body
        message: String,
    },

    /// Response body could not be parsed as JSON at all
    #[error("The response body could not be decoded: {source}")]
    MalformedResponse {
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Response was valid JSON but did not describe a credential
    #[error("unexpected credential response: {source}")]
    Decode {
        /// What was wrong with the body
        #[source]
        source: DecodeError,
    },

    /// Request body could not be encoded
    #[error("failed to encode request: {source}")]
    Encode {
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },

    /// Request rejected before it was sent
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected
        reason: String,
    },

    /// No API URL is configured
    #[error("An API target is not set. Please target the location of your server to continue.")]
    NoApiTarget,

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CredHubError {
    /// Build an [`CredHubError::InvalidRequest`]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// HTTP status of the failed response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Unauthorized { source: None } => Some(401),
            _ => None,
        }
    }
}

impl From<DecodeError> for CredHubError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Malformed(source) => Self::MalformedResponse { source },
            other => Self::Decode { source: other },
        }
    }
}

impl From<AuthError> for CredHubError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Network(source) => Self::Network { source },
            other => Self::Unauthorized {
                source: Some(other),
            },
        }
    }
}

impl From<TransportError> for CredHubError {
    fn from(source: TransportError) -> Self {
        Self::Network { source }
    }
}

/// Response-body decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not a JSON object
    #[error("response is not a JSON object: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Body was empty where a credential was expected
    #[error("response body is empty")]
    NoContent,

    /// `{"data": []}` held no versions
    #[error("response contains no credential versions")]
    EmptyDataList,

    /// `type` field absent or null
    #[error("response has no credential type")]
    MissingType,

    /// `type` names no supported credential type
    #[error("unknown credential type '{0}'")]
    UnknownType(String),

    /// Required field absent
    #[error("response is missing field '{0}'")]
    MissingField(&'static str),

    /// `id`, `name` or `version_created_at` has the wrong shape
    #[error("invalid credential envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// `value` does not match the shape its `type` requires
    #[error("invalid {kind} value: {source}")]
    InvalidValue {
        /// Declared type
        kind: CredentialType,
        /// Shape mismatch
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field holds an unusable value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A required field is absent
    #[error("Missing required configuration field: {field}")]
    MissingRequired {
        /// Field name
        field: &'static str,
    },
}

/// Result type for CredHub operations
pub type Result<T, E = CredHubError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_message_verbatim() {
        let err = CredHubError::Server {
            status: 400,
            message: "The request could not be fulfilled.".into(),
        };
        assert_eq!(err.to_string(), "The request could not be fulfilled.");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn malformed_decode_maps_to_malformed_response() {
        let parse = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err: CredHubError = DecodeError::Malformed(parse).into();
        assert!(matches!(err, CredHubError::MalformedResponse { .. }));
    }

    #[test]
    fn other_decode_errors_keep_their_detail() {
        let err: CredHubError = DecodeError::UnknownType("pgp".into()).into();
        assert!(matches!(
            err,
            CredHubError::Decode {
                source: DecodeError::UnknownType(_)
            }
        ));
        assert!(err.to_string().contains("pgp"));
    }

    #[test]
    fn auth_network_failure_is_a_network_error() {
        let err: CredHubError = AuthError::Network(TransportError::Timeout {
            url: "https://uaa.example.com/oauth/token".into(),
        })
        .into();
        assert!(matches!(err, CredHubError::Network { .. }));
    }

    #[test]
    fn auth_rejection_is_unauthorized() {
        let err: CredHubError = AuthError::Rejected { status: 401 }.into();
        assert!(matches!(
            err,
            CredHubError::Unauthorized {
                source: Some(AuthError::Rejected { status: 401 })
            }
        ));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn config_error_is_transparent() {
        let err: CredHubError = ConfigError::MissingRequired { field: "api_url" }.into();
        assert_eq!(
            err.to_string(),
            "Missing required configuration field: api_url"
        );
    }
}
