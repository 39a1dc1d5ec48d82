//! Request authorization
//!
//! An [`Authenticator`] attaches credentials to outgoing requests and can be asked
//! to refresh them once the server answers 401. The transport decides *when* to
//! refresh; authenticators only decide *how*.

mod bearer;
mod uaa;

use async_trait::async_trait;
use http::HeaderValue;
use thiserror::Error;

pub use bearer::BearerTokenAuthenticator;
pub use uaa::{Grant, UaaAuthenticator};

use crate::core::SecureString;
use crate::transport::{ApiRequest, TransportError};

/// Authorization failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token held and none can be obtained
    #[error("no access token is available")]
    MissingToken,

    /// This authenticator cannot obtain a fresh token
    #[error("token refresh is not supported by the {strategy} authenticator")]
    RefreshNotSupported {
        /// Authenticator name
        strategy: &'static str,
    },

    /// Token endpoint answered with a non-2xx status
    #[error("token request was rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },

    /// Token endpoint could not be reached
    #[error("could not reach the token endpoint: {0}")]
    Network(#[source] TransportError),

    /// Token endpoint answered 2xx with an unreadable body
    #[error("token response could not be decoded: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    /// Token contains bytes not allowed in a header
    #[error("access token is not a valid header value")]
    InvalidHeader,
}

/// Attaches credentials to requests
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return `request` with authorization attached
    async fn authorize(&self, request: ApiRequest) -> Result<ApiRequest, AuthError>;

    /// Obtain fresh credentials for subsequent `authorize` calls
    async fn refresh(&self) -> Result<(), AuthError>;

    /// Short name used in logs and errors
    fn name(&self) -> &'static str;
}

/// `Authorization: Bearer <token>`, marked sensitive so it is never logged
pub(crate) fn bearer_header(token: &SecureString) -> Result<HeaderValue, AuthError> {
    let mut value = token
        .with_exposed(|t| HeaderValue::from_str(&format!("Bearer {t}")))
        .map_err(|_| AuthError::InvalidHeader)?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_sensitive() {
        let header = bearer_header(&SecureString::new("abc")).unwrap();
        assert_eq!(header, "Bearer abc");
        assert!(header.is_sensitive());
        assert_eq!(format!("{header:?}"), "Sensitive");
    }

    #[test]
    fn newline_in_token_is_rejected() {
        assert!(matches!(
            bearer_header(&SecureString::new("abc\ndef")),
            Err(AuthError::InvalidHeader)
        ));
    }
}
