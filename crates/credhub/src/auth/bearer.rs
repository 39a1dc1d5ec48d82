use async_trait::async_trait;
use http::header::AUTHORIZATION;

use super::{AuthError, Authenticator, bearer_header};
use crate::core::SecureString;
use crate::transport::ApiRequest;

/// Attaches a fixed, previously issued access token
///
/// Cannot refresh: a 401 with this authenticator is always terminal.
#[derive(Debug, Clone)]
pub struct BearerTokenAuthenticator {
    token: SecureString,
}

impl BearerTokenAuthenticator {
    /// Authenticator for `token`
    pub fn new(token: impl Into<SecureString>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authorize(&self, mut request: ApiRequest) -> Result<ApiRequest, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        request
            .headers
            .insert(AUTHORIZATION, bearer_header(&self.token)?);
        Ok(request)
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        Err(AuthError::RefreshNotSupported {
            strategy: self.name(),
        })
    }

    fn name(&self) -> &'static str {
        "bearer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn attaches_token() {
        let auth = BearerTokenAuthenticator::new("some-token");
        let request = auth.authorize(ApiRequest::get("/x")).await.unwrap();
        assert_eq!(request.headers[AUTHORIZATION], "Bearer some-token");
    }

    #[tokio::test]
    async fn empty_token_is_missing() {
        let auth = BearerTokenAuthenticator::new("");
        assert!(matches!(
            auth.authorize(ApiRequest::get("/x")).await,
            Err(AuthError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn refresh_is_unsupported() {
        let auth = BearerTokenAuthenticator::new("some-token");
        assert!(matches!(
            auth.refresh().await,
            Err(AuthError::RefreshNotSupported { strategy: "bearer" })
        ));
    }
}
