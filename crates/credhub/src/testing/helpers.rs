//! Client assembly for tests

use std::sync::Arc;

use super::{MockAuthenticator, MockHttpClient, TEST_API_URL};
use crate::client::{CredHub, CredHubBuilder};
use crate::core::ClientConfig;

/// A client wired to fresh mocks
pub struct MockCredHub {
    /// Client under test
    pub credhub: CredHub,
    /// Transport double
    pub http: Arc<MockHttpClient>,
    /// Authenticator double
    pub auth: Arc<MockAuthenticator>,
}

/// Client over mocks, targeting [`TEST_API_URL`]
pub fn mock_credhub() -> MockCredHub {
    mock_credhub_with_config(ClientConfig::new(TEST_API_URL))
}

/// Client over mocks with an explicit configuration
pub fn mock_credhub_with_config(config: ClientConfig) -> MockCredHub {
    let http = Arc::new(MockHttpClient::new());
    let auth = Arc::new(MockAuthenticator::new());
    let credhub = CredHubBuilder::new(config)
        .http_client(http.clone())
        .shared_authenticator(auth.clone())
        .build();
    match credhub {
        Ok(credhub) => MockCredHub { credhub, http, auth },
        Err(err) => panic!("mock client must build: {err}"),
    }
}
