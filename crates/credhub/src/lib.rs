//! CredHub client
//!
//! A typed, authenticated client for the CredHub credential store API.
//!
//! # Layers
//!
//! - **Credentials** - one enum variant per credential type, tag and shape always agree
//! - **Codec** - the only place that knows the JSON wire shapes
//! - **Authenticators** - UAA OAuth2, fixed bearer token, or a test double
//! - **Transport** - authorize, send, and refresh-then-retry exactly once on 401
//! - **Classifier** - 2xx / 401 / error envelope / malformed
//! - **Repository and Action** - orchestration for one invocation
//! - **[`CredHub`]** - the high-level facade

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Single-invocation entry point
pub mod action;
/// Authentication strategies
pub mod auth;
pub mod classify;
/// Request and response body encoding
pub mod codec;
pub mod client;
/// Core types, errors, and configuration
pub mod core;
pub mod credentials;
pub mod repository;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

pub use crate::client::{CredHub, CredHubBuilder};
pub use crate::core::{CredHubError, Result};

/// Commonly used types and traits
pub mod prelude {
    pub use crate::auth::{AuthError, Authenticator, BearerTokenAuthenticator, Grant, UaaAuthenticator};
    pub use crate::client::{CredHub, CredHubBuilder};
    pub use crate::core::{ClientConfig, ConfigError, CredHubError, DecodeError, SecureString};
    pub use crate::credentials::{
        CertificateValue, Credential, CredentialType, CredentialValue, GenerationParameters,
        RsaValue, SshValue, UserValue,
    };
    pub use async_trait::async_trait;
}
