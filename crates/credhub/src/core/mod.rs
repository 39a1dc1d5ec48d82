//! Core types shared by every layer
mod config;
mod error;
mod secure;

pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ConfigError, CredHubError, DecodeError, Result};
pub use secure::SecureString;
