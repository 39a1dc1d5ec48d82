//! Structured credential payloads
//!
//! Optional sub-fields are omitted from the wire when absent. Fields the server
//! assigns (`password_hash`, `public_key_fingerprint`) are read but never written.

use serde::{Deserialize, Serialize};

/// `user` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserValue {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Server-computed crypt(3) hash of `password`
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
}

impl UserValue {
    /// Create a user payload for writing
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            password_hash: None,
        }
    }
}

/// `certificate` payload; any subset of the fields may be present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateValue {
    /// PEM-encoded CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
    /// Name of a CA credential stored in CredHub, used instead of `ca`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,
    /// PEM-encoded leaf certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    /// PEM-encoded private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// `rsa` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaValue {
    /// PEM-encoded public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// PEM-encoded private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// `ssh` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshValue {
    /// OpenSSH-format public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// PEM-encoded private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Server-computed SHA-256 fingerprint of `public_key`
    #[serde(default, skip_serializing)]
    pub public_key_fingerprint: Option<String>,
}
