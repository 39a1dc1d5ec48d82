//! Credential model
//!
//! A stored credential is a named, typed value. The `type` tag and the shape of the
//! value always agree: [`CredentialValue`] carries one variant per tag, and
//! [`CredentialType`] is the tag on its own.

mod generate;
mod values;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

pub use generate::GenerationParameters;
pub use values::{CertificateValue, RsaValue, SshValue, UserValue};

/// Credential type tag as it appears in the `type` field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// Opaque password string
    Password,
    /// Opaque value string
    Value,
    /// Arbitrary JSON document
    Json,
    /// Username/password record
    User,
    /// CA, certificate and private key
    Certificate,
    /// RSA key pair
    Rsa,
    /// SSH key pair
    Ssh,
}

impl CredentialType {
    /// Every supported type, in wire-name order
    pub const ALL: [Self; 7] = [
        Self::Password,
        Self::Value,
        Self::Json,
        Self::User,
        Self::Certificate,
        Self::Rsa,
        Self::Ssh,
    ];

    /// Wire name of the type
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Value => "value",
            Self::Json => "json",
            Self::User => "user",
            Self::Certificate => "certificate",
            Self::Rsa => "rsa",
            Self::Ssh => "ssh",
        }
    }

    /// Whether the server can generate a value of this type
    pub const fn is_generatable(self) -> bool {
        matches!(self, Self::Password | Self::User | Self::Rsa | Self::Ssh)
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known credential type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown credential type '{0}'")]
pub struct UnknownCredentialType(pub String);

impl FromStr for CredentialType {
    type Err = UnknownCredentialType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCredentialType(s.to_string()))
    }
}

/// Typed credential payload, one variant per [`CredentialType`]
///
/// Serializes as the bare `value` payload; the tag travels separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CredentialValue {
    /// `password`
    Password(String),
    /// `value`
    Value(String),
    /// `json`
    Json(serde_json::Value),
    /// `user`
    User(UserValue),
    /// `certificate`
    Certificate(CertificateValue),
    /// `rsa`
    Rsa(RsaValue),
    /// `ssh`
    Ssh(SshValue),
}

impl CredentialValue {
    /// Tag matching this payload
    pub const fn credential_type(&self) -> CredentialType {
        match self {
            Self::Password(_) => CredentialType::Password,
            Self::Value(_) => CredentialType::Value,
            Self::Json(_) => CredentialType::Json,
            Self::User(_) => CredentialType::User,
            Self::Certificate(_) => CredentialType::Certificate,
            Self::Rsa(_) => CredentialType::Rsa,
            Self::Ssh(_) => CredentialType::Ssh,
        }
    }

    /// Payload as a string for the two opaque-string variants
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Password(s) | Self::Value(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for CredentialValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<UserValue> for CredentialValue {
    fn from(value: UserValue) -> Self {
        Self::User(value)
    }
}

impl From<CertificateValue> for CredentialValue {
    fn from(value: CertificateValue) -> Self {
        Self::Certificate(value)
    }
}

impl From<RsaValue> for CredentialValue {
    fn from(value: RsaValue) -> Self {
        Self::Rsa(value)
    }
}

impl From<SshValue> for CredentialValue {
    fn from(value: SshValue) -> Self {
        Self::Ssh(value)
    }
}

/// A credential as returned by the server
///
/// `id` and `version_created_at` are server-assigned and therefore absent on
/// anything decoded from a request payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    /// Server-assigned version identifier
    pub id: Option<String>,
    /// Hierarchical credential path, e.g. `/example-password`
    pub name: String,
    /// Typed payload
    pub value: CredentialValue,
    /// Creation time of this version
    pub version_created_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Tag of the stored value
    pub const fn credential_type(&self) -> CredentialType {
        self.value.credential_type()
    }
}

// Same shape as the server's response envelope, `type` included.
impl Serialize for Credential {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut envelope = serializer.serialize_struct("Credential", 5)?;
        if let Some(id) = &self.id {
            envelope.serialize_field("id", id)?;
        }
        envelope.serialize_field("name", &self.name)?;
        envelope.serialize_field("type", &self.credential_type())?;
        envelope.serialize_field("value", &self.value)?;
        if let Some(created) = &self.version_created_at {
            envelope.serialize_field("version_created_at", created)?;
        }
        envelope.end()
    }
}
