use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Secret string (tokens, client secrets, passwords) that never prints itself
#[derive(Clone)]
pub struct SecureString(SecretString);

impl SecureString {
    /// Wrap `s`; its contents are zeroed on drop
    pub fn new(s: impl Into<String>) -> Self {
        Self(SecretString::from(s.into()))
    }

    /// Plain text, for building headers and form bodies
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Run `f` against the plain text without handing out a reference
    pub fn with_exposed<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        f(self.0.expose_secret())
    }

    /// Whether the secret is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureString(***)")
    }
}
