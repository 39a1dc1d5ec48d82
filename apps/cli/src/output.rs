//! Credential rendering on stdout

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Utc};
use credhub::credentials::{Credential, CredentialType, CredentialValue};
use serde::Serialize;

/// How credentials are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn from_flag(output_json: bool) -> Self {
        if output_json { Self::Json } else { Self::Yaml }
    }
}

/// Printed form of a credential
///
/// Unlike the request encoding, this includes the fields the server assigns to
/// `user` and `ssh` values.
#[derive(Serialize)]
struct CredentialView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    name: &'a str,
    #[serde(rename = "type")]
    kind: CredentialType,
    value: ValueView<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_created_at: Option<&'a DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ValueView<'a> {
    User {
        username: &'a str,
        password: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        password_hash: Option<&'a str>,
    },
    Ssh {
        #[serde(skip_serializing_if = "Option::is_none")]
        public_key: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        private_key: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        public_key_fingerprint: Option<&'a str>,
    },
    Plain(&'a CredentialValue),
}

impl<'a> From<&'a Credential> for CredentialView<'a> {
    fn from(credential: &'a Credential) -> Self {
        let value = match &credential.value {
            CredentialValue::User(user) => ValueView::User {
                username: &user.username,
                password: &user.password,
                password_hash: user.password_hash.as_deref(),
            },
            CredentialValue::Ssh(ssh) => ValueView::Ssh {
                public_key: ssh.public_key.as_deref(),
                private_key: ssh.private_key.as_deref(),
                public_key_fingerprint: ssh.public_key_fingerprint.as_deref(),
            },
            other => ValueView::Plain(other),
        };
        Self {
            id: credential.id.as_deref(),
            name: &credential.name,
            kind: credential.credential_type(),
            value,
            version_created_at: credential.version_created_at.as_ref(),
        }
    }
}

/// Render `credential` in `format`, without a trailing newline
pub fn render(credential: &Credential, format: OutputFormat) -> anyhow::Result<String> {
    let view = CredentialView::from(credential);
    let rendered = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&view).context("failed to render credential as YAML")?
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&view).context("failed to render credential as JSON")?
        }
    };
    Ok(rendered.trim_end().to_string())
}

/// Print `credential` to stdout
pub fn print_credential(credential: &Credential, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(credential, format)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

/// Print a one-line status message to stdout
pub fn print_message(message: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{message}")?;
    Ok(())
}
