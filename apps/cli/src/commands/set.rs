use clap::Args;
use credhub::credentials::{
    CertificateValue, CredentialType, CredentialValue, RsaValue, SshValue, UserValue,
};
use credhub::{CredHub, CredHubError};

use crate::output::{OutputFormat, print_credential};

#[derive(Args)]
pub struct SetArgs {
    /// Name of the credential to set
    #[arg(short, long)]
    pub name: String,

    /// Credential type: password, value, json, user, certificate, rsa or ssh
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: CredentialType,

    /// Value for `value` and `json` credentials (`password` accepts it too)
    #[arg(long)]
    pub value: Option<String>,

    /// Password for `password` and `user` credentials
    #[arg(short = 'w', long)]
    pub password: Option<String>,

    /// Username for `user` credentials
    #[arg(short = 'z', long)]
    pub username: Option<String>,

    /// CA certificate for `certificate` credentials
    #[arg(short = 'r', long)]
    pub root: Option<String>,

    /// Name of a stored CA to use instead of `--root`
    #[arg(short = 'm', long)]
    pub ca_name: Option<String>,

    /// Certificate for `certificate` credentials
    #[arg(short = 'c', long)]
    pub certificate: Option<String>,

    /// Private key for `certificate`, `rsa` and `ssh` credentials
    #[arg(short = 'p', long)]
    pub private: Option<String>,

    /// Public key for `rsa` and `ssh` credentials
    #[arg(short = 'u', long)]
    pub public: Option<String>,

    /// Keep an existing credential instead of adding a new version
    #[arg(short = 'O', long)]
    pub no_overwrite: bool,
}

fn required(flag: &str, kind: CredentialType, value: Option<String>) -> Result<String, CredHubError> {
    value.ok_or_else(|| CredHubError::invalid_request(format!("{flag} is required for {kind} credentials")))
}

impl SetArgs {
    /// Typed value for the requested credential type
    pub fn credential_value(&self) -> Result<CredentialValue, CredHubError> {
        let kind = self.kind;
        let value = match kind {
            CredentialType::Password => CredentialValue::Password(required(
                "--password",
                kind,
                self.password.clone().or_else(|| self.value.clone()),
            )?),
            CredentialType::Value => {
                CredentialValue::Value(required("--value", kind, self.value.clone())?)
            }
            CredentialType::Json => {
                let raw = required("--value", kind, self.value.clone())?;
                let document = serde_json::from_str(&raw).map_err(|e| {
                    CredHubError::invalid_request(format!("--value is not valid JSON: {e}"))
                })?;
                CredentialValue::Json(document)
            }
            CredentialType::User => CredentialValue::User(UserValue::new(
                required("--username", kind, self.username.clone())?,
                required("--password", kind, self.password.clone())?,
            )),
            CredentialType::Certificate => {
                let certificate = CertificateValue {
                    ca: self.root.clone(),
                    ca_name: self.ca_name.clone(),
                    certificate: self.certificate.clone(),
                    private_key: self.private.clone(),
                };
                if certificate == CertificateValue::default() {
                    return Err(CredHubError::invalid_request(
                        "at least one of --root, --ca-name, --certificate or --private is required",
                    ));
                }
                CredentialValue::Certificate(certificate)
            }
            CredentialType::Rsa => {
                self.require_key_pair_field(kind)?;
                CredentialValue::Rsa(RsaValue {
                    public_key: self.public.clone(),
                    private_key: self.private.clone(),
                })
            }
            CredentialType::Ssh => {
                self.require_key_pair_field(kind)?;
                CredentialValue::Ssh(SshValue {
                    public_key: self.public.clone(),
                    private_key: self.private.clone(),
                    public_key_fingerprint: None,
                })
            }
        };
        Ok(value)
    }

    fn require_key_pair_field(&self, kind: CredentialType) -> Result<(), CredHubError> {
        if self.public.is_none() && self.private.is_none() {
            return Err(CredHubError::invalid_request(format!(
                "at least one of --public or --private is required for {kind} credentials"
            )));
        }
        Ok(())
    }
}

pub async fn run(credhub: &CredHub, args: SetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let value = args.credential_value()?;
    let credential = credhub.set(&args.name, value, !args.no_overwrite).await?;
    print_credential(&credential, format)
}
