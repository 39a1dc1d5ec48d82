use clap::Args;
use credhub::CredHub;
use credhub::credentials::{CredentialType, GenerationParameters};

use crate::output::{OutputFormat, print_credential};

#[derive(Args)]
pub struct GenerateArgs {
    /// Name of the credential to generate
    #[arg(short, long)]
    pub name: String,

    /// Credential type: password, user, rsa or ssh
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "password")]
    pub kind: CredentialType,

    /// Fixed username for `user` credentials
    #[arg(short = 'z', long)]
    pub username: Option<String>,

    /// Length of the generated password
    #[arg(short = 'l', long)]
    pub length: Option<u32>,

    /// Leave out upper-case letters
    #[arg(short = 'U', long)]
    pub exclude_upper: bool,

    /// Leave out lower-case letters
    #[arg(short = 'L', long)]
    pub exclude_lower: bool,

    /// Leave out digits
    #[arg(short = 'N', long)]
    pub exclude_number: bool,

    /// Add special characters
    #[arg(short = 'S', long)]
    pub include_special: bool,

    /// Key length in bits for `rsa` and `ssh` credentials
    #[arg(short = 'k', long, value_parser = parse_key_length)]
    pub key_length: Option<u32>,

    /// Comment appended to a generated ssh public key
    #[arg(short = 'm', long)]
    pub ssh_comment: Option<String>,

    /// Keep an existing credential instead of adding a new version
    #[arg(short = 'O', long)]
    pub no_overwrite: bool,
}

fn parse_key_length(raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(bits @ (2048 | 3072 | 4096)) => Ok(bits),
        _ => Err(format!("'{raw}' is not one of 2048, 3072 or 4096")),
    }
}

impl GenerateArgs {
    /// Parameters to send; flags left unset are left to server defaults
    pub fn parameters(&self) -> GenerationParameters {
        GenerationParameters {
            length: self.length,
            exclude_upper: self.exclude_upper.then_some(true),
            exclude_lower: self.exclude_lower.then_some(true),
            exclude_number: self.exclude_number.then_some(true),
            include_special: self.include_special.then_some(true),
            key_length: self.key_length,
            ssh_comment: self.ssh_comment.clone(),
        }
    }
}

pub async fn run(credhub: &CredHub, args: GenerateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let parameters = args.parameters();
    let overwrite = !args.no_overwrite;
    let credential = match args.kind {
        CredentialType::User => {
            credhub
                .generate_user(&args.name, args.username.as_deref(), &parameters, overwrite)
                .await?
        }
        kind => credhub.generate(&args.name, kind, &parameters, overwrite).await?,
    };
    print_credential(&credential, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn parse(args: &[&str]) -> GenerateArgs {
        let argv = ["credhub", "generate"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Generate(generate) => generate,
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn defaults_to_password_with_server_defaults() {
        let args = parse(&["-n", "/p"]);
        assert_eq!(args.kind, CredentialType::Password);
        assert_eq!(args.parameters(), GenerationParameters::default());
    }

    #[test]
    fn flags_become_parameters() {
        let args = parse(&["-n", "/p", "-l", "40", "-S", "-N"]);
        assert_eq!(
            args.parameters(),
            GenerationParameters {
                length: Some(40),
                include_special: Some(true),
                exclude_number: Some(true),
                ..GenerationParameters::default()
            }
        );
    }

    #[test]
    fn key_length_is_restricted() {
        assert_eq!(parse(&["-n", "/k", "-t", "rsa", "-k", "4096"]).key_length, Some(4096));
        assert!(Cli::try_parse_from(["credhub", "generate", "-n", "/k", "-k", "1024"]).is_err());
    }
}
