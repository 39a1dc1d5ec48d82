//! Subcommand handlers

mod delete;
mod generate;
mod get;
mod set;

use credhub::{CredHub, CredHubBuilder, CredHubError};

pub use delete::DeleteArgs;
pub use generate::GenerateArgs;
pub use get::GetArgs;
pub use set::SetArgs;

use crate::cli::{Cli, Command};
use crate::config::{CliConfig, FlagOverrides};
use crate::output::OutputFormat;

/// Load configuration, build a client and run the chosen subcommand
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(
        cli.config.as_deref(),
        FlagOverrides {
            api_url: cli.api_url,
            skip_tls_validation: cli.skip_tls_validation.then_some(true),
        },
    )?;

    let client_config = config.client_config();
    if !client_config.has_api_target() {
        return Err(CredHubError::NoApiTarget.into());
    }
    tracing::debug!(api_url = %client_config.api_url, "loaded configuration");

    let credhub = CredHubBuilder::new(client_config)
        .shared_authenticator(config.authenticator()?)
        .build()?;
    let format = OutputFormat::from_flag(cli.output_json);

    dispatch(&credhub, cli.command, format).await
}

async fn dispatch(credhub: &CredHub, command: Command, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Command::Set(args) => set::run(credhub, args, format).await,
        Command::Get(args) => get::run(credhub, args, format).await,
        Command::Delete(args) => delete::run(credhub, args).await,
        Command::Generate(args) => generate::run(credhub, args, format).await,
    }
}
