//! `credhub` command-line interface
//!
//! Exit codes:
//! - 0 success
//! - 1 server rejection or any other failure
//! - 2 configuration (no API target, missing credentials, unreadable config)
//! - 3 network
//! - 4 authorization
//! - 5 malformed server response

mod cli;
mod commands;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;
use credhub::CredHubError;
use credhub::core::ConfigError;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = credhub_log::Config::from_env().with_verbosity(cli.verbose);
    let _guard = match credhub_log::init_with(log_config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: logging disabled: {err}");
            None
        }
    };

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<CredHubError>() {
            return match err {
                CredHubError::NoApiTarget | CredHubError::Config(_) => 2,
                CredHubError::Network { .. } => 3,
                CredHubError::Unauthorized { .. } => 4,
                CredHubError::MalformedResponse { .. } | CredHubError::Decode { .. } => 5,
                CredHubError::Server { .. }
                | CredHubError::Encode { .. }
                | CredHubError::InvalidRequest { .. } => 1,
            };
        }
        if cause.is::<ConfigError>() || cause.is::<figment::Error>() {
            return 2;
        }
    }
    1
}
