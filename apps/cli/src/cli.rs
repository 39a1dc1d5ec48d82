//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{DeleteArgs, GenerateArgs, GetArgs, SetArgs};

#[derive(Parser)]
#[command(name = "credhub")]
#[command(about = "Command-line interface for the CredHub secret store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file [default: ~/.credhub/config.toml]
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print credentials as JSON instead of YAML
    #[arg(long, global = true)]
    pub output_json: bool,

    /// CredHub API URL, overriding the configuration file and environment
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    pub skip_tls_validation: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Set a credential to a provided value
    Set(SetArgs),
    /// Fetch a credential by name or version identifier
    Get(GetArgs),
    /// Delete every version of a credential
    Delete(DeleteArgs),
    /// Have the server generate a credential value
    Generate(GenerateArgs),
}
