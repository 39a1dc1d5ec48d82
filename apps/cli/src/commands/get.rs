use clap::Args;
use credhub::CredHub;

use crate::output::{OutputFormat, print_credential};

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct GetArgs {
    /// Name of the credential to fetch
    #[arg(short, long)]
    pub name: Option<String>,

    /// Version identifier to fetch
    #[arg(long)]
    pub id: Option<String>,
}

pub async fn run(credhub: &CredHub, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let credential = match (args.name, args.id) {
        (_, Some(id)) => credhub.get_by_id(&id).await?,
        (Some(name), None) => credhub.get(&name).await?,
        (None, None) => anyhow::bail!("either --name or --id is required"),
    };
    print_credential(&credential, format)
}
