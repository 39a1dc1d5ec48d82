use clap::Args;
use credhub::CredHub;

use crate::output::print_message;

#[derive(Args)]
pub struct DeleteArgs {
    /// Name of the credential to delete
    #[arg(short, long)]
    pub name: String,
}

pub async fn run(credhub: &CredHub, args: DeleteArgs) -> anyhow::Result<()> {
    credhub.delete(&args.name).await?;
    print_message("Secret successfully deleted")
}
