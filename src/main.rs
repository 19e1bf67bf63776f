//! Entrypoint for the vault management scripts

use std::path::Path;

use clap::Parser;
use vault_scripts::{addresses::AddressStore, cli::Cli, errors::ScriptError, utils::setup_client};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        deployments_path,
        backup_path,
        artifacts_path,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let (client, chain_id) = setup_client(&priv_key, &rpc_url).await?;
    let store = AddressStore::new(deployments_path, backup_path);

    command
        .run(client, chain_id, &store, Path::new(&artifacts_path))
        .await
}
