//! Definitions of CLI arguments and commands for the vault management scripts

use std::{path::Path, sync::Arc};

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    addresses::AddressStore,
    commands::{
        add_holding_position, add_trusted_position, add_vault_to_registry, change_vault_addresses,
        deploy_accounting_manager, deploy_connector, deploy_shared_contracts, deposit, get_tvl,
        grant_emergency_role, rescue, sync_vault_details, update_connectors,
    },
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_BACKUP_DIR, DEFAULT_BASE_TOKEN_SYMBOL,
        DEFAULT_DEPLOYMENTS_DIR,
    },
    errors::ScriptError,
    types::{ConnectorContract, SharedContract},
};

/// Deploys and administers the multi-chain vault contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer / operator
    #[arg(short, long, env = "OPERATOR_PRIV_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Directory holding the deployment address records
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub deployments_path: String,

    /// Directory receiving single-generation backups of vault records
    #[arg(long, default_value = DEFAULT_BACKUP_DIR)]
    pub backup_path: String,

    /// Directory holding contract compilation artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_path: String,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts runnable against the vault contract suite
#[derive(Subcommand)]
pub enum Command {
    /// Deploy chain-wide singleton contracts and record them in the shared file
    DeploySharedContracts(DeploySharedContractsArgs),
    /// Deploy a vault's accounting manager
    DeployAccountingManager(DeployAccountingManagerArgs),
    /// Deploy a connector for a vault
    DeployConnector(DeployConnectorArgs),
    /// Deposit base tokens into a vault
    Deposit(DepositArgs),
    /// Rescue a token held by a vault's accounting manager
    Rescue(RescueArgs),
    /// Print the current TVL of a vault
    GetTvl(GetTvlArgs),
    /// Copy a vault's on-chain details into its address record
    SyncVaultDetails(SyncVaultDetailsArgs),
    /// Register a vault with the position registry
    AddVaultToRegistry(AddVaultToRegistryArgs),
    /// Register a vault's connectors with the position registry
    UpdateConnectors(UpdateConnectorsArgs),
    /// Grant the registry's emergency role to an account
    GrantEmergencyRole(GrantEmergencyRoleArgs),
    /// Rotate a vault's role addresses in the position registry
    ChangeVaultAddresses(ChangeVaultAddressesArgs),
    /// Register a recorded connector as a trusted position
    AddTrustedPosition(AddTrustedPositionArgs),
    /// Register a holding position through a recorded mock connector
    AddHoldingPosition(AddHoldingPositionArgs),
}

impl Command {
    /// Runs the selected script against the connected chain
    pub async fn run(
        self,
        client: Arc<impl Middleware>,
        chain_id: u64,
        store: &AddressStore,
        artifacts_dir: &Path,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeploySharedContracts(args) => {
                deploy_shared_contracts(args, client, chain_id, store, artifacts_dir).await
            }
            Command::DeployAccountingManager(args) => {
                deploy_accounting_manager(args, client, chain_id, store, artifacts_dir).await
            }
            Command::DeployConnector(args) => {
                deploy_connector(args, client, chain_id, store, artifacts_dir).await
            }
            Command::Deposit(args) => deposit(args, client, chain_id, store).await,
            Command::Rescue(args) => rescue(args, client, chain_id, store).await,
            Command::GetTvl(args) => get_tvl(args, client, chain_id, store).await,
            Command::SyncVaultDetails(args) => {
                sync_vault_details(args, client, chain_id, store).await
            }
            Command::AddVaultToRegistry(args) => {
                add_vault_to_registry(args, client, chain_id, store).await
            }
            Command::UpdateConnectors(args) => {
                update_connectors(args, client, chain_id, store).await
            }
            Command::GrantEmergencyRole(args) => {
                grant_emergency_role(args, client, chain_id, store).await
            }
            Command::ChangeVaultAddresses(args) => {
                change_vault_addresses(args, client, chain_id, store).await
            }
            Command::AddTrustedPosition(args) => {
                add_trusted_position(args, client, chain_id, store).await
            }
            Command::AddHoldingPosition(args) => {
                add_holding_position(args, client, chain_id, store).await
            }
        }
    }
}

/// Deploy chain-wide singleton contracts.
///
/// Contracts are deployed in the order given; constructor dependencies
/// (registry before oracle, both before the swap handler) must either already
/// be recorded or appear earlier in the list. Already-recorded contracts are
/// skipped.
#[derive(Args)]
pub struct DeploySharedContractsArgs {
    /// The shared contracts to deploy, in order
    #[arg(short, long, value_enum, num_args = 1..)]
    pub contracts: Vec<SharedContract>,

    /// Address owning the deployed contracts
    #[arg(short, long)]
    pub owner: String,
}

/// Deploy the accounting manager for a vault and record it
#[derive(Args)]
pub struct DeployAccountingManagerArgs {
    /// Id of the vault to deploy for
    pub vault_id: String,

    /// Display name of the vault share token
    #[arg(long)]
    pub name: String,

    /// Symbol of the vault share token
    #[arg(long)]
    pub symbol: String,

    /// Symbol of the base token, resolved through constants.json
    #[arg(long, default_value = DEFAULT_BASE_TOKEN_SYMBOL)]
    pub base_token_symbol: String,

    /// Receiver of withdraw and management fees
    #[arg(long)]
    pub management_fee_receiver: String,

    /// Receiver of performance fees
    #[arg(long)]
    pub performance_fee_receiver: String,

    /// Withdraw fee, in basis points
    #[arg(long, default_value_t = 0)]
    pub withdraw_fee: u64,

    /// Performance fee, in basis points
    #[arg(long, default_value_t = 0)]
    pub performance_fee: u64,

    /// Management fee, in basis points
    #[arg(long, default_value_t = 0)]
    pub management_fee: u64,
}

/// Deploy a connector and append it to the vault's address record
#[derive(Args)]
pub struct DeployConnectorArgs {
    /// Id of the vault to deploy for
    pub vault_id: String,

    /// The connector contract to deploy
    #[arg(short, long, value_enum)]
    pub connector: ConnectorContract,
}

/// Deposit base tokens into a vault
#[derive(Args)]
pub struct DepositArgs {
    /// Id of the vault to deposit into
    pub vault_id: String,

    /// Amount to deposit, in base token units
    #[arg(short, long)]
    pub amount: String,

    /// Receiver of the vault shares; defaults to the operator
    #[arg(long)]
    pub receiver: Option<String>,

    /// Approve the accounting manager for the deposit amount first
    #[arg(long)]
    pub approve: bool,
}

/// Rescue a token held by a vault's accounting manager
#[derive(Args)]
pub struct RescueArgs {
    /// Id of the vault to rescue from
    pub vault_id: String,

    /// Token to rescue; defaults to the vault's base token
    #[arg(short, long)]
    pub token: Option<String>,
}

/// Print the current TVL of a vault
#[derive(Args)]
pub struct GetTvlArgs {
    /// Id of the vault to query
    pub vault_id: String,
}

/// Copy on-chain vault details into the address records
#[derive(Args)]
pub struct SyncVaultDetailsArgs {
    /// Ids of the vaults to sync
    #[arg(short = 'i', long, num_args = 1..)]
    pub vault_ids: Vec<String>,
}

/// Role addresses shared by the registry administration scripts.
///
/// Every role defaults to the admin address and can be overridden
/// individually.
#[derive(Args)]
pub struct RoleArgs {
    /// Default address for all roles
    #[arg(long)]
    pub admin: String,

    /// Governor of the vault
    #[arg(long)]
    pub governor: Option<String>,

    /// Maintainer of the vault
    #[arg(long)]
    pub maintainer: Option<String>,

    /// Maintainer exempt from the timelock
    #[arg(long)]
    pub maintainer_without_timelock: Option<String>,

    /// Keeper contract of the vault
    #[arg(long)]
    pub keeper: Option<String>,

    /// Watcher of the vault
    #[arg(long)]
    pub watcher: Option<String>,

    /// Emergency address of the vault
    #[arg(long)]
    pub emergency: Option<String>,
}

/// Register a vault with the position registry
#[derive(Args)]
pub struct AddVaultToRegistryArgs {
    /// Id of the vault to register
    pub vault_id: String,

    /// Role addresses for the vault
    #[command(flatten)]
    pub roles: RoleArgs,

    /// Tokens trusted by the vault
    #[arg(long, num_args = 0..)]
    pub trusted_tokens: Vec<String>,
}

/// Register connectors with the position registry
#[derive(Args)]
pub struct UpdateConnectorsArgs {
    /// Id of the vault the connectors belong to
    pub vault_id: String,

    /// Connector addresses to register; defaults to every connector recorded
    /// for the current chain
    #[arg(short, long, num_args = 0..)]
    pub connectors: Vec<String>,
}

/// Grant the registry's emergency role
#[derive(Args)]
pub struct GrantEmergencyRoleArgs {
    /// Account to grant the role to
    #[arg(short, long)]
    pub account: String,
}

/// Rotate a vault's role addresses in the position registry
#[derive(Args)]
pub struct ChangeVaultAddressesArgs {
    /// Id of the vault to update
    pub vault_id: String,

    /// Replacement role addresses
    #[command(flatten)]
    pub roles: RoleArgs,
}

/// Register a recorded connector as a trusted position
#[derive(Args)]
pub struct AddTrustedPositionArgs {
    /// Id of the vault the connector belongs to
    pub vault_id: String,

    /// Index of the connector among those recorded for the current chain
    #[arg(long, default_value_t = 0)]
    pub connector_index: usize,

    /// Position type id to register
    #[arg(long, default_value_t = 1)]
    pub position_type_id: u64,
}

/// Register a holding position through a recorded mock connector
#[derive(Args)]
pub struct AddHoldingPositionArgs {
    /// Id of the vault the connector belongs to
    pub vault_id: String,

    /// Index of the connector among those recorded for the current chain
    #[arg(long, default_value_t = 0)]
    pub connector_index: usize,

    /// Position type id to register
    #[arg(long, default_value_t = 1)]
    pub position_type_id: u64,
}
