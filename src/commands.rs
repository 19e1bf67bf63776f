//! Implementations of the deployment and administration scripts.
//!
//! Every script follows the same read-before-mutate cycle: load the address
//! records, resolve or deploy contracts against the connected chain, then
//! persist any new addresses. Missing deployed dependencies are soft skips
//! (a warning and a clean exit), so "nothing to do" stays distinguishable
//! from "something went wrong".

use std::{path::Path, str::FromStr, sync::Arc};

use ethers::{
    abi::{Address, Detokenize},
    contract::FunctionCall,
    providers::Middleware,
    types::{Bytes, U256},
};
use tracing::{info, warn};

use crate::{
    addresses::{AddressStore, ConnectorEntry, SharedAddressRecord, VaultAddressRecord},
    cli::{
        AddHoldingPositionArgs, AddTrustedPositionArgs, AddVaultToRegistryArgs,
        ChangeVaultAddressesArgs, DeployAccountingManagerArgs, DeployConnectorArgs,
        DeploySharedContractsArgs, DepositArgs, GetTvlArgs, GrantEmergencyRoleArgs, RescueArgs,
        RoleArgs, SyncVaultDetailsArgs, UpdateConnectorsArgs,
    },
    constants::{
        ACCOUNTING_MANAGER_CONTRACT_NAME, PANCAKESWAP_FACTORY_KEY, PANCAKESWAP_MASTER_CHEF_KEY,
        PANCAKESWAP_POSITION_MANAGER_KEY, STARGATE_LP_STAKING_KEY, STARGATE_ROUTER_KEY,
        UNISWAP_FACTORY_KEY, UNISWAP_POSITION_MANAGER_KEY,
    },
    errors::ScriptError,
    solidity::{
        AccountingManagerContract, ConnectorMockContract, Ierc20Contract,
        PositionRegistryContract,
    },
    types::{ConnectorContract, SharedContract},
    utils::deploy_contract,
};

/// Parses a hex address argument
fn parse_address(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Parses a decimal amount argument
fn parse_amount(amount: &str) -> Result<U256, ScriptError> {
    U256::from_dec_str(amount).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Parses a vault id into its on-chain representation
fn parse_vault_id(vault_id: &str) -> Result<U256, ScriptError> {
    U256::from_dec_str(vault_id).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Sends a state-changing contract call and waits for it to be mined
async fn send_tx<M: Middleware, D: Detokenize>(
    call: FunctionCall<Arc<M>, M, D>,
) -> Result<(), ScriptError> {
    call.send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    Ok(())
}

/// Resolves the six registry role addresses, falling back to the admin
/// address for any role not set explicitly
fn resolve_roles(roles: &RoleArgs) -> Result<[Address; 6], ScriptError> {
    let admin = parse_address(&roles.admin)?;
    let resolve = |role: &Option<String>| -> Result<Address, ScriptError> {
        match role {
            Some(addr) => parse_address(addr),
            None => Ok(admin),
        }
    };
    Ok([
        resolve(&roles.governor)?,
        resolve(&roles.maintainer)?,
        resolve(&roles.maintainer_without_timelock)?,
        resolve(&roles.keeper)?,
        resolve(&roles.watcher)?,
        resolve(&roles.emergency)?,
    ])
}

/// Constructor arguments for the swap-and-bridge handler.
///
/// The leading users whitelist starts empty; swap handlers are registered
/// post-deployment.
fn swap_handler_constructor_args(
    value_oracle: Address,
    registry: Address,
) -> (Vec<Address>, Address, Address) {
    (Vec::new(), value_oracle, registry)
}

/// Builds a deposit call against a vault's accounting manager.
///
/// The operator is always recorded as the referrer, regardless of who
/// receives the shares.
fn deposit_call<M: Middleware>(
    manager: &AccountingManagerContract<M>,
    receiver: Address,
    amount: U256,
    operator: Address,
) -> FunctionCall<Arc<M>, M, ()> {
    manager.deposit(receiver, amount, operator)
}

/// The vault's accounting manager handle on the given chain, if one is
/// recorded
fn accounting_manager<M: Middleware>(
    record: &VaultAddressRecord,
    vault_id: &str,
    chain_id: u64,
    client: Arc<M>,
) -> Option<AccountingManagerContract<M>> {
    match record.accounting_manager(chain_id) {
        Some(address) => Some(AccountingManagerContract::new(address, client)),
        None => {
            warn!("accounting manager not deployed for vault {vault_id} on chain {chain_id}");
            None
        }
    }
}

/// The position registry handle on the given chain, if one is recorded
fn registry<M: Middleware>(
    shared: &SharedAddressRecord,
    chain_id: u64,
    client: Arc<M>,
) -> Option<PositionRegistryContract<M>> {
    match shared.chain(chain_id).and_then(|c| c.registry) {
        Some(address) => Some(PositionRegistryContract::new(address, client)),
        None => {
            warn!("registry not deployed on chain {chain_id}, deploy the shared contracts first");
            None
        }
    }
}

/// A connector recorded for the vault on the given chain, by index
fn chain_connector<'a>(
    record: &'a VaultAddressRecord,
    vault_id: &str,
    chain_id: u64,
    index: usize,
) -> Option<&'a ConnectorEntry> {
    let entry = record
        .connectors
        .iter()
        .filter(|c| c.chain_id == chain_id)
        .nth(index);
    if entry.is_none() {
        warn!("no connector at index {index} recorded for vault {vault_id} on chain {chain_id}");
    }
    entry
}

/// Deploys the requested chain-wide singleton contracts and records their
/// addresses in the shared-contracts file
pub async fn deploy_shared_contracts(
    args: DeploySharedContractsArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
    artifacts_dir: &Path,
) -> Result<(), ScriptError> {
    let owner = parse_address(&args.owner)?;
    let mut shared = store.read_shared()?;
    let entry = shared.chain_mut(chain_id);

    info!("deploying shared contracts on chain {chain_id}");
    for contract in args.contracts {
        let name = contract.contract_name();
        match contract {
            SharedContract::Registry => {
                if entry.registry.is_some() {
                    warn!("{contract} already deployed on chain {chain_id}");
                    continue;
                }
                let address = deploy_contract(
                    client.clone(),
                    artifacts_dir,
                    name,
                    None,
                    (owner, owner, owner, Address::zero()),
                )
                .await?;
                info!("{name} deployed to {address:#x}");
                entry.registry = Some(address);
            }
            SharedContract::TvlHelper => {
                if entry.tvl_helper.is_some() {
                    warn!("{contract} already deployed on chain {chain_id}");
                    continue;
                }
                let address = deploy_contract(client.clone(), artifacts_dir, name, None, ()).await?;
                info!("{name} deployed to {address:#x}");
                entry.tvl_helper = Some(address);
            }
            SharedContract::ValueOracle => {
                if entry.value_oracle.is_some() {
                    warn!("{contract} already deployed on chain {chain_id}");
                    continue;
                }
                let Some(registry) = entry.registry else {
                    warn!("deploy the registry before the value oracle");
                    continue;
                };
                let address =
                    deploy_contract(client.clone(), artifacts_dir, name, None, (registry,)).await?;
                info!("{name} deployed to {address:#x}");
                entry.value_oracle = Some(address);
            }
            SharedContract::SwapHandler => {
                if entry.swap_handler.is_some() {
                    warn!("{contract} already deployed on chain {chain_id}");
                    continue;
                }
                let (Some(registry), Some(value_oracle)) = (entry.registry, entry.value_oracle)
                else {
                    warn!("deploy the registry and value oracle before the swap handler");
                    continue;
                };
                let address = deploy_contract(
                    client.clone(),
                    artifacts_dir,
                    name,
                    None,
                    swap_handler_constructor_args(value_oracle, registry),
                )
                .await?;
                info!("{name} deployed to {address:#x}");
                entry.swap_handler = Some(address);
            }
            SharedContract::LzHelperSender | SharedContract::LzHelperReceiver => {
                let deployed = match contract {
                    SharedContract::LzHelperSender => &entry.lz_helper_sender,
                    _ => &entry.lz_helper_receiver,
                };
                if deployed.is_some() {
                    warn!("{contract} already deployed on chain {chain_id}");
                    continue;
                }
                let Some(lz_endpoint) = entry.lz_endpoint else {
                    warn!("no LZEndpoint recorded for chain {chain_id}, add it to the shared file first");
                    continue;
                };
                let address = deploy_contract(
                    client.clone(),
                    artifacts_dir,
                    name,
                    None,
                    (lz_endpoint, owner),
                )
                .await?;
                info!("{name} deployed to {address:#x}");
                match contract {
                    SharedContract::LzHelperSender => entry.lz_helper_sender = Some(address),
                    _ => entry.lz_helper_receiver = Some(address),
                }
            }
        }
    }

    store.write_shared(&shared)
}

/// Deploys a vault's accounting manager, linking the TVL helper library, and
/// records the deployment along with the vault-global details
pub async fn deploy_accounting_manager(
    args: DeployAccountingManagerArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
    artifacts_dir: &Path,
) -> Result<(), ScriptError> {
    let mut record = store.read_vault(&args.vault_id)?;
    if record.accounting_manager(chain_id).is_some() {
        warn!(
            "accounting manager already deployed for vault {} on chain {chain_id}",
            args.vault_id
        );
        return Ok(());
    }

    let shared = store.read_shared()?;
    let Some(shared_chain) = shared.chain(chain_id) else {
        warn!("no shared contracts recorded for chain {chain_id}, deploy them first");
        return Ok(());
    };
    let (Some(registry), Some(value_oracle), Some(tvl_helper)) = (
        shared_chain.registry,
        shared_chain.value_oracle,
        shared_chain.tvl_helper,
    ) else {
        warn!("registry, value oracle and TVL helper must be deployed first on chain {chain_id}");
        return Ok(());
    };

    let constants = store.read_constants()?;
    let tokens = constants
        .chain(chain_id)
        .map(|c| &c.tokens)
        .ok_or_else(|| {
            ScriptError::Schema(format!("constants.json has no entry for chain {chain_id}"))
        })?;
    let base_token = *tokens.get(&args.base_token_symbol).ok_or_else(|| {
        ScriptError::Schema(format!(
            "no \"{}\" token recorded for chain {chain_id} in constants.json",
            args.base_token_symbol
        ))
    })?;

    let vault_id = parse_vault_id(&args.vault_id)?;
    let management_fee_receiver = parse_address(&args.management_fee_receiver)?;
    let performance_fee_receiver = parse_address(&args.performance_fee_receiver)?;

    info!(
        "deploying accounting manager for vault {} on chain {chain_id}",
        args.vault_id
    );
    // The constructor takes its parameters as a single struct
    let constructor_params = (
        args.name.clone(),
        args.symbol.clone(),
        base_token,
        registry,
        value_oracle,
        vault_id,
        management_fee_receiver,
        management_fee_receiver,
        performance_fee_receiver,
        U256::from(args.withdraw_fee),
        U256::from(args.performance_fee),
        U256::from(args.management_fee),
    );
    let address = deploy_contract(
        client,
        artifacts_dir,
        ACCOUNTING_MANAGER_CONTRACT_NAME,
        Some(tvl_helper),
        (constructor_params,),
    )
    .await?;
    info!("AccountingManager deployed to {address:#x}");

    record.chain_mut(chain_id).accounting_manager = Some(address);
    record.name = Some(args.name);
    record.symbol = Some(args.symbol);
    record.base_token = Some(base_token);
    record.vault_id = Some(vault_id.as_u64());
    store.write_vault(&args.vault_id, &record)
}

/// Deploys a connector for a vault and appends it to the vault's connector
/// sequence
pub async fn deploy_connector(
    args: DeployConnectorArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
    artifacts_dir: &Path,
) -> Result<(), ScriptError> {
    let mut record = store.read_vault(&args.vault_id)?;
    let shared = store.read_shared()?;
    let Some(shared_chain) = shared.chain(chain_id) else {
        warn!("no shared contracts recorded for chain {chain_id}, deploy them first");
        return Ok(());
    };
    let Some(registry) = shared_chain.registry else {
        warn!("registry not deployed on chain {chain_id}, deploy the shared contracts first");
        return Ok(());
    };

    let vault_id = parse_vault_id(&args.vault_id)?;
    let name = args.connector.contract_name();

    // The mock connector only binds to the registry; every real connector
    // additionally takes a base parameter struct (registry, vault id, swap
    // handler, value oracle) after its venue-specific addresses, which come
    // from the shared record.
    let address = if let ConnectorContract::Mock = args.connector {
        deploy_contract(client, artifacts_dir, name, None, (registry, vault_id)).await?
    } else {
        let (Some(swap_handler), Some(value_oracle)) =
            (shared_chain.swap_handler, shared_chain.value_oracle)
        else {
            warn!("swap handler and value oracle must be deployed first on chain {chain_id}");
            return Ok(());
        };
        let base_params = (registry, vault_id, swap_handler, value_oracle);

        let venue_keys: &[&str] = match args.connector {
            ConnectorContract::Univ3 => &[UNISWAP_POSITION_MANAGER_KEY, UNISWAP_FACTORY_KEY],
            ConnectorContract::Pancakeswap => &[
                PANCAKESWAP_MASTER_CHEF_KEY,
                PANCAKESWAP_POSITION_MANAGER_KEY,
                PANCAKESWAP_FACTORY_KEY,
            ],
            ConnectorContract::Stargate => &[STARGATE_LP_STAKING_KEY, STARGATE_ROUTER_KEY],
            ConnectorContract::Gearboxv3 | ConnectorContract::Mock => &[],
        };
        let mut venue_addresses = Vec::new();
        for key in venue_keys {
            let Some(venue_address) = shared_chain.extra_address(key)? else {
                warn!("no \"{key}\" recorded for chain {chain_id} in the shared file");
                return Ok(());
            };
            venue_addresses.push(venue_address);
        }

        match venue_addresses.as_slice() {
            [] => deploy_contract(client, artifacts_dir, name, None, (base_params,)).await?,
            [a] => deploy_contract(client, artifacts_dir, name, None, (*a, base_params)).await?,
            [a, b] => {
                deploy_contract(client, artifacts_dir, name, None, (*a, *b, base_params)).await?
            }
            [a, b, c] => {
                deploy_contract(client, artifacts_dir, name, None, (*a, *b, *c, base_params))
                    .await?
            }
            _ => {
                return Err(ScriptError::CalldataConstruction(format!(
                    "unsupported constructor arity for {name}"
                )))
            }
        }
    };
    info!("{name} deployed to {address:#x}");

    record.connectors.push(ConnectorEntry {
        connector: address,
        connector_type: name.to_string(),
        chain_id,
    });
    store.write_vault(&args.vault_id, &record)
}

/// Deposits base tokens into a vault through its accounting manager
pub async fn deposit(
    args: DepositArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let Some(manager) = accounting_manager(&record, &args.vault_id, chain_id, client.clone())
    else {
        return Ok(());
    };

    let amount = parse_amount(&args.amount)?;
    let operator = client
        .default_sender()
        .ok_or_else(|| {
            ScriptError::ClientInitialization("client does not have sender attached".to_string())
        })?;
    let receiver = match &args.receiver {
        Some(receiver) => parse_address(receiver)?,
        None => operator,
    };

    if args.approve {
        let Some(base_token) = record.base_token else {
            warn!(
                "no base token recorded for vault {}, run sync-vault-details first",
                args.vault_id
            );
            return Ok(());
        };
        let token = Ierc20Contract::new(base_token, client.clone());
        send_tx(token.approve(manager.address(), amount)).await?;
        info!("approved {amount} for the accounting manager");
    }

    send_tx(deposit_call(&manager, receiver, amount, operator)).await?;
    info!(
        "deposited {amount} into vault {} for {receiver:#x}",
        args.vault_id
    );
    Ok(())
}

/// Rescues a token held by a vault's accounting manager; the rescued amount
/// defaults to the vault's current TVL
pub async fn rescue(
    args: RescueArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let Some(manager) = accounting_manager(&record, &args.vault_id, chain_id, client) else {
        return Ok(());
    };

    let token = match &args.token {
        Some(token) => parse_address(token)?,
        None => {
            let Some(base_token) = record.base_token else {
                warn!(
                    "no base token recorded for vault {}, pass --token explicitly",
                    args.vault_id
                );
                return Ok(());
            };
            base_token
        }
    };

    let amount = manager
        .tvl()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    send_tx(manager.rescue(token, amount)).await?;
    info!("rescued {amount} of {token:#x} from vault {}", args.vault_id);
    Ok(())
}

/// Prints the current TVL of a vault
pub async fn get_tvl(
    args: GetTvlArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let Some(manager) = accounting_manager(&record, &args.vault_id, chain_id, client) else {
        return Ok(());
    };

    let tvl = manager
        .tvl()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("TVL of vault {} is {tvl}", args.vault_id);
    Ok(())
}

/// Reads each vault's details from its on-chain accounting manager and
/// persists them into the vault's address record
pub async fn sync_vault_details(
    args: SyncVaultDetailsArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    for vault_id in &args.vault_ids {
        let mut record = store.read_vault(vault_id)?;
        let Some(manager) = accounting_manager(&record, vault_id, chain_id, client.clone())
        else {
            continue;
        };

        let name = manager
            .name()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let symbol = manager
            .symbol()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let base_token = manager
            .base_token()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let on_chain_vault_id = manager
            .vault_id()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        record.name = Some(name);
        record.symbol = Some(symbol);
        record.base_token = Some(base_token);
        record.vault_id = Some(on_chain_vault_id.as_u64());
        store.write_vault(vault_id, &record)?;
        info!("synced details for vault {vault_id}");
    }
    Ok(())
}

/// Registers a vault with the position registry
pub async fn add_vault_to_registry(
    args: AddVaultToRegistryArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let Some(manager) = record.accounting_manager(chain_id) else {
        warn!(
            "accounting manager not deployed for vault {} on chain {chain_id}",
            args.vault_id
        );
        return Ok(());
    };
    let Some(base_token) = record.base_token else {
        warn!(
            "no base token recorded for vault {}, run sync-vault-details first",
            args.vault_id
        );
        return Ok(());
    };

    let shared = store.read_shared()?;
    let Some(registry) = registry(&shared, chain_id, client) else {
        return Ok(());
    };

    let [governor, maintainer, maintainer_without_timelock, keeper, watcher, emergency] =
        resolve_roles(&args.roles)?;
    let trusted_tokens = args
        .trusted_tokens
        .iter()
        .map(|t| parse_address(t))
        .collect::<Result<Vec<_>, _>>()?;

    send_tx(registry.add_vault(
        parse_vault_id(&args.vault_id)?,
        manager,
        base_token,
        governor,
        maintainer,
        maintainer_without_timelock,
        keeper,
        watcher,
        emergency,
        trusted_tokens,
    ))
    .await?;
    info!("vault {} added to the registry", args.vault_id);
    Ok(())
}

/// Registers connectors with the position registry; defaults to every
/// connector recorded for the vault on the current chain
pub async fn update_connectors(
    args: UpdateConnectorsArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let connectors = if args.connectors.is_empty() {
        record
            .connectors
            .iter()
            .filter(|c| c.chain_id == chain_id)
            .map(|c| c.connector)
            .collect::<Vec<_>>()
    } else {
        args.connectors
            .iter()
            .map(|c| parse_address(c))
            .collect::<Result<Vec<_>, _>>()?
    };
    if connectors.is_empty() {
        warn!(
            "no connectors recorded for vault {} on chain {chain_id}",
            args.vault_id
        );
        return Ok(());
    }

    let shared = store.read_shared()?;
    let Some(registry) = registry(&shared, chain_id, client) else {
        return Ok(());
    };

    let enabled = vec![true; connectors.len()];
    let count = connectors.len();
    send_tx(registry.add_connector(parse_vault_id(&args.vault_id)?, connectors, enabled)).await?;
    info!("registered {count} connectors for vault {}", args.vault_id);
    Ok(())
}

/// Grants the registry's emergency role to an account
pub async fn grant_emergency_role(
    args: GrantEmergencyRoleArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let shared = store.read_shared()?;
    let Some(registry) = registry(&shared, chain_id, client) else {
        return Ok(());
    };

    let account = parse_address(&args.account)?;
    let role = registry
        .emergency_role()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    send_tx(registry.grant_role(role, account)).await?;
    info!("emergency role granted to {account:#x}");
    Ok(())
}

/// Rotates a vault's role addresses in the position registry
pub async fn change_vault_addresses(
    args: ChangeVaultAddressesArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    if record.accounting_manager(chain_id).is_none() {
        warn!(
            "accounting manager not deployed for vault {} on chain {chain_id}",
            args.vault_id
        );
        return Ok(());
    }

    let shared = store.read_shared()?;
    let Some(registry) = registry(&shared, chain_id, client) else {
        return Ok(());
    };

    let [governor, maintainer, maintainer_without_timelock, keeper, watcher, emergency] =
        resolve_roles(&args.roles)?;
    send_tx(registry.change_vault_addresses(
        parse_vault_id(&args.vault_id)?,
        governor,
        maintainer,
        maintainer_without_timelock,
        keeper,
        watcher,
        emergency,
    ))
    .await?;
    info!("vault {} role addresses changed", args.vault_id);
    Ok(())
}

/// Registers a recorded connector as a trusted position in the registry
pub async fn add_trusted_position(
    args: AddTrustedPositionArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let Some(entry) = chain_connector(&record, &args.vault_id, chain_id, args.connector_index)
    else {
        return Ok(());
    };

    let shared = store.read_shared()?;
    let Some(registry) = registry(&shared, chain_id, client) else {
        return Ok(());
    };

    send_tx(registry.add_trusted_position(
        parse_vault_id(&args.vault_id)?,
        U256::from(args.position_type_id),
        entry.connector,
        false,
        false,
        Bytes::new(),
        Bytes::new(),
    ))
    .await?;
    info!(
        "trusted position of type {} added for vault {} via {:#x}",
        args.position_type_id, args.vault_id, entry.connector
    );
    Ok(())
}

/// Registers a holding position through a recorded mock connector
pub async fn add_holding_position(
    args: AddHoldingPositionArgs,
    client: Arc<impl Middleware>,
    chain_id: u64,
    store: &AddressStore,
) -> Result<(), ScriptError> {
    let record = store.read_vault(&args.vault_id)?;
    let Some(entry) = chain_connector(&record, &args.vault_id, chain_id, args.connector_index)
    else {
        return Ok(());
    };

    let connector = ConnectorMockContract::new(entry.connector, client);
    send_tx(
        connector
            .add_position_to_registry_using_type(U256::from(args.position_type_id), Bytes::new()),
    )
    .await?;
    info!(
        "holding position of type {} registered via {:#x}",
        args.position_type_id, entry.connector
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use ethers::{
        abi::{Abi, Token, Tokenize},
        providers::{Http, Provider},
    };

    use super::*;

    /// ABI of the swap-and-bridge handler constructor
    const SWAP_HANDLER_CONSTRUCTOR_ABI: &str = r#"[{
        "inputs": [
            {"name": "_usersWhiteList", "type": "address[]"},
            {"name": "_valueOracle", "type": "address"},
            {"name": "_registry", "type": "address"}
        ],
        "stateMutability": "nonpayable",
        "type": "constructor"
    }]"#;

    #[test]
    fn swap_handler_constructor_starts_with_an_empty_users_whitelist() {
        let value_oracle = Address::from_low_u64_be(0x01);
        let registry = Address::from_low_u64_be(0x02);

        let tokens = swap_handler_constructor_args(value_oracle, registry).into_tokens();
        assert_eq!(
            tokens,
            vec![
                Token::Array(Vec::new()),
                Token::Address(value_oracle),
                Token::Address(registry),
            ]
        );

        // The arguments must encode against the three-parameter constructor
        let abi: Abi = serde_json::from_str(SWAP_HANDLER_CONSTRUCTOR_ABI).unwrap();
        abi.constructor().unwrap().encode_input(Vec::new(), &tokens).unwrap();
    }

    #[test]
    fn deposit_records_the_operator_as_referrer() {
        let provider = Provider::<Http>::try_from("http://localhost:8545").unwrap();
        let manager = AccountingManagerContract::new(Address::zero(), Arc::new(provider));

        let receiver = Address::from_low_u64_be(0x01);
        let operator = Address::from_low_u64_be(0x02);
        let amount = U256::from(1_000_000u64);

        let call = deposit_call(&manager, receiver, amount, operator);
        let calldata = call.calldata().unwrap();
        let args = manager
            .abi()
            .function("deposit")
            .unwrap()
            .decode_input(&calldata[4..])
            .unwrap();
        assert_eq!(args[0], Token::Address(receiver));
        assert_eq!(args[1], Token::Uint(amount));
        assert_eq!(args[2], Token::Address(operator));
    }
}
