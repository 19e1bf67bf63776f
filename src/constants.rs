//! Constants used in the vault management scripts

/// The default directory holding the deployment address records
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// The default directory receiving single-generation backups of vault records
pub const DEFAULT_BACKUP_DIR: &str = "deploymentsOld";

/// The default directory holding contract compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The file name of the shared-contracts record inside the deployments directory
pub const SHARED_CONTRACTS_FILE: &str = "sharedContracts.json";

/// The file name of the static per-chain token reference data
pub const CONSTANTS_FILE: &str = "constants.json";

/// The file name prefix of per-vault address records
pub const VAULT_ADDRESSES_FILE_PREFIX: &str = "vaultAddresses_";

/// The extension of address record and artifact files
pub const JSON_EXTENSION: &str = "json";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 0;

/// The prefix of a library placeholder in unlinked Solidity bytecode
pub const LIB_PLACEHOLDER_PREFIX: &str = "__$";

/// The suffix of a library placeholder in unlinked Solidity bytecode
pub const LIB_PLACEHOLDER_SUFFIX: &str = "$__";

/// The symbol of the base token used when none is given explicitly
pub const DEFAULT_BASE_TOKEN_SYMBOL: &str = "USDC";

/// The name of the accounting manager contract
pub const ACCOUNTING_MANAGER_CONTRACT_NAME: &str = "AccountingManager";

/// The name of the position registry contract
pub const REGISTRY_CONTRACT_NAME: &str = "PositionRegistry";

/// The name of the TVL helper library contract
pub const TVL_HELPER_CONTRACT_NAME: &str = "TVLHelper";

/// The name of the value oracle contract
pub const VALUE_ORACLE_CONTRACT_NAME: &str = "ValueOracle";

/// The name of the swap-and-bridge handler contract
pub const SWAP_HANDLER_CONTRACT_NAME: &str = "SwapAndBridgeHandler";

/// The name of the LayerZero sender helper contract
pub const LZ_HELPER_SENDER_CONTRACT_NAME: &str = "LZHelperSender";

/// The name of the LayerZero receiver helper contract
pub const LZ_HELPER_RECEIVER_CONTRACT_NAME: &str = "LZHelperReceiver";

/// The name of the Uniswap V3 connector contract
pub const UNIV3_CONNECTOR_CONTRACT_NAME: &str = "UNIv3Connector";

/// The name of the Pancakeswap connector contract
pub const PANCAKESWAP_CONNECTOR_CONTRACT_NAME: &str = "PancakeswapConnector";

/// The name of the Stargate connector contract
pub const STARGATE_CONNECTOR_CONTRACT_NAME: &str = "StargateConnector";

/// The name of the Gearbox v3 connector contract
pub const GEARBOX_CONNECTOR_CONTRACT_NAME: &str = "Gearboxv3";

/// The name of the mock connector contract
pub const MOCK_CONNECTOR_CONTRACT_NAME: &str = "ConnectorMock2";

/// The shared-record key holding the Uniswap V3 position manager address
pub const UNISWAP_POSITION_MANAGER_KEY: &str = "uniswapV3PositionManager";

/// The shared-record key holding the Uniswap V3 factory address
pub const UNISWAP_FACTORY_KEY: &str = "uniswapV3Factory";

/// The shared-record key holding the Pancakeswap master chef address
pub const PANCAKESWAP_MASTER_CHEF_KEY: &str = "pancakeswapMasterChef";

/// The shared-record key holding the Pancakeswap position manager address
pub const PANCAKESWAP_POSITION_MANAGER_KEY: &str = "pancakeswapPositionManager";

/// The shared-record key holding the Pancakeswap factory address
pub const PANCAKESWAP_FACTORY_KEY: &str = "pancakeswapFactory";

/// The shared-record key holding the Stargate LP staking address
pub const STARGATE_LP_STAKING_KEY: &str = "stargateLPStaking";

/// The shared-record key holding the Stargate router address
pub const STARGATE_ROUTER_KEY: &str = "stargateRouter";

/// Vault-global record fields that must never appear inside a chain entry
pub const VAULT_GLOBAL_FIELDS: [&str; 4] = ["name", "symbol", "baseToken", "vaultId"];
