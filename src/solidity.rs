//! Bindings for the contract surfaces invoked by the scripts

use ethers::contract::abigen;

abigen!(
    AccountingManagerContract,
    r#"[
        function deposit(address receiver, uint256 amount, address referrer) external
        function rescue(address token, uint256 amount) external
        function TVL() external view returns (uint256)
        function name() external view returns (string)
        function symbol() external view returns (string)
        function baseToken() external view returns (address)
        function vaultId() external view returns (uint256)
    ]"#
);

abigen!(
    PositionRegistryContract,
    r#"[
        function addVault(uint256 vaultId, address accountingManager, address baseToken, address governor, address maintainer, address maintainerWithoutTimeLock, address keeperContract, address watcher, address emergency, address[] trustedTokens) external
        function addConnector(uint256 vaultId, address[] connectors, bool[] enabled) external
        function addTrustedPosition(uint256 vaultId, uint256 positionTypeId, address calculatorConnector, bool onlyOwner, bool onlyPositionOwner, bytes additionalData, bytes additionalDataForPosition) external
        function changeVaultAddresses(uint256 vaultId, address governor, address maintainer, address maintainerWithoutTimeLock, address keeperContract, address watcher, address emergency) external
        function grantRole(bytes32 role, address account) external
        function hasRole(bytes32 role, address account) external view returns (bool)
        function EMERGENCY_ROLE() external view returns (bytes32)
    ]"#
);

abigen!(
    Ierc20Contract,
    r#"[
        function balanceOf(address account) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 value) external returns (bool)
    ]"#
);

abigen!(
    ConnectorMockContract,
    r#"[
        function addPositionToRegistryUsingType(uint256 positionTypeId, bytes data) external
    ]"#
);
