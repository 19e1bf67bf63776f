//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::constants::{
    GEARBOX_CONNECTOR_CONTRACT_NAME, LZ_HELPER_RECEIVER_CONTRACT_NAME,
    LZ_HELPER_SENDER_CONTRACT_NAME, MOCK_CONNECTOR_CONTRACT_NAME,
    PANCAKESWAP_CONNECTOR_CONTRACT_NAME, REGISTRY_CONTRACT_NAME, STARGATE_CONNECTOR_CONTRACT_NAME,
    SWAP_HANDLER_CONTRACT_NAME, TVL_HELPER_CONTRACT_NAME, UNIV3_CONNECTOR_CONTRACT_NAME,
    VALUE_ORACLE_CONTRACT_NAME,
};

/// The chain-wide singleton contracts that can be deployed
#[derive(ValueEnum, Copy, Clone, Eq, PartialEq)]
pub enum SharedContract {
    /// The position registry
    Registry,
    /// The TVL helper library
    TvlHelper,
    /// The value oracle
    ValueOracle,
    /// The swap-and-bridge handler
    SwapHandler,
    /// The LayerZero sender helper
    LzHelperSender,
    /// The LayerZero receiver helper
    LzHelperReceiver,
}

impl SharedContract {
    /// The name of the Solidity contract, and of its compilation artifact
    pub fn contract_name(self) -> &'static str {
        match self {
            SharedContract::Registry => REGISTRY_CONTRACT_NAME,
            SharedContract::TvlHelper => TVL_HELPER_CONTRACT_NAME,
            SharedContract::ValueOracle => VALUE_ORACLE_CONTRACT_NAME,
            SharedContract::SwapHandler => SWAP_HANDLER_CONTRACT_NAME,
            SharedContract::LzHelperSender => LZ_HELPER_SENDER_CONTRACT_NAME,
            SharedContract::LzHelperReceiver => LZ_HELPER_RECEIVER_CONTRACT_NAME,
        }
    }
}

impl Display for SharedContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharedContract::Registry => write!(f, "registry"),
            SharedContract::TvlHelper => write!(f, "tvl-helper"),
            SharedContract::ValueOracle => write!(f, "value-oracle"),
            SharedContract::SwapHandler => write!(f, "swap-handler"),
            SharedContract::LzHelperSender => write!(f, "lz-helper-sender"),
            SharedContract::LzHelperReceiver => write!(f, "lz-helper-receiver"),
        }
    }
}

/// The connector contracts that can be deployed for a vault
#[derive(ValueEnum, Copy, Clone, Eq, PartialEq)]
pub enum ConnectorContract {
    /// The Uniswap V3 connector
    Univ3,
    /// The Pancakeswap connector
    Pancakeswap,
    /// The Stargate connector
    Stargate,
    /// The Gearbox v3 connector
    Gearboxv3,
    /// The mock connector, for testing only
    Mock,
}

impl ConnectorContract {
    /// The name of the Solidity contract, and of its compilation artifact.
    ///
    /// Also recorded as the connector's type tag in the vault address record.
    pub fn contract_name(self) -> &'static str {
        match self {
            ConnectorContract::Univ3 => UNIV3_CONNECTOR_CONTRACT_NAME,
            ConnectorContract::Pancakeswap => PANCAKESWAP_CONNECTOR_CONTRACT_NAME,
            ConnectorContract::Stargate => STARGATE_CONNECTOR_CONTRACT_NAME,
            ConnectorContract::Gearboxv3 => GEARBOX_CONNECTOR_CONTRACT_NAME,
            ConnectorContract::Mock => MOCK_CONNECTOR_CONTRACT_NAME,
        }
    }
}

impl Display for ConnectorContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorContract::Univ3 => write!(f, "univ3"),
            ConnectorContract::Pancakeswap => write!(f, "pancakeswap"),
            ConnectorContract::Stargate => write!(f, "stargate"),
            ConnectorContract::Gearboxv3 => write!(f, "gearboxv3"),
            ConnectorContract::Mock => write!(f, "mock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Contract names double as artifact file names, so they must match the
    // Solidity build output exactly.
    #[test]
    fn contract_names_match_the_solidity_artifacts() {
        assert_eq!(SharedContract::Registry.contract_name(), "PositionRegistry");
        assert_eq!(SharedContract::TvlHelper.contract_name(), "TVLHelper");
        assert_eq!(SharedContract::ValueOracle.contract_name(), "ValueOracle");
        assert_eq!(
            SharedContract::SwapHandler.contract_name(),
            "SwapAndBridgeHandler"
        );
        assert_eq!(
            SharedContract::LzHelperSender.contract_name(),
            "LZHelperSender"
        );
        assert_eq!(
            SharedContract::LzHelperReceiver.contract_name(),
            "LZHelperReceiver"
        );

        assert_eq!(ConnectorContract::Univ3.contract_name(), "UNIv3Connector");
        assert_eq!(
            ConnectorContract::Pancakeswap.contract_name(),
            "PancakeswapConnector"
        );
        assert_eq!(
            ConnectorContract::Stargate.contract_name(),
            "StargateConnector"
        );
        assert_eq!(ConnectorContract::Gearboxv3.contract_name(), "Gearboxv3");
        assert_eq!(ConnectorContract::Mock.contract_name(), "ConnectorMock2");
    }
}
