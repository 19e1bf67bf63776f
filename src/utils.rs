//! Utilities for the deploy scripts: client setup, artifact loading, library linking

use std::{path::Path, str::FromStr, sync::Arc};

use ethers::{
    abi::{Abi, Address, Tokenize},
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::Bytes,
    utils::hex::FromHex,
};
use serde::Deserialize;

use crate::{
    constants::{
        JSON_EXTENSION, LIB_PLACEHOLDER_PREFIX, LIB_PLACEHOLDER_SUFFIX, NUM_DEPLOY_CONFIRMATIONS,
    },
    errors::ScriptError,
};

/// Sets up the RPC client with which all contract calls are made, returning it
/// alongside the connected chain id.
///
/// The chain id is threaded explicitly through every command rather than
/// re-derived from the connection at each use site.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<(Arc<SignerMiddleware<Provider<Http>, LocalWallet>>, u64), ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    ));

    Ok((client, chain_id))
}

/// A contract compilation artifact, as emitted by the Solidity toolchain
#[derive(Deserialize)]
pub struct ContractArtifact {
    /// The contract ABI
    pub abi: Abi,
    /// The unlinked deployment bytecode, hex-encoded
    pub bytecode: String,
}

/// Loads the compilation artifact for the named contract from the artifacts
/// directory
pub fn load_artifact(
    artifacts_dir: &Path,
    contract_name: &str,
) -> Result<ContractArtifact, ScriptError> {
    let path = artifacts_dir.join(format!("{contract_name}.{JSON_EXTENSION}"));
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))
}

/// Substitutes every library placeholder (`__$...$__`) in unlinked bytecode
/// with the given library address.
///
/// Placeholders and addresses are both 40 hex characters, so linking preserves
/// the bytecode length.
pub fn link_bytecode(bytecode: &str, library_address: Address) -> String {
    let address_hex = format!("{library_address:x}");
    let mut linked = String::with_capacity(bytecode.len());
    let mut rest = bytecode;

    while let Some(start) = rest.find(LIB_PLACEHOLDER_PREFIX) {
        let Some(end) = rest[start..].find(LIB_PLACEHOLDER_SUFFIX) else {
            break;
        };
        linked.push_str(&rest[..start]);
        linked.push_str(&address_hex);
        rest = &rest[start + end + LIB_PLACEHOLDER_SUFFIX.len()..];
    }

    linked.push_str(rest);
    linked
}

/// Deploys the named contract through its compilation artifact, optionally
/// linking a library address into the bytecode first, and returns the deployed
/// address
pub async fn deploy_contract<M: Middleware, T: Tokenize>(
    client: Arc<M>,
    artifacts_dir: &Path,
    contract_name: &str,
    library: Option<Address>,
    constructor_args: T,
) -> Result<Address, ScriptError> {
    let artifact = load_artifact(artifacts_dir, contract_name)?;

    let mut bytecode = artifact.bytecode.trim_start_matches("0x").to_string();
    if let Some(library_address) = library {
        bytecode = link_bytecode(&bytecode, library_address);
    }
    let bytecode =
        Bytes::from_hex(&bytecode).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let factory = ContractFactory::new(artifact.abi, bytecode, client);
    let contract = factory
        .deploy(constructor_args)
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    Ok(contract.address())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn linking_substitutes_every_placeholder() {
        let library = Address::from_low_u64_be(0xAB);
        let library_hex = format!("{library:x}");
        let placeholder = "__$f00df00df00df00df00df00df00df00df0$__";
        let bytecode = format!("6080{placeholder}6040{placeholder}00");

        let linked = link_bytecode(&bytecode, library);
        assert_eq!(linked, format!("6080{library_hex}6040{library_hex}00"));
        assert_eq!(linked.len(), bytecode.len());
    }

    #[test]
    fn linking_leaves_placeholder_free_bytecode_untouched() {
        let bytecode = "60806040526000";
        let linked = link_bytecode(bytecode, Address::from_low_u64_be(0xAB));
        assert_eq!(linked, bytecode);
    }

    #[test]
    fn artifacts_parse_from_disk() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("TVLHelper.json"),
            r#"{"abi": [{"inputs": [], "stateMutability": "nonpayable", "type": "constructor"}], "bytecode": "0x6080"}"#,
        )
        .unwrap();

        let artifact = load_artifact(dir.path(), "TVLHelper").unwrap();
        assert_eq!(artifact.bytecode, "0x6080");

        assert!(matches!(
            load_artifact(dir.path(), "Missing"),
            Err(ScriptError::ReadFile(_))
        ));
    }
}
