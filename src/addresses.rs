//! Durable JSON persistence of deployment metadata.
//!
//! One document exists per vault (`vaultAddresses_<vaultId>.json`) plus a single
//! shared document for chain-wide singleton contracts (`sharedContracts.json`).
//! Vault writes rotate the previous file into a single-generation backup
//! directory; shared-contract writes do not receive a backup.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use ethers::abi::Address;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{
        CONSTANTS_FILE, JSON_EXTENSION, SHARED_CONTRACTS_FILE, VAULT_ADDRESSES_FILE_PREFIX,
        VAULT_GLOBAL_FIELDS,
    },
    errors::ScriptError,
};

/// A connector contract recorded for a vault, in deployment order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorEntry {
    /// Address of the deployed connector
    pub connector: Address,
    /// Name of the connector contract
    pub connector_type: String,
    /// The chain the connector was deployed on
    pub chain_id: u64,
}

/// The deployment-specific addresses a vault holds on a single chain
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainDeployments {
    /// Address of the vault's accounting manager on this chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounting_manager: Option<Address>,
    /// Further per-chain addresses (library addresses etc.), preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The per-vault address record
///
/// Flat fields (`name`, `symbol`, `baseToken`, `vaultId`) are vault-global and,
/// once set, are expected to stay consistent across chains. Chain-scoped
/// addresses live under the explicit `chains` sub-map; the legacy form with
/// bare chain-id keys at the top level is rejected on load.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaultAddressRecord {
    /// Connectors deployed for this vault, in deployment order; never reordered
    #[serde(default)]
    pub connectors: Vec<ConnectorEntry>,
    /// Display name of the vault share token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Symbol of the vault share token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Address of the vault's base token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_token: Option<Address>,
    /// Numeric id of the vault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<u64>,
    /// Per-chain deployment addresses, keyed by chain id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub chains: BTreeMap<String, ChainDeployments>,
    /// Unknown top-level keys, preserved verbatim across read/write cycles
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VaultAddressRecord {
    /// The chain entry for the given chain id, if any
    pub fn chain(&self, chain_id: u64) -> Option<&ChainDeployments> {
        self.chains.get(&chain_id.to_string())
    }

    /// The chain entry for the given chain id, created empty if absent
    pub fn chain_mut(&mut self, chain_id: u64) -> &mut ChainDeployments {
        self.chains.entry(chain_id.to_string()).or_default()
    }

    /// The vault's accounting manager address on the given chain, if deployed
    pub fn accounting_manager(&self, chain_id: u64) -> Option<Address> {
        self.chain(chain_id).and_then(|c| c.accounting_manager)
    }

    /// Rejects the ambiguous legacy record shapes.
    ///
    /// A bare numeric key at the top level is a chain map outside `chains`,
    /// and a vault-global field inside a chain entry contradicts the flat
    /// fields; both are surfaced as schema errors rather than silently
    /// resolved.
    fn validate(&self) -> Result<(), ScriptError> {
        for key in self.extra.keys() {
            if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ScriptError::Schema(format!(
                    "chain-scoped entries must live under \"chains\", found top-level key \"{key}\""
                )));
            }
        }
        for (chain_id, deployments) in &self.chains {
            for key in deployments.extra.keys() {
                if VAULT_GLOBAL_FIELDS.contains(&key.as_str()) {
                    return Err(ScriptError::Schema(format!(
                        "vault-global field \"{key}\" appears under chain {chain_id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The chain-wide singleton contract addresses recorded for one chain
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharedChainContracts {
    /// Address of the position registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<Address>,
    /// Address of the value oracle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_oracle: Option<Address>,
    /// Address of the swap-and-bridge handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_handler: Option<Address>,
    /// Address of the TVL helper library
    #[serde(rename = "TVLHelper", default, skip_serializing_if = "Option::is_none")]
    pub tvl_helper: Option<Address>,
    /// Address of the LayerZero sender helper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lz_helper_sender: Option<Address>,
    /// Address of the LayerZero receiver helper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lz_helper_receiver: Option<Address>,
    /// Address of the LayerZero endpoint, an operator-provided input
    #[serde(rename = "LZEndpoint", default, skip_serializing_if = "Option::is_none")]
    pub lz_endpoint: Option<Address>,
    /// Venue-specific addresses (position managers, routers, ...), preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SharedChainContracts {
    /// A venue-specific address stored under the given key, if present
    pub fn extra_address(&self, key: &str) -> Result<Option<Address>, ScriptError> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => {
                let raw = value.as_str().ok_or_else(|| {
                    ScriptError::Schema(format!("shared contract entry \"{key}\" is not a string"))
                })?;
                Address::from_str(raw)
                    .map(Some)
                    .map_err(|e| ScriptError::Schema(format!("shared contract entry \"{key}\": {e}")))
            }
        }
    }
}

/// The shared-contracts record, keyed by chain id
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct SharedAddressRecord {
    /// Per-chain shared contract addresses
    pub chains: BTreeMap<String, SharedChainContracts>,
}

impl SharedAddressRecord {
    /// The shared contracts recorded for the given chain, if any
    pub fn chain(&self, chain_id: u64) -> Option<&SharedChainContracts> {
        self.chains.get(&chain_id.to_string())
    }

    /// The shared contracts entry for the given chain, created empty if absent
    pub fn chain_mut(&mut self, chain_id: u64) -> &mut SharedChainContracts {
        self.chains.entry(chain_id.to_string()).or_default()
    }
}

/// The static reference data recorded for one chain in `constants.json`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct ChainConstants {
    /// Well-known token addresses, keyed by symbol
    #[serde(default)]
    pub tokens: BTreeMap<String, Address>,
}

/// The `constants.json` document, keyed by chain id; read-only input
#[derive(Deserialize, Default, Debug, Clone)]
#[serde(transparent)]
pub struct ConstantsRecord {
    /// Per-chain reference data
    pub chains: BTreeMap<String, ChainConstants>,
}

impl ConstantsRecord {
    /// The reference data for the given chain, if any
    pub fn chain(&self, chain_id: u64) -> Option<&ChainConstants> {
        self.chains.get(&chain_id.to_string())
    }
}

/// Reads and writes the deployment address records on disk
pub struct AddressStore {
    /// Directory holding the primary address records
    deployments_dir: PathBuf,
    /// Directory receiving the single-generation vault record backups
    backup_dir: PathBuf,
}

impl AddressStore {
    /// Creates a store rooted at the given primary and backup directories
    pub fn new(deployments_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            deployments_dir: deployments_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// The file name of a vault's address record
    fn vault_file_name(vault_id: &str) -> String {
        format!("{VAULT_ADDRESSES_FILE_PREFIX}{vault_id}.{JSON_EXTENSION}")
    }

    /// The path of a vault's primary address record
    fn vault_path(&self, vault_id: &str) -> PathBuf {
        self.deployments_dir.join(Self::vault_file_name(vault_id))
    }

    /// Reads the shared-contracts record, defaulting to an empty mapping when
    /// the file does not exist or holds a JSON `null`
    pub fn read_shared(&self) -> Result<SharedAddressRecord, ScriptError> {
        let path = self.deployments_dir.join(SHARED_CONTRACTS_FILE);
        match read_json_value(&path)? {
            None => Ok(SharedAddressRecord::default()),
            Some(value) => decode(value, &path),
        }
    }

    /// Writes the shared-contracts record in place.
    ///
    /// Shared-contract writes do not receive a backup copy; only vault records
    /// are rotated into the backup directory.
    pub fn write_shared(&self, record: &SharedAddressRecord) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.deployments_dir)
            .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        let path = self.deployments_dir.join(SHARED_CONTRACTS_FILE);
        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        fs::write(path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))
    }

    /// Reads a vault's address record.
    ///
    /// A missing file, a JSON `null`, or a missing `connectors` key all
    /// normalize to a record with an empty `connectors` sequence; any other
    /// keys present in the file are preserved. Reading never creates files.
    pub fn read_vault(&self, vault_id: &str) -> Result<VaultAddressRecord, ScriptError> {
        let path = self.vault_path(vault_id);
        let record: VaultAddressRecord = match read_json_value(&path)? {
            None => VaultAddressRecord::default(),
            Some(value) => decode(value, &path)?,
        };
        record.validate()?;
        Ok(record)
    }

    /// Writes a vault's address record, rotating any existing primary file
    /// into the backup directory first.
    ///
    /// The backup keeps a single generation: it is overwritten on every write
    /// and always lags the primary by exactly one write. The backup-then-write
    /// sequence is not atomic; scripts are run one at a time by an operator.
    pub fn write_vault(
        &self,
        vault_id: &str,
        record: &VaultAddressRecord,
    ) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.deployments_dir)
            .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

        let primary = self.vault_path(vault_id);
        if primary.exists() {
            fs::create_dir_all(&self.backup_dir)
                .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
            let backup = self.backup_dir.join(Self::vault_file_name(vault_id));
            fs::copy(&primary, backup).map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
        fs::write(primary, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))
    }

    /// Reads the static per-chain token reference data.
    ///
    /// Unlike the address records, `constants.json` is an operator-provided
    /// input; a missing file is an error here, not an empty default.
    pub fn read_constants(&self) -> Result<ConstantsRecord, ScriptError> {
        let path = self.deployments_dir.join(CONSTANTS_FILE);
        match read_json_value(&path)? {
            None => Err(ScriptError::ReadFile(format!(
                "{} not found",
                path.display()
            ))),
            Some(value) => decode(value, &path),
        }
    }
}

/// Reads a JSON document from disk.
///
/// Returns `None` when the file does not exist or parses to `null`; a
/// malformed file is a fatal read error.
fn read_json_value(path: &Path) -> Result<Option<Value>, ScriptError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|e| ScriptError::ReadFile(e.to_string()))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", path.display())))?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Decodes a parsed JSON value into a typed record, surfacing shape mismatches
/// as schema errors
fn decode<T: DeserializeOwned>(value: Value, path: &Path) -> Result<T, ScriptError> {
    serde_json::from_value(value).map_err(|e| ScriptError::Schema(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    use super::*;

    fn test_store() -> (TempDir, AddressStore) {
        let dir = tempdir().unwrap();
        let store = AddressStore::new(dir.path().join("deployments"), dir.path().join("deploymentsOld"));
        (dir, store)
    }

    fn addr(low: u64) -> Address {
        Address::from_low_u64_be(low)
    }

    #[test]
    fn read_vault_defaults_for_unknown_vault() {
        let (dir, store) = test_store();

        let record = store.read_vault("999").unwrap();
        assert!(record.connectors.is_empty());
        assert!(record.name.is_none());
        assert!(record.chains.is_empty());
        assert!(record.extra.is_empty());

        // Reads must not have side effects
        assert!(!dir.path().join("deployments").exists());
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = test_store();

        let mut record = VaultAddressRecord {
            connectors: vec![ConnectorEntry {
                connector: addr(0xAA),
                connector_type: "UNIv3Connector".to_string(),
                chain_id: 8453,
            }],
            name: Some("Test vault".to_string()),
            symbol: Some("TV".to_string()),
            base_token: Some(addr(0xBEEF)),
            vault_id: Some(42),
            ..Default::default()
        };
        record.chain_mut(8453).accounting_manager = Some(addr(0xCAFE));
        record
            .extra
            .insert("note".to_string(), json!("hand-added"));

        store.write_vault("42", &record).unwrap();
        let read_back = store.read_vault("42").unwrap();
        assert_eq!(read_back, record);
    }

    #[test]
    fn backup_lags_primary_by_one_write() {
        let (dir, store) = test_store();
        let primary = dir.path().join("deployments/vaultAddresses_42.json");
        let backup = dir.path().join("deploymentsOld/vaultAddresses_42.json");

        let empty = VaultAddressRecord::default();
        store.write_vault("42", &empty).unwrap();
        assert!(!backup.exists());
        let first_bytes = fs::read(&primary).unwrap();

        let mut second = VaultAddressRecord::default();
        second.connectors.push(ConnectorEntry {
            connector: addr(0xAA),
            connector_type: "ConnectorMock".to_string(),
            chain_id: 1,
        });
        store.write_vault("42", &second).unwrap();

        // The backup holds exactly the bytes the primary held after the first write
        assert_eq!(fs::read(&backup).unwrap(), first_bytes);
        assert_eq!(store.read_vault("42").unwrap(), second);

        let backup_record: VaultAddressRecord =
            serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
        assert_eq!(backup_record, empty);
    }

    #[test]
    fn read_shared_missing_returns_empty() {
        let (_dir, store) = test_store();
        let shared = store.read_shared().unwrap();
        assert!(shared.chains.is_empty());
    }

    #[test]
    fn write_shared_does_not_create_backup() {
        let (dir, store) = test_store();

        let mut shared = SharedAddressRecord::default();
        shared.chain_mut(1).registry = Some(addr(0x01));
        store.write_shared(&shared).unwrap();
        shared.chain_mut(1).value_oracle = Some(addr(0x02));
        store.write_shared(&shared).unwrap();

        assert_eq!(store.read_shared().unwrap(), shared);
        assert!(!dir.path().join("deploymentsOld").exists());
    }

    #[test]
    fn missing_connectors_key_is_normalized_preserving_other_keys() {
        let (dir, store) = test_store();
        let deployments = dir.path().join("deployments");
        fs::create_dir_all(&deployments).unwrap();
        fs::write(
            deployments.join("vaultAddresses_7.json"),
            r#"{"name": "hand edited", "note": "keep me"}"#,
        )
        .unwrap();

        let record = store.read_vault("7").unwrap();
        assert!(record.connectors.is_empty());
        assert_eq!(record.name.as_deref(), Some("hand edited"));
        assert_eq!(record.extra.get("note"), Some(&json!("keep me")));
    }

    #[test]
    fn null_file_reads_as_default() {
        let (dir, store) = test_store();
        let deployments = dir.path().join("deployments");
        fs::create_dir_all(&deployments).unwrap();
        fs::write(deployments.join("vaultAddresses_8.json"), "null").unwrap();
        fs::write(deployments.join("sharedContracts.json"), "null").unwrap();

        assert_eq!(store.read_vault("8").unwrap(), VaultAddressRecord::default());
        assert!(store.read_shared().unwrap().chains.is_empty());
    }

    #[test]
    fn malformed_file_is_a_read_error() {
        let (dir, store) = test_store();
        let deployments = dir.path().join("deployments");
        fs::create_dir_all(&deployments).unwrap();
        fs::write(deployments.join("vaultAddresses_9.json"), "not json").unwrap();

        assert!(matches!(
            store.read_vault("9"),
            Err(ScriptError::ReadFile(_))
        ));
    }

    #[test]
    fn vault_global_field_inside_chain_entry_is_rejected() {
        let (dir, store) = test_store();
        let deployments = dir.path().join("deployments");
        fs::create_dir_all(&deployments).unwrap();
        fs::write(
            deployments.join("vaultAddresses_10.json"),
            r#"{"connectors": [], "chains": {"8453": {"baseToken": "0x0000000000000000000000000000000000000001"}}}"#,
        )
        .unwrap();

        assert!(matches!(
            store.read_vault("10"),
            Err(ScriptError::Schema(_))
        ));
    }

    #[test]
    fn top_level_chain_key_is_rejected() {
        let (dir, store) = test_store();
        let deployments = dir.path().join("deployments");
        fs::create_dir_all(&deployments).unwrap();
        fs::write(
            deployments.join("vaultAddresses_11.json"),
            r#"{"connectors": [], "8453": {"accountingManager": "0x0000000000000000000000000000000000000001"}}"#,
        )
        .unwrap();

        assert!(matches!(
            store.read_vault("11"),
            Err(ScriptError::Schema(_))
        ));
    }

    #[test]
    fn shared_record_round_trips_extra_venue_addresses() {
        let (_dir, store) = test_store();

        let mut shared = SharedAddressRecord::default();
        let entry = shared.chain_mut(8453);
        entry.registry = Some(addr(0x11));
        entry.extra.insert(
            "uniswapV3Factory".to_string(),
            json!("0x0000000000000000000000000000000000000022"),
        );
        store.write_shared(&shared).unwrap();

        let read_back = store.read_shared().unwrap();
        assert_eq!(read_back, shared);
        let chain = read_back.chain(8453).unwrap();
        assert_eq!(
            chain.extra_address("uniswapV3Factory").unwrap(),
            Some(addr(0x22))
        );
        assert_eq!(chain.extra_address("missing").unwrap(), None);
    }

    #[test]
    fn constants_are_an_operator_input() {
        let (dir, store) = test_store();
        assert!(matches!(
            store.read_constants(),
            Err(ScriptError::ReadFile(_))
        ));

        let deployments = dir.path().join("deployments");
        fs::create_dir_all(&deployments).unwrap();
        fs::write(
            deployments.join("constants.json"),
            r#"{"8453": {"tokens": {"USDC": "0x0000000000000000000000000000000000000033"}}}"#,
        )
        .unwrap();

        let constants = store.read_constants().unwrap();
        let tokens = &constants.chain(8453).unwrap().tokens;
        assert_eq!(tokens.get("USDC"), Some(&addr(0x33)));
    }
}
