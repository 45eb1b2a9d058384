//! Durable deployment output: one record per network plus the shared interface file.
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/<network>.json          deployment record, overwritten on every run
//! <root>/<Contract>-ABI.json     interface description, shared by all networks
//! <root>/.<network>.lock         serialises concurrent writers of the same record
//! ```

use std::{
    io,
    path::{Path, PathBuf},
};

use alloy_core::primitives::{Address, B256};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{artifacts::InterfaceArtifact, fs::FsHandler};

/// A storage write or read that failed.
#[derive(Debug, Error)]
#[error("{} failed: {source}", path.display())]
pub struct StoreError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Machine-readable record of a confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub network: String,
    #[serde(with = "decimal_string")]
    pub chain_id: u64,
    #[serde(serialize_with = "checksummed")]
    pub contract_address: Address,
    #[serde(serialize_with = "checksummed")]
    pub deployer_address: Address,
    pub deployment_hash: B256,
    /// Creation time of the record, RFC 3339 in UTC.
    pub timestamp: String,
    pub block_number: Option<u64>,
}

impl DeploymentRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        network: impl Into<String>,
        chain_id: u64,
        contract_address: Address,
        deployer_address: Address,
        deployment_hash: B256,
        block_number: Option<u64>,
    ) -> Self {
        Self {
            network: network.into(),
            chain_id,
            contract_address,
            deployer_address,
            deployment_hash,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            block_number,
        }
    }
}

fn checksummed<S: serde::Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

/// Chain ids are written as decimal strings.
mod decimal_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Network-keyed file storage for deployment output.
#[derive(Debug, Clone)]
pub struct DeploymentStore {
    root: PathBuf,
}

impl DeploymentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the record for `network`.
    pub fn record_path(&self, network: &str) -> PathBuf {
        self.root.join(format!("{}.json", network))
    }

    /// Path of the shared interface file for `contract`.
    pub fn interface_path(&self, contract: &str) -> PathBuf {
        self.root.join(format!("{}-ABI.json", contract))
    }

    /// Lock guarding writes of the file named `<key>.json`.
    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.lock", key))
    }

    /// Write `record`, replacing any previous record for the same network.
    pub async fn save_record(&self, record: &DeploymentRecord) -> Result<PathBuf, StoreError> {
        let root = self.root.clone();
        let path = self.record_path(&record.network);
        let lock_path = self.lock_path(&record.network);

        let json = serde_json::to_vec_pretty(record).map_err(|e| StoreError {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        let target = path.clone();
        run_blocking(&path, move || {
            FsHandler::create_dir(&root)?;
            let _lock = FsHandler::lock_exclusive(&lock_path)?;
            FsHandler::write_atomic(&target, &json)
        })
        .await?;

        tracing::debug!(path = %path.display(), network = %record.network, "Deployment record written");
        Ok(path)
    }

    /// Copy an interface description verbatim into the storage root.
    ///
    /// The file is shared by every network, so runs against different
    /// networks serialise on its lock.
    pub async fn save_interface(
        &self,
        contract: &str,
        interface: &InterfaceArtifact,
    ) -> Result<PathBuf, StoreError> {
        let root = self.root.clone();
        let path = self.interface_path(contract);
        let lock_path = self.lock_path(&format!("{}-ABI", contract));
        let contents = interface.as_json().as_bytes().to_vec();

        let target = path.clone();
        run_blocking(&path, move || {
            FsHandler::create_dir(&root)?;
            let _lock = FsHandler::lock_exclusive(&lock_path)?;
            FsHandler::write_atomic(&target, &contents)
        })
        .await?;

        Ok(path)
    }

    /// Read the current record for `network`, if there is one.
    pub async fn load_record(&self, network: &str) -> Result<Option<DeploymentRecord>, StoreError> {
        let path = self.record_path(network);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError { path, source }),
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|e| StoreError {
                path,
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })
    }
}

async fn run_blocking<F>(path: &Path, op: F) -> Result<(), StoreError>
where
    F: FnOnce() -> io::Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(io::Error::other)
        .and_then(|result| result)
        .map_err(|source| StoreError {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn record(network: &str, contract: u8) -> DeploymentRecord {
        DeploymentRecord::new(
            network,
            1337,
            Address::repeat_byte(contract),
            Address::repeat_byte(0xf3),
            B256::repeat_byte(0x42),
            Some(7),
        )
    }

    #[test]
    fn test_record_field_names() {
        let value = serde_json::to_value(record("testnet", 0x5f)).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "blockNumber",
                "chainId",
                "contractAddress",
                "deployerAddress",
                "deploymentHash",
                "network",
                "timestamp",
            ]
        );
        assert_eq!(value["chainId"], "1337");
        assert_eq!(value["blockNumber"], 7);
        assert_eq!(
            value["deploymentHash"],
            "0x4242424242424242424242424242424242424242424242424242424242424242"
        );
    }

    #[test]
    fn test_missing_block_number_is_null() {
        let mut record = record("testnet", 0x5f);
        record.block_number = None;

        let value = serde_json::to_value(&record).unwrap();
        assert!(value["blockNumber"].is_null());
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let record = record("testnet", 0x5f);
        assert!(record.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let tmp = TempDir::new("dtodo-store").unwrap();
        let store = DeploymentStore::new(tmp.path().join("deployments"));

        let saved = record("testnet", 0x5f);
        let path = store.save_record(&saved).await.unwrap();
        assert_eq!(path, tmp.path().join("deployments/testnet.json"));

        let loaded = store.load_record("testnet").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(store.load_record("mainnet").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let tmp = TempDir::new("dtodo-store").unwrap();
        let store = DeploymentStore::new(tmp.path());

        store.save_record(&record("testnet", 0x01)).await.unwrap();
        store.save_record(&record("testnet", 0x02)).await.unwrap();

        let loaded = store.load_record("testnet").await.unwrap().unwrap();
        assert_eq!(loaded.contract_address, Address::repeat_byte(0x02));
    }

    #[tokio::test]
    async fn test_networks_do_not_share_records() {
        let tmp = TempDir::new("dtodo-store").unwrap();
        let store = DeploymentStore::new(tmp.path());

        store.save_record(&record("testnet", 0x01)).await.unwrap();
        store.save_record(&record("localhost", 0x02)).await.unwrap();

        let testnet = store.load_record("testnet").await.unwrap().unwrap();
        let localhost = store.load_record("localhost").await.unwrap().unwrap();
        assert_eq!(testnet.contract_address, Address::repeat_byte(0x01));
        assert_eq!(localhost.contract_address, Address::repeat_byte(0x02));
    }

    #[tokio::test]
    async fn test_save_interface_verbatim() {
        let tmp = TempDir::new("dtodo-store").unwrap();
        let store = DeploymentStore::new(tmp.path());
        let abi = InterfaceArtifact::from_json("[{\"type\":\"function\",  \"name\":\"owner\"}]").unwrap();

        let path = store.save_interface("Todo", &abi).await.unwrap();
        assert_eq!(path, tmp.path().join("Todo-ABI.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), abi.as_json());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_share_root() {
        let tmp = TempDir::new("dtodo-store").unwrap();
        let store = DeploymentStore::new(tmp.path().join("deployments"));
        let abi = InterfaceArtifact::from_json("[{\"type\":\"function\",\"name\":\"owner\"}]").unwrap();

        let mut handles = Vec::new();
        for i in 0..16u8 {
            let store = store.clone();
            let abi = abi.clone();
            handles.push(tokio::spawn(async move {
                // Same network for every record writer, one interface file for all.
                store.save_record(&record("testnet", i + 1)).await?;
                store.save_interface("DecentralizedTodoList", &abi).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let saved = store.load_record("testnet").await.unwrap().unwrap();
        assert!((1..=16).any(|i| saved.contract_address == Address::repeat_byte(i)));

        let interface = std::fs::read_to_string(store.interface_path("DecentralizedTodoList")).unwrap();
        assert_eq!(interface, abi.as_json());
        let leftovers = std::fs::read_dir(tmp.path().join("deployments"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_unwritable_root_fails() {
        let tmp = TempDir::new("dtodo-store").unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let store = DeploymentStore::new(blocker.join("deployments"));
        let err = store.save_record(&record("testnet", 0x01)).await.unwrap_err();
        assert_eq!(err.path, blocker.join("deployments/testnet.json"));
    }
}
