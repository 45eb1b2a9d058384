//! [`ChainClient`] backed by an Ethereum JSON-RPC endpoint.
//!
//! Transactions are signed by the node itself (`eth_sendTransaction`), which is
//! how local development nodes such as Hardhat and Anvil expose their accounts.

use std::time::Duration;

use alloy_core::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{ChainClient, ClientError, NetworkInfo, TxReceipt, network_name_for};
use crate::rpc;

/// Connection settings for a [`JsonRpcClient`].
#[derive(Debug, Clone)]
pub struct JsonRpcClientConfig {
    /// The RPC endpoint.
    pub url: Url,
    /// Overrides the network name derived from the chain id.
    pub network_name: Option<String>,
    /// Account to deploy from. Defaults to the node's first account.
    pub from: Option<Address>,
    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
    /// How long to wait for a transaction to be mined.
    pub confirmation_timeout: Duration,
    /// Interval between receipt polls.
    pub poll_interval: Duration,
}

impl JsonRpcClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            network_name: None,
            from: None,
            request_timeout: Duration::from_secs(30),
            confirmation_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Receipt fields as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: B256,
    contract_address: Option<Address>,
    block_number: Option<String>,
    status: Option<String>,
}

/// JSON-RPC implementation of [`ChainClient`].
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    config: JsonRpcClientConfig,
}

impl JsonRpcClient {
    pub fn new(config: JsonRpcClientConfig) -> Result<Self, ClientError> {
        let client = rpc::create_client(config.request_timeout)?;
        Ok(Self { client, config })
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<T, ClientError> {
        rpc::json_rpc_call(&self.client, self.config.url.as_str(), method, params).await
    }

    async fn receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>, ClientError> {
        let raw: Option<RawReceipt> = self
            .request("eth_getTransactionReceipt", vec![serde_json::json!(tx_hash)])
            .await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        // Pending receipts on some nodes come back without a block number.
        let Some(block_number) = raw.block_number else {
            return Ok(None);
        };

        let block_number = rpc::parse_quantity("eth_getTransactionReceipt", &block_number)?;
        let success = match raw.status {
            Some(status) => rpc::parse_quantity("eth_getTransactionReceipt", &status)? == 1,
            None => true,
        };

        Ok(Some(TxReceipt {
            transaction_hash: raw.transaction_hash,
            contract_address: raw.contract_address,
            block_number: Some(block_number),
            success,
        }))
    }
}

#[async_trait]
impl ChainClient for JsonRpcClient {
    async fn signer(&self) -> Result<Address, ClientError> {
        if let Some(from) = self.config.from {
            return Ok(from);
        }

        let accounts: Vec<Address> = self.request("eth_accounts", vec![]).await?;
        accounts.into_iter().next().ok_or(ClientError::NoSigner)
    }

    async fn balance(&self, account: Address) -> Result<U256, ClientError> {
        self.request(
            "eth_getBalance",
            vec![serde_json::json!(account), serde_json::json!("latest")],
        )
        .await
    }

    async fn network(&self) -> Result<NetworkInfo, ClientError> {
        let chain_id: String = self.request("eth_chainId", vec![]).await?;
        let chain_id = rpc::parse_quantity("eth_chainId", &chain_id)?;

        let name = self
            .config
            .network_name
            .clone()
            .unwrap_or_else(|| network_name_for(chain_id));

        Ok(NetworkInfo { name, chain_id })
    }

    async fn send_creation(&self, from: Address, init_code: Bytes) -> Result<B256, ClientError> {
        self.request(
            "eth_sendTransaction",
            vec![serde_json::json!({
                "from": from,
                "data": init_code,
            })],
        )
        .await
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, ClientError> {
        rpc::wait_until(
            &format!("receipt of {}", tx_hash),
            self.config.confirmation_timeout,
            self.config.poll_interval,
            || self.receipt(tx_hash),
        )
        .await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ClientError> {
        self.request(
            "eth_getCode",
            vec![serde_json::json!(address), serde_json::json!("latest")],
        )
        .await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ClientError> {
        self.request(
            "eth_call",
            vec![
                serde_json::json!({ "to": to, "data": data }),
                serde_json::json!("latest"),
            ],
        )
        .await
    }

    async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<u64, ClientError> {
        let gas: String = self
            .request(
                "eth_estimateGas",
                vec![serde_json::json!({ "from": from, "to": to, "data": data })],
            )
            .await?;
        rpc::parse_quantity("eth_estimateGas", &gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = JsonRpcClientConfig::new(Url::parse("http://127.0.0.1:8545").unwrap());
        assert!(config.network_name.is_none());
        assert!(config.from.is_none());
        assert_eq!(config.confirmation_timeout, Duration::from_secs(120));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_raw_receipt_deserialization() {
        let raw: RawReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": "0x9fc76417374aa880d4449a1f7f31ec597f00b1f6f3dd2d66f4c9c6c445836d8b",
            "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "blockNumber": "0x1",
            "status": "0x1",
            "gasUsed": "0x5208"
        }))
        .unwrap();

        assert_eq!(raw.block_number.as_deref(), Some("0x1"));
        assert_eq!(raw.status.as_deref(), Some("0x1"));
        assert_eq!(
            raw.contract_address.unwrap().to_checksum(None),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let mut config = JsonRpcClientConfig::new(Url::parse("http://127.0.0.1:1").unwrap());
        config.request_timeout = Duration::from_secs(1);
        let client = JsonRpcClient::new(config).unwrap();

        let err = client.network().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(!err.is_revert());
    }
}
