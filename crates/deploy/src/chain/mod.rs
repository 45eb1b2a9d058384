//! The Chain Client seam: network identity, signing account, transactions and calls.

mod json_rpc;
mod network;

use alloy_core::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use thiserror::Error;

pub use json_rpc::{JsonRpcClient, JsonRpcClientConfig};
pub use network::{KnownNetwork, network_name_for};

/// Errors reported by a [`ChainClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The response could not be decoded.
    #[error("failed to decode {method} response: {reason}")]
    Decode { method: String, reason: String },
    /// The node has no account to sign with.
    #[error("no signer available")]
    NoSigner,
    /// Gave up waiting for something the node never delivered.
    #[error("timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },
}

impl ClientError {
    /// Returns true when the node reports that execution reverted.
    ///
    /// A revert means an on-chain precondition was not met. Every other kind
    /// of failure is a problem with reaching or talking to the node.
    pub fn is_revert(&self) -> bool {
        match self {
            Self::Rpc { code, message } => {
                *code == 3 || message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

/// Identity of the connected network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: u64,
}

/// The parts of a transaction receipt a deployment cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Everything the orchestrator needs from a blockchain connection.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The account that signs and pays for transactions.
    async fn signer(&self) -> Result<Address, ClientError>;

    /// Balance of `account` in wei.
    async fn balance(&self, account: Address) -> Result<U256, ClientError>;

    /// Name and chain id of the connected network.
    async fn network(&self) -> Result<NetworkInfo, ClientError>;

    /// Submit a contract creation transaction and return its hash.
    async fn send_creation(&self, from: Address, init_code: Bytes) -> Result<B256, ClientError>;

    /// Block until the transaction is included and return its receipt.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, ClientError>;

    /// Runtime code deployed at `address`.
    async fn code_at(&self, address: Address) -> Result<Bytes, ClientError>;

    /// Execute a read-only call.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ClientError>;

    /// Estimate the gas a transaction would use.
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes)
    -> Result<u64, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_classification() {
        let anvil = ClientError::Rpc {
            code: 3,
            message: "execution reverted: Task does not exist".to_string(),
        };
        let hardhat = ClientError::Rpc {
            code: -32603,
            message: "Error: VM Exception while processing transaction: reverted with reason string 'Task does not exist'".to_string(),
        };
        assert!(anvil.is_revert());
        assert!(hardhat.is_revert());

        let funds = ClientError::Rpc {
            code: -32000,
            message: "insufficient funds for gas * price + value".to_string(),
        };
        assert!(!funds.is_revert());
        assert!(!ClientError::Transport("connection refused".to_string()).is_revert());
        assert!(
            !ClientError::Timeout {
                what: "receipt".to_string(),
                secs: 5
            }
            .is_revert()
        );
    }
}
