//! The To-Do List contract: creation through a factory and calls against a live instance.

use std::sync::Arc;

use alloy_core::primitives::{Address, B256, Bytes};
use alloy_sol_types::{SolCall, sol};

use crate::{
    artifacts::ContractArtifact,
    chain::{ChainClient, ClientError, TxReceipt},
    error::DeploymentFailure,
};

/// Name of the contract deployed by default.
pub const DEFAULT_CONTRACT_NAME: &str = "DecentralizedTodoList";

sol! {
    /// On-chain interface of the decentralized to-do list.
    interface ITodoList {
        function owner() external view returns (address);
        function createTask(string content) external;
        function completeTask(uint256 taskId) external;
        function deleteTask(uint256 taskId) external;
    }
}

/// Creates instances of a compiled contract.
pub struct ContractFactory {
    artifact: ContractArtifact,
    client: Arc<dyn ChainClient>,
}

/// A confirmed contract creation.
pub struct Deployment {
    pub contract: DeployedContract,
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
}

impl ContractFactory {
    pub fn new(artifact: ContractArtifact, client: Arc<dyn ChainClient>) -> Self {
        Self { artifact, client }
    }

    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    /// Submit the creation transaction from `from` and wait until it is mined.
    ///
    /// The deployment only counts once the receipt reports success and code
    /// exists at the new address.
    pub async fn deploy(&self, from: Address) -> Result<Deployment, DeploymentFailure> {
        let tx_hash = self
            .client
            .send_creation(from, self.artifact.bytecode.clone())
            .await?;

        tracing::info!(tx_hash = %tx_hash, "Creation transaction submitted, waiting for confirmation...");

        let receipt: TxReceipt = self.client.wait_for_receipt(tx_hash).await?;

        if !receipt.success {
            return Err(DeploymentFailure::Reverted(tx_hash.to_string()));
        }

        let address = receipt
            .contract_address
            .ok_or_else(|| DeploymentFailure::MissingAddress(tx_hash.to_string()))?;

        let code = self.client.code_at(address).await?;
        if code.is_empty() {
            return Err(DeploymentFailure::NoCode(address));
        }

        Ok(Deployment {
            contract: DeployedContract {
                address,
                client: self.client.clone(),
            },
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}

/// Handle on a live contract instance.
#[derive(Clone)]
pub struct DeployedContract {
    address: Address,
    client: Arc<dyn ChainClient>,
}

impl DeployedContract {
    pub fn address(&self) -> Address {
        self.address
    }

    /// Read-only call of `call` against the instance.
    pub async fn call<C: SolCall>(&self, call: C) -> Result<C::Return, ClientError> {
        let output = self
            .client
            .call(self.address, Bytes::from(call.abi_encode()))
            .await?;

        C::abi_decode_returns(&output, true).map_err(|e| ClientError::Decode {
            method: C::SIGNATURE.to_string(),
            reason: e.to_string(),
        })
    }

    /// Gas needed for `from` to send `call` to the instance.
    pub async fn estimate_gas<C: SolCall>(&self, from: Address, call: C) -> Result<u64, ClientError> {
        self.client
            .estimate_gas(from, self.address, Bytes::from(call.abi_encode()))
            .await
    }

    /// The owner recorded by the contract.
    pub async fn owner(&self) -> Result<Address, ClientError> {
        Ok(self.call(ITodoList::ownerCall {}).await?._0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        assert_eq!(ITodoList::ownerCall::SIGNATURE, "owner()");
        assert_eq!(ITodoList::createTaskCall::SIGNATURE, "createTask(string)");
        assert_eq!(ITodoList::completeTaskCall::SIGNATURE, "completeTask(uint256)");
        assert_eq!(ITodoList::ownerCall::SELECTOR, [0x8d, 0xa5, 0xcb, 0x5b]);
    }

    #[test]
    fn test_owner_return_decoding() {
        let owner = Address::repeat_byte(0xab);
        let encoded = ITodoList::ownerCall::abi_encode_returns(&(owner,));
        let decoded = ITodoList::ownerCall::abi_decode_returns(&encoded, true).unwrap();
        assert_eq!(decoded._0, owner);
    }
}
