//! Error taxonomy for a deployment run.
//!
//! Only the fatal kinds live here. Degraded outcomes of verification and gas
//! estimation are ordinary values (see [`crate::Verification`] and
//! [`crate::GasEstimate`]) and never abort a run.

use std::path::PathBuf;

use alloy_core::primitives::Address;
use thiserror::Error;

use crate::{artifacts::ArtifactError, chain::ClientError};

/// A failure that ends the run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The network could not be reached, or no signer could be resolved.
    #[error("connectivity error: {0}")]
    Connectivity(#[source] ClientError),

    /// The creation transaction could not be built, submitted or confirmed.
    #[error("deployment of {contract} failed: {reason}")]
    Deployment { contract: String, reason: DeploymentFailure },

    /// The contract is on-chain but the local record could not be written.
    #[error(
        "contract deployed at {contract_address} but its deployment files could not be written to {}: {source}",
        path.display()
    )]
    Persistence {
        contract_address: Address,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What went wrong while deploying.
#[derive(Debug, Error)]
pub enum DeploymentFailure {
    #[error("contract factory not found: {0}")]
    Factory(#[from] ArtifactError),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("creation transaction {0} reverted")]
    Reverted(String),
    #[error("receipt of transaction {0} carries no contract address")]
    MissingAddress(String),
    #[error("no code found at {0} after confirmation")]
    NoCode(Address),
}

impl DeployError {
    pub(crate) fn deployment(contract: &str, reason: impl Into<DeploymentFailure>) -> Self {
        Self::Deployment {
            contract: contract.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true if the contract is known to be on-chain despite the failure.
    pub fn contract_deployed(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_mentions_address() {
        let err = DeployError::Persistence {
            contract_address: Address::repeat_byte(0x11),
            path: PathBuf::from("/nope/testnet.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        let msg = err.to_string();
        assert!(msg.contains("0x1111111111111111111111111111111111111111"));
        assert!(msg.contains("/nope/testnet.json"));
        assert!(err.contract_deployed());
    }

    #[test]
    fn test_deployment_error_is_not_deployed() {
        let err = DeployError::deployment(
            "DecentralizedTodoList",
            DeploymentFailure::Reverted("0xabc".to_string()),
        );
        assert!(!err.contract_deployed());
        assert_eq!(
            err.to_string(),
            "deployment of DecentralizedTodoList failed: creation transaction 0xabc reverted"
        );
    }
}
