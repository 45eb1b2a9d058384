//! Post-deploy verification.

use alloy_core::primitives::Address;

use crate::contract::DeployedContract;

/// Outcome of the post-deploy read.
///
/// Verification only asks whether the instance answers a read. The returned
/// owner is reported, not compared against anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified { owner: Address },
    Warning(String),
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// Call the owner accessor once. A failure becomes a warning.
pub async fn verify_deployment(contract: &DeployedContract) -> Verification {
    match contract.owner().await {
        Ok(owner) => {
            tracing::info!(owner = %owner, "Deployment verified");
            Verification::Verified { owner }
        }
        Err(e) => {
            tracing::warn!(
                contract_address = %contract.address(),
                err = %e,
                "Could not verify deployment"
            );
            Verification::Warning(e.to_string())
        }
    }
}
