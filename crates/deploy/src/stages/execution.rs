//! Deployment execution: resolve the factory, submit the creation and wait for it.

use std::sync::Arc;

use crate::{
    artifacts::ArtifactStore,
    chain::ChainClient,
    contract::{ContractFactory, Deployment},
    error::DeployError,
};

use super::DeploymentContext;

/// Deploy `contract_name` from the context's signer and block until it is confirmed.
///
/// Every failure here is fatal. Nothing is retried.
pub async fn execute_deployment(
    context: &DeploymentContext,
    artifacts: &dyn ArtifactStore,
    client: Arc<dyn ChainClient>,
    contract_name: &str,
) -> Result<Deployment, DeployError> {
    let artifact = artifacts
        .resolve_factory(contract_name)
        .map_err(|e| DeployError::deployment(contract_name, e))?;

    let factory = ContractFactory::new(artifact, client);

    tracing::info!(contract = %factory.name(), "Deploying contract...");

    let deployment = factory
        .deploy(context.deployer_address)
        .await
        .map_err(|e| DeployError::deployment(contract_name, e))?;

    tracing::info!(
        contract_address = %deployment.contract.address(),
        tx_hash = %deployment.transaction_hash,
        block_number = ?deployment.block_number,
        "Contract deployed successfully"
    );

    Ok(deployment)
}
