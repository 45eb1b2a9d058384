use std::{path::PathBuf, sync::Arc};

use alloy_core::primitives::Address;

use crate::{
    DeploymentReport,
    artifacts::ArtifactStore,
    chain::ChainClient,
    error::DeployError,
    stages,
    store::{DeploymentRecord, DeploymentStore, StoreError},
};

/// Orchestrates a single contract deployment from context resolution to cost estimation.
///
/// The storage root is part of the deployer rather than implied by the
/// working directory, so separate runs can write to separate locations.
#[derive(Debug, Clone)]
pub struct Deployer {
    /// Name of the contract to deploy, as known to the artifact store.
    pub contract_name: String,
    /// Where the deployment record and interface file are written.
    pub store: DeploymentStore,
}

impl Deployer {
    pub fn new(contract_name: impl Into<String>, outdata: impl Into<PathBuf>) -> Self {
        Self {
            contract_name: contract_name.into(),
            store: DeploymentStore::new(outdata),
        }
    }

    /// Run every stage in order.
    ///
    /// Returns an error for connectivity, deployment and persistence failures.
    /// A failed verification or an unavailable gas estimate is reported in the
    /// returned [`DeploymentReport`] instead.
    pub async fn deploy(
        &self,
        client: Arc<dyn ChainClient>,
        artifacts: &dyn ArtifactStore,
    ) -> Result<DeploymentReport, DeployError> {
        tracing::info!(contract = %self.contract_name, "Starting deployment process...");

        let context = stages::resolve_context(client.as_ref()).await?;

        let deployment =
            stages::execute_deployment(&context, artifacts, client.clone(), &self.contract_name)
                .await?;
        let contract_address = deployment.contract.address();

        let verification = stages::verify_deployment(&deployment.contract).await;

        let record = DeploymentRecord::new(
            context.network_name.clone(),
            context.chain_id,
            contract_address,
            context.deployer_address,
            deployment.transaction_hash,
            deployment.block_number,
        );
        let record_path = self
            .persist_record(&record)
            .await
            .map_err(|e| persistence_error(contract_address, e))?;

        let interface_path = self
            .export_interface(artifacts)
            .await
            .map_err(|e| persistence_error(contract_address, e))?;

        let gas_estimates =
            stages::estimate_costs(&deployment.contract, context.deployer_address).await?;

        tracing::info!(
            contract_address = %contract_address,
            network = %context.network_name,
            "✓ Deployment complete!"
        );

        Ok(DeploymentReport {
            context,
            contract_name: self.contract_name.clone(),
            contract_address,
            transaction_hash: deployment.transaction_hash,
            block_number: deployment.block_number,
            verification,
            record_path,
            interface_path,
            gas_estimates,
        })
    }

    async fn persist_record(&self, record: &DeploymentRecord) -> Result<PathBuf, StoreError> {
        let path = self.store.save_record(record).await?;
        tracing::info!(path = %path.display(), "Deployment info saved");
        Ok(path)
    }

    /// Copy the interface description next to the records, if the artifact store has one.
    async fn export_interface(
        &self,
        artifacts: &dyn ArtifactStore,
    ) -> Result<Option<PathBuf>, StoreError> {
        let Some(interface) = artifacts.interface_description(&self.contract_name) else {
            tracing::debug!(contract = %self.contract_name, "No interface description, skipping export");
            return Ok(None);
        };

        let path = self.store.save_interface(&self.contract_name, &interface).await?;
        tracing::info!(path = %path.display(), "ABI saved");
        Ok(Some(path))
    }
}

fn persistence_error(contract_address: Address, e: StoreError) -> DeployError {
    DeployError::Persistence {
        contract_address,
        path: e.path,
        source: e.source,
    }
}
