//! dtodo is a CLI tool to deploy the decentralized to-do list contract and record the deployment.

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use dtodo_deploy::{DeployConfig, HardhatArtifacts, JsonRpcClient};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let config = DeployConfig::load(cli.config.as_deref(), &cli.overrides())?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        contract = %config.contract,
        artifacts = %config.artifacts.display(),
        outdata = %config.outdata.display(),
        "Starting deployment of the decentralized to-do list contract..."
    );

    let client = JsonRpcClient::new(config.client_config()).context("Failed to create RPC client")?;
    let artifacts = HardhatArtifacts::new(&config.artifacts);
    let deployer = config.deployer();

    match deployer.deploy(Arc::new(client), &artifacts).await {
        Ok(report) => {
            println!("{}", report);
            tracing::info!("Script execution completed");
            Ok(())
        }
        Err(e) => {
            if e.contract_deployed() {
                tracing::error!(
                    "The contract is already on-chain, do not redeploy. Fix the output directory and keep the address below."
                );
            }
            Err(e).context("Deployment failed")
        }
    }
}
