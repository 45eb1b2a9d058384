//! Context resolution: who deploys, with how much, and where.

use alloy_core::primitives::{Address, U256, utils::format_ether};

use crate::{chain::ChainClient, error::DeployError};

/// Identity and network of a run, shared by every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentContext {
    pub deployer_address: Address,
    /// Balance in wei when the run started.
    pub account_balance: U256,
    /// Filesystem-safe network name, used as the persistence key.
    pub network_name: String,
    pub chain_id: u64,
}

impl DeploymentContext {
    /// The balance formatted in ether.
    pub fn balance_in_ether(&self) -> String {
        format_ether(self.account_balance)
    }
}

/// Query the signer, its balance and the network identity.
pub async fn resolve_context(client: &dyn ChainClient) -> Result<DeploymentContext, DeployError> {
    let deployer_address = client.signer().await.map_err(DeployError::Connectivity)?;
    let account_balance = client
        .balance(deployer_address)
        .await
        .map_err(DeployError::Connectivity)?;
    let network = client.network().await.map_err(DeployError::Connectivity)?;

    let context = DeploymentContext {
        deployer_address,
        account_balance,
        network_name: sanitize_network_name(&network.name),
        chain_id: network.chain_id,
    };

    tracing::info!(
        deployer = %context.deployer_address,
        balance_eth = %context.balance_in_ether(),
        network = %context.network_name,
        chain_id = context.chain_id,
        "Resolved deployment context"
    );

    Ok(context)
}

/// Turn a network name into a token that is safe to use as a file name.
///
/// Lowercases ASCII letters, keeps digits, `-` and `_`, and replaces anything
/// else with `-`.
pub fn sanitize_network_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '-',
        })
        .collect();

    let sanitized = sanitized.trim_matches('-');
    if sanitized.is_empty() {
        "unknown".to_string()
    } else {
        sanitized.to_string()
    }
}
