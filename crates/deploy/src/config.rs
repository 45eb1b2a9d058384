//! Run configuration, layered from defaults, a TOML file, the environment and CLI flags.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Deployer, JsonRpcClientConfig, contract::DEFAULT_CONTRACT_NAME};

/// The default name of the configuration file.
pub const CONFIG_FILENAME: &str = "Dtodo.toml";

/// Prefix of the environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DTODO_";

/// Everything a deployment run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// JSON-RPC endpoint of the target network.
    pub rpc_url: Url,
    /// Network name override. Derived from the chain id when absent.
    pub network: Option<String>,
    /// Contract to deploy.
    pub contract: String,
    /// Hardhat artifacts directory.
    pub artifacts: PathBuf,
    /// Directory receiving the deployment record and ABI.
    pub outdata: PathBuf,
    /// Account to deploy from. Defaults to the node's first account.
    pub from: Option<Address>,
    pub confirmation_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            rpc_url: Url::parse("http://127.0.0.1:8545").expect("static URL is valid"),
            network: None,
            contract: DEFAULT_CONTRACT_NAME.to_string(),
            artifacts: PathBuf::from("artifacts"),
            outdata: PathBuf::from("deployments"),
            from: None,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

/// Values given explicitly on the command line. Unset fields leave lower layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdata: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_timeout_secs: Option<u64>,
}

impl DeployConfig {
    /// Load the configuration.
    ///
    /// Precedence, lowest first: built-in defaults, the TOML file, `DTODO_*`
    /// environment variables, `overrides`. An explicitly given `config_path`
    /// must exist; otherwise `Dtodo.toml` in the working directory is read if present.
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found: {}", path.display());
                }
                if path.is_dir() {
                    path.join(CONFIG_FILENAME)
                } else {
                    path.to_path_buf()
                }
            }
            None => PathBuf::from(CONFIG_FILENAME),
        };

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
            .extract()
            .with_context(|| format!("Failed to load configuration (file: {})", file.display()))?;

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Settings for the JSON-RPC chain client.
    pub fn client_config(&self) -> JsonRpcClientConfig {
        JsonRpcClientConfig {
            url: self.rpc_url.clone(),
            network_name: self.network.clone(),
            from: self.from,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            confirmation_timeout: Duration::from_secs(self.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// A deployer writing to the configured output directory.
    pub fn deployer(&self) -> Deployer {
        Deployer::new(self.contract.clone(), self.outdata.clone())
    }
}
