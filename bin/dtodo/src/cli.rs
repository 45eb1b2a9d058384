use std::path::PathBuf;

use alloy_core::primitives::Address;
use clap::Parser;
use dtodo_deploy::ConfigOverrides;
use tracing::level_filters::LevelFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "dtodo")]
#[command(
    author,
    version,
    about = "Deploy the decentralized to-do list contract and record where it lives"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "DTODO_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// Path to a Dtodo.toml configuration file (or the directory holding it).
    ///
    /// If not provided, ./Dtodo.toml is read when it exists.
    #[arg(long, alias = "conf", env = "DTODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// The URL of the JSON-RPC endpoint to deploy to.
    ///
    /// Defaults to a local development node at http://127.0.0.1:8545.
    #[arg(long, alias = "rpc")]
    pub rpc_url: Option<Url>,

    /// A custom name for the network.
    ///
    /// If not provided, the name is derived from the chain id (e.g. sepolia, hardhat,
    /// chain-424242). The name keys the deployment record file.
    #[arg(short, long, visible_alias = "name")]
    pub network: Option<String>,

    /// The name of the contract to deploy.
    #[arg(long)]
    pub contract: Option<String>,

    /// The Hardhat artifacts directory holding the compiled contract.
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// The directory where the deployment record and ABI are written.
    ///
    /// Defaults to ./deployments.
    #[arg(long, alias = "outdata")]
    pub out: Option<PathBuf>,

    /// The account to deploy from.
    ///
    /// If not provided, the first account managed by the node is used.
    #[arg(long)]
    pub from: Option<Address>,

    /// Maximum time in seconds to wait for the creation transaction to be mined.
    #[arg(long)]
    pub confirmation_timeout: Option<u64>,
}

impl Cli {
    /// Configuration values given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rpc_url: self.rpc_url.clone(),
            network: self.network.clone(),
            contract: self.contract.clone(),
            artifacts: self.artifacts.clone(),
            outdata: self.out.clone(),
            from: self.from,
            confirmation_timeout_secs: self.confirmation_timeout,
        }
    }
}
