//! dtodo-deploy - Deployment library for the decentralized to-do list contract.
//!
//! This crate deploys the contract to an EVM network, checks that the new
//! instance answers reads, records the deployment per network and estimates
//! the cost of the contract's write operations.

pub mod artifacts;
pub mod chain;
mod config;
pub mod contract;
mod deployer;
mod error;
mod fs;
mod report;
mod rpc;
pub mod stages;
mod store;

pub use artifacts::{ArtifactError, ArtifactStore, ContractArtifact, HardhatArtifacts, InterfaceArtifact};
pub use chain::{ChainClient, ClientError, JsonRpcClient, JsonRpcClientConfig, NetworkInfo, TxReceipt};
pub use config::{CONFIG_FILENAME, ConfigOverrides, DeployConfig, ENV_PREFIX};
pub use contract::{DEFAULT_CONTRACT_NAME, DeployedContract, ITodoList};
pub use deployer::Deployer;
pub use error::{DeployError, DeploymentFailure};
pub use report::DeploymentReport;
pub use stages::{DeploymentContext, GasEstimate, OperationEstimate, Verification};
pub use store::{DeploymentRecord, DeploymentStore, StoreError};
