//! The stages of a deployment run.
//!
//! The order is fixed: context -> execution -> verification -> persistence ->
//! interface export -> cost estimation. Verification and cost estimation degrade
//! into values instead of failing the run.

mod context;
mod estimation;
mod execution;
mod verification;

pub use context::{DeploymentContext, resolve_context, sanitize_network_name};
pub use estimation::{GasEstimate, OperationEstimate, estimate_costs};
pub use execution::execute_deployment;
pub use verification::{Verification, verify_deployment};
