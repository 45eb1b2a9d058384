//! Gas cost estimation for the contract's write operations.

use std::fmt;

use alloy_core::primitives::{Address, U256};

use crate::{
    chain::ClientError,
    contract::{DeployedContract, ITodoList},
    error::DeployError,
};

/// Estimated cost of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GasEstimate {
    Units(u64),
    /// The operation reverts in the current state, so it cannot be estimated.
    Unavailable(String),
}

impl fmt::Display for GasEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasEstimate::Units(gas) => write!(f, "{} gas", gas),
            GasEstimate::Unavailable(reason) => write!(f, "N/A ({})", reason),
        }
    }
}

/// A named operation with its estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEstimate {
    pub operation: &'static str,
    pub estimate: GasEstimate,
}

/// Estimate creating a task (needs no prior state) and completing task 0
/// (needs an existing task).
///
/// A revert is reported as [`GasEstimate::Unavailable`]. Any other client
/// error means the node is unreachable and fails the run.
pub async fn estimate_costs(
    contract: &DeployedContract,
    from: Address,
) -> Result<Vec<OperationEstimate>, DeployError> {
    let create = contract
        .estimate_gas(
            from,
            ITodoList::createTaskCall {
                content: "Sample task".to_string(),
            },
        )
        .await;

    let complete = contract
        .estimate_gas(
            from,
            ITodoList::completeTaskCall {
                taskId: U256::ZERO,
            },
        )
        .await;

    let estimates = vec![
        OperationEstimate {
            operation: "Create Task",
            estimate: classify("Create Task", create, None)?,
        },
        OperationEstimate {
            operation: "Complete Task",
            estimate: classify("Complete Task", complete, Some("no tasks"))?,
        },
    ];

    Ok(estimates)
}

/// Map an estimation result to a [`GasEstimate`].
///
/// `precondition` names the state the operation needs, used as the reason
/// when it reverts.
fn classify(
    operation: &str,
    result: Result<u64, ClientError>,
    precondition: Option<&str>,
) -> Result<GasEstimate, DeployError> {
    match result {
        Ok(gas) => {
            tracing::info!(operation, gas, "Estimated gas");
            Ok(GasEstimate::Units(gas))
        }
        Err(e) if e.is_revert() => {
            tracing::warn!(operation, err = %e, "Gas estimate unavailable");
            let reason = precondition.map(str::to_string).unwrap_or_else(|| e.to_string());
            Ok(GasEstimate::Unavailable(reason))
        }
        Err(e) => Err(DeployError::Connectivity(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revert() -> ClientError {
        ClientError::Rpc {
            code: 3,
            message: "execution reverted: Task does not exist".to_string(),
        }
    }

    #[test]
    fn test_classify_success() {
        let estimate = classify("Create Task", Ok(91_000), None).unwrap();
        assert_eq!(estimate, GasEstimate::Units(91_000));
        assert_eq!(estimate.to_string(), "91000 gas");
    }

    #[test]
    fn test_classify_revert_uses_precondition() {
        let estimate = classify("Complete Task", Err(revert()), Some("no tasks")).unwrap();
        assert_eq!(estimate, GasEstimate::Unavailable("no tasks".to_string()));
        assert_eq!(estimate.to_string(), "N/A (no tasks)");
    }

    #[test]
    fn test_classify_revert_without_precondition() {
        let estimate = classify("Create Task", Err(revert()), None).unwrap();
        assert!(matches!(estimate, GasEstimate::Unavailable(reason) if reason.contains("Task does not exist")));
    }

    #[test]
    fn test_classify_connectivity_is_fatal() {
        let result = classify(
            "Create Task",
            Err(ClientError::Transport("connection refused".to_string())),
            None,
        );
        assert!(matches!(result, Err(DeployError::Connectivity(_))));
    }
}
