//! Human-readable summary of a deployment run.

use std::{fmt, path::PathBuf};

use alloy_core::primitives::{Address, B256};
use comfy_table::Table;

use crate::stages::{DeploymentContext, OperationEstimate, Verification};

/// Aggregated outcome of a successful run.
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub context: DeploymentContext,
    pub contract_name: String,
    pub contract_address: Address,
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub verification: Verification,
    pub record_path: PathBuf,
    /// `None` when no interface description was available.
    pub interface_path: Option<PathBuf>,
    pub gas_estimates: Vec<OperationEstimate>,
}

impl DeploymentReport {
    fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["Deployment", ""]);

        table.add_row(vec!["Contract".to_string(), self.contract_name.clone()]);
        table.add_row(vec![
            "Network".to_string(),
            format!("{} (chain id {})", self.context.network_name, self.context.chain_id),
        ]);
        table.add_row(vec![
            "Deployer".to_string(),
            self.context.deployer_address.to_checksum(None),
        ]);
        table.add_row(vec![
            "Balance".to_string(),
            format!("{} ETH", self.context.balance_in_ether()),
        ]);
        table.add_row(vec![
            "Contract address".to_string(),
            self.contract_address.to_checksum(None),
        ]);
        table.add_row(vec![
            "Transaction hash".to_string(),
            self.transaction_hash.to_string(),
        ]);
        table.add_row(vec![
            "Block number".to_string(),
            self.block_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        ]);
        table.add_row(vec![
            "Verification".to_string(),
            match &self.verification {
                Verification::Verified { owner } => format!("ok, owner {}", owner.to_checksum(None)),
                Verification::Warning(reason) => format!("warning: {}", reason),
            },
        ]);
        table.add_row(vec![
            "Record".to_string(),
            self.record_path.display().to_string(),
        ]);
        table.add_row(vec![
            "ABI".to_string(),
            self.interface_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not exported".to_string()),
        ]);

        table
    }

    fn gas_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["Operation", "Estimated gas"]);
        for estimate in &self.gas_estimates {
            table.add_row(vec![estimate.operation.to_string(), estimate.estimate.to_string()]);
        }
        table
    }

    /// Snippets showing how to use the deployed instance.
    pub fn interaction_examples(&self) -> String {
        let address = self.contract_address.to_checksum(None);
        let name = &self.contract_name;

        format!(
            "// JavaScript (ethers.js)\n\
             const contractAddress = \"{address}\";\n\
             const todoList = await ethers.getContractAt(\"{name}\", contractAddress);\n\
             \n\
             // Create a new task\n\
             await todoList.createTask(\"Buy groceries\");\n\
             \n\
             // Get all tasks\n\
             const tasks = await todoList.getAllTasks();\n\
             \n\
             // Complete a task\n\
             await todoList.completeTask(0); // taskId = 0\n\
             \n\
             // Delete a task\n\
             await todoList.deleteTask(0); // taskId = 0"
        )
    }
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary_table())?;
        writeln!(f)?;
        writeln!(f, "{}", self.gas_table())?;
        writeln!(f)?;
        writeln!(f, "Contract interaction examples:")?;
        writeln!(f, "{}", self.interaction_examples())?;
        writeln!(f)?;
        write!(
            f,
            "Contract is ready for interaction on {}",
            self.context.network_name
        )
    }
}
