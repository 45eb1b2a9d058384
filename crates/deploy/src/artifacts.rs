//! The Build Artifact Store seam: compiled creation code and interface descriptions.

use std::path::PathBuf;

use alloy_core::primitives::Bytes;
use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;

/// Errors raised while resolving a contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no artifact for contract {name} at {}", path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("artifact for contract {0} carries no creation bytecode")]
    EmptyBytecode(String),
}

/// Everything needed to create an instance of a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub name: String,
    /// Creation code, including any constructor logic.
    pub bytecode: Bytes,
}

/// Interface description of a contract, kept exactly as the store reports it.
#[derive(Debug, Clone)]
pub struct InterfaceArtifact(Box<RawValue>);

impl InterfaceArtifact {
    pub fn new(raw: Box<RawValue>) -> Self {
        Self(raw)
    }

    /// Parse an interface description from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Self)
    }

    /// The interface description as JSON text.
    pub fn as_json(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for InterfaceArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

/// Source of compiled contracts.
pub trait ArtifactStore: Send + Sync {
    /// Resolve the creation code for `name`.
    fn resolve_factory(&self, name: &str) -> Result<ContractArtifact, ArtifactError>;

    /// The interface description for `name`, if one is available.
    fn interface_description(&self, name: &str) -> Option<InterfaceArtifact>;
}

/// Layout of a Hardhat compilation artifact.
#[derive(Debug, Deserialize)]
struct HardhatArtifact {
    #[serde(default)]
    abi: Option<Box<RawValue>>,
    #[serde(default)]
    bytecode: Option<String>,
}

/// Reads artifacts from a Hardhat `artifacts/` directory.
///
/// A contract `Name` declared in `contracts/Name.sol` lives at
/// `<root>/contracts/Name.sol/Name.json`.
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

impl HardhatArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the artifact file for `name`.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.root
            .join("contracts")
            .join(format!("{}.sol", name))
            .join(format!("{}.json", name))
    }

    fn load(&self, name: &str) -> Result<HardhatArtifact, ArtifactError> {
        let path = self.artifact_path(name);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(source) => return Err(ArtifactError::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|e| ArtifactError::Malformed {
            path,
            reason: e.to_string(),
        })
    }
}

impl ArtifactStore for HardhatArtifacts {
    fn resolve_factory(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let artifact = self.load(name)?;

        let bytecode = artifact
            .bytecode
            .filter(|code| !code.trim_start_matches("0x").is_empty())
            .ok_or_else(|| ArtifactError::EmptyBytecode(name.to_string()))?;

        let bytecode: Bytes = bytecode.parse().map_err(|e| ArtifactError::Malformed {
            path: self.artifact_path(name),
            reason: format!("invalid bytecode: {}", e),
        })?;

        Ok(ContractArtifact {
            name: name.to_string(),
            bytecode,
        })
    }

    fn interface_description(&self, name: &str) -> Option<InterfaceArtifact> {
        match self.load(name) {
            Ok(artifact) => artifact.abi.map(InterfaceArtifact::new),
            Err(e) => {
                tracing::debug!(contract = %name, err = %e, "No interface description available");
                None
            }
        }
    }
}
