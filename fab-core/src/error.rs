use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FabError {
    Config(String),
    /// A request the caller expected to succeed came back with a non-success status.
    Remote {
        operation: String,
        detail: String,
    },
    Io(#[from] std::io::Error),
    Command(String),
    Dependency(String),
    Auth(String),
    Serialization(String),
    WorkspaceIdUnresolved(String),
    Other(#[from] anyhow::Error),
}

impl FabError {
    pub fn remote(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        FabError::Remote {
            operation: operation.into(),
            detail: detail.into(),
        }
    }
}

impl Display for FabError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FabError::Config(s) => write!(f, "Configuration error: {}", s),
            FabError::Remote { operation, detail } => {
                write!(f, "Remote request failed while trying to {}: {}", operation, detail)
            }
            FabError::Io(e) => write!(f, "I/O error: {}", e),
            FabError::Command(s) => write!(f, "Command failed: {}", s),
            FabError::Dependency(s) => {
                write!(f, "Dependency not found: {}\n\n", s)?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Install the Fabric CLI: pip install ms-fabric-cli\n")?;
                write!(f, "  • Or point FAB_CLI_PATH at an existing `fab` executable")
            }
            FabError::Auth(s) => write!(f, "Authentication failed: {}", s),
            FabError::Serialization(s) => write!(f, "Serialization error: {}", s),
            FabError::WorkspaceIdUnresolved(name) => write!(
                f,
                "Could not resolve the id of workspace '{}'; dependent steps cannot continue",
                name
            ),
            FabError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl From<serde_yaml_ng::Error> for FabError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        FabError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for FabError {
    fn from(err: serde_json::Error) -> Self {
        FabError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FabError>;
