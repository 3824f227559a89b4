use crate::capacity::CapacityOutcome;
use crate::workspace::PermissionReport;

/// Where a workspace's Git binding ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitState {
    /// The workspace declares no repository folder.
    NotRequested,
    /// No connection could be found or created.
    NoConnection,
    ConnectFailed,
    Connected,
    Synced,
    SyncFailed,
}

impl GitState {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            GitState::NoConnection | GitState::ConnectFailed | GitState::SyncFailed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    pub name: String,
    pub outcome: CapacityOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceReport {
    pub name: String,
    pub id: Option<String>,
    pub permissions: PermissionReport,
    pub git: GitState,
    /// Set when the workspace could not be provisioned at all.
    pub error: Option<String>,
}

impl WorkspaceReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            permissions: PermissionReport::default(),
            git: GitState::NotRequested,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(name)
        }
    }

    pub fn has_failures(&self) -> bool {
        self.error.is_some() || !self.permissions.is_complete() || self.git.is_failure()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub capacities: Vec<CapacityReport>,
    pub workspaces: Vec<WorkspaceReport>,
}

impl DeployReport {
    pub fn has_failures(&self) -> bool {
        self.workspaces.iter().any(WorkspaceReport::has_failures)
            || self
                .capacities
                .iter()
                .any(|c| c.outcome == CapacityOutcome::Created { ready: false })
    }

    pub fn workspace(&self, name: &str) -> Option<&WorkspaceReport> {
        self.workspaces.iter().find(|w| w.name == name)
    }

    /// One line per problem, for the final summary.
    pub fn failure_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for capacity in &self.capacities {
            if capacity.outcome == (CapacityOutcome::Created { ready: false }) {
                lines.push(format!("capacity {}: not ready within the wait budget", capacity.name));
            }
        }
        for workspace in &self.workspaces {
            if let Some(error) = &workspace.error {
                lines.push(format!("workspace {}: {}", workspace.name, error));
            }
            for failure in &workspace.permissions.failed {
                lines.push(format!(
                    "workspace {}: {} for {}: {}",
                    workspace.name, failure.permission.role, failure.permission.group, failure.reason
                ));
            }
            if workspace.git.is_failure() {
                lines.push(format!("workspace {}: git {:?}", workspace.name, workspace.git));
            }
        }
        lines
    }
}
