//! Sequencing of the lifecycle components over a deployment template.
//!
//! Capacities come first and their failures abort the run, since nothing
//! downstream can work without them. Workspaces are then provisioned one by
//! one on a best-effort basis: a failure is recorded in the report and the
//! next workspace is still attempted.

use fab_config::{DeployConfig, GitHubConfig, Permission, WorkspaceConfig};
use fab_core::error::Result;
use fab_core::{fab_error, fab_section, fab_success, fab_warning};
use tracing::{info, info_span};

use crate::capacity::CapacityLifecycle;
use crate::context::ProvisionContext;
use crate::git::GitBinding;
use crate::report::{CapacityReport, DeployReport, GitState, WorkspaceReport};
use crate::workspace::WorkspaceLifecycle;

pub const DEFAULT_FEATURE_GROUP: &str = "SG_AV_Engineers";
pub const DEFAULT_FEATURE_ROLE: &str = "Admin";

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Pull repository content into each workspace after binding it.
    pub sync_from_git: bool,
}

/// Workspaces to create for a feature branch.
#[derive(Debug, Clone)]
pub struct FeatureRequest {
    pub branch: String,
    pub workspace_types: Vec<String>,
    pub group: String,
    pub role: String,
}

impl FeatureRequest {
    pub fn new(branch: impl Into<String>, workspace_types: Vec<String>) -> Self {
        Self {
            branch: branch.into(),
            workspace_types,
            group: DEFAULT_FEATURE_GROUP.to_string(),
            role: DEFAULT_FEATURE_ROLE.to_string(),
        }
    }

    /// Split a comma-separated list of workspace types.
    pub fn parse_types(csv: &str) -> Vec<String> {
        csv.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn workspace_name(&self, solution_version: &str, workspace_type: &str) -> String {
        format!("{}-{}-{}", solution_version, self.branch, workspace_type)
    }
}

/// Capacity a feature workspace of the given type lives on.
pub fn capacity_for_workspace_type(workspace_type: &str, solution_version: &str) -> Option<String> {
    match workspace_type {
        "processing" | "datastores" => Some(format!("fc{}devengineering", solution_version)),
        "consumption" => Some(format!("fc{}devconsumption", solution_version)),
        _ => None,
    }
}

pub struct Orchestrator<'a> {
    capacities: CapacityLifecycle<'a>,
    workspaces: WorkspaceLifecycle<'a>,
    git: GitBinding<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(ctx: ProvisionContext<'a>) -> Self {
        Self {
            capacities: CapacityLifecycle::new(ctx),
            workspaces: WorkspaceLifecycle::new(ctx),
            git: GitBinding::new(ctx),
        }
    }

    /// Provision every capacity and workspace in the template.
    pub fn deploy(&self, config: &DeployConfig, options: &DeployOptions) -> Result<DeployReport> {
        let mut report = DeployReport::default();
        let defaults = &config.azure.capacity_defaults;
        let resource_group = config.resource_group();

        fab_section!("Creating Capacities");
        for capacity in &config.capacities {
            let _span = info_span!("capacity", name = %capacity.name).entered();
            let outcome = self.capacities.create(capacity, resource_group, defaults)?;
            report.capacities.push(CapacityReport {
                name: capacity.name.clone(),
                outcome,
            });
        }

        fab_section!("Creating Workspaces and setting up Git connection");
        let mut connection: Option<String> = None;
        for workspace in &config.workspaces {
            let _span = info_span!("workspace", name = %workspace.name).entered();
            let ws_report = self.provision_workspace(
                workspace,
                config,
                &config.github,
                &mut connection,
                |binding, workspace_id| {
                    if options.sync_from_git {
                        binding.sync(workspace_id)
                    } else {
                        GitState::Connected
                    }
                },
            );
            report.workspaces.push(ws_report);
        }

        info!(
            capacities = report.capacities.len(),
            workspaces = report.workspaces.len(),
            "deployment finished"
        );
        Ok(report)
    }

    /// Create per-branch workspaces for feature development, bound to
    /// `solution/<type>/` on the feature branch and synced from it.
    pub fn create_feature_workspaces(
        &self,
        config: &DeployConfig,
        request: &FeatureRequest,
    ) -> Result<DeployReport> {
        let mut report = DeployReport::default();
        let version = config.solution_version();
        let git_config = GitHubConfig {
            branch: request.branch.clone(),
            ..config.github.clone()
        };

        fab_section!("Creating feature workspaces for branch: {}", request.branch);
        let mut connection: Option<String> = None;
        for workspace_type in &request.workspace_types {
            let name = request.workspace_name(version, workspace_type);
            let Some(capacity) = capacity_for_workspace_type(workspace_type, version) else {
                fab_error!("Unknown workspace type: {}", workspace_type);
                report.workspaces.push(WorkspaceReport::failed(
                    name,
                    format!("unknown workspace type '{}'", workspace_type),
                ));
                continue;
            };

            let _span = info_span!("workspace", name = %name).entered();
            fab_section!("Creating {}", name);
            let workspace = WorkspaceConfig {
                name,
                capacity,
                permissions: vec![Permission::new(&request.group, &request.role)],
                connect_to_git_folder: Some(format!("solution/{}/", workspace_type)),
            };

            let ws_report = self.provision_workspace(
                &workspace,
                config,
                &git_config,
                &mut connection,
                |binding, workspace_id| {
                    if !binding.git.initialize_connection(workspace_id) {
                        fab_warning!("Git connection for {} was not initialized", workspace_id);
                    }
                    binding.sync(workspace_id)
                },
            );
            report.workspaces.push(ws_report);
        }

        fab_success!("Feature workspace creation complete");
        Ok(report)
    }

    /// Suspend every template capacity, or only `only` when given.
    pub fn suspend_capacities(
        &self,
        config: &DeployConfig,
        only: Option<&str>,
    ) -> Vec<(String, bool)> {
        let resource_group = config.resource_group();
        let names: Vec<String> = match only {
            Some(name) => vec![name.to_string()],
            None => config.capacities.iter().map(|c| c.name.clone()).collect(),
        };

        names
            .into_iter()
            .map(|name| {
                let suspended = self.capacities.suspend(&name, resource_group);
                (name, suspended)
            })
            .collect()
    }

    /// Create, grant, connect, then hand over to `after_connect`.
    fn provision_workspace<F>(
        &self,
        workspace: &WorkspaceConfig,
        config: &DeployConfig,
        git_config: &GitHubConfig,
        connection: &mut Option<String>,
        after_connect: F,
    ) -> WorkspaceReport
    where
        F: FnOnce(&Self, &str) -> GitState,
    {
        let mut report = WorkspaceReport::new(&workspace.name);

        let workspace_id = match self.workspaces.create(workspace) {
            Ok(id) => id,
            Err(e) => {
                fab_error!("{}", e);
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.id = Some(workspace_id.clone());

        report.permissions = self.workspaces.assign_permissions(
            &workspace_id,
            &workspace.permissions,
            &config.azure.security_groups,
        );

        let Some(directory) = workspace.connect_to_git_folder.as_deref() else {
            return report;
        };

        if !git_config.is_configured() {
            fab_warning!("No GitHub repository configured, skipping Git binding");
            report.git = GitState::NoConnection;
            return report;
        }

        if connection.is_none() {
            *connection = self.git.resolve_or_create_connection(git_config);
        }
        let Some(connection_id) = connection.as_deref() else {
            report.git = GitState::NoConnection;
            return report;
        };

        if !self
            .git
            .connect(&workspace_id, directory, git_config, connection_id)
        {
            report.git = GitState::ConnectFailed;
            return report;
        }

        report.git = after_connect(self, &workspace_id);
        report
    }

    fn sync(&self, workspace_id: &str) -> GitState {
        if self.git.sync_from_remote(workspace_id) {
            GitState::Synced
        } else {
            GitState::SyncFailed
        }
    }
}
