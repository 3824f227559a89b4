//! Workspace lifecycle and role assignments.
//!
//! Lookups and creation go through the platform CLI's path syntax
//! (`<name>.Workspace`); role assignments go through the REST API.

use std::time::Duration;

use fab_config::{Permission, WorkspaceConfig};
use fab_core::command::CommandOutput;
use fab_core::error::{FabError, Result};
use fab_core::{fab_success, fab_warning};
use fab_transport::ApiRequest;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::{debug, info};

use crate::context::ProvisionContext;

/// Delay after creation before the new workspace's id becomes queryable.
pub const WORKSPACE_SETTLE_DELAY: Duration = Duration::from_secs(5);

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

/// Primary strategy: the value printed by a successful `-q id` query, when it
/// is exactly one UUID.
pub fn structured_id(output: &CommandOutput) -> Option<String> {
    if !output.success() {
        return None;
    }
    let value = output.stdout.trim().trim_matches('"').trim().to_lowercase();
    let whole = UUID_PATTERN
        .find(&value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len());
    whole.then_some(value)
}

/// Fallback strategy: the first UUID-shaped token anywhere in the output.
pub fn scan_for_uuid(output: &CommandOutput) -> Option<String> {
    let text = output.combined().to_lowercase();
    UUID_PATTERN.find(&text).map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionFailure {
    pub permission: Permission,
    pub reason: String,
}

/// Per-assignment outcome of [`WorkspaceLifecycle::assign_permissions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionReport {
    pub assigned: Vec<Permission>,
    pub failed: Vec<PermissionFailure>,
}

impl PermissionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct WorkspaceLifecycle<'a> {
    ctx: ProvisionContext<'a>,
}

impl<'a> WorkspaceLifecycle<'a> {
    pub fn new(ctx: ProvisionContext<'a>) -> Self {
        Self { ctx }
    }

    fn item_path(name: &str) -> String {
        format!("{}.Workspace", name)
    }

    fn run(&self, args: &[&str]) -> CommandOutput {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.ctx.transport.run(&args)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.run(&["ls", &Self::item_path(name)]).success()
    }

    /// Resolve a workspace id by name, trying the structured query first and
    /// scanning the raw output for a UUID only when that yields nothing.
    pub fn resolve_id(&self, name: &str) -> Option<String> {
        let output = self.run(&["get", &Self::item_path(name), "-q", "id"]);
        let id = structured_id(&output).or_else(|| {
            debug!(workspace = name, "structured id query empty, scanning output");
            scan_for_uuid(&output)
        });
        debug!(workspace = name, id = ?id, "resolved workspace id");
        id
    }

    /// Create the workspace on its capacity unless it already exists, and
    /// return its id. An id that cannot be resolved is an error, since
    /// permission assignment and Git binding depend on it.
    pub fn create(&self, config: &WorkspaceConfig) -> Result<String> {
        let name = config.name.as_str();

        if self.exists(name) {
            fab_success!("{} exists", name);
            return self
                .resolve_id(name)
                .ok_or_else(|| FabError::WorkspaceIdUnresolved(name.to_string()));
        }

        let capacity = format!("capacityname={}", config.capacity);
        let output = self.run(&["create", &Self::item_path(name), "-P", &capacity]);
        if !output.success() {
            return Err(FabError::remote(
                format!("create workspace '{}'", name),
                format!(
                    "exit code {:?}: {}",
                    output.exit_code,
                    output.combined().trim()
                ),
            ));
        }
        fab_success!("Created {}", name);
        info!(workspace = name, capacity = %config.capacity, "workspace created");

        self.ctx.sleeper.sleep(WORKSPACE_SETTLE_DELAY);
        self.resolve_id(name)
            .ok_or_else(|| FabError::WorkspaceIdUnresolved(name.to_string()))
    }

    /// Assign each `(group, role)` pair on the workspace.
    ///
    /// Assignments are independent: a failure is recorded in the report and
    /// the remaining pairs are still attempted.
    pub fn assign_permissions(
        &self,
        workspace_id: &str,
        permissions: &[Permission],
        security_groups: &IndexMap<String, String>,
    ) -> PermissionReport {
        let mut report = PermissionReport::default();

        for permission in permissions {
            let Some(group_id) = security_groups.get(&permission.group) else {
                fab_warning!("Unknown security group {}", permission.group);
                report.failed.push(PermissionFailure {
                    permission: permission.clone(),
                    reason: "security group not found in directory".to_string(),
                });
                continue;
            };

            let request = ApiRequest::post(format!("workspaces/{}/roleAssignments", workspace_id))
                .with_body(json!({
                    "principal": {
                        "id": group_id,
                        "type": "Group",
                        "groupDetails": { "groupType": "SecurityGroup" }
                    },
                    "role": permission.role
                }));
            let response = self.ctx.transport.invoke(&request);

            if response.status_in(&[200, 201]) {
                fab_success!("Assigned {} to {}", permission.role, permission.group);
                report.assigned.push(permission.clone());
            } else {
                fab_warning!(
                    "Failed to assign {} to {} (status {})",
                    permission.role,
                    permission.group,
                    response.status_label()
                );
                report.failed.push(PermissionFailure {
                    permission: permission.clone(),
                    reason: format!("status {}: {}", response.status_label(), response.body),
                });
            }
        }

        report
    }
}
