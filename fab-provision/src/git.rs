//! GitHub connections and workspace Git binding.
//!
//! A binding moves through Unbound → Connected → Initialized → Synced.
//! Connection creation, binding and syncing are soft operations: failures
//! are reported as `false`/`None` so the caller can keep provisioning other
//! workspaces.

use fab_config::{GitHubConfig, PlatformSettings};
use fab_core::{fab_progress, fab_success, fab_warning};
use fab_transport::{ApiRequest, ApiResponse};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::context::ProvisionContext;

/// Error code the status endpoint returns before a fresh binding is initialized.
pub const GIT_CONNECTION_NOT_INITIALIZED: &str = "WorkspaceGitConnectionNotInitialized";

/// Progress of a pull, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    StatusChecked,
    Initializing,
    StatusConfirmed,
    Updated,
}

pub struct GitBinding<'a> {
    ctx: ProvisionContext<'a>,
}

impl<'a> GitBinding<'a> {
    pub fn new(ctx: ProvisionContext<'a>) -> Self {
        Self { ctx }
    }

    /// Id of the connection with the given display name, if listed.
    pub fn find_connection(&self, display_name: &str) -> Option<String> {
        let response = self.ctx.transport.invoke(&ApiRequest::get("connections"));
        if !response.status_in(&[200]) {
            debug!(status = %response.status_label(), "could not list connections");
            return None;
        }

        response
            .body
            .get("value")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|conn| conn.get("displayName").and_then(Value::as_str) == Some(display_name))
            .and_then(|conn| conn.get("id").and_then(Value::as_str))
            .map(String::from)
    }

    /// Request body for a new shareable GitHub connection.
    pub fn connection_body(git: &GitHubConfig, settings: &PlatformSettings) -> Value {
        json!({
            "connectivityType": "ShareableCloud",
            "displayName": git.connection_name(),
            "connectionDetails": {
                "type": "GitHubSourceControl",
                "creationMethod": "GitHubSourceControl.Contents",
                "parameters": [
                    { "dataType": "Text", "name": "url", "value": git.repository_url() }
                ]
            },
            "credentialDetails": {
                "credentials": { "credentialType": "Key", "key": settings.github_pat }
            }
        })
    }

    /// Reuse the connection named `GitHub-{organization}-{repository}` or
    /// create it. `None` means Git integration is unavailable for this run.
    pub fn resolve_or_create_connection(&self, git: &GitHubConfig) -> Option<String> {
        let name = git.connection_name();

        if let Some(id) = self.find_connection(&name) {
            fab_success!("Using existing connection: {}", name);
            return Some(id);
        }

        if self.ctx.settings.github_pat.is_none() {
            warn!(connection = %name, "creating connection without a GitHub credential");
        }

        let request =
            ApiRequest::post("connections").with_body(Self::connection_body(git, self.ctx.settings));
        let response = self.ctx.transport.invoke(&request);

        if response.status_in(&[200, 201]) {
            if let Some(id) = response.str_field("id") {
                fab_success!("Created connection: {}", name);
                return Some(id.to_string());
            }
            fab_warning!("Connection {} created but no id was returned", name);
            return None;
        }

        fab_warning!(
            "Failed to create connection {} (status {})",
            name,
            response.status_label()
        );
        None
    }

    /// Bind the workspace to `directory` on the configured branch. Not retried.
    pub fn connect(
        &self,
        workspace_id: &str,
        directory: &str,
        git: &GitHubConfig,
        connection_id: &str,
    ) -> bool {
        let request = ApiRequest::post(format!("workspaces/{}/git/connect", workspace_id))
            .with_body(json!({
                "gitProviderDetails": {
                    "ownerName": git.organization,
                    "gitProviderType": git.provider,
                    "repositoryName": git.repository,
                    "branchName": git.branch,
                    "directoryName": directory
                },
                "myGitCredentials": {
                    "source": "ConfiguredConnection",
                    "connectionId": connection_id
                }
            }));
        let response = self.ctx.transport.invoke(&request);

        if response.status_in(&[200, 201]) {
            fab_success!("Connected workspace {} to Git: {}", workspace_id, directory);
            return true;
        }

        fab_warning!(
            "Failed to connect workspace {} to Git (status {})",
            workspace_id,
            response.status_label()
        );
        false
    }

    pub fn initialize_connection(&self, workspace_id: &str) -> bool {
        let response = self.ctx.transport.invoke(&Self::initialize_request(workspace_id));
        let ok = response.status_in(&[200, 201, 202]);
        if ok {
            fab_success!("Initialized Git connection");
        } else {
            debug!(
                workspace_id,
                status = %response.status_label(),
                "initialize connection not accepted"
            );
        }
        ok
    }

    fn initialize_request(workspace_id: &str) -> ApiRequest {
        ApiRequest::post(format!("workspaces/{}/git/initializeConnection", workspace_id))
            .with_body(json!({}))
    }

    fn git_status(&self, workspace_id: &str) -> ApiResponse {
        self.ctx
            .transport
            .invoke(&ApiRequest::get(format!("workspaces/{}/git/status", workspace_id)))
    }

    fn needs_initialization(status: &ApiResponse) -> bool {
        status.status_code == Some(400)
            && status.str_field("errorCode") == Some(GIT_CONNECTION_NOT_INITIALIZED)
    }

    /// Pull remote content into the workspace.
    ///
    /// Reads the Git status (initializing the binding once if the platform
    /// reports it uninitialized), then updates from the remote commit with the
    /// workspace winning conflicts. An empty update response counts as success.
    pub fn sync_from_remote(&self, workspace_id: &str) -> bool {
        let mut status = self.git_status(workspace_id);
        if status.is_blank() || !status.is_parsed() {
            fab_warning!("Failed to get Git status");
            return false;
        }
        debug!(workspace_id, state = ?SyncState::StatusChecked, "git sync");

        if Self::needs_initialization(&status) {
            debug!(workspace_id, state = ?SyncState::Initializing, "git sync");
            fab_progress!("Initializing Git connection");
            self.ctx.transport.invoke(&Self::initialize_request(workspace_id));

            status = self.git_status(workspace_id);
            if status.is_blank() || !status.is_parsed() {
                fab_warning!("Failed to get Git status after initialization");
                return false;
            }
        }

        if !status.status_in(&[200]) {
            fab_warning!("Failed to get Git status: {}", status.status_label());
            fab_warning!("Error: {}", status.body);
            return false;
        }

        let Some(remote_commit_hash) = status
            .str_field("remoteCommitHash")
            .filter(|hash| !hash.is_empty())
            .map(String::from)
        else {
            fab_warning!("No remoteCommitHash found in status");
            return false;
        };
        debug!(workspace_id, state = ?SyncState::StatusConfirmed, %remote_commit_hash, "git sync");

        let request = ApiRequest::post(format!("workspaces/{}/git/updateFromGit", workspace_id))
            .with_body(json!({
                "remoteCommitHash": remote_commit_hash,
                "conflictResolution": {
                    "conflictResolutionType": "Workspace",
                    "conflictResolutionPolicy": "PreferWorkspace"
                },
                "options": { "allowOverrideItems": true }
            }));
        let response = self.ctx.transport.invoke(&request);

        if response.is_blank() || response.status_in(&[200, 201, 202]) {
            debug!(workspace_id, state = ?SyncState::Updated, "git sync");
            fab_success!("Updated workspace {} from Git", workspace_id);
            return true;
        }

        fab_warning!(
            "Update from Git may have failed (status {})",
            response.status_label()
        );
        false
    }
}
