#![allow(dead_code)]

use fab_config::PlatformSettings;
use fab_transport::ApiResponse;
use serde_json::json;

pub const SUBSCRIPTION: &str = "sub-123";
pub const RESOURCE_GROUP: &str = "rg-fabric";
pub const WORKSPACE_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

pub fn settings() -> PlatformSettings {
    PlatformSettings::new(SUBSCRIPTION).with_github_pat("ghp_test_token")
}

/// ARM describe response for a capacity.
pub fn capacity(provisioning_state: &str, state: Option<&str>) -> ApiResponse {
    let mut properties = json!({ "provisioningState": provisioning_state });
    if let Some(state) = state {
        properties["state"] = json!(state);
    }
    ApiResponse::json(200, json!({ "properties": properties }))
}

pub fn git_status(remote_commit_hash: &str) -> ApiResponse {
    ApiResponse::json(
        200,
        json!({ "remoteCommitHash": remote_commit_hash, "workspaceHead": "000" }),
    )
}

pub fn git_not_initialized() -> ApiResponse {
    ApiResponse::json(
        400,
        json!({
            "errorCode": "WorkspaceGitConnectionNotInitialized",
            "message": "The workspace git connection is not initialized"
        }),
    )
}
