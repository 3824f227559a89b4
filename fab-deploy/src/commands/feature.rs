use std::path::Path;

use fab_core::error::{FabError, Result};
use fab_provision::{FeatureRequest, Orchestrator};

use super::{load_template, summarize, Outcome, Platform};

pub fn handle_feature_workspaces(
    config_path: &Path,
    skip_login: bool,
    branch: &str,
    workspaces: &str,
    group: Option<&str>,
) -> Result<Outcome> {
    let workspace_types = FeatureRequest::parse_types(workspaces);
    if branch.trim().is_empty() {
        return Err(FabError::Config("feature branch name is empty".to_string()));
    }
    if workspace_types.is_empty() {
        return Err(FabError::Config(
            "no workspace types requested for the feature branch".to_string(),
        ));
    }

    let mut request = FeatureRequest::new(branch.trim(), workspace_types);
    if let Some(group) = group {
        request.group = group.to_string();
    }

    let config = load_template(config_path)?;
    let platform = Platform::connect(skip_login)?;
    let orchestrator = Orchestrator::new(platform.context());
    let report = orchestrator.create_feature_workspaces(&config, &request)?;

    Ok(summarize(&report))
}
