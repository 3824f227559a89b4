use std::path::Path;

use fab_core::error::Result;
use fab_core::fab_info;
use fab_provision::{DeployOptions, Orchestrator};

use super::{load_template, summarize, Outcome, Platform};

pub fn handle_deploy(config_path: &Path, skip_login: bool, sync: bool) -> Result<Outcome> {
    let config = load_template(config_path)?;
    fab_info!(
        "Deploying solution {} from {}",
        config.solution_version(),
        config_path.display()
    );

    let platform = Platform::connect(skip_login)?;
    let orchestrator = Orchestrator::new(platform.context());
    let report = orchestrator.deploy(&config, &DeployOptions { sync_from_git: sync })?;

    Ok(summarize(&report))
}
