use std::path::Path;

use fab_core::error::Result;
use fab_core::{fab_error, fab_section};
use fab_provision::Orchestrator;

use super::{load_template, Outcome, Platform};

pub fn handle_suspend(config_path: &Path, skip_login: bool, only: Option<&str>) -> Result<Outcome> {
    let config = load_template(config_path)?;
    let platform = Platform::connect(skip_login)?;
    let orchestrator = Orchestrator::new(platform.context());

    fab_section!("Suspending Capacities");
    let results = orchestrator.suspend_capacities(&config, only);

    let mut failed = false;
    for (name, suspended) in &results {
        if !suspended {
            fab_error!("Could not suspend {}", name);
            failed = true;
        }
    }
    Ok(Outcome::from_failures(failed))
}
