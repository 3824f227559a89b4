//! Offline template check.

use std::path::Path;

use fab_config::DeployConfig;
use fab_core::error::Result;
use fab_core::{fab_println, fab_success, fab_warning};

use super::{load_template, Outcome};

pub fn handle_validate(config_path: &Path) -> Result<Outcome> {
    let config = load_template(config_path)?;
    fab_success!("Template {} is valid", config_path.display());

    print_summary(&config);

    let problems = problems(&config);
    for problem in &problems {
        fab_warning!("{}", problem);
    }
    Ok(Outcome::from_failures(!problems.is_empty()))
}

fn print_summary(config: &DeployConfig) {
    let defaults = &config.azure.capacity_defaults;

    fab_println!("Solution version: {}", config.solution_version());
    fab_println!("Resource group:   {}", config.resource_group());
    fab_println!("Capacities ({}):", config.capacities.len());
    for capacity in &config.capacities {
        fab_println!(
            "  {} [{} / {}]",
            capacity.name,
            capacity.region_or(defaults).unwrap_or("?"),
            capacity.sku_or(defaults).unwrap_or("?")
        );
    }
    fab_println!("Workspaces ({}):", config.workspaces.len());
    for workspace in &config.workspaces {
        match &workspace.connect_to_git_folder {
            Some(folder) => {
                fab_println!("  {} on {} -> {}", workspace.name, workspace.capacity, folder);
            }
            None => {
                fab_println!("  {} on {}", workspace.name, workspace.capacity);
            }
        }
    }
    if config.github.is_configured() {
        fab_println!(
            "Git: {} ({})",
            config.github.repository_url(),
            config.github.branch
        );
    }
}

/// Things a deploy would trip over.
fn problems(config: &DeployConfig) -> Vec<String> {
    let defaults = &config.azure.capacity_defaults;
    let mut problems = Vec::new();

    if !config.capacities.is_empty() && config.resource_group().is_empty() {
        problems.push("azure.capacity_defaults.resource_group is not set".to_string());
    }
    for capacity in &config.capacities {
        if capacity.region_or(defaults).is_none() || capacity.sku_or(defaults).is_none() {
            problems.push(format!("capacity {} has no region or sku", capacity.name));
        }
    }
    for workspace in &config.workspaces {
        for permission in &workspace.permissions {
            if !config.azure.security_groups.contains_key(&permission.group) {
                problems.push(format!(
                    "workspace {} grants {} to unknown group {}",
                    workspace.name, permission.role, permission.group
                ));
            }
        }
        if workspace.connect_to_git_folder.is_some() && !config.github.is_configured() {
            problems.push(format!(
                "workspace {} binds to Git but no repository is configured",
                workspace.name
            ));
        }
    }
    problems
}
