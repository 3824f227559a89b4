// Command handlers for deployment operations

use std::path::Path;

use fab_config::{DeployConfig, PlatformSettings, TemplateLoader};
use fab_core::error::Result;
use fab_core::{fab_error_with_details, fab_section, fab_success, ThreadSleeper};
use fab_provision::{CapacityOutcome, DeployReport, GitState, ProvisionContext};
use fab_transport::FabCliTransport;
use tracing::debug;

use crate::cli::{Args, Command};

pub mod deploy;
pub mod feature;
pub mod login;
pub mod suspend;
pub mod validate;

/// How a command finished when it did not error outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// The run completed but some resources were left in a failed state.
    Failures,
}

impl Outcome {
    pub fn from_failures(has_failures: bool) -> Self {
        if has_failures {
            Outcome::Failures
        } else {
            Outcome::Clean
        }
    }
}

/// Main command dispatcher
pub fn execute_command(args: &Args) -> Result<Outcome> {
    match &args.command {
        Command::Validate => {
            debug!("Handling validate command");
            validate::handle_validate(&args.config)
        }
        Command::Login => {
            debug!("Handling login command");
            login::handle_login()
        }
        Command::Deploy { sync } => {
            debug!("Handling deploy command with sync={}", sync);
            deploy::handle_deploy(&args.config, args.skip_login, *sync)
        }
        Command::FeatureWorkspaces {
            branch,
            workspaces,
            group,
        } => {
            debug!("Handling feature-workspaces command for branch {}", branch);
            feature::handle_feature_workspaces(
                &args.config,
                args.skip_login,
                branch,
                workspaces,
                group.as_deref(),
            )
        }
        Command::Suspend { capacity } => {
            debug!("Handling suspend command");
            suspend::handle_suspend(&args.config, args.skip_login, capacity.as_deref())
        }
    }
}

pub fn load_template(path: &Path) -> Result<DeployConfig> {
    TemplateLoader::from_env().load(path)
}

/// Live collaborators for a provisioning run.
pub struct Platform {
    transport: FabCliTransport,
    sleeper: ThreadSleeper,
    settings: PlatformSettings,
}

impl Platform {
    /// Discover the CLI, read settings and, unless skipped, log in.
    pub fn connect(skip_login: bool) -> Result<Self> {
        let transport = FabCliTransport::discover()?;
        let settings = PlatformSettings::from_env()?;
        debug!(executable = %transport.executable().display(), "using platform CLI");

        if skip_login {
            debug!("skipping service principal login");
        } else {
            fab_provision::login(&transport, &settings)?;
        }

        Ok(Self {
            transport,
            sleeper: ThreadSleeper,
            settings,
        })
    }

    pub fn context(&self) -> ProvisionContext<'_> {
        ProvisionContext::new(&self.transport, &self.sleeper, &self.settings)
    }
}

/// Print the run summary and map it to an outcome.
pub fn summarize(report: &DeployReport) -> Outcome {
    fab_section!("Summary");
    for capacity in &report.capacities {
        let state = match capacity.outcome {
            CapacityOutcome::AlreadyExists => "already existed",
            CapacityOutcome::Created { ready: true } => "created",
            CapacityOutcome::Created { ready: false } => "created, not ready",
        };
        fab_success!("Capacity {}: {}", capacity.name, state);
    }
    for workspace in &report.workspaces {
        if workspace.has_failures() {
            continue;
        }
        let git = match workspace.git {
            GitState::Synced => ", synced from Git",
            GitState::Connected => ", connected to Git",
            _ => "",
        };
        fab_success!("Workspace {}{}", workspace.name, git);
    }

    let failures = report.failure_lines();
    if !failures.is_empty() {
        fab_error_with_details!("Deployment finished with failures", &failures);
    }
    Outcome::from_failures(report.has_failures())
}
