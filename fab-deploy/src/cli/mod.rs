// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_TEMPLATE: &str = "config/templates/v01/v01_template.yaml";

#[derive(Debug, Clone, Parser)]
#[command(name = "fab-deploy")]
#[command(about = "Provision Fabric capacities, workspaces and Git bindings from a template")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the deployment template
    #[arg(short, long, global = true, default_value = DEFAULT_TEMPLATE)]
    pub config: PathBuf,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Reuse the current CLI session instead of logging in as the service principal
    #[arg(long, global = true)]
    pub skip_login: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create every capacity and workspace in the template and bind them to Git
    Deploy {
        /// Pull repository content into each workspace after binding it
        #[arg(long)]
        sync: bool,
    },

    /// Create per-branch workspaces for feature development
    FeatureWorkspaces {
        /// Feature branch the workspaces are bound to
        #[arg(long, env = "FEATURE_BRANCH_NAME")]
        branch: String,

        /// Workspace types to create (comma-separated)
        #[arg(long, env = "WORKSPACES_TO_CREATE", default_value = "processing,datastores")]
        workspaces: String,

        /// Security group granted Admin on each workspace
        #[arg(long)]
        group: Option<String>,
    },

    /// Suspend template capacities to stop billing
    Suspend {
        /// Suspend only this capacity
        #[arg(long)]
        capacity: Option<String>,
    },

    /// Log the platform CLI in as the service principal
    Login,

    /// Load the template and summarise it without contacting the platform
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["fab-deploy", "deploy"]).unwrap();
        assert_eq!(args.config, PathBuf::from(DEFAULT_TEMPLATE));
        assert!(!args.skip_login);
        assert!(matches!(args.command, Command::Deploy { sync: false }));
    }

    #[test]
    fn test_feature_workspaces_flags() {
        let args = Args::try_parse_from([
            "fab-deploy",
            "feature-workspaces",
            "--branch",
            "feat-1",
            "--workspaces",
            "consumption",
            "--skip-login",
        ])
        .unwrap();
        match args.command {
            Command::FeatureWorkspaces {
                branch,
                workspaces,
                group,
            } => {
                assert_eq!(branch, "feat-1");
                assert_eq!(workspaces, "consumption");
                assert_eq!(group, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(args.skip_login);
    }
}
