//! Deployment template handling.
//!
//! The template is a YAML document describing capacities, workspaces, their
//! permissions and the GitHub repository workspaces are bound to. This crate
//! owns its data model, the loader that performs version and environment
//! substitution, and the explicit platform settings object derived from the
//! process environment.

pub mod config;
pub mod env;
pub mod loader;
pub mod settings;

pub use config::{
    AdminMembers, AzureConfig, CapacityConfig, CapacityDefaults, DeployConfig, GitHubConfig,
    Permission, WorkspaceConfig,
};
pub use env::load_local_env_file;
pub use loader::TemplateLoader;
pub use settings::PlatformSettings;
