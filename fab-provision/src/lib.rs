//! Idempotent provisioning orchestrator.
//!
//! Each managed resource has a lifecycle component that decides whether the
//! resource already exists, which state transition to request and how long to
//! wait for the platform to settle:
//!
//! - [`CapacityLifecycle`]: compute capacities through Azure Resource Manager.
//! - [`WorkspaceLifecycle`]: workspaces and their role assignments.
//! - [`GitBinding`]: GitHub connections, workspace binding and pulls.
//!
//! The [`Orchestrator`] sequences them per template entry. Everything is
//! synchronous and blocking; waits go through the injected
//! [`fab_core::Sleeper`].
//!
//! Lookup-before-create is not atomic. Two concurrent runs against the same
//! template can both observe a resource as missing and both request its
//! creation.

pub mod auth;
pub mod capacity;
pub mod context;
pub mod git;
pub mod orchestrator;
pub mod report;
pub mod workspace;

pub use auth::login;
pub use capacity::{CapacityLifecycle, CapacityOutcome, CapacityStatus};
pub use context::ProvisionContext;
pub use git::GitBinding;
pub use orchestrator::{DeployOptions, FeatureRequest, Orchestrator};
pub use report::{CapacityReport, DeployReport, GitState, WorkspaceReport};
pub use workspace::{PermissionFailure, PermissionReport, WorkspaceLifecycle};
