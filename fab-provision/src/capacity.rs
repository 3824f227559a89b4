//! Compute capacity lifecycle.
//!
//! Capacities are Azure resources managed through Resource Manager. They are
//! created declaratively, polled until ready, and can be suspended to stop
//! billing. Suspension never deletes a capacity.

use std::time::Duration;

use fab_config::{CapacityConfig, CapacityDefaults};
use fab_core::error::{FabError, Result};
use fab_core::{fab_error, fab_progress, fab_success, fab_warning};
use fab_transport::{ApiRequest, ApiResponse, Audience};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::context::ProvisionContext;

pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
pub const SUSPEND_MAX_ATTEMPTS: u32 = 5;
pub const SUSPEND_BACKOFF: Duration = Duration::from_secs(60);

const PROVISIONING_SUCCEEDED: &str = "Succeeded";
const USABLE_STATES: [&str; 2] = ["Active", "Paused"];

/// Remote-observed state of a capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityStatus {
    pub provisioning_state: Option<String>,
    pub state: Option<String>,
}

impl CapacityStatus {
    /// Provisioning has succeeded and the reported state, if any, is usable.
    pub fn is_ready(&self) -> bool {
        self.provisioning_state.as_deref() == Some(PROVISIONING_SUCCEEDED)
            && self
                .state
                .as_deref()
                .map_or(true, |state| USABLE_STATES.contains(&state))
    }

    fn from_body(body: &Value) -> Self {
        let props = body.get("properties");
        let field = |key: &str| {
            props
                .and_then(|p| p.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };
        Self {
            provisioning_state: field("provisioningState"),
            state: field("state"),
        }
    }
}

impl std::fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "provisioningState={}, state={}",
            self.provisioning_state.as_deref().unwrap_or("<absent>"),
            self.state.as_deref().unwrap_or("<absent>")
        )
    }
}

/// What `create` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityOutcome {
    AlreadyExists,
    Created { ready: bool },
}

pub struct CapacityLifecycle<'a> {
    ctx: ProvisionContext<'a>,
}

impl<'a> CapacityLifecycle<'a> {
    pub fn new(ctx: ProvisionContext<'a>) -> Self {
        Self { ctx }
    }

    fn capacity_path(&self, name: &str, resource_group: &str) -> String {
        format!(
            "{}/providers/Microsoft.Fabric/capacities/{}",
            self.ctx.settings.resource_group_path(resource_group),
            name
        )
    }

    fn arm_request(&self, request: ApiRequest) -> ApiRequest {
        request
            .with_audience(Audience::Azure)
            .with_query("api-version", &self.ctx.settings.arm_api_version)
    }

    fn describe(&self, name: &str, resource_group: &str) -> ApiResponse {
        let request = self.arm_request(ApiRequest::get(self.capacity_path(name, resource_group)));
        self.ctx.transport.invoke(&request)
    }

    /// True iff the describe call returns 200. Any other outcome, including
    /// transient failures, reads as "does not exist".
    pub fn exists(&self, name: &str, resource_group: &str) -> bool {
        let response = self.describe(name, resource_group);
        debug!(capacity = name, status = %response.status_label(), "capacity lookup");
        response.status_in(&[200])
    }

    /// Current `(provisioningState, state)`. Unlike [`exists`](Self::exists),
    /// a non-200 response is an error: this is only asked of capacities
    /// believed to exist.
    pub fn status(&self, name: &str, resource_group: &str) -> Result<CapacityStatus> {
        let response = self.describe(name, resource_group);
        if !response.status_in(&[200]) {
            return Err(FabError::remote(
                format!("fetch status of capacity '{}'", name),
                format!("status {}: {}", response.status_label(), response.body),
            ));
        }
        Ok(CapacityStatus::from_body(&response.body))
    }

    /// Poll at a fixed interval until the capacity is ready or `max_wait` is
    /// used up. Running out of time returns `Ok(false)`.
    pub fn wait_until_ready(
        &self,
        name: &str,
        resource_group: &str,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> Result<bool> {
        let poll_interval = if poll_interval.is_zero() {
            Duration::from_secs(1)
        } else {
            poll_interval
        };

        let mut waited = Duration::ZERO;
        while waited < max_wait {
            let status = self.status(name, resource_group)?;
            if status.is_ready() {
                fab_success!("{} is ready ({})", name, status);
                return Ok(true);
            }

            fab_progress!("waiting for {} ({})", name, status);
            self.ctx.sleeper.sleep(poll_interval);
            waited += poll_interval;
        }

        fab_error!("{} not ready after {} seconds", name, max_wait.as_secs());
        Ok(false)
    }

    /// Request body for a capacity, merging per-capacity values over defaults.
    pub fn create_body(config: &CapacityConfig, defaults: &CapacityDefaults) -> Result<Value> {
        let region = config.region_or(defaults).ok_or_else(|| {
            FabError::Config(format!("capacity '{}' has no region", config.name))
        })?;
        let sku = config.sku_or(defaults).ok_or_else(|| {
            FabError::Config(format!("capacity '{}' has no sku", config.name))
        })?;

        Ok(json!({
            "location": region,
            "sku": { "name": sku, "tier": "Fabric" },
            "properties": {
                "administration": { "members": config.admins_or(defaults) }
            }
        }))
    }

    /// Create the capacity unless it already exists, then wait for it to be
    /// ready. A rejected create request is an error and is not retried.
    pub fn create(
        &self,
        config: &CapacityConfig,
        resource_group: &str,
        defaults: &CapacityDefaults,
    ) -> Result<CapacityOutcome> {
        let name = config.name.as_str();

        if self.exists(name, resource_group) {
            fab_success!("{} exists", name);
            return Ok(CapacityOutcome::AlreadyExists);
        }

        let body = Self::create_body(config, defaults)?;
        let request = self
            .arm_request(ApiRequest::put(self.capacity_path(name, resource_group)))
            .with_body(body);
        let response = self.ctx.transport.invoke(&request);

        if !response.status_in(&[200, 201]) {
            return Err(FabError::remote(
                format!("create capacity '{}'", name),
                format!("status {}: {}", response.status_label(), response.body),
            ));
        }

        fab_success!("Created {}", name);
        info!(capacity = name, resource_group, "capacity created");

        let ready =
            self.wait_until_ready(name, resource_group, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL)?;
        if !ready {
            warn!(capacity = name, "capacity created but not ready within the wait budget");
        }
        Ok(CapacityOutcome::Created { ready })
    }

    /// Suspend the capacity to stop billing.
    ///
    /// Retries up to [`SUSPEND_MAX_ATTEMPTS`] times with a fixed
    /// [`SUSPEND_BACKOFF`] between attempts. Returns false once attempts run out.
    pub fn suspend(&self, name: &str, resource_group: &str) -> bool {
        let request = self.arm_request(ApiRequest::post(format!(
            "{}/suspend",
            self.capacity_path(name, resource_group)
        )));

        for attempt in 1..=SUSPEND_MAX_ATTEMPTS {
            let response = self.ctx.transport.invoke(&request);
            if response.status_in(&[200, 202]) {
                fab_success!("Suspended {}", name);
                return true;
            }

            warn!(
                capacity = name,
                attempt,
                status = %response.status_label(),
                "suspend request not accepted"
            );
            if attempt < SUSPEND_MAX_ATTEMPTS {
                self.ctx.sleeper.sleep(SUSPEND_BACKOFF);
            }
        }

        fab_warning!("Failed to suspend {} after {} attempts", name, SUSPEND_MAX_ATTEMPTS);
        false
    }
}
