use std::path::{Path, PathBuf};

use fab_core::command::{find_fab_executable, run_captured, CommandOutput};
use fab_core::error::Result;
use tracing::debug;

use crate::{ApiRequest, ApiResponse, Transport};

/// Transport backed by the Microsoft Fabric CLI (`fab`).
///
/// REST calls go through `fab api`, which handles token acquisition for both
/// the Fabric and Azure Resource Manager audiences and prints a JSON envelope
/// of the form `{"status_code": ..., "text": ...}`.
#[derive(Debug, Clone)]
pub struct FabCliTransport {
    executable: PathBuf,
}

impl FabCliTransport {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Locate `fab` (see [`find_fab_executable`]).
    pub fn discover() -> Result<Self> {
        Ok(Self::new(find_fab_executable()?))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments for a `fab api` invocation.
    pub fn api_args(request: &ApiRequest) -> Vec<String> {
        let mut args = vec![
            "api".to_string(),
            request.path_and_query(),
            "-X".to_string(),
            request.method.as_str().to_string(),
        ];
        if let Some(audience) = request.audience {
            args.push("-A".to_string());
            args.push(audience.as_str().to_string());
        }
        if let Some(body) = &request.body {
            args.push("-i".to_string());
            args.push(body.to_string());
        }
        args
    }
}

impl Transport for FabCliTransport {
    fn invoke(&self, request: &ApiRequest) -> ApiResponse {
        // Bodies can carry credentials, so only the route is logged.
        debug!(method = %request.method, endpoint = %request.endpoint, "invoking platform API");
        let response = ApiResponse::from_output(run_captured(
            &self.executable,
            &Self::api_args(request),
        ));
        debug!(
            status = %response.status_label(),
            exit_code = ?response.exit_code,
            "platform API responded"
        );
        response
    }

    fn run(&self, args: &[String]) -> CommandOutput {
        run_captured(&self.executable, args)
    }
}
