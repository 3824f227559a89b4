//! Transport to the remote analytics platform.
//!
//! The provisioning core never builds network requests itself. It describes a
//! request (endpoint, verb, optional JSON body, token audience and query
//! parameters) and hands it to a [`Transport`], or asks the transport to run a
//! platform CLI command. Transport-level failures (process launch errors,
//! non-JSON output) are not errors here; they surface as responses with no
//! status code and an empty body, which callers handle explicitly.

pub mod fab_cli;
pub mod request;
pub mod response;

#[cfg(feature = "test-helpers")]
pub mod mock;

pub use fab_cli::FabCliTransport;
pub use fab_core::command::CommandOutput;
pub use request::{ApiRequest, Audience, HttpMethod};
pub use response::ApiResponse;

#[cfg(feature = "test-helpers")]
pub use mock::MockTransport;

/// The contract between the provisioning core and the platform.
pub trait Transport {
    /// Execute a REST call against the platform.
    fn invoke(&self, request: &ApiRequest) -> ApiResponse;

    /// Run a platform CLI command (arguments exclude the executable itself).
    fn run(&self, args: &[String]) -> CommandOutput;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn invoke(&self, request: &ApiRequest) -> ApiResponse {
        (**self).invoke(request)
    }

    fn run(&self, args: &[String]) -> CommandOutput {
        (**self).run(args)
    }
}
