use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::{ApiRequest, ApiResponse, CommandOutput, HttpMethod, Transport};

struct ApiRoute {
    method: HttpMethod,
    suffix: String,
    responses: VecDeque<ApiResponse>,
}

struct CommandRoute {
    prefix: Vec<String>,
    outputs: VecDeque<CommandOutput>,
}

/// Scripted transport for tests.
///
/// API routes match on method and endpoint suffix; command routes match on an
/// argument prefix. Each route replays its responses in order and keeps
/// repeating the last one. Unscripted calls get a 404 / exit code 1. Every
/// call is recorded.
#[derive(Default)]
pub struct MockTransport {
    api_routes: Mutex<Vec<ApiRoute>>,
    command_routes: Mutex<Vec<CommandRoute>>,
    requests: Mutex<Vec<ApiRequest>>,
    commands: Mutex<Vec<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn next_or_last<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_api<I>(self, method: HttpMethod, endpoint_suffix: &str, responses: I) -> Self
    where
        I: IntoIterator<Item = ApiResponse>,
    {
        lock(&self.api_routes).push(ApiRoute {
            method,
            suffix: endpoint_suffix.to_string(),
            responses: responses.into_iter().collect(),
        });
        self
    }

    pub fn on_command<I>(self, prefix: &[&str], outputs: I) -> Self
    where
        I: IntoIterator<Item = CommandOutput>,
    {
        lock(&self.command_routes).push(CommandRoute {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.into_iter().collect(),
        });
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn requests_to(&self, method: HttpMethod, endpoint_suffix: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.endpoint.ends_with(endpoint_suffix))
            .collect()
    }

    pub fn count(&self, method: HttpMethod, endpoint_suffix: &str) -> usize {
        self.requests_to(method, endpoint_suffix).len()
    }

    pub fn count_method(&self, method: HttpMethod) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        lock(&self.commands).clone()
    }

    pub fn command_count(&self, prefix: &[&str]) -> usize {
        self.commands()
            .iter()
            .filter(|args| starts_with(args, prefix))
            .count()
    }

    /// Convenience output for a successful command.
    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Convenience output for a failed command.
    pub fn failed(exit_code: i32, stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(exit_code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

fn starts_with<S: AsRef<str>>(args: &[String], prefix: &[S]) -> bool {
    args.len() >= prefix.len()
        && args
            .iter()
            .zip(prefix.iter())
            .all(|(a, p)| a == p.as_ref())
}

impl Transport for MockTransport {
    fn invoke(&self, request: &ApiRequest) -> ApiResponse {
        lock(&self.requests).push(request.clone());

        let mut routes = lock(&self.api_routes);
        routes
            .iter_mut()
            .find(|route| route.method == request.method && request.endpoint.ends_with(&route.suffix))
            .and_then(|route| next_or_last(&mut route.responses))
            .unwrap_or_else(|| ApiResponse::status(404))
    }

    fn run(&self, args: &[String]) -> CommandOutput {
        lock(&self.commands).push(args.to_vec());

        let mut routes = lock(&self.command_routes);
        routes
            .iter_mut()
            .find(|route| starts_with(args, &route.prefix))
            .and_then(|route| next_or_last(&mut route.outputs))
            .unwrap_or_else(|| Self::failed(1, ""))
    }
}
