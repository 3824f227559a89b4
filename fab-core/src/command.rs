// Standard library
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

// External crates
use crate::error::{FabError, Result};
use duct::cmd;
use tracing::debug;
use which::which;

/// Captured result of running an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process could not be launched or was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr, for scanning diagnostics out of either stream.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Run a command to completion with stdout and stderr captured.
///
/// A non-zero exit is not an error here; launch failures are folded into the
/// output (no exit code, error text in stderr) so callers have a single shape
/// to inspect.
pub fn run_captured<P, A>(program: P, args: &[A]) -> CommandOutput
where
    P: AsRef<Path>,
    A: AsRef<OsStr>,
{
    let program = program.as_ref();
    // Arguments may carry credentials; only the program and arity are logged.
    debug!(program = %program.display(), args = args.len(), "running command");

    match cmd(program, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
    {
        Ok(output) => CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => CommandOutput {
            exit_code: None,
            stdout: String::new(),
            stderr: format!("Failed to start command '{}': {}", program.display(), e),
        },
    }
}

/// Locate the Fabric CLI executable.
///
/// Resolution order: `FAB_CLI_PATH`, the active virtualenv's `bin/fab`, then `PATH`.
pub fn find_fab_executable() -> Result<PathBuf> {
    if let Ok(path) = env::var("FAB_CLI_PATH") {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Ok(path);
        }
        return Err(FabError::Dependency(format!(
            "FAB_CLI_PATH points at {}, which does not exist",
            path.display()
        )));
    }

    if let Ok(venv) = env::var("VIRTUAL_ENV") {
        let candidate = Path::new(&venv).join("bin").join("fab");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    which("fab").map_err(|_| FabError::Dependency("fab (Microsoft Fabric CLI)".to_string()))
}
