use std::path::PathBuf;
use tracing::{debug, warn};

/// Load a local `.env` file into the process environment.
///
/// Skipped on GitHub Actions, where secrets arrive as real environment
/// variables. A missing file is not an error. Returns the loaded path.
pub fn load_local_env_file() -> Option<PathBuf> {
    if std::env::var_os("GITHUB_ACTIONS").is_some() {
        debug!("running under GitHub Actions, not loading .env");
        return None;
    }

    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("failed to load .env file: {}", e);
            None
        }
    }
}
