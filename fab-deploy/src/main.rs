use clap::Parser;
use tracing::debug;

use fab_core::fab_error;
use fab_logging::LogSettings;

mod cli;
mod commands;

use cli::Args;
use commands::{execute_command, Outcome};

fn main() {
    // Before parsing, so `.env` values can feed clap's env fallbacks.
    let env_file = fab_config::load_local_env_file();

    let args = Args::parse();

    // Tests expect clean output, so logging stays off in test mode.
    let _log_guard = if std::env::var_os("FAB_TEST_MODE").is_none() {
        fab_logging::init_with(&LogSettings::from_env().with_debug(args.debug))
    } else {
        None
    };

    if let Some(path) = env_file {
        debug!("loaded environment from {}", path.display());
    }
    debug!(command = ?args.command, config = %args.config.display(), "starting fab-deploy");

    match execute_command(&args) {
        Ok(Outcome::Clean) => {}
        Ok(Outcome::Failures) => std::process::exit(2),
        Err(e) => {
            fab_error!("{}", e);
            std::process::exit(1);
        }
    }
}
