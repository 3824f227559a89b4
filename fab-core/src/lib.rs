pub mod command;
pub mod error;
pub mod output_macros;
pub mod wait;

pub use command::{find_fab_executable, run_captured, CommandOutput};
pub use error::{FabError, Result};
pub use wait::{Sleeper, ThreadSleeper};

#[cfg(any(test, feature = "test-helpers"))]
pub use wait::RecordingSleeper;
