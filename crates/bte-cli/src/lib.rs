//! BTE command line
//!
//! Library side of the `bte` binary, kept separate so commands can be driven
//! from tests with an in-memory output buffer.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::build_cli;
pub use commands::{load_settings, run, EXIT_FAILED, EXIT_OK};
pub use logging::init_logging;
