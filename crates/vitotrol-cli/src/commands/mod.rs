//! Command implementations for the CLI.

mod config;
mod refresh;
mod write;

pub use config::cmd_config;
pub use refresh::{RefreshArgs, cmd_refresh};
pub use write::{WriteArgs, cmd_write};
