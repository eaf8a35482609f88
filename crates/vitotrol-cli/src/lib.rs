//! Command-line interface for the Viessmann Vitotrol heating service.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `write` | Write a data point and wait until the device applied it |
//! | `refresh` | Refresh data points and wait for completion |
//! | `config` | Show, locate or initialize the configuration file |
//! | `completions` | Generate shell completions |
//!
//! Both `write` and `refresh` return as soon as the server confirms, fails
//! the action, or the `--timeout` expires. `--no-wait` skips the
//! confirmation entirely.
//!
//! # Configuration
//!
//! The CLI reads `~/.config/vitotrol/config.toml` (or platform equivalent,
//! or the file given by `--config`). Command-line flags override it.
//!
//! ```toml
//! login = "user@example.com"
//! password = "secret"
//! device = 12345
//! location = 678
//! timeout = 60
//!
//! [wait]
//! write_min_wait_ms = 2000
//! write_poll_interval_ms = 1000
//! refresh_min_wait_ms = 5000
//! refresh_poll_interval_ms = 1000
//! ```
//!
//! # Environment Variables
//!
//! - `VITOTROL_LOGIN`, `VITOTROL_PASSWORD`: Credentials
//! - `VITOTROL_DEVICE`, `VITOTROL_LOCATION`: Default device
//! - `VITOTROL_URL`: Service URL
//! - `VITOTROL_CONFIG`: Configuration file
//! - `NO_COLOR`: Disable colored output when set
//!
//! # Examples
//!
//! Set data point 104 to 21:
//! ```bash
//! vitotrol write --device 12345 --location 678 --attr 104 --value 21
//! ```
//!
//! Refresh three data points, waiting at most 30 seconds:
//! ```bash
//! vitotrol refresh --attr 5,6,7 --timeout 30
//! ```

// Re-export core dependencies for convenience
pub use vitotrol_core;
pub use vitotrol_types;
