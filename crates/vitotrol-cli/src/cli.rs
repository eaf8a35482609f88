//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use vitotrol_types::{AttrId, DeviceId, LocationId};

/// Reusable device addressing arguments
#[derive(Debug, Clone, Args)]
pub struct DeviceArgs {
    /// Device id (GeraetId), or use VITOTROL_DEVICE env var
    #[arg(short, long, env = "VITOTROL_DEVICE")]
    pub device: Option<DeviceId>,

    /// Installation id (AnlageId), or use VITOTROL_LOCATION env var
    #[arg(short, long, env = "VITOTROL_LOCATION")]
    pub location: Option<LocationId>,
}

#[derive(Parser)]
#[command(name = "vitotrol")]
#[command(author, version, about = "CLI for the Viessmann Vitotrol heating service", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Give up waiting for confirmation after this many seconds
    #[arg(short = 'T', long, global = true)]
    pub timeout: Option<u64>,

    /// Service URL (defaults to the production endpoint)
    #[arg(long, global = true, env = "VITOTROL_URL")]
    pub url: Option<String>,

    /// Account login
    #[arg(long, global = true, env = "VITOTROL_LOGIN")]
    pub login: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "VITOTROL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Use this configuration file instead of the default one
    #[arg(long, global = true, env = "VITOTROL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a value to a data point and wait until the device applied it
    Write {
        #[command(flatten)]
        device: DeviceArgs,

        /// Data point id (DatapunktId)
        #[arg(short, long)]
        attr: AttrId,

        /// Value to write, as expected by the data point
        #[arg(long, allow_hyphen_values = true)]
        value: String,

        /// Return once the server accepted the write, without waiting
        #[arg(long)]
        no_wait: bool,
    },

    /// Refresh data points from the device and wait for completion
    Refresh {
        #[command(flatten)]
        device: DeviceArgs,

        /// Data point ids, comma-separated or repeated
        #[arg(short, long = "attr", value_delimiter = ',', required = true)]
        attrs: Vec<AttrId>,

        /// Return once the server accepted the refresh, without waiting
        #[arg(long)]
        no_wait: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
