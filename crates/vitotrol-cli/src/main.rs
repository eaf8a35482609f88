use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod style;
mod util;

use cli::{Cli, Commands};
use commands::{RefreshArgs, WriteArgs, cmd_config, cmd_refresh, cmd_write};
use config::{Config, resolve_timeout};
use util::{Connection, require_device};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "vitotrol", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::path);
    let config = Config::load_from(&config_path);
    tracing::debug!("Using config file {}", config_path.display());

    let timeout = resolve_timeout(cli.timeout, &config);

    match cli.command {
        Commands::Write {
            device,
            attr,
            value,
            no_wait,
        } => {
            let device = require_device(&device, &config)?;
            let connection = Connection::resolve(cli.url, cli.login, cli.password, &config)?;
            cmd_write(
                &connection,
                WriteArgs {
                    device,
                    attr,
                    value,
                    wait: config.wait.write(),
                    timeout,
                    no_wait,
                    quiet: cli.quiet,
                },
            )
            .await?;
        }
        Commands::Refresh {
            device,
            attrs,
            no_wait,
        } => {
            let device = require_device(&device, &config)?;
            let connection = Connection::resolve(cli.url, cli.login, cli.password, &config)?;
            cmd_refresh(
                &connection,
                RefreshArgs {
                    device,
                    attrs,
                    wait: config.wait.refresh(),
                    timeout,
                    no_wait,
                    quiet: cli.quiet,
                },
            )
            .await?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config_path, cli.quiet)?;
        }
        Commands::Completions { .. } => {
            // Already handled above
        }
    }

    Ok(())
}
