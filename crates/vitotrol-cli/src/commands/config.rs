//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, path: &Path, quiet: bool) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = Config::load_from(path);
            let content = toml::to_string_pretty(&config.redacted())
                .context("Failed to serialize config")?;
            print!("{}", content);
        }
        ConfigAction::Init => {
            if path.exists() {
                if !quiet {
                    eprintln!("Config already exists at {}", path.display());
                }
                return Ok(());
            }
            Config::default().save_to(path)?;
            if !quiet {
                println!("Created config at {}", path.display());
            }
        }
    }
    Ok(())
}
