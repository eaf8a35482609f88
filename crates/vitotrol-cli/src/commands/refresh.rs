//! Refresh command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use vitotrol_core::{Device, VitotrolApi, WaitConfig, refresh_data_wait};
use vitotrol_types::AttrId;

use crate::style;
use crate::util::{Connection, connect_with_progress, wait_with_progress};

/// Arguments for the refresh command.
pub struct RefreshArgs {
    pub device: Device,
    pub attrs: Vec<AttrId>,
    pub wait: WaitConfig,
    pub timeout: Duration,
    pub no_wait: bool,
    pub quiet: bool,
}

pub async fn cmd_refresh(connection: &Connection, args: RefreshArgs) -> Result<()> {
    let session = connect_with_progress(connection, !args.quiet).await?;
    run_refresh(session, args).await
}

async fn run_refresh<A>(api: Arc<A>, args: RefreshArgs) -> Result<()>
where
    A: VitotrolApi + ?Sized + 'static,
{
    let RefreshArgs {
        device,
        attrs,
        wait,
        timeout,
        no_wait,
        quiet,
    } = args;

    let signal = refresh_data_wait(api, &device, &attrs, wait)
        .await
        .with_context(|| format!("Failed to refresh {}", device))?;

    if no_wait {
        if !quiet {
            style::print_pending(&format!(
                "Refresh of {} accepted (refresh id {})",
                device,
                signal.refresh_id()
            ));
        }
        return Ok(());
    }

    wait_with_progress(signal, timeout, !quiet).await?;

    if !quiet {
        style::print_success(&format!(
            "Refreshed {} attribute(s) of {}",
            attrs.len(),
            device
        ));
    }
    Ok(())
}
