//! Write command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use vitotrol_core::{Device, VitotrolApi, WaitConfig, write_data_wait};
use vitotrol_types::AttrId;

use crate::style;
use crate::util::{Connection, connect_with_progress, wait_with_progress};

/// Arguments for the write command.
pub struct WriteArgs {
    pub device: Device,
    pub attr: AttrId,
    pub value: String,
    pub wait: WaitConfig,
    pub timeout: Duration,
    pub no_wait: bool,
    pub quiet: bool,
}

pub async fn cmd_write(connection: &Connection, args: WriteArgs) -> Result<()> {
    let session = connect_with_progress(connection, !args.quiet).await?;
    run_write(session, args).await
}

async fn run_write<A>(api: Arc<A>, args: WriteArgs) -> Result<()>
where
    A: VitotrolApi + ?Sized + 'static,
{
    let WriteArgs {
        device,
        attr,
        value,
        wait,
        timeout,
        no_wait,
        quiet,
    } = args;

    let signal = write_data_wait(api, &device, attr, &value, wait)
        .await
        .with_context(|| format!("Failed to write attribute {} of {}", attr, device))?;

    if no_wait {
        if !quiet {
            style::print_pending(&format!(
                "Write of attribute {} accepted (refresh id {})",
                attr,
                signal.refresh_id()
            ));
        }
        return Ok(());
    }

    wait_with_progress(signal, timeout, !quiet).await?;

    if !quiet {
        style::print_success(&format!("Attribute {} of {} set to {}", attr, device, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitotrol_core::{ActionStatus, MockApiBuilder, MockCall};

    fn args(no_wait: bool) -> WriteArgs {
        WriteArgs {
            device: Device::new(1u32, 2u32),
            attr: AttrId(104),
            value: "21".to_string(),
            wait: WaitConfig::immediate(),
            timeout: Duration::from_secs(5),
            no_wait,
            quiet: true,
        }
    }

    #[tokio::test]
    async fn test_run_write_waits_for_confirmation() {
        let api = Arc::new(
            MockApiBuilder::new()
                .write_statuses([ActionStatus::Pending, ActionStatus::Succeeded])
                .build(),
        );

        run_write(Arc::clone(&api), args(false)).await.unwrap();
        assert_eq!(api.poll_count(), 2);
    }

    #[tokio::test]
    async fn test_run_write_reports_remote_failure() {
        let api = Arc::new(
            MockApiBuilder::new()
                .write_statuses([ActionStatus::Failed { code: 5 }])
                .build(),
        );

        let err = run_write(api, args(false)).await.unwrap_err();
        assert!(err.to_string().contains("could not apply"));
    }

    #[tokio::test]
    async fn test_run_write_rejected() {
        let api = Arc::new(MockApiBuilder::new().fail_initiate("bad XML").build());

        let err = run_write(api, args(false)).await.unwrap_err();
        assert!(err.to_string().contains("Failed to write attribute 104"));
    }

    #[tokio::test]
    async fn test_run_write_no_wait() {
        let api = Arc::new(MockApiBuilder::new().build());

        run_write(Arc::clone(&api), args(true)).await.unwrap();
        let calls = api.calls().await;
        assert!(matches!(calls.first(), Some(MockCall::WriteData { .. })));
    }
}
