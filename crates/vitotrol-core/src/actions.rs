//! Write-then-confirm operations on a device.
//!
//! Each operation issues the mutating call and returns as soon as the server
//! accepted it. Confirmation is polled in the background and delivered
//! through the returned [`CompletionSignal`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vitotrol_core::{Device, Session, WaitConfig, write_data_wait};
//! use vitotrol_types::AttrId;
//!
//! # async fn example() -> vitotrol_core::Result<()> {
//! let session = Arc::new(Session::new(vitotrol_core::MAIN_URL)?);
//! session.login("user@example.com", "secret").await?;
//!
//! let device = Device::new(12345u32, 678u32);
//! let signal = write_data_wait(session, &device, AttrId(104), "21", WaitConfig::for_write()).await?;
//! signal.wait_timeout(Duration::from_secs(60)).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

use vitotrol_types::AttrId;

use crate::device::Device;
use crate::error::Result;
use crate::traits::VitotrolApi;
use crate::wait::{ActionTarget, CompletionSignal, WaitConfig, initiate_and_wait};

/// Write `value` to `attr` and wait in the background for the device to apply it.
///
/// A failing `WriteData` call is returned directly. Otherwise the returned
/// signal resolves once `RequestWriteStatus` reports a terminal state.
pub async fn write_data_wait<A>(
    api: Arc<A>,
    device: &Device,
    attr: AttrId,
    value: &str,
    config: WaitConfig,
) -> Result<CompletionSignal>
where
    A: VitotrolApi + ?Sized + 'static,
{
    info!("Writing {} to attribute {} of {}", value, attr, device);

    let target = ActionTarget::Write {
        device: device.device_id,
        location: device.location_id,
        attr,
    };
    let poller = Arc::clone(&api);

    initiate_and_wait(
        target,
        config,
        api.write_data(device, attr, value),
        move |refresh_id| {
            let api = Arc::clone(&poller);
            async move { api.request_write_status(&refresh_id).await }
        },
    )
    .await
}

/// Refresh `attrs` from the device and wait in the background for completion.
///
/// A failing `RefreshData` call is returned directly. Otherwise the returned
/// signal resolves once `RequestRefreshStatus` reports a terminal state.
pub async fn refresh_data_wait<A>(
    api: Arc<A>,
    device: &Device,
    attrs: &[AttrId],
    config: WaitConfig,
) -> Result<CompletionSignal>
where
    A: VitotrolApi + ?Sized + 'static,
{
    info!("Refreshing {} attribute(s) of {}", attrs.len(), device);

    let target = ActionTarget::Refresh {
        device: device.device_id,
        location: device.location_id,
        attrs: attrs.to_vec(),
    };
    let poller = Arc::clone(&api);

    initiate_and_wait(
        target,
        config,
        api.refresh_data(device, attrs),
        move |refresh_id| {
            let api = Arc::clone(&poller);
            async move { api.request_refresh_status(&refresh_id).await }
        },
    )
    .await
}
