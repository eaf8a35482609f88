//! Trait abstractions for Vitotrol remote calls.
//!
//! This module provides the [`VitotrolApi`] trait that abstracts over the
//! real SOAP session and the mock used in tests.

use async_trait::async_trait;

use vitotrol_types::{ActionStatus, AttrId, RefreshId};

use crate::device::Device;
use crate::error::Result;

/// The mutating and status calls the write-then-confirm waiters are built on.
///
/// Implemented by [`crate::Session`] for the live service and by
/// [`crate::MockApi`] for tests.
///
/// # Example
///
/// ```ignore
/// use vitotrol_core::{Device, Result, VitotrolApi};
///
/// async fn write_once<A: VitotrolApi>(api: &A, device: &Device) -> Result<()> {
///     let id = api.write_data(device, AttrId(104), "21").await?;
///     println!("status: {}", api.request_write_status(&id).await?);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait VitotrolApi: Send + Sync {
    // --- Writes ---

    /// Write `value` to data point `attr` of `device`.
    ///
    /// Returns the handle to pass to [`request_write_status`](Self::request_write_status).
    async fn write_data(&self, device: &Device, attr: AttrId, value: &str) -> Result<RefreshId>;

    /// Report whether a previous write has been applied.
    async fn request_write_status(&self, refresh_id: &RefreshId) -> Result<ActionStatus>;

    // --- Refreshes ---

    /// Ask the server to re-read `attrs` from `device`.
    ///
    /// Returns the handle to pass to [`request_refresh_status`](Self::request_refresh_status).
    async fn refresh_data(&self, device: &Device, attrs: &[AttrId]) -> Result<RefreshId>;

    /// Report whether a previous refresh has completed.
    async fn request_refresh_status(&self, refresh_id: &RefreshId) -> Result<ActionStatus>;
}
