//! Async client library for the Viessmann Vitotrol heating-control service.
//!
//! This crate talks to the Vitotrol SOAP web service and provides
//! write-then-confirm operations: a mutating call is issued, and its
//! completion is confirmed by polling the matching status call in the
//! background.
//!
//! # Features
//!
//! - **Session**: Login and cookie handling over `reqwest`
//! - **Writes**: `WriteData` + `RequestWriteStatus` as a single awaitable operation
//! - **Refreshes**: `RefreshData` + `RequestRefreshStatus` likewise
//! - **Cancellation**: Caller-side timeouts, explicit cancel, cancel-on-drop
//! - **Testing**: [`MockApi`] scripts the service for unit tests
//!
//! # Status codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0-3 | Pending (queued or being transferred to the device) |
//! | 4 | Succeeded |
//! | other | Failed |
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vitotrol_core::{Device, Session, WaitConfig, refresh_data_wait};
//! use vitotrol_types::AttrId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(Session::new(vitotrol_core::MAIN_URL)?);
//!     session.login("user@example.com", "secret").await?;
//!
//!     let device = Device::new(12345u32, 678u32);
//!     let signal = refresh_data_wait(
//!         session,
//!         &device,
//!         &[AttrId(5), AttrId(6)],
//!         WaitConfig::for_refresh(),
//!     )
//!     .await?;
//!
//!     tokio::select! {
//!         outcome = signal => outcome?,
//!         _ = tokio::time::sleep(Duration::from_secs(60)) => println!("still pending"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod device;
pub mod error;
pub mod mock;
pub mod session;
pub mod soap;
pub mod traits;
pub mod wait;

// Core exports
pub use actions::{refresh_data_wait, write_data_wait};
pub use device::Device;
pub use error::{Error, Result};
pub use session::{DEFAULT_HTTP_TIMEOUT, MAIN_URL, Session};
pub use traits::VitotrolApi;
pub use wait::{ActionTarget, CompletionSignal, PendingAction, WaitConfig, initiate_and_wait};

/// Type alias for a shared API handle.
///
/// The waiters keep a clone of the handle in their background task, so the
/// API is passed behind an `Arc`.
pub type SharedApi = std::sync::Arc<dyn VitotrolApi>;

pub use mock::{MockApi, MockApiBuilder, MockCall, MockStatus};

// Re-export from vitotrol-types
pub use vitotrol_types::{ActionStatus, AttrId, DeviceId, LocationId, RefreshId};
