//! Mock Vitotrol API for testing.
//!
//! This module provides a scripted stand-in for [`crate::Session`] so the
//! waiters can be tested without network access.
//!
//! The [`MockApi`] implements the [`VitotrolApi`] trait, allowing it to be
//! used interchangeably with a real session in generic code.
//!
//! # Features
//!
//! - **Scripted statuses**: Queue the answers of the status calls, in order
//! - **Failure injection**: Make the mutating calls or single polls fail
//! - **Latency simulation**: Add artificial delays to every call
//! - **Call log**: Inspect which calls were made and in which order

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use vitotrol_types::{ActionStatus, AttrId, RefreshId};

use crate::device::Device;
use crate::error::{Error, Result};
use crate::traits::VitotrolApi;

/// Scripted answer of a status call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStatus {
    /// Answer with this status.
    Status(ActionStatus),
    /// Fail the call as if the response could not be decoded.
    Error(String),
}

impl From<ActionStatus> for MockStatus {
    fn from(status: ActionStatus) -> Self {
        MockStatus::Status(status)
    }
}

/// A call received by a [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    WriteData {
        device: Device,
        attr: AttrId,
        value: String,
    },
    RequestWriteStatus(RefreshId),
    RefreshData {
        device: Device,
        attrs: Vec<AttrId>,
    },
    RequestRefreshStatus(RefreshId),
}

impl MockCall {
    /// Whether this is one of the status calls.
    pub fn is_status_request(&self) -> bool {
        matches!(
            self,
            MockCall::RequestWriteStatus(_) | MockCall::RequestRefreshStatus(_)
        )
    }
}

/// A mock Vitotrol service for testing.
///
/// Status calls pop their answer from a per-action queue. Once a queue is
/// empty, the fallback status is returned (succeeded by default).
///
/// # Example
///
/// ```
/// use vitotrol_core::{Device, MockApiBuilder, VitotrolApi};
/// use vitotrol_types::{ActionStatus, AttrId};
///
/// #[tokio::main]
/// async fn main() {
///     let api = MockApiBuilder::new()
///         .write_statuses([ActionStatus::Pending, ActionStatus::Succeeded])
///         .build();
///
///     let device = Device::new(1u32, 2u32);
///     let id = api.write_data(&device, AttrId(104), "21").await.unwrap();
///     assert_eq!(api.request_write_status(&id).await.unwrap(), ActionStatus::Pending);
///     assert_eq!(api.request_write_status(&id).await.unwrap(), ActionStatus::Succeeded);
/// }
/// ```
pub struct MockApi {
    write_statuses: Mutex<VecDeque<MockStatus>>,
    refresh_statuses: Mutex<VecDeque<MockStatus>>,
    fallback_status: ActionStatus,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Simulated latency of every call in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    next_refresh_id: AtomicU64,
    poll_count: AtomicU32,
    calls: RwLock<Vec<MockCall>>,
}

impl std::fmt::Debug for MockApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockApi")
            .field("fallback_status", &self.fallback_status)
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .field("poll_count", &self.poll_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create a mock whose status calls always report success.
    pub fn new() -> Self {
        MockApiBuilder::new().build()
    }

    /// Queue an answer for `RequestWriteStatus`.
    pub async fn push_write_status(&self, status: impl Into<MockStatus>) {
        self.write_statuses.lock().await.push_back(status.into());
    }

    /// Queue an answer for `RequestRefreshStatus`.
    pub async fn push_refresh_status(&self, status: impl Into<MockStatus>) {
        self.refresh_statuses.lock().await.push_back(status.into());
    }

    /// Make the mutating calls (`WriteData`, `RefreshData`) fail.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Set simulated latency.
    ///
    /// Every call will be delayed by this duration.
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of status calls received so far.
    pub fn poll_count(&self) -> u32 {
        self.poll_count.load(Ordering::Relaxed)
    }

    /// All calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    /// Forget the recorded calls and reset the poll counter.
    pub async fn reset_calls(&self) {
        self.calls.write().await.clear();
        self.poll_count.store(0, Ordering::Relaxed);
    }

    async fn simulate_latency(&self) {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
    }

    async fn record(&self, call: MockCall) {
        self.calls.write().await.push(call);
    }

    async fn initiate(&self, action: &'static str) -> Result<RefreshId> {
        self.simulate_latency().await;

        if self.should_fail.load(Ordering::Relaxed) {
            let message = self.fail_message.read().await.clone();
            return Err(Error::invalid_response(action, message));
        }

        let id = self.next_refresh_id.fetch_add(1, Ordering::Relaxed);
        Ok(RefreshId::new(format!("mock-{}", id)))
    }

    async fn answer(
        &self,
        action: &'static str,
        queue: &Mutex<VecDeque<MockStatus>>,
    ) -> Result<ActionStatus> {
        self.simulate_latency().await;
        self.poll_count.fetch_add(1, Ordering::Relaxed);

        match queue.lock().await.pop_front() {
            Some(MockStatus::Status(status)) => Ok(status),
            Some(MockStatus::Error(message)) => Err(Error::invalid_response(action, message)),
            None => Ok(self.fallback_status),
        }
    }
}

#[async_trait]
impl VitotrolApi for MockApi {
    async fn write_data(&self, device: &Device, attr: AttrId, value: &str) -> Result<RefreshId> {
        self.record(MockCall::WriteData {
            device: device.clone(),
            attr,
            value: value.to_string(),
        })
        .await;
        self.initiate("WriteData").await
    }

    async fn request_write_status(&self, refresh_id: &RefreshId) -> Result<ActionStatus> {
        self.record(MockCall::RequestWriteStatus(refresh_id.clone())).await;
        self.answer("RequestWriteStatus", &self.write_statuses).await
    }

    async fn refresh_data(&self, device: &Device, attrs: &[AttrId]) -> Result<RefreshId> {
        self.record(MockCall::RefreshData {
            device: device.clone(),
            attrs: attrs.to_vec(),
        })
        .await;
        if attrs.is_empty() {
            return Err(Error::invalid_config("no attributes to refresh"));
        }
        self.initiate("RefreshData").await
    }

    async fn request_refresh_status(&self, refresh_id: &RefreshId) -> Result<ActionStatus> {
        self.record(MockCall::RequestRefreshStatus(refresh_id.clone())).await;
        self.answer("RequestRefreshStatus", &self.refresh_statuses).await
    }
}

/// Builder for creating mock APIs with custom behavior.
#[derive(Debug)]
pub struct MockApiBuilder {
    write_statuses: VecDeque<MockStatus>,
    refresh_statuses: VecDeque<MockStatus>,
    fallback_status: ActionStatus,
    fail_message: Option<String>,
    latency: Duration,
}

impl Default for MockApiBuilder {
    fn default() -> Self {
        Self {
            write_statuses: VecDeque::new(),
            refresh_statuses: VecDeque::new(),
            fallback_status: ActionStatus::Succeeded,
            fail_message: None,
            latency: Duration::ZERO,
        }
    }
}

impl MockApiBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for `RequestWriteStatus`.
    #[must_use]
    pub fn write_statuses<S: Into<MockStatus>>(
        mut self,
        statuses: impl IntoIterator<Item = S>,
    ) -> Self {
        self.write_statuses
            .extend(statuses.into_iter().map(Into::into));
        self
    }

    /// Queue answers for `RequestRefreshStatus`.
    #[must_use]
    pub fn refresh_statuses<S: Into<MockStatus>>(
        mut self,
        statuses: impl IntoIterator<Item = S>,
    ) -> Self {
        self.refresh_statuses
            .extend(statuses.into_iter().map(Into::into));
        self
    }

    /// Make the next `RequestWriteStatus` fail instead of answering.
    #[must_use]
    pub fn write_status_error(mut self, message: &str) -> Self {
        self.write_statuses
            .push_back(MockStatus::Error(message.to_string()));
        self
    }

    /// Make the next `RequestRefreshStatus` fail instead of answering.
    #[must_use]
    pub fn refresh_status_error(mut self, message: &str) -> Self {
        self.refresh_statuses
            .push_back(MockStatus::Error(message.to_string()));
        self
    }

    /// Status returned once a queue runs dry.
    #[must_use]
    pub fn fallback_status(mut self, status: ActionStatus) -> Self {
        self.fallback_status = status;
        self
    }

    /// Make the mutating calls fail with `message`.
    #[must_use]
    pub fn fail_initiate(mut self, message: &str) -> Self {
        self.fail_message = Some(message.to_string());
        self
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Build the mock API.
    #[must_use]
    pub fn build(self) -> MockApi {
        let should_fail = self.fail_message.is_some();
        let fail_message = self.fail_message.unwrap_or_else(|| "Mock failure".to_string());
        MockApi {
            write_statuses: Mutex::new(self.write_statuses),
            refresh_statuses: Mutex::new(self.refresh_statuses),
            fallback_status: self.fallback_status,
            should_fail: AtomicBool::new(should_fail),
            fail_message: RwLock::new(fail_message),
            latency_ms: AtomicU64::new(self.latency.as_millis() as u64),
            next_refresh_id: AtomicU64::new(1),
            poll_count: AtomicU32::new(0),
            calls: RwLock::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> Device {
        Device::new(1u32, 2u32)
    }

    #[tokio::test]
    async fn test_mock_defaults_to_success() {
        let api = MockApi::new();
        let id = api.write_data(&device(), AttrId(104), "21").await.unwrap();

        assert_eq!(id.as_str(), "mock-1");
        assert_eq!(
            api.request_write_status(&id).await.unwrap(),
            ActionStatus::Succeeded
        );
        assert_eq!(api.poll_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_refresh_ids_increment() {
        let api = MockApi::new();
        let first = api.write_data(&device(), AttrId(1), "1").await.unwrap();
        let second = api.refresh_data(&device(), &[AttrId(2)]).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_mock_scripted_statuses() {
        let api = MockApiBuilder::new()
            .refresh_statuses([ActionStatus::Pending, ActionStatus::Failed { code: 5 }])
            .fallback_status(ActionStatus::Pending)
            .build();
        let id = RefreshId::new("x");

        assert_eq!(
            api.request_refresh_status(&id).await.unwrap(),
            ActionStatus::Pending
        );
        assert_eq!(
            api.request_refresh_status(&id).await.unwrap(),
            ActionStatus::Failed { code: 5 }
        );
        assert_eq!(
            api.request_refresh_status(&id).await.unwrap(),
            ActionStatus::Pending
        );
        // Write queue is independent
        assert_eq!(
            api.request_write_status(&id).await.unwrap(),
            ActionStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_mock_status_error() {
        let api = MockApiBuilder::new().write_status_error("bad XML").build();

        let result = api.request_write_status(&RefreshId::new("x")).await;
        assert!(matches!(
            result,
            Err(Error::InvalidResponse {
                action: "RequestWriteStatus",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_mock_fail_initiate() {
        let api = MockApiBuilder::new().fail_initiate("Test error").build();

        let result = api.write_data(&device(), AttrId(1), "1").await;
        assert!(result.unwrap_err().to_string().contains("Test error"));

        api.set_should_fail(false, None).await;
        assert!(api.write_data(&device(), AttrId(1), "1").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_refresh_requires_attrs() {
        let api = MockApi::new();
        let result = api.refresh_data(&device(), &[]).await;
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let api = MockApi::new();
        let id = api.write_data(&device(), AttrId(104), "21").await.unwrap();
        api.request_write_status(&id).await.unwrap();

        let calls = api.calls().await;
        assert_eq!(
            calls,
            vec![
                MockCall::WriteData {
                    device: device(),
                    attr: AttrId(104),
                    value: "21".to_string(),
                },
                MockCall::RequestWriteStatus(id),
            ]
        );
        assert!(!calls[0].is_status_request());
        assert!(calls[1].is_status_request());

        api.reset_calls().await;
        assert!(api.calls().await.is_empty());
        assert_eq!(api.poll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency() {
        let api = MockApiBuilder::new()
            .latency(Duration::from_millis(200))
            .build();
        let start = tokio::time::Instant::now();

        api.request_write_status(&RefreshId::new("x")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));

        api.set_latency(Duration::ZERO);
    }

    #[tokio::test]
    async fn test_mock_through_trait() {
        async fn poll_via_trait<A: VitotrolApi>(api: &A) -> ActionStatus {
            api.request_refresh_status(&RefreshId::new("x")).await.unwrap()
        }

        let api = MockApiBuilder::new()
            .refresh_statuses([ActionStatus::Pending])
            .build();
        assert_eq!(poll_via_trait(&api).await, ActionStatus::Pending);
    }
}
