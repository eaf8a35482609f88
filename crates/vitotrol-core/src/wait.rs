//! Write-then-confirm: run a mutating call, then poll its status in the background.
//!
//! The Vitotrol service accepts writes and refreshes immediately but applies
//! them later, once the gateway has talked to the boiler. [`initiate_and_wait`]
//! performs the mutating call, and if the server accepted it, spawns a task
//! that polls the matching status call until the action reaches a terminal
//! state. The outcome is delivered exactly once through a [`CompletionSignal`].
//!
//! The polling loop has no deadline of its own. Callers bound the wait with
//! [`CompletionSignal::wait_timeout`] or by racing the signal in
//! `tokio::select!`. Dropping the signal, calling [`CompletionSignal::cancel`]
//! or hitting the timeout stops the background task.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use vitotrol_types::{ActionStatus, AttrId, DeviceId, LocationId, RefreshId};

use crate::error::{Error, Result};

/// Timing of the status polls.
///
/// Values are copied into the background task when it starts, so changing a
/// config afterwards never affects a wait already in flight.
///
/// ```
/// use std::time::Duration;
/// use vitotrol_core::WaitConfig;
///
/// let config = WaitConfig::for_write().poll_interval(Duration::from_millis(500));
/// assert_eq!(config.min_wait, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay before the first status poll.
    ///
    /// Models the minimum time the gateway needs to reach the device.
    pub min_wait: Duration,
    /// Delay between two status polls that reported "pending".
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::for_write()
    }
}

impl WaitConfig {
    /// Create a config with explicit timings.
    pub fn new(min_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            min_wait,
            poll_interval,
        }
    }

    /// Timings suited to `WriteData` confirmations.
    pub fn for_write() -> Self {
        Self {
            min_wait: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Timings suited to `RefreshData` confirmations.
    ///
    /// A refresh reads every requested data point from the device, which takes
    /// noticeably longer than a single write.
    pub fn for_refresh() -> Self {
        Self {
            min_wait: Duration::from_secs(5),
            poll_interval: Duration::from_secs(1),
        }
    }

    /// No delays at all. Ordering is unchanged, only timing.
    pub fn immediate() -> Self {
        Self {
            min_wait: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }

    /// Set the delay before the first poll.
    #[must_use]
    pub fn min_wait(mut self, delay: Duration) -> Self {
        self.min_wait = delay;
        self
    }

    /// Set the delay between polls.
    #[must_use]
    pub fn poll_interval(mut self, delay: Duration) -> Self {
        self.poll_interval = delay;
        self
    }
}

/// What a pending action applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// A single data point write.
    Write {
        device: DeviceId,
        location: LocationId,
        attr: AttrId,
    },
    /// A refresh of a set of data points.
    Refresh {
        device: DeviceId,
        location: LocationId,
        attrs: Vec<AttrId>,
    },
}

impl ActionTarget {
    /// Name of the whole write-then-confirm operation.
    pub fn operation(&self) -> &'static str {
        match self {
            ActionTarget::Write { .. } => "WriteDataWait",
            ActionTarget::Refresh { .. } => "RefreshDataWait",
        }
    }

    /// Name of the status call polled for this target.
    pub fn status_action(&self) -> &'static str {
        match self {
            ActionTarget::Write { .. } => "RequestWriteStatus",
            ActionTarget::Refresh { .. } => "RequestRefreshStatus",
        }
    }
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionTarget::Write {
                device,
                location,
                attr,
            } => write!(f, "attribute {} of {}@{}", attr, device, location),
            ActionTarget::Refresh {
                device,
                location,
                attrs,
            } => {
                let ids: Vec<String> = attrs.iter().map(ToString::to_string).collect();
                write!(f, "attributes [{}] of {}@{}", ids.join(","), device, location)
            }
        }
    }
}

/// An accepted remote action whose completion is being awaited.
#[derive(Debug, Clone)]
pub struct PendingAction {
    /// What the action applies to.
    pub target: ActionTarget,
    /// Correlation handle returned by the mutating call.
    pub refresh_id: RefreshId,
    /// When the mutating call was accepted.
    pub started_at: OffsetDateTime,
    /// Poll timings, fixed for the lifetime of the action.
    pub config: WaitConfig,
}

/// Run `initiate`, then poll in the background until the action completes.
///
/// `initiate` is awaited before this function returns. If it fails, its error
/// is returned as-is and nothing is spawned. Otherwise a task is started that
/// sleeps `config.min_wait`, then calls `poll` with the correlation handle
/// until it reports a terminal status, sleeping `config.poll_interval` after
/// each pending answer. Polls never overlap.
///
/// The returned [`CompletionSignal`] resolves to:
/// - `Ok(())` when a poll reports success,
/// - [`Error::ActionFailed`] when a poll reports failure,
/// - [`Error::StatusPoll`] when a poll itself fails (no retry),
/// - [`Error::Cancelled`] if the task was stopped before reaching a verdict.
pub async fn initiate_and_wait<I, P, Fut>(
    target: ActionTarget,
    config: WaitConfig,
    initiate: I,
    poll: P,
) -> Result<CompletionSignal>
where
    I: Future<Output = Result<RefreshId>>,
    P: FnMut(RefreshId) -> Fut + Send + 'static,
    Fut: Future<Output = Result<ActionStatus>> + Send + 'static,
{
    let refresh_id = initiate.await?;

    let pending = PendingAction {
        target,
        refresh_id,
        started_at: OffsetDateTime::now_utc(),
        config,
    };
    debug!(
        operation = pending.target.operation(),
        refresh_id = %pending.refresh_id,
        "Accepted {}, waiting for confirmation",
        pending.target
    );

    let (tx, rx) = oneshot::channel();
    let cancel_token = CancellationToken::new();
    let task_token = cancel_token.clone();
    let task_pending = pending.clone();

    let handle = tokio::spawn(async move {
        let outcome = tokio::select! {
            _ = task_token.cancelled() => {
                debug!(
                    refresh_id = %task_pending.refresh_id,
                    "Wait cancelled, stopping status polls"
                );
                return;
            }
            outcome = poll_until_terminal(&task_pending, poll) => outcome,
        };

        if tx.send(outcome).is_err() {
            debug!(
                refresh_id = %task_pending.refresh_id,
                "Completion signal dropped before the outcome was delivered"
            );
        }
    });

    Ok(CompletionSignal {
        receiver: rx,
        handle,
        cancel_token,
        pending,
    })
}

async fn poll_until_terminal<P, Fut>(pending: &PendingAction, mut poll: P) -> Result<()>
where
    P: FnMut(RefreshId) -> Fut,
    Fut: Future<Output = Result<ActionStatus>>,
{
    let status_action = pending.target.status_action();
    let WaitConfig {
        min_wait,
        poll_interval,
    } = pending.config;

    sleep(min_wait).await;

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let status = poll(pending.refresh_id.clone())
            .await
            .map_err(|e| Error::status_poll(status_action, e))?;

        debug!(
            refresh_id = %pending.refresh_id,
            attempt,
            %status,
            "{} answered",
            status_action
        );

        match status {
            ActionStatus::Succeeded => return Ok(()),
            ActionStatus::Failed { code } => {
                return Err(Error::ActionFailed {
                    action: status_action,
                    code,
                });
            }
            ActionStatus::Pending => sleep(poll_interval).await,
        }
    }
}

/// One-shot outcome of a write-then-confirm operation.
///
/// Await it directly, race it in `tokio::select!`, or use
/// [`wait_timeout`](Self::wait_timeout). The background task writes to it at
/// most once. Dropping the signal stops the task.
///
/// Like any future, it must not be polled again after it has resolved.
pub struct CompletionSignal {
    receiver: oneshot::Receiver<Result<()>>,
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
    pending: PendingAction,
}

impl CompletionSignal {
    /// The action being awaited.
    pub fn pending(&self) -> &PendingAction {
        &self.pending
    }

    /// Correlation handle returned by the mutating call.
    pub fn refresh_id(&self) -> &RefreshId {
        &self.pending.refresh_id
    }

    /// Wait for the outcome, giving up after `duration`.
    ///
    /// On timeout the background task is cancelled and [`Error::Timeout`] is
    /// returned.
    pub async fn wait_timeout(mut self, duration: Duration) -> Result<()> {
        match tokio::time::timeout(duration, &mut self).await {
            Ok(outcome) => outcome,
            Err(_) => {
                self.cancel_token.cancel();
                Err(Error::timeout(self.pending.target.operation(), duration))
            }
        }
    }

    /// Stop the background task. The signal then resolves to [`Error::Cancelled`].
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Get a token that can be used to cancel the wait externally.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Check if the background task is still polling.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Check if the wait has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("pending", &self.pending)
            .field("active", &self.is_active())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl Future for CompletionSignal {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(Error::Cancelled)))
    }
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
