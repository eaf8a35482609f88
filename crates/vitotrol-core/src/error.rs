//! Error types for vitotrol-core.
//!
//! This module defines all error types that can occur when talking to the
//! Vitotrol SOAP service and while waiting for a remote action to complete.
//!
//! # Error Taxonomy for Write-then-Confirm
//!
//! [`crate::write_data_wait`] and [`crate::refresh_data_wait`] report
//! failures through two channels:
//!
//! | Stage | Delivered | Variants |
//! |-------|-----------|----------|
//! | Mutating call (`WriteData`, `RefreshData`) | returned directly, no background task | any transport or response error |
//! | Status poll transport/parse failure | through the [`crate::CompletionSignal`] | [`Error::StatusPoll`] |
//! | Remote side reports failure | through the [`crate::CompletionSignal`] | [`Error::ActionFailed`] |
//! | Caller gives up waiting | [`crate::CompletionSignal::wait_timeout`] | [`Error::Timeout`] |
//!
//! A failed status poll is never retried: one failure ends the wait.
//!
//! ## Example
//!
//! ```ignore
//! use vitotrol_core::{Error, WaitConfig, write_data_wait};
//!
//! let signal = write_data_wait(api, &device, AttrId(104), "21", WaitConfig::for_write()).await?;
//! match signal.wait_timeout(Duration::from_secs(60)).await {
//!     Ok(()) => println!("applied"),
//!     Err(Error::ActionFailed { code, .. }) => eprintln!("device refused (status {code})"),
//!     Err(Error::Timeout { .. }) => eprintln!("no confirmation in time"),
//!     Err(e) => eprintln!("status request failed: {e}"),
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the Vitotrol service.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something that is not a usable SOAP response.
    #[error("Invalid response to {action}: {message}")]
    InvalidResponse {
        /// The SOAP action that was called.
        action: &'static str,
        /// What was wrong with the response.
        message: String,
    },

    /// The server answered with a SOAP fault.
    #[error("SOAP fault from {action}: {message}")]
    Fault {
        /// The SOAP action that was called.
        action: &'static str,
        /// The fault string.
        message: String,
    },

    /// The action result carried a non-zero error number.
    #[error("{action} failed with error {code}: {message}")]
    Remote {
        /// The SOAP action that was called.
        action: &'static str,
        /// The `Ergebnis` value.
        code: i32,
        /// The `ErgebnisText` value.
        message: String,
    },

    /// The remote side reported that the write or refresh was not applied.
    #[error("{action} reported failure (status {code})")]
    ActionFailed {
        /// The status action that reported the failure.
        action: &'static str,
        /// Raw status code.
        code: i32,
    },

    /// A status request failed before a status could be read.
    #[error("{action} failed: {source}")]
    StatusPoll {
        /// The status action that failed.
        action: &'static str,
        /// The underlying transport or parse error.
        #[source]
        source: Box<Error>,
    },

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Operation was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Identifier parse error.
    #[error(transparent)]
    Parse(#[from] vitotrol_types::ParseError),
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(action: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            action,
            message: message.into(),
        }
    }

    /// Wrap an error raised by a status request.
    pub fn status_poll(action: &'static str, source: Error) -> Self {
        Self::StatusPoll {
            action,
            source: Box::new(source),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether the remote side explicitly reported that the action failed.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Error::ActionFailed { .. })
    }

    /// Whether a status request failed at the transport or parsing layer.
    pub fn is_poll_failure(&self) -> bool {
        matches!(self, Error::StatusPoll { .. })
    }
}

/// Result type alias using vitotrol-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
