//! Core types for the Vitotrol API.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident($inner:ty), $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl $name {
            /// Returns the raw numeric value.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(ParseError::Empty { kind: $kind });
                }
                s.parse::<$inner>()
                    .map(Self)
                    .map_err(|_| ParseError::InvalidId {
                        kind: $kind,
                        input: s.to_string(),
                    })
            }
        }
    };
}

numeric_id!(
    /// Identifier of a heating device (`GeraetId` on the wire).
    DeviceId(u32),
    "device id"
);

numeric_id!(
    /// Identifier of the installation a device belongs to (`AnlageId` on the wire).
    LocationId(u32),
    "location id"
);

numeric_id!(
    /// Identifier of a device data point (`DatapunktId` on the wire).
    AttrId(u16),
    "attribute id"
);

/// Correlation handle returned by a mutating call.
///
/// The server hands one out for every `WriteData` and `RefreshData` call
/// (`AktualisierungsId` on the wire). It is only meaningful to the matching
/// status request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RefreshId(String);

impl RefreshId {
    /// Create a refresh id from the raw server value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw server value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefreshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RefreshId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RefreshId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Status code reported once a remote action has been applied.
pub const STATUS_DONE: i32 = 4;

/// Highest status code that still means "in progress".
pub const STATUS_MAX_PENDING: i32 = 3;

/// State of a remote action as reported by a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum ActionStatus {
    /// The action is queued or still being transferred to the device.
    Pending,
    /// The device confirmed the action.
    Succeeded,
    /// The server gave up on the action.
    Failed {
        /// Raw status code returned by the server.
        code: i32,
    },
}

impl ActionStatus {
    /// Map a raw `Status` code from a status response.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitotrol_types::ActionStatus;
    ///
    /// assert_eq!(ActionStatus::from_code(0), ActionStatus::Pending);
    /// assert_eq!(ActionStatus::from_code(4), ActionStatus::Succeeded);
    /// assert_eq!(ActionStatus::from_code(5), ActionStatus::Failed { code: 5 });
    /// ```
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            STATUS_DONE => ActionStatus::Succeeded,
            0..=STATUS_MAX_PENDING => ActionStatus::Pending,
            _ => ActionStatus::Failed { code },
        }
    }

    /// Whether no further status request is needed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ActionStatus::Pending)
    }
}

impl From<i32> for ActionStatus {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Pending => write!(f, "pending"),
            ActionStatus::Succeeded => write!(f, "succeeded"),
            ActionStatus::Failed { code } => write!(f, "failed (status {})", code),
        }
    }
}
