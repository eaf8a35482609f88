//! Platform-agnostic types for the Vitotrol heating-control API.
//!
//! This crate provides the identifiers and status codes shared by the
//! SOAP client (vitotrol-core) and the command-line tool (vitotrol-cli).
//!
//! # Features
//!
//! - Typed identifiers for devices, locations and data points
//! - The correlation handle returned by mutating calls
//! - Status code mapping for write/refresh confirmations
//! - Error types for identifier parsing
//!
//! # Example
//!
//! ```
//! use vitotrol_types::{ActionStatus, AttrId};
//!
//! let attr: AttrId = "5".parse().unwrap();
//! assert_eq!(attr.get(), 5);
//! assert!(ActionStatus::from_code(4).is_terminal());
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    ActionStatus, AttrId, DeviceId, LocationId, RefreshId, STATUS_DONE, STATUS_MAX_PENDING,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- Identifier parsing tests ---

    #[test]
    fn test_parse_attr_id() {
        let attr: AttrId = "104".parse().unwrap();
        assert_eq!(attr, AttrId(104));
        assert_eq!(attr.to_string(), "104");
    }

    #[test]
    fn test_parse_id_trims_whitespace() {
        let device: DeviceId = " 12345 ".parse().unwrap();
        assert_eq!(device.get(), 12345);
    }

    #[test]
    fn test_parse_id_empty() {
        let err = "".parse::<LocationId>().unwrap_err();
        assert_eq!(err, ParseError::Empty { kind: "location id" });
        assert_eq!(err.to_string(), "Empty location id");
    }

    #[test]
    fn test_parse_id_invalid() {
        let err = "abc".parse::<DeviceId>().unwrap_err();
        assert!(err.to_string().contains("device id"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_parse_attr_id_overflow() {
        // Data point ids are 16-bit on the wire
        assert!("70000".parse::<AttrId>().is_err());
    }

    // --- RefreshId tests ---

    #[test]
    fn test_refresh_id() {
        let id = RefreshId::new("a1b2c3");
        assert_eq!(id.as_str(), "a1b2c3");
        assert_eq!(id.to_string(), "a1b2c3");
        assert_eq!(RefreshId::from("a1b2c3"), id);
    }

    // --- ActionStatus tests ---

    #[test]
    fn test_status_from_code() {
        assert_eq!(ActionStatus::from_code(0), ActionStatus::Pending);
        assert_eq!(ActionStatus::from_code(1), ActionStatus::Pending);
        assert_eq!(ActionStatus::from_code(3), ActionStatus::Pending);
        assert_eq!(ActionStatus::from_code(4), ActionStatus::Succeeded);
        assert_eq!(ActionStatus::from_code(5), ActionStatus::Failed { code: 5 });
        assert_eq!(
            ActionStatus::from_code(-1),
            ActionStatus::Failed { code: -1 }
        );
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!ActionStatus::Pending.is_terminal());
        assert!(ActionStatus::Succeeded.is_terminal());
        assert!(ActionStatus::Failed { code: 9 }.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ActionStatus::Pending.to_string(), "pending");
        assert_eq!(
            ActionStatus::Failed { code: 7 }.to_string(),
            "failed (status 7)"
        );
    }

    // --- Serialization tests ---

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&AttrId(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&RefreshId::new("x")).unwrap(),
            "\"x\""
        );
        let device: DeviceId = serde_json::from_str("42").unwrap();
        assert_eq!(device, DeviceId(42));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ActionStatus::Failed { code: 6 }).unwrap();
        assert!(json.contains("\"state\":\"failed\""));
        assert!(json.contains("\"code\":6"));
    }

    proptest! {
        #[test]
        fn prop_only_done_code_succeeds(code in any::<i32>()) {
            let status = ActionStatus::from_code(code);
            prop_assert_eq!(status == ActionStatus::Succeeded, code == STATUS_DONE);
        }

        #[test]
        fn prop_failed_keeps_raw_code(code in any::<i32>()) {
            if let ActionStatus::Failed { code: raw } = ActionStatus::from_code(code) {
                prop_assert_eq!(raw, code);
                prop_assert!(!(0..=STATUS_MAX_PENDING).contains(&code));
            }
        }

        #[test]
        fn prop_attr_id_display_parses_back(raw in any::<u16>()) {
            let attr = AttrId(raw);
            prop_assert_eq!(attr.to_string().parse::<AttrId>().unwrap(), attr);
        }
    }
}
