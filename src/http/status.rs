//! Provider payload status
//!
//! The legacy web services answer HTTP 200 even when a call failed and report
//! the outcome in `status` / `error_message` fields of the body.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Status token for a successful call
pub const STATUS_OK: &str = "OK";
/// Status token for a successful call without matches
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Common status fields found at the end of most web service responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: String,
}

impl ProviderStatus {
    /// Fail with [`Error::Provider`] unless the status is OK or ZERO_RESULTS.
    pub fn check(&self) -> Result<()> {
        match self.status.as_str() {
            STATUS_OK | STATUS_ZERO_RESULTS => Ok(()),
            other => Err(Error::provider(other, self.error_message.clone())),
        }
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_ok_and_zero_results_succeed() {
        let ok: ProviderStatus = serde_json::from_str(r#"{"status":"OK"}"#).unwrap();
        let zero: ProviderStatus = serde_json::from_str(r#"{"status":"ZERO_RESULTS"}"#).unwrap();

        assert!(ok.check().is_ok());
        assert!(zero.check().is_ok());
    }

    #[test]
    fn test_failure_status_carries_token_and_message() {
        let status: ProviderStatus =
            serde_json::from_str(r#"{"status":"INVALID_REQUEST","error_message":"x"}"#).unwrap();

        match status.check() {
            Err(Error::Provider { status, message }) => {
                assert_eq!(status, "INVALID_REQUEST");
                assert_eq!(message, "x");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_status_is_failure() {
        let status: ProviderStatus = serde_json::from_str("{}").unwrap();
        assert!(status.check().is_err());
    }
}
