//! Response shapes of the Electricity Maps API and the shared decode step.
//!
//! Every response type is decode-only: fields are private, values come from
//! [`Decode::from_json`] and are read through accessors.

mod carbon_intensity;
mod home_assistant;
mod power_breakdown;
mod zone;

pub use carbon_intensity::{CarbonIntensity, CarbonIntensityHistory, LatestCarbonIntensity};
pub use home_assistant::{
    HomeAssistantCarbonIntensityData, HomeAssistantCarbonIntensityResponse,
    HomeAssistantCarbonIntensityUnit,
};
pub use power_breakdown::{Breakdown, LatestPowerBreakdown, PowerBreakdown, PowerBreakdownHistory};
pub use zone::{Zone, ZonesResponse};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

pub(crate) const STATUS_OK: &str = "ok";
pub(crate) const STATUS_NO_DATA: &str = "no-data";

/// Parse a raw response body into a typed response.
///
/// Decoding runs in three steps: parse JSON, let the shape adjust or reject
/// the document ([`Decode::pre_decode`]), then map it onto `Self`.
pub trait Decode: DeserializeOwned {
    /// Shape-specific validation and rewriting before structural mapping.
    ///
    /// The default rejects documents carrying a `status` other than `"ok"`.
    fn pre_decode(value: Value) -> Result<Value> {
        if value.get("status").is_some() {
            check_status(&value)?;
        }
        Ok(value)
    }

    fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::Decode(format!("JSON decoding failed: {e}")))?;
        let value = Self::pre_decode(value)?;
        serde_json::from_value(value)
            .map_err(|e| Error::Decode(format!("unexpected response shape: {e}")))
    }
}

/// Require `status == "ok"`.
///
/// `"no-data"` becomes [`Error::NoData`]; a missing or unknown status becomes
/// [`Error::Generic`] naming the value.
pub(crate) fn check_status(value: &Value) -> Result<()> {
    match value.get("status").and_then(Value::as_str) {
        Some(STATUS_OK) => Ok(()),
        Some(STATUS_NO_DATA) => Err(Error::NoData(
            "No data available for selected location".to_string(),
        )),
        Some(other) => Err(Error::Generic(format!(
            "Unknown response status occurred: {other}"
        ))),
        None => Err(Error::Generic(format!(
            "Unknown response status occurred: {}",
            value.get("status").unwrap_or(&Value::Null)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn ok_status_passes() {
        assert!(check_status(&json!({"status": "ok"})).is_ok());
    }

    #[test]
    fn no_data_status_is_no_data_error() {
        let err = check_status(&json!({"status": "no-data"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
    }

    #[test]
    fn unknown_status_is_generic_and_named() {
        let err = check_status(&json!({"status": "unexpected-value"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.to_string().contains("unexpected-value"));
    }

    #[test]
    fn missing_or_non_string_status_is_generic() {
        assert_eq!(
            check_status(&json!({})).unwrap_err().kind(),
            ErrorKind::Generic
        );
        let err = check_status(&json!({"status": 3})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.to_string().contains('3'));
    }
}
