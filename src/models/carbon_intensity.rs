use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Decode;

/// A single carbon intensity reading (gCO2eq/kWh).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonIntensity {
    carbon_intensity: i64,
    datetime: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    emission_factor_type: String,
    is_estimated: bool,
    #[serde(default)]
    estimation_method: Option<String>,
}

impl CarbonIntensity {
    pub fn carbon_intensity(&self) -> i64 {
        self.carbon_intensity
    }

    /// Start of the hour the reading refers to.
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `lifecycle` or `direct`.
    pub fn emission_factor_type(&self) -> &str {
        &self.emission_factor_type
    }

    pub fn is_estimated(&self) -> bool {
        self.is_estimated
    }

    pub fn estimation_method(&self) -> Option<&str> {
        self.estimation_method.as_deref()
    }
}

/// Response of `/carbon-intensity/latest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestCarbonIntensity {
    zone: String,
    #[serde(flatten)]
    carbon_intensity: CarbonIntensity,
}

impl LatestCarbonIntensity {
    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn carbon_intensity(&self) -> &CarbonIntensity {
        &self.carbon_intensity
    }
}

impl Decode for LatestCarbonIntensity {}

/// Response of `/carbon-intensity/history`, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonIntensityHistory {
    zone: String,
    history: Vec<CarbonIntensity>,
}

impl CarbonIntensityHistory {
    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn history(&self) -> &[CarbonIntensity] {
        &self.history
    }
}

impl Decode for CarbonIntensityHistory {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LATEST: &str = r#"{
        "zone": "DE",
        "carbonIntensity": 302,
        "datetime": "2023-12-03T13:00:00.000Z",
        "updatedAt": "2023-12-03T12:51:04.016Z",
        "emissionFactorType": "lifecycle",
        "isEstimated": true,
        "estimationMethod": "TIME_SLICER_AVERAGE"
    }"#;

    #[test]
    fn latest_maps_camel_case_fields() {
        let latest = LatestCarbonIntensity::from_json(LATEST).unwrap();
        assert_eq!(latest.zone(), "DE");
        let ci = latest.carbon_intensity();
        assert_eq!(ci.carbon_intensity(), 302);
        assert_eq!(ci.datetime().to_rfc3339(), "2023-12-03T13:00:00+00:00");
        assert_eq!(ci.emission_factor_type(), "lifecycle");
        assert!(ci.is_estimated());
        assert_eq!(ci.estimation_method(), Some("TIME_SLICER_AVERAGE"));
    }

    #[test]
    fn null_estimation_method_is_absent() {
        let body = LATEST.replace(r#""TIME_SLICER_AVERAGE""#, "null");
        let latest = LatestCarbonIntensity::from_json(&body).unwrap();
        assert_eq!(latest.carbon_intensity().estimation_method(), None);
    }

    #[test]
    fn wrong_type_is_decode_error() {
        let body = LATEST.replace("302", r#""high""#);
        let err = LatestCarbonIntensity::from_json(&body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn serialize_round_trips_wire_names() {
        let latest = LatestCarbonIntensity::from_json(LATEST).unwrap();
        let value = serde_json::to_value(&latest).unwrap();
        assert_eq!(value["carbonIntensity"], 302);
        assert_eq!(value["isEstimated"], true);
        assert_eq!(
            LatestCarbonIntensity::from_json(&value.to_string()).unwrap(),
            latest
        );
    }
}
