use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Decode, check_status};
use crate::error::Result;

/// Simplified carbon intensity served by `/home-assistant` and by the legacy
/// `/latest` endpoint.
///
/// Unlike the other shapes the `status` field is mandatory here; anything but
/// `"ok"` fails the decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAssistantCarbonIntensityResponse {
    status: String,
    country_code: String,
    data: HomeAssistantCarbonIntensityData,
    units: HomeAssistantCarbonIntensityUnit,
}

impl HomeAssistantCarbonIntensityResponse {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn data(&self) -> &HomeAssistantCarbonIntensityData {
        &self.data
    }

    pub fn units(&self) -> &HomeAssistantCarbonIntensityUnit {
        &self.units
    }
}

impl Decode for HomeAssistantCarbonIntensityResponse {
    fn pre_decode(value: Value) -> Result<Value> {
        check_status(&value)?;
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAssistantCarbonIntensityData {
    carbon_intensity: f64,
    fossil_fuel_percentage: f64,
}

impl HomeAssistantCarbonIntensityData {
    pub fn carbon_intensity(&self) -> f64 {
        self.carbon_intensity
    }

    pub fn fossil_fuel_percentage(&self) -> f64 {
        self.fossil_fuel_percentage
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAssistantCarbonIntensityUnit {
    carbon_intensity: String,
}

impl HomeAssistantCarbonIntensityUnit {
    /// Usually `gCO2eq/kWh`.
    pub fn carbon_intensity(&self) -> &str {
        &self.carbon_intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_status_is_rejected() {
        let body = r#"{"countryCode":"DE","data":{"carbonIntensity":1.0,"fossilFuelPercentage":2.0},"units":{"carbonIntensity":"gCO2eq/kWh"}}"#;
        let err = HomeAssistantCarbonIntensityResponse::from_json(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[test]
    fn no_data_is_checked_before_shape() {
        // A no-data body carries none of the other fields.
        let err = HomeAssistantCarbonIntensityResponse::from_json(r#"{"status":"no-data"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
    }
}
