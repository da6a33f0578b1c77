use electricitymaps::{
    CarbonIntensityHistory, Decode, ErrorKind, HomeAssistantCarbonIntensityResponse,
    LatestCarbonIntensity, LatestPowerBreakdown, PowerBreakdownHistory, ZonesResponse,
};

const HOME_ASSISTANT: &str = include_str!("fixtures/home_assistant.json");
const NO_DATA: &str = include_str!("fixtures/no_data.json");
const UNKNOWN_STATUS: &str = include_str!("fixtures/unknown_status.json");
const ZONES: &str = include_str!("fixtures/zones.json");
const LATEST_CARBON_INTENSITY: &str = include_str!("fixtures/latest_carbon_intensity.json");
const CARBON_INTENSITY_HISTORY: &str = include_str!("fixtures/carbon_intensity_history.json");
const LATEST_POWER_BREAKDOWN: &str = include_str!("fixtures/latest_power_breakdown.json");
const POWER_BREAKDOWN_HISTORY: &str = include_str!("fixtures/power_breakdown_history.json");

// --- status sentinel ---

#[test]
fn home_assistant_ok() {
    let resp = HomeAssistantCarbonIntensityResponse::from_json(HOME_ASSISTANT).unwrap();
    assert_eq!(resp.status(), "ok");
    assert_eq!(resp.country_code(), "DE");
    assert_eq!(resp.data().carbon_intensity(), 391.5);
    assert_eq!(resp.data().fossil_fuel_percentage(), 57.28);
    assert_eq!(resp.units().carbon_intensity(), "gCO2eq/kWh");
}

#[test]
fn home_assistant_no_data() {
    let err = HomeAssistantCarbonIntensityResponse::from_json(NO_DATA).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[test]
fn home_assistant_unknown_status() {
    let err = HomeAssistantCarbonIntensityResponse::from_json(UNKNOWN_STATUS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.to_string().contains("unexpected-value"));
}

#[test]
fn home_assistant_malformed_json() {
    let err = HomeAssistantCarbonIntensityResponse::from_json(r#"{"status": "ok""#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn home_assistant_ok_but_wrong_shape() {
    let err = HomeAssistantCarbonIntensityResponse::from_json(r#"{"status": "ok"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn status_on_other_shapes_is_checked_too() {
    let err = LatestCarbonIntensity::from_json(r#"{"status": "no-data"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}

// --- zones ---

#[test]
fn zones_two_entries() {
    let zones = ZonesResponse::from_json(
        r#"{"DE": {"zoneName": "Germany"}, "FR": {"zoneName": "France", "countryName": "France"}}"#,
    )
    .unwrap();
    assert_eq!(zones.len(), 2);
    let de = zones.get("DE").unwrap();
    assert_eq!(de.zone_name(), "Germany");
    assert!(de.country_name().is_none());
    assert_eq!(zones.get("FR").unwrap().country_name(), Some("France"));
}

#[test]
fn zones_fixture() {
    let zones = ZonesResponse::from_json(ZONES).unwrap();
    assert_eq!(zones.len(), 3);
    assert_eq!(zones.get("US-CAL-CISO").unwrap().zone_name(), "CAISO");
    assert!(!zones.is_empty());
}

#[test]
fn zones_not_an_object() {
    let err = ZonesResponse::from_json("[]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

// --- carbon intensity ---

#[test]
fn latest_carbon_intensity() {
    let latest = LatestCarbonIntensity::from_json(LATEST_CARBON_INTENSITY).unwrap();
    assert_eq!(latest.zone(), "DE");
    let ci = latest.carbon_intensity();
    assert_eq!(ci.carbon_intensity(), 302);
    assert_eq!(ci.datetime().to_rfc3339(), "2023-12-03T13:00:00+00:00");
    assert_eq!(
        ci.updated_at().to_rfc3339(),
        "2023-12-03T12:51:04.016+00:00"
    );
    assert_eq!(ci.emission_factor_type(), "lifecycle");
    assert!(ci.is_estimated());
    assert_eq!(ci.estimation_method(), Some("TIME_SLICER_AVERAGE"));
}

#[test]
fn carbon_intensity_history_keeps_server_order() {
    let history = CarbonIntensityHistory::from_json(CARBON_INTENSITY_HISTORY).unwrap();
    assert_eq!(history.zone(), "DE");
    let values: Vec<i64> = history
        .history()
        .iter()
        .map(|c| c.carbon_intensity())
        .collect();
    assert_eq!(values, vec![318, 310]);
    assert!(!history.history()[0].is_estimated());
    assert_eq!(history.history()[0].estimation_method(), None);
}

#[test]
fn decoding_is_idempotent() {
    assert_eq!(
        CarbonIntensityHistory::from_json(CARBON_INTENSITY_HISTORY).unwrap(),
        CarbonIntensityHistory::from_json(CARBON_INTENSITY_HISTORY).unwrap()
    );
    assert_eq!(
        LatestPowerBreakdown::from_json(LATEST_POWER_BREAKDOWN).unwrap(),
        LatestPowerBreakdown::from_json(LATEST_POWER_BREAKDOWN).unwrap()
    );
}

// --- power breakdown ---

#[test]
fn latest_power_breakdown() {
    let latest = LatestPowerBreakdown::from_json(LATEST_POWER_BREAKDOWN).unwrap();
    assert_eq!(latest.zone(), "DE");
    let pb = latest.power_breakdown();
    assert_eq!(pb.datetime().to_rfc3339(), "2023-12-03T13:00:00+00:00");
    assert_eq!(pb.created_at().to_rfc3339(), "2023-11-30T13:45:32.489+00:00");
    assert_eq!(pb.power_consumption_breakdown()["coal"], Some(9921));
    assert_eq!(pb.power_consumption_breakdown()["battery discharge"], None);
    assert_eq!(pb.power_production_breakdown()["nuclear"], None);
    assert_eq!(pb.power_import_breakdown()["AT"], Some(812));
    assert_eq!(pb.power_export_breakdown()["FR"], Some(1203));
    assert_eq!(pb.fossil_free_percentage(), 51);
    assert_eq!(pb.renewable_percentage(), 50);
    assert_eq!(pb.power_consumption_total(), 42532);
    assert_eq!(pb.power_production_total(), 41711);
    assert_eq!(pb.power_import_total(), 812);
    assert_eq!(pb.power_export_total(), 1203);
    assert!(pb.is_estimated());
    assert_eq!(pb.estimation_method(), Some("TIME_SLICER_AVERAGE"));
}

#[test]
fn power_breakdown_history() {
    let history = PowerBreakdownHistory::from_json(POWER_BREAKDOWN_HISTORY).unwrap();
    assert_eq!(history.zone(), "DE");
    assert_eq!(history.history().len(), 2);
    assert_eq!(
        history.history()[0].power_consumption_breakdown()["coal"],
        None
    );
    assert_eq!(
        history.history()[1].power_consumption_breakdown()["coal"],
        Some(9800)
    );
    assert!(history.history()[0].datetime() < history.history()[1].datetime());
}

#[test]
fn missing_total_is_decode_error() {
    let body = LATEST_POWER_BREAKDOWN.replace(r#""powerImportTotal": 812,"#, "");
    let err = LatestPowerBreakdown::from_json(&body).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}
