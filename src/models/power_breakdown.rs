use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Decode;

/// Megawatts per production source or exchange partner. `None` means the
/// value is unknown, not zero.
pub type Breakdown = BTreeMap<String, Option<i64>>;

/// Per-source decomposition of a zone's electricity for one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerBreakdown {
    datetime: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    power_consumption_breakdown: Breakdown,
    power_production_breakdown: Breakdown,
    power_import_breakdown: Breakdown,
    power_export_breakdown: Breakdown,
    fossil_free_percentage: i64,
    renewable_percentage: i64,
    power_consumption_total: i64,
    power_production_total: i64,
    power_import_total: i64,
    power_export_total: i64,
    is_estimated: bool,
    #[serde(default)]
    estimation_method: Option<String>,
}

impl PowerBreakdown {
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn power_consumption_breakdown(&self) -> &Breakdown {
        &self.power_consumption_breakdown
    }

    pub fn power_production_breakdown(&self) -> &Breakdown {
        &self.power_production_breakdown
    }

    /// Keyed by exporting zone.
    pub fn power_import_breakdown(&self) -> &Breakdown {
        &self.power_import_breakdown
    }

    /// Keyed by importing zone.
    pub fn power_export_breakdown(&self) -> &Breakdown {
        &self.power_export_breakdown
    }

    pub fn fossil_free_percentage(&self) -> i64 {
        self.fossil_free_percentage
    }

    pub fn renewable_percentage(&self) -> i64 {
        self.renewable_percentage
    }

    pub fn power_consumption_total(&self) -> i64 {
        self.power_consumption_total
    }

    pub fn power_production_total(&self) -> i64 {
        self.power_production_total
    }

    pub fn power_import_total(&self) -> i64 {
        self.power_import_total
    }

    pub fn power_export_total(&self) -> i64 {
        self.power_export_total
    }

    pub fn is_estimated(&self) -> bool {
        self.is_estimated
    }

    pub fn estimation_method(&self) -> Option<&str> {
        self.estimation_method.as_deref()
    }
}

/// Response of `/power-breakdown/latest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestPowerBreakdown {
    zone: String,
    #[serde(flatten)]
    power_breakdown: PowerBreakdown,
}

impl LatestPowerBreakdown {
    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn power_breakdown(&self) -> &PowerBreakdown {
        &self.power_breakdown
    }
}

impl Decode for LatestPowerBreakdown {}

/// Response of `/power-breakdown/history`, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerBreakdownHistory {
    zone: String,
    history: Vec<PowerBreakdown>,
}

impl PowerBreakdownHistory {
    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn history(&self) -> &[PowerBreakdown] {
        &self.history
    }
}

impl Decode for PowerBreakdownHistory {}
