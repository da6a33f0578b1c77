use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Decode;
use crate::error::Result;

/// One entry of the zone directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    zone_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country_name: Option<String>,
}

impl Zone {
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    pub fn country_name(&self) -> Option<&str> {
        self.country_name.as_deref()
    }
}

/// The zone directory, keyed by zone code.
///
/// The wire body is a bare object (`{"DE": {...}, ...}`) and the type encodes
/// and decodes as that object directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZonesResponse {
    zones: BTreeMap<String, Zone>,
}

impl ZonesResponse {
    pub fn zones(&self) -> &BTreeMap<String, Zone> {
        &self.zones
    }

    pub fn get(&self, code: &str) -> Option<&Zone> {
        self.zones.get(code)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn into_zones(self) -> BTreeMap<String, Zone> {
        self.zones
    }
}

impl Decode for ZonesResponse {
    // Keys are zone codes, so a zone called "status" is not a status field.
    fn pre_decode(value: Value) -> Result<Value> {
        Ok(value)
    }
}
