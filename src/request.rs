//! Logical queries and their query-string parameters.

use std::collections::BTreeMap;
use std::fmt;

/// Query-string parameters, ordered by key so encoding and logging are stable.
pub type Parameters = BTreeMap<&'static str, String>;

/// How the client normalizes zone codes before sending them.
///
/// The builder itself never rewrites values; the [`Client`](crate::Client)
/// applies this policy right before a request goes out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZoneCase {
    /// Upper-case zone codes (`de` -> `DE`).
    #[default]
    Upper,
    /// Send zone codes exactly as given.
    Preserve,
}

/// Query a single zone by its code, e.g. `DE` or `US-CAL-CISO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneRequest {
    zone: String,
}

impl ZoneRequest {
    pub fn new(zone: impl Into<String>) -> Self {
        Self { zone: zone.into() }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }
}

/// Query by geographic position.
///
/// Latitude and longitude are passed through as strings; range and format
/// checking is left to the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinatesRequest {
    lat: String,
    lon: String,
}

impl CoordinatesRequest {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }

    pub fn lat(&self) -> &str {
        &self.lat
    }

    pub fn lon(&self) -> &str {
        &self.lon
    }
}

/// Any query accepted by the location-based endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    Zone(ZoneRequest),
    Coordinates(CoordinatesRequest),
}

impl Request {
    /// Parameters for the current API generation.
    pub fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        match self {
            Request::Zone(r) => {
                params.insert("zone", r.zone.clone());
            }
            Request::Coordinates(r) => {
                params.insert("lat", r.lat.clone());
                params.insert("lon", r.lon.clone());
            }
        }
        params
    }

    /// Returns a copy with the zone code rewritten according to `case`.
    /// Coordinate requests are returned unchanged.
    pub fn normalized(&self, case: ZoneCase) -> Request {
        match (self, case) {
            (Request::Zone(r), ZoneCase::Upper) => {
                Request::Zone(ZoneRequest::new(r.zone.to_uppercase()))
            }
            _ => self.clone(),
        }
    }
}

impl From<ZoneRequest> for Request {
    fn from(value: ZoneRequest) -> Self {
        Request::Zone(value)
    }
}

impl From<CoordinatesRequest> for Request {
    fn from(value: CoordinatesRequest) -> Self {
        Request::Coordinates(value)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Zone(r) => write!(f, "ZoneRequest(zone={})", r.zone),
            Request::Coordinates(r) => {
                write!(f, "CoordinatesRequest(lat={}, lon={})", r.lat, r.lon)
            }
        }
    }
}
