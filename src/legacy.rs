//! The legacy (co2signal-style) API generation.
//!
//! Older tokens are only accepted by `GET <legacy>/latest`, which takes
//! `countryCode` instead of `zone` and answers with the same shape as the
//! home-assistant endpoint.

use crate::request::{Parameters, Request};

pub(crate) const LEGACY_API_BASE_URL: &str = "https://api.co2signal.com/v1";
pub(crate) const LEGACY_LATEST: &str = "/latest";

/// Tokens up to this length were issued for the legacy API.
pub(crate) const LEGACY_TOKEN_MAX_LEN: usize = 32;

/// Messages sent with a 404 when the token cannot be used on the queried generation.
pub(crate) const INVALID_TOKEN_PHRASES: &[&str] =
    &["No data product found", "Invalid authentication"];

pub(crate) fn is_legacy_token(token: &str) -> bool {
    let token = token.trim();
    !token.is_empty() && token.len() <= LEGACY_TOKEN_MAX_LEN
}

pub(crate) fn legacy_parameters(request: &Request) -> Parameters {
    let mut params = Parameters::new();
    match request {
        Request::Zone(r) => {
            params.insert("countryCode", r.zone().to_string());
        }
        Request::Coordinates(r) => {
            params.insert("lat", r.lat().to_string());
            params.insert("lon", r.lon().to_string());
        }
    }
    params
}
