//! A small blocking Rust client for the Electricity Maps API.
//!
//! Query carbon intensity and power breakdown for a grid zone, either by zone
//! code or by coordinates, and list the zones the API covers.
//!
//! ## Quick start
//! - Configure authentication via environment variables (`ELECTRICITYMAPS_TOKEN`,
//!   optionally `ELECTRICITYMAPS_URL`) or a `.electricitymapsrc` file (supported in the
//!   current directory and in your home directory), or pass the token directly.
//! - Call one of the [`Client`] operations with a [`ZoneRequest`] or a [`CoordinatesRequest`].
//!
//! ```no_run
//! use anyhow::Result;
//! use electricitymaps::{Client, CoordinatesRequest, ZoneRequest};
//!
//! fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!
//!     let latest = client.latest_carbon_intensity(ZoneRequest::new("DE"))?;
//!     println!("{} gCO2eq/kWh", latest.carbon_intensity().carbon_intensity());
//!
//!     let simple = client.carbon_intensity_for_home_assistant(
//!         CoordinatesRequest::new("53.1357012", "8.2024685"),
//!     )?;
//!     println!("{}: {}", simple.country_code(), simple.data().carbon_intensity());
//!     Ok(())
//! }
//! ```
//!
//! Every operation returns either a fully decoded response or exactly one
//! [`Error`] variant.

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod legacy;
pub mod models;
mod request;
pub mod transport;
mod util;

pub use client::{API_BASE_URL, Client, ClientConfig};
pub use error::{Error, ErrorKind, Result};
pub use models::{
    CarbonIntensity, CarbonIntensityHistory, Decode, HomeAssistantCarbonIntensityResponse,
    LatestCarbonIntensity, LatestPowerBreakdown, PowerBreakdown, PowerBreakdownHistory, Zone,
    ZonesResponse,
};
pub use request::{CoordinatesRequest, Parameters, Request, ZoneCase, ZoneRequest};
pub use transport::{HttpResponse, HttpSession, Transport, TransportError};
