use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::load_config;
use crate::error::{ApiGeneration, Error, Result, StatusOutcome, classify_status};
use crate::legacy::{LEGACY_API_BASE_URL, LEGACY_LATEST, is_legacy_token, legacy_parameters};
use crate::models::{
    CarbonIntensityHistory, Decode, HomeAssistantCarbonIntensityResponse, LatestCarbonIntensity,
    LatestPowerBreakdown, PowerBreakdownHistory, Zone, ZonesResponse,
};
use crate::request::{Parameters, Request, ZoneCase};
use crate::transport::{HttpSession, Transport, TransportError};
use crate::util::{truncate, urljoin};

/// Base URL of the current API generation.
pub const API_BASE_URL: &str = "https://api.electricitymaps.com/v3";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const AUTH_HEADER: &str = "auth-token";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, typically `https://api.electricitymaps.com/v3`.
    pub url: String,
    /// API token sent as `auth-token`.
    pub token: String,
    /// Deadline for a single request.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    path: &'static str,
    generation: ApiGeneration,
    authenticated: bool,
    /// Whether a 404 "no data product" answer may switch the client to the
    /// legacy generation and retry.
    legacy_equivalent: bool,
}

impl Endpoint {
    const fn current(path: &'static str) -> Self {
        Self {
            path,
            generation: ApiGeneration::Current,
            authenticated: true,
            legacy_equivalent: false,
        }
    }
}

const HOME_ASSISTANT: Endpoint = Endpoint {
    legacy_equivalent: true,
    ..Endpoint::current("/home-assistant")
};
const LEGACY_HOME_ASSISTANT: Endpoint = Endpoint {
    generation: ApiGeneration::Legacy,
    ..Endpoint::current(LEGACY_LATEST)
};
const ZONES: Endpoint = Endpoint {
    authenticated: false,
    ..Endpoint::current("/zones")
};
const CARBON_INTENSITY_LATEST: Endpoint = Endpoint::current("/carbon-intensity/latest");
const CARBON_INTENSITY_HISTORY: Endpoint = Endpoint::current("/carbon-intensity/history");
const POWER_BREAKDOWN_LATEST: Endpoint = Endpoint::current("/power-breakdown/latest");
const POWER_BREAKDOWN_HISTORY: Endpoint = Endpoint::current("/power-breakdown/history");

/// What a single request produced, before decoding.
#[derive(Debug)]
enum Outcome {
    Body(String),
    /// The token was refused by the current API; the client switched to the
    /// legacy generation and the call should be issued once more.
    RetryOnLegacy,
}

#[derive(Debug)]
enum SessionSlot {
    Empty,
    /// Created by the client on first use; closed by [`Client::close`].
    Owned(Arc<dyn Transport>),
    /// Supplied by the caller; never closed by the client.
    Borrowed(Arc<dyn Transport>),
}

/// Blocking client for the Electricity Maps API.
///
/// The HTTP session is created lazily on the first request unless one was
/// supplied with [`Client::with_session`]. A session the client created
/// itself is closed by [`Client::close`] or when the client is dropped; a
/// supplied session is left open.
///
/// ```no_run
/// use electricitymaps::{Client, ZoneRequest};
///
/// # fn main() -> Result<(), electricitymaps::Error> {
/// let client = Client::new("my-api-token");
/// let latest = client.latest_carbon_intensity(ZoneRequest::new("DE"))?;
/// println!("{} gCO2eq/kWh", latest.carbon_intensity().carbon_intensity());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    url: String,
    legacy_url: String,
    token: String,

    timeout: Duration,
    zone_case: ZoneCase,
    legacy_fallback: bool,

    legacy: AtomicBool,
    session: Mutex<SessionSlot>,
}

impl Client {
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_config(ClientConfig {
            url: API_BASE_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_config(cfg: ClientConfig) -> Self {
        let legacy = is_legacy_token(&cfg.token);
        Self {
            url: cfg.url,
            legacy_url: LEGACY_API_BASE_URL.to_string(),
            token: cfg.token,
            timeout: cfg.timeout,
            zone_case: ZoneCase::default(),
            legacy_fallback: true,
            legacy: AtomicBool::new(legacy),
            session: Mutex::new(SessionSlot::Empty),
        }
    }

    /// Creates a client using environment variables and/or `.electricitymapsrc`.
    ///
    /// This is equivalent to `Client::from_parts(None, None, None)`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_parts(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`token`/`timeout` arguments
    /// - environment variables `ELECTRICITYMAPS_URL` / `ELECTRICITYMAPS_TOKEN` / `ELECTRICITYMAPS_TIMEOUT`
    /// - config file from `ELECTRICITYMAPS_RC` or `.electricitymapsrc`
    pub fn from_parts(
        url: Option<String>,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        Ok(Self::from_config(load_config(url, token, timeout)?))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a caller-owned session. The client never closes it.
    pub fn with_session(mut self, session: Arc<dyn Transport>) -> Self {
        let slot = self
            .session
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let SessionSlot::Owned(previous) = &*slot {
            previous.close();
        }
        *slot = SessionSlot::Borrowed(session);
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_legacy_url(mut self, url: impl Into<String>) -> Self {
        self.legacy_url = url.into();
        self
    }

    pub fn with_zone_case(mut self, zone_case: ZoneCase) -> Self {
        self.zone_case = zone_case;
        self
    }

    /// Enable or disable the legacy API generation. When disabled, short
    /// tokens are not treated as legacy and a rejected token is never retried.
    pub fn with_legacy_fallback(mut self, enabled: bool) -> Self {
        self.legacy_fallback = enabled;
        self.legacy = AtomicBool::new(enabled && is_legacy_token(&self.token));
        self
    }

    /// Whether requests for the home-assistant shape go to the legacy API.
    pub fn is_legacy(&self) -> bool {
        self.legacy.load(Ordering::SeqCst)
    }

    /// The session in use, if one has been supplied or created.
    pub fn session(&self) -> Option<Arc<dyn Transport>> {
        match &*self.lock_session() {
            SessionSlot::Empty => None,
            SessionSlot::Owned(s) | SessionSlot::Borrowed(s) => Some(Arc::clone(s)),
        }
    }

    /// Simplified carbon intensity for a zone or a position.
    ///
    /// Uses the legacy `/latest` endpoint for legacy tokens, and switches to
    /// it once if the current API refuses the token with a "no data product"
    /// 404.
    pub fn carbon_intensity_for_home_assistant(
        &self,
        request: impl Into<Request>,
    ) -> Result<HomeAssistantCarbonIntensityResponse> {
        let request = request.into().normalized(self.zone_case);
        let body = self.retry_on_legacy(|| {
            let endpoint = if self.is_legacy() {
                LEGACY_HOME_ASSISTANT
            } else {
                HOME_ASSISTANT
            };
            self.execute(endpoint, Some(&request))
        })?;
        HomeAssistantCarbonIntensityResponse::from_json(&body)
    }

    pub fn latest_carbon_intensity(
        &self,
        request: impl Into<Request>,
    ) -> Result<LatestCarbonIntensity> {
        let request = request.into().normalized(self.zone_case);
        let body = self.fetch(CARBON_INTENSITY_LATEST, Some(&request))?;
        LatestCarbonIntensity::from_json(&body)
    }

    /// Hourly carbon intensity for the past 24 hours.
    pub fn carbon_intensity_history(
        &self,
        request: impl Into<Request>,
    ) -> Result<CarbonIntensityHistory> {
        let request = request.into().normalized(self.zone_case);
        let body = self.fetch(CARBON_INTENSITY_HISTORY, Some(&request))?;
        CarbonIntensityHistory::from_json(&body)
    }

    pub fn latest_power_breakdown(
        &self,
        request: impl Into<Request>,
    ) -> Result<LatestPowerBreakdown> {
        let request = request.into().normalized(self.zone_case);
        let body = self.fetch(POWER_BREAKDOWN_LATEST, Some(&request))?;
        LatestPowerBreakdown::from_json(&body)
    }

    /// Hourly power breakdown for the past 24 hours.
    pub fn power_breakdown_history(
        &self,
        request: impl Into<Request>,
    ) -> Result<PowerBreakdownHistory> {
        let request = request.into().normalized(self.zone_case);
        let body = self.fetch(POWER_BREAKDOWN_HISTORY, Some(&request))?;
        PowerBreakdownHistory::from_json(&body)
    }

    /// All zones the API knows about. No token is sent.
    pub fn zones(&self) -> Result<BTreeMap<String, Zone>> {
        let body = self.fetch(ZONES, None)?;
        Ok(ZonesResponse::from_json(&body)?.into_zones())
    }

    /// Close the session if the client created it. Supplied sessions stay open.
    pub fn close(&self) {
        if let SessionSlot::Owned(session) = &*self.lock_session() {
            if !session.is_closed() {
                debug!("Closing owned HTTP session");
                session.close();
            }
        }
    }

    fn fetch(&self, endpoint: Endpoint, request: Option<&Request>) -> Result<String> {
        match self.execute(endpoint, request)? {
            Outcome::Body(body) => Ok(body),
            Outcome::RetryOnLegacy => Err(Error::InvalidToken(format!(
                "token rejected by {}",
                endpoint.path
            ))),
        }
    }

    /// Run `call`, and run it exactly once more if it asked for a legacy retry.
    fn retry_on_legacy<F>(&self, call: F) -> Result<String>
    where
        F: Fn() -> Result<Outcome>,
    {
        match call()? {
            Outcome::Body(body) => Ok(body),
            Outcome::RetryOnLegacy => match call()? {
                Outcome::Body(body) => Ok(body),
                Outcome::RetryOnLegacy => Err(Error::InvalidToken(
                    "token rejected by both API generations".to_string(),
                )),
            },
        }
    }

    fn execute(&self, endpoint: Endpoint, request: Option<&Request>) -> Result<Outcome> {
        let session = self.ensure_session()?;

        let base = match endpoint.generation {
            ApiGeneration::Current => &self.url,
            ApiGeneration::Legacy => &self.legacy_url,
        };
        let url = urljoin(base, endpoint.path);

        let headers: Vec<(&str, &str)> = if endpoint.authenticated {
            vec![(AUTH_HEADER, self.token.as_str())]
        } else {
            Vec::new()
        };

        let params = match (request, endpoint.generation) {
            (Some(r), ApiGeneration::Current) => r.parameters(),
            (Some(r), ApiGeneration::Legacy) => legacy_parameters(r),
            (None, _) => Parameters::new(),
        };

        debug!("Doing request: GET {} params={:?}", url, params);

        let response = session
            .get(&url, &headers, &params, self.timeout)
            .map_err(|e| match e {
                TransportError::Timeout(msg) => Error::ConnectionTimeout(format!(
                    "no response from {} within {:?}: {}",
                    url, self.timeout, msg
                )),
                TransportError::Connection(msg) => Error::Connection(format!(
                    "Unknown error occurred while fetching data from {}: {}",
                    url, msg
                )),
                TransportError::Closed => Error::Connection("HTTP session is closed".to_string()),
            })?;

        debug!(
            "Got response with status {} and body: {}",
            response.status,
            truncate(&response.body, 1000)
        );

        match classify_status(endpoint.generation, response.status, &url, &response.body) {
            StatusOutcome::Success => Ok(Outcome::Body(response.body)),
            StatusOutcome::TokenRejectedByMessage(message) => {
                if endpoint.legacy_equivalent && self.legacy_fallback {
                    // A concurrent call may have switched already; retry either way.
                    if !self.legacy.swap(true, Ordering::SeqCst) {
                        warn!("Token refused by {} ({}), switching to legacy API", url, message);
                    }
                    return Ok(Outcome::RetryOnLegacy);
                }
                Err(Error::InvalidToken(message))
            }
            StatusOutcome::Failure(err) => Err(err),
        }
    }

    fn ensure_session(&self) -> Result<Arc<dyn Transport>> {
        let mut slot = self.lock_session();
        match &*slot {
            SessionSlot::Owned(s) | SessionSlot::Borrowed(s) => return Ok(Arc::clone(s)),
            SessionSlot::Empty => {}
        }

        debug!("Creating owned HTTP session");
        let session: Arc<dyn Transport> =
            Arc::new(HttpSession::new().map_err(|e| Error::Connection(e.to_string()))?);
        *slot = SessionSlot::Owned(Arc::clone(&session));
        Ok(session)
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, SessionSlot> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}
