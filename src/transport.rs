//! The HTTP capability the client is built on.
//!
//! [`Transport`] is the whole contract: one GET with headers, query
//! parameters and a deadline, answering with a status and body text or a
//! transport-level error. [`HttpSession`] implements it over
//! `reqwest::blocking`; tests and embedders can supply their own.

use std::error::Error as _;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::request::Parameters;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS, connect, TLS or I/O failure.
    #[error("{0}")]
    Connection(String),

    #[error("session is closed")]
    Closed,
}

pub trait Transport: Send + Sync + fmt::Debug {
    fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &Parameters,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;

    /// Release the underlying resources. Later calls to `get` fail with
    /// [`TransportError::Closed`].
    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// Pooled HTTP session backed by `reqwest::blocking::Client`.
#[derive(Debug)]
pub struct HttpSession {
    http: Mutex<Option<HttpClient>>,
}

impl HttpSession {
    pub fn new() -> Result<Self, TransportError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("electricitymaps-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("electricitymaps-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| TransportError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::from_client(http))
    }

    /// Wrap an already configured client (proxies, TLS roots, ...).
    pub fn from_client(http: HttpClient) -> Self {
        Self {
            http: Mutex::new(Some(http)),
        }
    }

    fn client(&self) -> Option<HttpClient> {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for HttpSession {
    fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        params: &Parameters,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let http = self.client().ok_or(TransportError::Closed)?;

        let mut req = http.get(url).query(params).timeout(timeout);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req.send().map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }

    fn close(&self) {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn is_closed(&self) -> bool {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() || has_io_timeout(&err) {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

// Body reads report deadline expiry as an io::Error deep in the source chain.
fn has_io_timeout(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = e.source();
    }
    false
}
