use reqwest::StatusCode;

use crate::legacy::INVALID_TOKEN_PHRASES;
use crate::util::truncate;

/// Everything that can go wrong while talking to the Electricity Maps API.
///
/// Every failure surfaces as exactly one variant, so `Result<_, Error>` is the
/// single "any error from this crate" type. Use [`Error::kind`] when only the
/// category matters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Anything not covered below, e.g. an unexpected `status` in a response.
    #[error("{0}")]
    Generic(String),

    /// Transport failure, or an HTTP error status without a more specific meaning.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request did not complete before its deadline.
    #[error("connection timed out: {0}")]
    ConnectionTimeout(String),

    /// The API rejected the token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The API answered, but has no data for the queried location.
    #[error("no data: {0}")]
    NoData(String),

    /// The body was not valid JSON or did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Fieldless mirror of [`Error`] for coarse branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Generic,
    Connection,
    ConnectionTimeout,
    InvalidToken,
    NoData,
    Decode,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Generic(_) => ErrorKind::Generic,
            Error::Connection(_) => ErrorKind::Connection,
            Error::ConnectionTimeout(_) => ErrorKind::ConnectionTimeout,
            Error::InvalidToken(_) => ErrorKind::InvalidToken,
            Error::NoData(_) => ErrorKind::NoData,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Which generation of the API answered. Token rejection is signalled
/// differently by each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiGeneration {
    /// `/v3` endpoints: 401, or 404 with a known message.
    Current,
    /// co2signal-style `/latest`: 401 or 403, or 404 with a known message.
    Legacy,
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
    // Some endpoints respond with {"error": ...}
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl ApiErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

/// Result of looking at an HTTP status before any decoding happens.
#[derive(Debug)]
pub(crate) enum StatusOutcome {
    /// 2xx/3xx: hand the body to the decoder.
    Success,
    /// 404 whose message says the token has no data product / is not
    /// authenticated. The caller decides between a legacy retry and
    /// [`Error::InvalidToken`].
    TokenRejectedByMessage(String),
    Failure(Error),
}

pub(crate) fn classify_status(
    generation: ApiGeneration,
    status: u16,
    url: &str,
    body: &str,
) -> StatusOutcome {
    if (200..400).contains(&status) {
        return StatusOutcome::Success;
    }

    let parsed = ApiErrorBody::parse(body);
    let detail = parsed
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| truncate(body, 200));

    let rejected_by_status = match generation {
        ApiGeneration::Current => status == StatusCode::UNAUTHORIZED.as_u16(),
        ApiGeneration::Legacy => {
            status == StatusCode::UNAUTHORIZED.as_u16() || status == StatusCode::FORBIDDEN.as_u16()
        }
    };
    if rejected_by_status {
        return StatusOutcome::Failure(Error::InvalidToken(format!(
            "HTTP {} for url ({}) {}",
            status, url, detail
        )));
    }

    if status == StatusCode::NOT_FOUND.as_u16() {
        if let Some(message) = parsed.message.as_deref() {
            if INVALID_TOKEN_PHRASES.iter().any(|p| message.contains(p)) {
                return StatusOutcome::TokenRejectedByMessage(message.to_string());
            }
        }
    }

    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    StatusOutcome::Failure(Error::Connection(format!(
        "HTTP {} {} for url ({}) {}",
        status, reason, url, detail
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure_kind(outcome: StatusOutcome) -> Option<ErrorKind> {
        match outcome {
            StatusOutcome::Failure(e) => Some(e.kind()),
            _ => None,
        }
    }

    #[test]
    fn success_range_includes_redirects() {
        assert!(matches!(
            classify_status(ApiGeneration::Current, 200, "u", ""),
            StatusOutcome::Success
        ));
        assert!(matches!(
            classify_status(ApiGeneration::Current, 304, "u", ""),
            StatusOutcome::Success
        ));
    }

    #[test]
    fn unauthorized_is_invalid_token_on_both_generations() {
        for generation in [ApiGeneration::Current, ApiGeneration::Legacy] {
            assert_eq!(
                failure_kind(classify_status(generation, 401, "u", "")),
                Some(ErrorKind::InvalidToken)
            );
        }
    }

    #[test]
    fn forbidden_is_invalid_token_only_on_legacy() {
        assert_eq!(
            failure_kind(classify_status(ApiGeneration::Legacy, 403, "u", "")),
            Some(ErrorKind::InvalidToken)
        );
        assert_eq!(
            failure_kind(classify_status(ApiGeneration::Current, 403, "u", "")),
            Some(ErrorKind::Connection)
        );
    }

    #[test]
    fn not_found_with_known_message_is_token_rejection() {
        let body = r#"{"message":"No data product found for this token"}"#;
        match classify_status(ApiGeneration::Current, 404, "u", body) {
            StatusOutcome::TokenRejectedByMessage(m) => assert!(m.contains("No data product")),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let body = r#"{"message":"Invalid authentication credentials"}"#;
        assert!(matches!(
            classify_status(ApiGeneration::Legacy, 404, "u", body),
            StatusOutcome::TokenRejectedByMessage(_)
        ));
    }

    #[test]
    fn plain_not_found_is_connection_error() {
        let body = r#"{"message":"Zone XX does not exist"}"#;
        assert_eq!(
            failure_kind(classify_status(ApiGeneration::Current, 404, "u", body)),
            Some(ErrorKind::Connection)
        );
        assert_eq!(
            failure_kind(classify_status(ApiGeneration::Current, 404, "u", "not json")),
            Some(ErrorKind::Connection)
        );
    }

    #[test]
    fn server_error_is_connection_error_with_detail() {
        match classify_status(ApiGeneration::Current, 500, "http://x/y", "Boooom!") {
            StatusOutcome::Failure(Error::Connection(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("http://x/y"));
                assert!(msg.contains("Boooom!"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Error::NoData("x".into()).kind(), ErrorKind::NoData);
        assert_eq!(Error::Decode("x".into()).kind(), ErrorKind::Decode);
        assert_eq!(Error::Generic("x".into()).kind(), ErrorKind::Generic);
    }
}
