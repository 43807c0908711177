use std::time::Duration;

use thiserror::Error;

/// Boxed underlying cause carried by some [`FetchError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Validation errors for configuration and domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("catalog endpoint cannot be empty")]
    EmptyEndpoint,
    #[error("catalog endpoint must be an http(s) URL: '{value}'")]
    InvalidEndpoint { value: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("provider allow-list must contain at least one provider")]
    EmptyAllowList,
}

/// Discriminant of [`FetchError`], usable as a map key or for matching
/// without borrowing the error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetchErrorKind {
    NetworkTimeout,
    ServerError,
    ParseError,
    NoCache,
    Aborted,
    NetworkError,
}

impl FetchErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkTimeout => "NETWORK_TIMEOUT",
            Self::ServerError => "SERVER_ERROR",
            Self::ParseError => "PARSE_ERROR",
            Self::NoCache => "NO_CACHE",
            Self::Aborted => "ABORTED",
            Self::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a remote fetch or a cache read.
///
/// This is the only error type that crosses the `modelsync-core` boundary
/// for fetch, retry and cache operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The per-attempt deadline elapsed before a response arrived.
    #[error("{message}")]
    NetworkTimeout { message: String, timeout: Duration },

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    ServerError { message: String, status: u16 },

    /// A payload (remote body or cached snapshot) could not be decoded.
    #[error("{message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// No usable cached snapshot exists.
    #[error("{message}")]
    NoCache {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The caller cancelled the operation.
    #[error("{message}")]
    Aborted { message: String },

    /// Transport-level failure: DNS, connect, reset, unreadable body.
    #[error("{message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl FetchError {
    pub fn timeout(timeout: Duration) -> Self {
        Self::NetworkTimeout {
            message: format!("request timed out ({}ms)", timeout.as_millis()),
            timeout,
        }
    }

    pub fn server(status: u16) -> Self {
        Self::ServerError {
            message: format!("server responded with status {status}"),
            status,
        }
    }

    pub fn parse(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ParseError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn no_cache(message: impl Into<String>) -> Self {
        Self::NoCache {
            message: message.into(),
            source: None,
        }
    }

    pub fn no_cache_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::NoCache {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn aborted() -> Self {
        Self::Aborted {
            message: String::from("request was cancelled"),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    pub fn network_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::NetworkTimeout { .. } => FetchErrorKind::NetworkTimeout,
            Self::ServerError { .. } => FetchErrorKind::ServerError,
            Self::ParseError { .. } => FetchErrorKind::ParseError,
            Self::NoCache { .. } => FetchErrorKind::NoCache,
            Self::Aborted { .. } => FetchErrorKind::Aborted,
            Self::NetworkError { .. } => FetchErrorKind::NetworkError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NetworkTimeout { message, .. }
            | Self::ServerError { message, .. }
            | Self::ParseError { message, .. }
            | Self::NoCache { message, .. }
            | Self::Aborted { message }
            | Self::NetworkError { message, .. } => message,
        }
    }

    /// HTTP status of a [`FetchError::ServerError`].
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable machine-readable code, e.g. `NETWORK_TIMEOUT`.
    pub const fn code(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Returned when neither the remote endpoint nor the cache produced data.
///
/// The display message is deliberately generic; the classified errors of
/// both tiers are kept for diagnostics.
#[derive(Debug, Error)]
#[error("no usable provider data from any source; check the network connection")]
pub struct SyncFailure {
    #[source]
    remote: FetchError,
    cache: FetchError,
}

impl SyncFailure {
    pub fn new(remote: FetchError, cache: FetchError) -> Self {
        Self { remote, cache }
    }

    pub fn remote_error(&self) -> &FetchError {
        &self.remote
    }

    pub fn cache_error(&self) -> &FetchError {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn timeout_message_carries_the_deadline() {
        let error = FetchError::timeout(Duration::from_millis(1_500));

        assert_eq!(error.to_string(), "request timed out (1500ms)");
        assert_eq!(error.kind(), FetchErrorKind::NetworkTimeout);
        assert_eq!(error.code(), "NETWORK_TIMEOUT");
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn server_error_exposes_status() {
        let error = FetchError::server(503);

        assert_eq!(error.status_code(), Some(503));
        assert_eq!(error.message(), "server responded with status 503");
    }

    #[test]
    fn parse_error_keeps_its_source() {
        let cause = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let error = FetchError::parse("catalog body is not valid JSON", cause);

        assert_eq!(error.kind(), FetchErrorKind::ParseError);
        assert!(error.source().is_some());
    }

    #[test]
    fn sync_failure_hides_details_behind_generic_message() {
        let failure = SyncFailure::new(
            FetchError::network("connection refused"),
            FetchError::no_cache("no cached provider data"),
        );

        assert_eq!(
            failure.to_string(),
            "no usable provider data from any source; check the network connection"
        );
        assert_eq!(failure.remote_error().kind(), FetchErrorKind::NetworkError);
        assert_eq!(failure.cache_error().kind(), FetchErrorKind::NoCache);
    }
}
