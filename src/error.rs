//! Error types for geminius.
//!
//! One enum covers every failure in the crate.  [`Error::Configuration`] is the only variant that
//! is raised before a conversation can start; [`Error::Validation`] and [`Error::Io`] come from
//! local input.  Everything else is a failure talking to the remote model service and is caught
//! at the turn boundary.

use std::error;
use std::fmt;
use std::io;
use std::str::Utf8Error;
use std::sync::Arc;

type Source = Arc<dyn error::Error + Send + Sync>;

/// The main error type for geminius.
#[derive(Clone, Debug)]
pub enum Error {
    /// An error status the service reported that has no dedicated variant.
    Api {
        /// HTTP status code, or the `code` of an error delivered inside a stream.
        status_code: u16,
        /// The service's status name, e.g. `INVALID_ARGUMENT` or `RESOURCE_EXHAUSTED`.
        status: Option<String>,
        /// Human-readable error message.
        message: String,
        /// Request ID, when the response carried one.
        request_id: Option<String>,
    },

    /// The API key is missing or unusable.
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// The service refused to answer because of a safety or policy filter.
    Blocked {
        /// The block or finish reason reported by the service.
        reason: String,
    },

    /// The key was rejected (401).
    Authentication { message: String },

    /// The key may not use this model or method (403).
    Permission { message: String },

    /// The model or method does not exist (404).
    NotFound { message: String },

    /// Quota exhausted (429).
    RateLimit {
        message: String,
        /// Seconds to wait, from the `retry-after` header.
        retry_after: Option<u64>,
    },

    /// The request was malformed (400).  Gemini also reports invalid API keys this way.
    BadRequest { message: String },

    /// The request or stream took longer than the client timeout.
    Timeout {
        message: String,
        /// The configured timeout in seconds.
        duration: Option<f64>,
    },

    /// The service could not be reached.
    Connection {
        message: String,
        source: Option<Source>,
    },

    /// The service failed (500).
    InternalServer {
        message: String,
        request_id: Option<String>,
    },

    /// The service is overloaded or a gateway failed (502-504).
    ServiceUnavailable {
        message: String,
        retry_after: Option<u64>,
    },

    /// A body or stream chunk was not the JSON we expected, or a transcript could not be written.
    Serialization {
        message: String,
        source: Option<Source>,
    },

    /// A local file could not be read or written.
    Io {
        message: String,
        source: Arc<io::Error>,
    },

    /// The HTTP client failed outside of connecting or timing out.
    HttpClient {
        message: String,
        source: Option<Source>,
    },

    /// User input was rejected before anything was sent.
    Validation {
        message: String,
        /// The offending value, e.g. the uploaded path.
        param: Option<String>,
    },

    /// The base URL or an endpoint could not be built.
    Url {
        message: String,
        source: Option<url::ParseError>,
    },

    /// The response stream broke after it started.
    Streaming {
        message: String,
        source: Option<Source>,
    },

    /// A stream event was not valid UTF-8.
    Encoding {
        message: String,
        source: Option<Source>,
    },
}

impl Error {
    /// Creates a new API error.
    pub fn api(
        status_code: u16,
        status: Option<String>,
        message: String,
        request_id: Option<String>,
    ) -> Self {
        Error::Api {
            status_code,
            status,
            message,
            request_id,
        }
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new blocked-content error.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Error::Blocked {
            reason: reason.into(),
        }
    }

    /// Creates a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    /// Creates a new permission error.
    pub fn permission(message: impl Into<String>) -> Self {
        Error::Permission {
            message: message.into(),
        }
    }

    /// Creates a new not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Error::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new internal server error.
    pub fn internal_server(message: impl Into<String>, request_id: Option<String>) -> Self {
        Error::InternalServer {
            message: message.into(),
            request_id,
        }
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Error::ServiceUnavailable {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new streaming error.
    pub fn streaming(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Streaming {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new encoding error.
    pub fn encoding(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Encoding {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Returns true if the client could not be configured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Returns true if the service blocked the prompt or the response.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Error::Blocked { .. })
    }

    /// Returns true if this error came from obtaining or streaming a response.
    pub fn is_remote_service(&self) -> bool {
        !matches!(
            self,
            Error::Configuration { .. } | Error::Validation { .. } | Error::Io { .. }
        )
    }

    /// Returns true if this error is a bad request.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::BadRequest { .. })
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if the service itself failed.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Error::InternalServer { .. } | Error::ServiceUnavailable { .. }
        )
    }

    /// Returns true if the same request might succeed later.
    ///
    /// Turns are never retried automatically; this only helps callers word their notices.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status_code, .. } => matches!(status_code, 408 | 429 | 500..=599),
            Error::Timeout { .. }
            | Error::Connection { .. }
            | Error::RateLimit { .. }
            | Error::ServiceUnavailable { .. }
            | Error::InternalServer { .. } => true,
            _ => false,
        }
    }

    /// Returns true if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns the request ID associated with this error, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Api { request_id, .. } | Error::InternalServer { request_id, .. } => {
                request_id.as_deref()
            }
            _ => None,
        }
    }

    /// Returns the status code of an [`Error::Api`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

fn with_retry_after(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    message: &str,
    retry_after: &Option<u64>,
) -> fmt::Result {
    match retry_after {
        Some(secs) => write!(f, "{prefix}: {message} (retry after {secs} seconds)"),
        None => write!(f, "{prefix}: {message}"),
    }
}

fn with_request_id(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    message: &str,
    request_id: &Option<String>,
) -> fmt::Result {
    match request_id {
        Some(id) => write!(f, "{prefix}: {message} (Request ID: {id})"),
        None => write!(f, "{prefix}: {message}"),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status,
                message,
                request_id,
                ..
            } => with_request_id(f, status.as_deref().unwrap_or("API error"), message, request_id),
            Error::Configuration { message } => write!(f, "Configuration error: {message}"),
            Error::Blocked { reason } => write!(f, "Response blocked: {reason}"),
            Error::Authentication { message } => write!(f, "Authentication error: {message}"),
            Error::Permission { message } => write!(f, "Permission error: {message}"),
            Error::NotFound { message } => write!(f, "Not found: {message}"),
            Error::RateLimit {
                message,
                retry_after,
            } => with_retry_after(f, "Rate limit exceeded", message, retry_after),
            Error::BadRequest { message } => write!(f, "Bad request: {message}"),
            Error::Timeout { message, duration } => match duration {
                Some(duration) => write!(f, "Timeout error: {message} ({duration} seconds)"),
                None => write!(f, "Timeout error: {message}"),
            },
            Error::Connection { message, .. } => write!(f, "Connection error: {message}"),
            Error::InternalServer {
                message,
                request_id,
            } => with_request_id(f, "Internal server error", message, request_id),
            Error::ServiceUnavailable {
                message,
                retry_after,
            } => with_retry_after(f, "Service unavailable", message, retry_after),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {message}"),
            Error::Io { message, .. } => write!(f, "I/O error: {message}"),
            Error::HttpClient { message, .. } => write!(f, "HTTP client error: {message}"),
            Error::Validation { message, param } => match param {
                Some(param) => write!(f, "Validation error: {message} ({param})"),
                None => write!(f, "Validation error: {message}"),
            },
            Error::Url { message, .. } => write!(f, "URL error: {message}"),
            Error::Streaming { message, .. } => write!(f, "Streaming error: {message}"),
            Error::Encoding { message, .. } => write!(f, "Encoding error: {message}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. }
            | Error::Serialization { source, .. }
            | Error::HttpClient { source, .. }
            | Error::Streaming { source, .. }
            | Error::Encoding { source, .. } => source
                .as_deref()
                .map(|e| e as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => source.as_ref().map(|e| e as &(dyn error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::encoding(format!("UTF-8 error: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for geminius operations.
pub type Result<T> = std::result::Result<T, Error>;
