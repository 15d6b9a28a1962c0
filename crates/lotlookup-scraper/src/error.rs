use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::browser::DriverError;

/// Errors from the Copart structured lot-detail endpoint.
#[derive(Debug, Error)]
pub enum CopartError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid Copart base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed payload from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },

    #[error("Copart reports no lot {lot}")]
    LotNotFound { lot: String },
}

/// Fatal errors from a rendered-page extraction.
///
/// Field-level read failures never show up here; they become absent fields.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browser session unavailable: {0}")]
    SessionUnavailable(#[source] DriverError),

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("{url} did not render lot data within {}ms", .waited.as_millis())]
    Timeout { url: String, waited: Duration },
}

/// Stable, machine-readable category of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnrecognizedInput,
    MalformedIdentifier,
    UpstreamUnavailable,
    LotNotFound,
    RenderTimeout,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedInput => "unrecognized_input",
            ErrorKind::MalformedIdentifier => "malformed_identifier",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::LotNotFound => "lot_not_found",
            ErrorKind::RenderTimeout => "render_timeout",
        }
    }

    /// Whether a caller may reasonably retry the same input later.
    #[must_use]
    pub fn is_retriable(self) -> bool {
        matches!(
            self,
            ErrorKind::UpstreamUnavailable | ErrorKind::RenderTimeout
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only error type [`crate::Pipeline::resolve`] returns.
///
/// Each variant carries a human-readable detail. Conversions from component
/// errors live in [`crate::pipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("{0}")]
    UnrecognizedInput(String),

    #[error("{0}")]
    MalformedIdentifier(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("lot not found: {0}")]
    LotNotFound(String),

    #[error("render timeout: {0}")]
    RenderTimeout(String),
}

impl PipelineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::UnrecognizedInput(_) => ErrorKind::UnrecognizedInput,
            PipelineError::MalformedIdentifier(_) => ErrorKind::MalformedIdentifier,
            PipelineError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            PipelineError::LotNotFound(_) => ErrorKind::LotNotFound,
            PipelineError::RenderTimeout(_) => ErrorKind::RenderTimeout,
        }
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            PipelineError::UnrecognizedInput(d)
            | PipelineError::MalformedIdentifier(d)
            | PipelineError::UpstreamUnavailable(d)
            | PipelineError::LotNotFound(d)
            | PipelineError::RenderTimeout(d) => d,
        }
    }
}
