//! Error types for the Helio client

use std::time::Duration;

use helio_core::job::JobStatus;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the Helio API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure or a non-2xx status outside the GraphQL envelope
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        trace_id: Option<String>,
    },

    /// HTTP 401/403 - the access token is invalid or expired
    #[error("authentication rejected (HTTP {status}) - check your access token")]
    Auth { status: u16, trace_id: Option<String> },

    /// HTTP 429 - quota exceeded or rate limited; back off before retrying
    #[error("rate limited by the API (HTTP 429)")]
    RateLimit { trace_id: Option<String> },

    /// Response body is not a valid GraphQL envelope, or the server reported
    /// a value outside the documented contract
    #[error("protocol error: {message}")]
    Protocol {
        message: String,
        trace_id: Option<String>,
    },

    /// Remote job reached FAILED or CANCELLED
    #[error("job ended as {status:?}: {reason}")]
    JobFailed {
        status: JobStatus,
        reason: String,
        trace_id: Option<String>,
    },

    /// Uploaded G-code was rejected during server-side processing
    #[error("gcode rejected: {reason}")]
    GcodeRejected {
        reason: String,
        trace_id: Option<String>,
    },

    /// Client gave up waiting; the remote job may still be running
    #[error("gave up polling after {waited:?} (limit {max_wait:?}); remote job not cancelled")]
    PollTimeout { waited: Duration, max_wait: Duration },

    /// Credential or endpoint resolution failed
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a transport error from a message, without a trace id.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            trace_id: None,
        }
    }

    /// Create a protocol error from a message and optional trace id.
    pub fn protocol(message: impl Into<String>, trace_id: Option<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            trace_id,
        }
    }

    /// True for failures that may succeed on a later attempt (network blips,
    /// rate limiting). The poller's opt-in retry uses this classification.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::RateLimit { .. })
    }

    /// Trace id for correlating with server-side logs, when one was captured.
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::Transport { trace_id, .. }
            | Self::Auth { trace_id, .. }
            | Self::RateLimit { trace_id }
            | Self::Protocol { trace_id, .. }
            | Self::JobFailed { trace_id, .. }
            | Self::GcodeRejected { trace_id, .. } => trace_id.as_deref(),
            Self::PollTimeout { .. } | Self::Config(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            trace_id: None,
        }
    }
}
