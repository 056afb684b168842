//! Helio Additive API client
//!
//! An async client for the Helio Additive GraphQL API: thermal simulation
//! and G-code optimization for 3D printing, executed remotely as
//! long-running jobs.
//!
//! The crate has two load-bearing pieces:
//! - [`HelioClient`]: builds and sends single GraphQL operations, attaching
//!   the bearer token and normalizing responses into an envelope. It never
//!   retries.
//! - [`JobPoller`]: waits for a remote job to reach a terminal state and
//!   fetches the final result. All retry and backoff policy lives here.
//!
//! # Example
//!
//! ```no_run
//! use helio_client::{ClientConfig, HelioClient, JobPoller, PollConfig};
//! use helio_core::simulation::SimulationSettings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HelioClient::new(ClientConfig::new("hel_pat_..."))?;
//!
//!     let settings = SimulationSettings::from_temperatures(Some(60.0), Some(100.0));
//!     let handle = client.create_simulation("gcode-id", &settings).await?;
//!
//!     let poller = JobPoller::new(&client, PollConfig::default());
//!     let outcome = poller.await_completion(&handle).await?;
//!     println!("artifact: {:?}", outcome.artifact_url());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod catalog;
pub mod download;
pub mod error;
mod jobs;
pub mod optimize;
mod poller;
pub mod queries;
pub mod simulate;
pub mod upload;

pub use error::{ClientError, Result};
pub use jobs::JobApi;
pub use poller::{Backoff, JobPoller, PollConfig};

use helio_core::envelope::{Envelope, GraphqlError};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Default production endpoint.
pub const API_URL_GLOBAL: &str = "https://api.helioadditive.com/graphql";
/// Regional endpoint for mainland China.
pub const API_URL_CHINA: &str = "https://api.helioam.cn/graphql";
/// Environment variable overriding the endpoint.
pub const ENV_API_URL: &str = "HELIO_API_URL";

const CLIENT_NAME: &str = "RustClient";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
const TRACE_ID_HEADER: &str = "trace-id";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// A single GraphQL operation: document text plus variables.
///
/// Stateless; constructed per call. Variables are not validated locally --
/// a mismatch against the document's declared names surfaces as a populated
/// `errors` list from the server.
#[derive(Debug, Clone)]
pub struct Operation {
    document: &'static str,
    variables: Map<String, Value>,
}

impl Operation {
    pub fn new(document: &'static str) -> Self {
        Self {
            document,
            variables: Map::new(),
        }
    }

    /// Attach one variable.
    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn document(&self) -> &str {
        self.document
    }
}

/// Configuration for [`HelioClient`] construction.
///
/// Endpoint precedence, evaluated once at construction and immutable
/// afterwards: explicit [`ClientConfig::api_url`] > `HELIO_API_URL`
/// environment variable > [`API_URL_GLOBAL`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    token: String,
    api_url: Option<String>,
}

impl ClientConfig {
    /// Configuration with the given Personal Access Token and default
    /// endpoint resolution.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: None,
        }
    }

    /// Override the API endpoint explicitly, bypassing the environment
    /// variable and the compiled-in default.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }
}

/// Client for the Helio Additive GraphQL API.
///
/// Owns the resolved endpoint and credential; both are immutable for the
/// client's lifetime. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HelioClient {
    api_url: String,
    token: String,
    http: Client,
}

impl HelioClient {
    /// Create a client from the given configuration.
    ///
    /// Fails with [`ClientError::Config`] when the token is empty.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Self::with_http_client(config, http)
    }

    /// Create a client with a custom `reqwest::Client`, for callers that
    /// need to tune timeouts, proxies, or TLS settings.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(ClientError::Config(
                "access token must not be empty".to_string(),
            ));
        }
        let env_override = std::env::var(ENV_API_URL).ok();
        let api_url = resolve_api_url(config.api_url.as_deref(), env_override.as_deref());
        Ok(Self {
            api_url,
            token: config.token,
            http,
        })
    }

    /// The resolved endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Underlying HTTP client, shared with non-GraphQL transfers (presigned
    /// uploads, artifact downloads).
    pub(crate) fn http_client(&self) -> &Client {
        &self.http
    }

    /// Execute one GraphQL operation.
    ///
    /// Sends exactly one POST; never retries. Server-reported GraphQL errors
    /// come back inside the envelope, not as an `Err` -- only transport-level
    /// failures, auth rejection, rate limiting, and malformed bodies do.
    pub async fn execute(&self, operation: Operation) -> Result<Envelope> {
        debug!(url = %self.api_url, "sending GraphQL request");

        let payload = serde_json::json!({
            "query": operation.document,
            "variables": Value::Object(operation.variables),
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .header("HelioAdditive-Client-Name", CLIENT_NAME)
            .header("HelioAdditive-Client-Version", CLIENT_VERSION)
            .json(&payload)
            .send()
            .await?;

        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let status = response.status();
        let body = response.text().await?;

        decode_envelope(status, trace_id, &body)
    }

    /// Fetch the first `data` field of an operation, treating GraphQL-level
    /// errors as failures.
    ///
    /// Convenience for operations where partial results are not meaningful;
    /// workflows that must inspect partial data call [`execute`] directly.
    ///
    /// [`execute`]: HelioClient::execute
    pub(crate) async fn execute_for_data(
        &self,
        context: &str,
        operation: Operation,
    ) -> Result<Value> {
        let envelope = self.execute(operation).await?;
        if envelope.has_errors() {
            return Err(ClientError::protocol(
                format!("{context}: {}", envelope.error_summary()),
                envelope.trace_id,
            ));
        }
        envelope.data.ok_or_else(|| {
            ClientError::protocol(format!("{context}: response carried no data"), None)
        })
    }
}

/// Resolve the endpoint: explicit argument > environment override > default.
///
/// Blank values count as unset at both levels.
fn resolve_api_url(explicit: Option<&str>, env_override: Option<&str>) -> String {
    explicit
        .filter(|s| !s.trim().is_empty())
        .or(env_override.filter(|s| !s.trim().is_empty()))
        .unwrap_or(API_URL_GLOBAL)
        .to_string()
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Map an HTTP response onto the error taxonomy or a decoded envelope.
fn decode_envelope(status: StatusCode, trace_id: Option<String>, body: &str) -> Result<Envelope> {
    match status.as_u16() {
        401 | 403 => {
            return Err(ClientError::Auth {
                status: status.as_u16(),
                trace_id,
            });
        }
        429 => return Err(ClientError::RateLimit { trace_id }),
        _ if !status.is_success() => {
            return Err(ClientError::Transport {
                message: format!("HTTP {}: {}", status.as_u16(), truncate(body, 500)),
                trace_id,
            });
        }
        _ => {}
    }

    let wire: WireEnvelope = serde_json::from_str(body).map_err(|e| {
        ClientError::protocol(format!("response body is not JSON: {e}"), trace_id.clone())
    })?;

    if wire.data.is_none() && wire.errors.is_none() {
        return Err(ClientError::protocol(
            "response body is not a GraphQL envelope (no data or errors field)",
            trace_id,
        ));
    }

    Ok(Envelope {
        data: wire.data,
        errors: wire.errors.unwrap_or_default(),
        trace_id,
    })
}

pub(crate) fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Timestamped run name, e.g. `RustClient 2026-08-23T10:15:00`.
pub(crate) fn generate_run_name() -> String {
    format!(
        "{} {}",
        CLIENT_NAME,
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S")
    )
}
