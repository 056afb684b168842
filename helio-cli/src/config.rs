//! Configuration module
//!
//! Carries the global CLI options down to the command handlers and builds
//! the configured API client.

use anyhow::{Context, Result};
use helio_client::{ClientConfig, HelioClient, auth};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit API endpoint override, if given
    pub api_url: Option<String>,
    /// Explicit access token, if given
    pub token: Option<String>,
}

impl Config {
    /// Build an API client from the global options.
    ///
    /// The token falls back to `HELIO_PAT` and `~/.helio_config`; the
    /// endpoint falls back to `HELIO_API_URL` and the global default.
    pub fn client(&self) -> Result<HelioClient> {
        let token =
            auth::resolve_token(self.token.as_deref()).context("Failed to resolve access token")?;
        let mut config = ClientConfig::new(token);
        if let Some(url) = &self.api_url {
            config = config.api_url(url);
        }
        HelioClient::new(config).context("Failed to build API client")
    }
}
