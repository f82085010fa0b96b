//! Configuration structures for astica clients.
//!
//! The API key is not part of this configuration; it is passed to the client
//! explicitly so configuration can be serialized and logged safely.

use crate::client::{DEFAULT_DESCRIBE_ENDPOINT, DEFAULT_MODEL_VERSION};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for an astica client instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AsticaClientConfig {
    /// Full URL of the describe operation
    #[validate(url)]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model version sent with each request
    #[validate(length(min = 1))]
    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Optional total request timeout in seconds (no timeout when unset)
    #[validate(range(min = 1, max = 600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Optional User-Agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_DESCRIBE_ENDPOINT.to_string()
}

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

impl AsticaClientConfig {
    /// Create a configuration pointing at a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the endpoint is not a valid URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            endpoint: endpoint.into(),
            ..Self::default()
        };

        config.validate()?;

        Ok(config)
    }

    /// Set the model version.
    #[must_use]
    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = version.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set the User-Agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Get the request timeout as a Duration, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parse and validate the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_endpoint(&self) -> Result<Url, Error> {
        Url::parse(&self.endpoint)
            .map_err(|e| Error::InvalidEndpoint(format!("Invalid describe endpoint: {e}")))
    }

    /// Validate every field, then parse the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if a field is out of range or the
    /// endpoint is not a URL.
    pub fn validated_endpoint(&self) -> Result<Url, Error> {
        self.validate()?;
        self.parse_endpoint()
    }
}

impl Default for AsticaClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_version: default_model_version(),
            request_timeout_secs: None,
            user_agent: None,
        }
    }
}
