//! Synchronous vision client.
//!
//! Same wire contract and errors as [`crate::VisionClient`], for callers
//! without an async runtime. Do not call from inside an async context.

use crate::client::{decode_response, encode_request, USER_AGENT};
use crate::models::{DescribeOptions, DescribeRequest, DescribeResponse, VisionParameter};
use crate::Result;
use astica_core::client::HttpConfig;
use astica_core::config::AsticaClientConfig;
use astica_core::{ApiKey, Error};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

/// Builder for the blocking [`VisionClient`].
#[derive(Debug, Clone)]
pub struct VisionClientBuilder {
    api_key: ApiKey,
    config: AsticaClientConfig,
    http_config: HttpConfig,
}

impl VisionClientBuilder {
    /// Create a builder with the default endpoint and model version.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            config: AsticaClientConfig::default(),
            http_config: HttpConfig::default(),
        }
    }

    /// Replace the whole service configuration.
    #[must_use]
    pub fn with_config(mut self, config: AsticaClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Send requests to a different describe endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Override the model version.
    #[must_use]
    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.config = self.config.with_model_version(version);
        self
    }

    /// Bound every call by a total timeout. Calls are unbounded by default.
    #[must_use]
    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.config = self.config.with_timeout(seconds);
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Override the HTTP transport configuration.
    #[must_use]
    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<VisionClient> {
        let endpoint = self.config.validated_endpoint()?;

        // reqwest's blocking client applies a 30s timeout unless told otherwise.
        let builder = ClientBuilder::new()
            .user_agent(self.config.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(self.config.timeout())
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression);

        let builder = match self.http_config.connect_timeout {
            Some(connect_timeout) => builder.connect_timeout(connect_timeout),
            None => builder,
        };

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build blocking vision HTTP client: {err}"))
        })?;

        Ok(VisionClient {
            http,
            endpoint,
            api_key: self.api_key,
            model_version: self.config.model_version,
        })
    }
}

/// Blocking client for the astica vision describe API.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: Client,
    endpoint: Url,
    api_key: ApiKey,
    model_version: String,
}

impl VisionClient {
    /// Create a client with default settings and no request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<ApiKey>) -> Result<Self> {
        VisionClientBuilder::new(api_key).build()
    }

    /// Start a builder for a customised client.
    #[must_use]
    pub fn builder(api_key: impl Into<ApiKey>) -> VisionClientBuilder {
        VisionClientBuilder::new(api_key)
    }

    /// Return the describe endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Return the model version sent with every request.
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Analyse an image, blocking the current thread until the exchange
    /// completes.
    ///
    /// # Errors
    ///
    /// See [`crate::VisionApi::describe`].
    pub fn describe(
        &self,
        image: &str,
        options: Option<DescribeOptions>,
        params: &[VisionParameter],
    ) -> Result<DescribeResponse> {
        let request = DescribeRequest::new(
            self.api_key.clone(),
            self.model_version.as_str(),
            image,
            options,
            params,
        );
        let body = encode_request(&request)?;

        debug!(
            endpoint = %self.endpoint,
            vision_params = %request.vision_params,
            "Sending blocking describe request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "Describe request rejected");
            return Err(Error::from_status(status));
        }

        let bytes = response.bytes()?;
        decode_response(&bytes)
    }
}
