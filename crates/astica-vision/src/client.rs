//! Asynchronous vision client implementation.

use crate::models::{DescribeOptions, DescribeRequest, DescribeResponse, VisionParameter};
use crate::Result;
use astica_core::client::HttpConfig;
use astica_core::config::AsticaClientConfig;
use astica_core::{ApiKey, Error};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::debug;
use url::Url;

pub(crate) const USER_AGENT: &str = concat!("astica-vision/", env!("CARGO_PKG_VERSION"));

/// Describe operation, abstracted so callers can substitute a test double.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionApi: Send + Sync {
    /// Analyse `image` with the requested `params`.
    ///
    /// # Errors
    ///
    /// Returns a transport error, [`Error::UnexpectedStatus`] for any status
    /// other than `200 OK`, or [`Error::Decode`] for a malformed body.
    async fn describe(
        &self,
        image: &str,
        options: Option<DescribeOptions>,
        params: &[VisionParameter],
    ) -> Result<DescribeResponse>;
}

/// Builder for [`VisionClient`].
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

    /// Build the client. No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<VisionClient> {
        let endpoint = self.config.validated_endpoint()?;

        let mut builder = ClientBuilder::new()
            .user_agent(self.config.user_agent.as_deref().unwrap_or(USER_AGENT))
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression);

        if let Some(timeout) = self.config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.http_config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build vision HTTP client: {err}"))
        })?;

        Ok(VisionClient {
            http,
            endpoint,
            api_key: self.api_key,
            model_version: self.config.model_version,
        })
    }
}

/// Asynchronous client for the astica vision describe API.
///
/// Cloning is cheap and clones share the connection pool. The client holds
/// no mutable state, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: Client,
    endpoint: Url,
    api_key: ApiKey,
    model_version: String,
}

impl VisionClient {
    /// Create a client with default settings. Never fails and never touches
    /// the network; an invalid key is only reported by the service.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            http: Client::new(),
            endpoint: default_endpoint(),
            api_key: api_key.into(),
            model_version: astica_core::client::DEFAULT_MODEL_VERSION.to_string(),
        }
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

    /// Return the model version sent with each request.
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Build the request body for a describe call without sending it.
    #[must_use]
    pub fn describe_request(
        &self,
        image: &str,
        options: Option<DescribeOptions>,
        params: &[VisionParameter],
    ) -> DescribeRequest {
        DescribeRequest::new(
            self.api_key.clone(),
            self.model_version.as_str(),
            image,
            options,
            params,
        )
    }

    /// Analyse an image.
    ///
    /// Exactly one POST is issued. There is no retry and, unless the client
    /// was built with a timeout, no deadline.
    ///
    /// # Errors
    ///
    /// See [`VisionApi::describe`].
    pub async fn describe(
        &self,
        image: &str,
        options: Option<DescribeOptions>,
        params: &[VisionParameter],
    ) -> Result<DescribeResponse> {
        let request = self.describe_request(image, options, params);
        let body = encode_request(&request)?;

        debug!(
            endpoint = %self.endpoint,
            vision_params = %request.vision_params,
            "Sending describe request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "Describe request rejected");
            return Err(Error::from_status(status));
        }

        let bytes = response.bytes().await?;
        decode_response(&bytes)
    }
}

#[async_trait]
impl VisionApi for VisionClient {
    async fn describe(
        &self,
        image: &str,
        options: Option<DescribeOptions>,
        params: &[VisionParameter],
    ) -> Result<DescribeResponse> {
        VisionClient::describe(self, image, options, params).await
    }
}

pub(crate) fn default_endpoint() -> Url {
    // The constant is a well-formed absolute URL.
    Url::parse(astica_core::client::DEFAULT_DESCRIBE_ENDPOINT)
        .unwrap_or_else(|err| unreachable!("default describe endpoint is invalid: {err}"))
}

pub(crate) fn encode_request(request: &DescribeRequest) -> Result<Vec<u8>> {
    serde_json::to_vec(request).map_err(|err| Error::Encode(err.to_string()))
}

pub(crate) fn decode_response(bytes: &[u8]) -> Result<DescribeResponse> {
    serde_json::from_slice(bytes).map_err(|err| Error::Decode(err.to_string()))
}
