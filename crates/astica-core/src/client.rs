//! HTTP transport settings.
//!
//! Connection pooling and compression knobs applied when a service client
//! builds its underlying `reqwest` client. Request timeouts live in
//! [`crate::config::AsticaClientConfig`].

use std::time::Duration;

/// Default endpoint of the vision describe operation
pub const DEFAULT_DESCRIBE_ENDPOINT: &str = "https://vision.astica.ai/describe";

/// Model version sent with every describe request unless overridden
pub const DEFAULT_MODEL_VERSION: &str = "2.1_full";

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
///
/// None of these settings bound the total duration of a call. A connect
/// timeout is only applied when set explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Optional TCP connect timeout
    pub connect_timeout: Option<Duration>,

    /// Enable response compression
    pub enable_compression: bool,
}

impl HttpConfig {
    /// Create a new HTTP configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            connect_timeout: None,
            enable_compression: true,
        }
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set a TCP connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
