//! API key handling.
//!
//! The key is kept in a [`SecretString`] so it never shows up in `Debug`
//! output or logs. It is only exposed when a request body is serialized.

use secrecy::{ExposeSecret, SecretString};
use serde::Serializer;
use std::fmt;
use std::sync::Arc;

/// Opaque astica API key.
///
/// No validation is performed: an empty or malformed key is only rejected by
/// the service when a call is made.
#[derive(Clone)]
pub struct ApiKey(Arc<SecretString>);

impl ApiKey {
    /// Wrap a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::from(key.into())))
    }

    /// Expose the raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Returns true if the key is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    /// Serialize the exposed key as a plain string.
    ///
    /// Intended for `#[serde(serialize_with = "...")]` on request bodies.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize_exposed<S>(key: &Self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(key.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
