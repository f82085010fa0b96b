//! # astica-core
//!
//! Core types and utilities shared by astica API clients.
//!
//! This crate provides the error type, client configuration, HTTP transport
//! settings, and credential handling used by the service-specific crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and transport error mapping
//! - [`config`] - Service configuration (endpoint, model version, timeout)
//! - [`client`] - HTTP transport settings and defaults
//! - [`credential`] - Secret-holding API key wrapper

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credential;
pub mod error;

// Re-export commonly used types
pub use credential::ApiKey;
pub use error::{Error, Result};
