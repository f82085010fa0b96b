//! Client and data models for the astica vision describe API.
//!
//! One operation is exposed: [`VisionClient::describe`] sends an image
//! reference and a list of [`VisionParameter`]s to the service and returns a
//! typed [`DescribeResponse`].
//!
//! ```no_run
//! use astica_vision::{VisionClient, VisionParameter};
//!
//! # async fn run() -> astica_vision::Result<()> {
//! let client = VisionClient::new("my-api-key");
//! let result = client
//!     .describe(
//!         "https://www.astica.org/inputs/analyze_3.jpg",
//!         None,
//!         &[VisionParameter::Describe, VisionParameter::Tags],
//!     )
//!     .await?;
//! println!("{}", result.caption.text);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod models;

pub use astica_core::{ApiKey, Error};
pub use client::{VisionApi, VisionClient, VisionClientBuilder};
pub use models::{
    CallInfo, Caption, DescribeOptions, DescribeRequest, DescribeResponse, DetectedObject,
    ImageMetadata, Rectangle, RegionCaption, Tag, VisionParameter,
};

/// Convenient result alias that reuses the shared astica error type.
pub type Result<T> = astica_core::Result<T>;
