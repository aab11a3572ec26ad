//! Cloudview Client
//!
//! The boundary to the cloud provider's REST API:
//! - `ResourceApi`: the upstream seam (HTTP in production, fakes in tests)
//! - `HttpApi`: bearer-authenticated reqwest implementation
//! - `Fetcher`: read path, degrading transport failures to empty data
//! - `Mutator`: create and delete calls, always reporting failures
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudview_client::{Fetcher, HttpApi};
//! use cloudview_core::{ApiConfig, Category};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cloudview_core::CloudError> {
//! let api = HttpApi::new(ApiConfig::from_env());
//! let fetcher = Fetcher::new(Arc::new(api));
//! let records = fetcher.fetch(Category::Compute).await?;
//! println!("{} droplets", records.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod fetcher;
pub mod mutation;
pub mod request;

pub use api::{HttpApi, ResourceApi};
#[cfg(any(test, feature = "mock"))]
pub use api::MockResourceApi;
pub use fetcher::Fetcher;
pub use mutation::Mutator;
pub use request::{DomainRequest, DropletPayload, DropletRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
