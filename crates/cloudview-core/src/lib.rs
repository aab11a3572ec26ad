//! Cloudview Core
//!
//! The resource model shared by the client, the synchronizer and the CLI:
//! - Categories, statuses, costs and the normalized `Resource`
//! - Upstream timestamps kept verbatim
//! - The error taxonomy
//! - Explicit configuration (no ambient lookups in request logic)
//! - The `Normalizer` that maps upstream JSON into `Resource`
//! - Placeholder records, overview aggregation and detail records
//!
//! # Example
//!
//! ```rust
//! use cloudview_core::{Category, FixedMetrics, Normalizer};
//! use serde_json::json;
//!
//! let normalizer = Normalizer::new(FixedMetrics::new(10, 20));
//! let set = normalizer.normalize(
//!     Category::Compute,
//!     &[json!({ "id": 7, "name": "web-1", "region": { "slug": "nyc1" } })],
//! );
//!
//! assert_eq!(set.fetched[0].id, "7");
//! assert_eq!(set.fetched[0].region, "nyc1");
//! assert_eq!(set.defaults.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod details;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod overview;
pub mod placeholder;
pub mod timestamp;
pub mod types;

// Re-exports for convenience
pub use config::{ApiConfig, CloudviewConfig, Credentials, FallbackPolicy, SyncConfig};
pub use details::{Hardware, MetricSummary, ResourceDetails, ResourceMetrics};
pub use error::{CloudError, Result};
pub use metrics::{FixedMetrics, MetricKind, MetricPoint, MetricSource, SimulatedMetrics, UsageSample};
pub use normalize::{NormalizedSet, Normalizer};
pub use overview::Overview;
pub use placeholder::placeholders;
pub use timestamp::Timestamp;
pub use types::{Category, Cost, ParseCategoryError, Resource, ResourceStatus};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Cloudview Core
    pub use crate::{
        ApiConfig, Category, CloudError, CloudviewConfig, FallbackPolicy, MetricSource,
        NormalizedSet, Normalizer, Resource, ResourceStatus, SyncConfig, Timestamp,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
