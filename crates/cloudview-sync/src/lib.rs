//! Cloudview Sync
//!
//! Keeps per-category resource lists current:
//! - `ResourceView`: one category, polled on an interval, cancellable
//! - `ViewSnapshot`: the state published to subscribers
//! - `Dashboard`: active views plus overview, details and mutations
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudview_client::HttpApi;
//! use cloudview_core::{ApiConfig, Category};
//! use cloudview_sync::{Dashboard, SyncContext};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let context = SyncContext::new(Arc::new(HttpApi::new(ApiConfig::from_env())));
//! let dashboard = Dashboard::new(context);
//! let view = dashboard.activate(Category::Compute);
//! if let Ok(snapshot) = view.ready().await {
//!     println!("{} droplets", snapshot.resources.len());
//! }
//! dashboard.shutdown().await;
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod dashboard;
pub mod state;
pub mod view;

pub use dashboard::Dashboard;
pub use state::{ViewPhase, ViewSnapshot};
pub use view::{ResourceView, SyncContext};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Cloudview Sync
    pub use crate::{Dashboard, ResourceView, SyncContext, ViewPhase, ViewSnapshot};
    pub use cloudview_core::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
