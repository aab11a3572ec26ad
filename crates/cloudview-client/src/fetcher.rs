//! Read path
//!
//! One GET per call. Transport and status failures are logged and degrade
//! to an empty collection; only configuration failures reach the caller.

use crate::api::ResourceApi;
use cloudview_core::{Category, CloudError};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Fetches raw upstream collections
#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn ResourceApi>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Create fetcher over an upstream API
    #[inline]
    #[must_use]
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self { api }
    }

    /// Fetch the raw records of a category
    ///
    /// # Errors
    /// - `CloudError::Configuration` if credentials are missing; no request is made
    pub async fn fetch(&self, category: Category) -> Result<Vec<Value>, CloudError> {
        match self.api.list(category).await {
            Ok(records) => Ok(records),
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!(%category, "Error fetching {}: {}", category.endpoint(), e);
                Ok(Vec::new())
            }
        }
    }
}
