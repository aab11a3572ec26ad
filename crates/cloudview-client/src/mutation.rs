//! Write path
//!
//! Create and delete calls. Every failure is reported to the caller as
//! `CloudError::Mutation` (or `Configuration`); nothing is retried.

use crate::api::ResourceApi;
use crate::request::{DomainRequest, DropletRequest};
use cloudview_core::{Category, CloudError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Issues create and delete calls
#[derive(Clone)]
pub struct Mutator {
    api: Arc<dyn ResourceApi>,
}

impl std::fmt::Debug for Mutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutator").finish_non_exhaustive()
    }
}

impl Mutator {
    /// Create mutator over an upstream API
    #[inline]
    #[must_use]
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self { api }
    }

    /// Delete a resource upstream
    ///
    /// # Errors
    /// - `CloudError::Configuration` if credentials are missing
    /// - `CloudError::Mutation` if the upstream did not confirm
    pub async fn delete(&self, category: Category, id: &str) -> Result<(), CloudError> {
        match self.api.delete(category, id).await {
            Ok(()) => {
                info!(%category, id, "Deleted resource");
                Ok(())
            }
            Err(e) => {
                error!(%category, id, "Failed to delete resource: {}", e);
                Err(e.into_mutation())
            }
        }
    }

    /// Create a droplet, filling absent fields with defaults
    ///
    /// # Errors
    /// - `CloudError::Configuration` if credentials are missing
    /// - `CloudError::Mutation` with the upstream message if creation failed
    pub async fn create_droplet(&self, request: DropletRequest) -> Result<Value, CloudError> {
        let payload = request.into_payload();
        match self.api.create_droplet(&payload).await {
            Ok(body) => {
                info!(name = %payload.name, region = %payload.region, "Droplet created");
                Ok(body)
            }
            Err(e) => {
                error!(name = %payload.name, "Failed to create droplet: {}", e);
                Err(creation_failed("Droplet", e))
            }
        }
    }

    /// Create a domain
    ///
    /// # Errors
    /// - `CloudError::Configuration` if credentials are missing
    /// - `CloudError::Mutation` with the upstream message if creation failed
    pub async fn create_domain(&self, request: DomainRequest) -> Result<Value, CloudError> {
        match self.api.create_domain(&request).await {
            Ok(body) => {
                info!(name = %request.name, "Domain created");
                Ok(body)
            }
            Err(e) => {
                error!(name = %request.name, "Failed to create domain: {}", e);
                Err(creation_failed("Domain", e))
            }
        }
    }
}

fn creation_failed(kind: &str, err: CloudError) -> CloudError {
    match err {
        CloudError::Status { message, .. } => {
            CloudError::mutation(format!("{kind} creation failed: {message}"))
        }
        other => other.into_mutation(),
    }
}
