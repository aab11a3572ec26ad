//! Upstream API seam and its HTTP implementation
//!
//! `ResourceApi` is the boundary to the cloud provider. `HttpApi` speaks
//! the provider's REST dialect over reqwest; tests substitute scripted or
//! mocked implementations.

use crate::request::{DomainRequest, DropletPayload};
use async_trait::async_trait;
use cloudview_core::{ApiConfig, Category, CloudError};
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Access to the upstream cloud API
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET {base}/{collection}`: raw records of a category
    ///
    /// # Errors
    /// - `CloudError::Configuration` before any request if credentials are missing
    /// - `CloudError::Transport` / `CloudError::Status` on failure
    async fn list(&self, category: Category) -> Result<Vec<Value>, CloudError>;

    /// `DELETE {base}/{collection}/{id}`
    ///
    /// # Errors
    /// - `CloudError::Configuration` before any request if credentials are missing
    /// - any other variant when the upstream did not confirm the deletion
    async fn delete(&self, category: Category, id: &str) -> Result<(), CloudError>;

    /// `POST {base}/droplets`
    ///
    /// # Errors
    /// - `CloudError::Configuration` before any request if credentials are missing
    /// - any other variant when creation failed
    async fn create_droplet(&self, payload: &DropletPayload) -> Result<Value, CloudError>;

    /// `POST {base}/domains`
    ///
    /// # Errors
    /// - `CloudError::Configuration` before any request if credentials are missing
    /// - any other variant when creation failed
    async fn create_domain(&self, request: &DomainRequest) -> Result<Value, CloudError>;
}

/// reqwest-backed `ResourceApi`
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: Arc<ApiConfig>,
}

impl HttpApi {
    /// Create client with a default reqwest `Client`
    #[inline]
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create client over an existing reqwest `Client`
    #[inline]
    #[must_use]
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl ResourceApi for HttpApi {
    async fn list(&self, category: Category) -> Result<Vec<Value>, CloudError> {
        let creds = self.config.credentials()?;
        let url = creds.url(category.endpoint());
        debug!(%category, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(creds.api_key)
            .send()
            .await
            .map_err(|e| CloudError::transport(format!("GET {url}: {e}")))?;
        let response = ensure_success(response).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| CloudError::transport(format!("invalid body from {url}: {e}")))?;
        let records = collection(body, category.endpoint());
        debug!(%category, count = records.len(), "Fetched {}", category.endpoint());
        Ok(records)
    }

    async fn delete(&self, category: Category, id: &str) -> Result<(), CloudError> {
        let creds = self.config.credentials()?;
        let url = creds.url(&format!("{}/{id}", category.endpoint()));
        debug!(%category, id, "DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(creds.api_key)
            .send()
            .await
            .map_err(|e| CloudError::transport(format!("DELETE {url}: {e}")))?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn create_droplet(&self, payload: &DropletPayload) -> Result<Value, CloudError> {
        let creds = self.config.credentials()?;
        let url = creds.url(Category::Compute.endpoint());
        debug!(name = %payload.name, "POST {}", url);
        self.post(&url, creds.api_key, payload).await
    }

    async fn create_domain(&self, request: &DomainRequest) -> Result<Value, CloudError> {
        let creds = self.config.credentials()?;
        let url = creds.url(Category::Domain.endpoint());
        debug!(name = %request.name, "POST {}", url);
        self.post(&url, creds.api_key, request).await
    }
}

impl HttpApi {
    async fn post<B: serde::Serialize + Sync + ?Sized>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> Result<Value, CloudError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CloudError::transport(format!("POST {url}: {e}")))?;
        let response = ensure_success(response).await?;

        // Some endpoints answer 202/204 without a body.
        let text = response
            .text()
            .await
            .map_err(|e| CloudError::transport(format!("reading body from {url}: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| CloudError::transport(format!("invalid body from {url}: {e}")))
    }
}

/// Pass successful responses through, turn the rest into `CloudError::Status`
async fn ensure_success(response: Response) -> Result<Response, CloudError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
    let message = match response.json::<Value>().await {
        Ok(body) => upstream_message(&body).unwrap_or(fallback),
        Err(_) => fallback,
    };
    Err(CloudError::Status {
        status: status.as_u16(),
        message,
    })
}

/// The `message` field of an upstream error body
#[must_use]
pub fn upstream_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// The array under `key` in a collection response; anything else is empty
#[must_use]
pub fn collection(body: Value, key: &str) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
