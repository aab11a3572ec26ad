//! Testing utilities for the Cloudview workspace
//!
//! Shared fixtures and a scripted upstream API whose responses can be held
//! back until a test opens a gate.

#![allow(missing_docs)]

use async_trait::async_trait;
use cloudview_client::{DomainRequest, DropletPayload, ResourceApi};
use cloudview_core::{ApiConfig, Category, CloudError, SyncConfig};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Compute record as returned by `GET /droplets`
pub fn droplet(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "region": { "slug": "nyc1" },
        "status": "active",
        "created_at": "2023-01-15T10:00:00Z",
    })
}

/// Database record as returned by `GET /databases`
pub fn database(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "region": "nyc3",
        "status": "online",
        "created_at": "2023-02-20T14:30:00Z",
    })
}

/// Domain record as returned by `GET /domains`
pub fn domain(name: &str) -> Value {
    json!({ "name": name, "ttl": 1800, "zone_file": "" })
}

/// Credentials pointing nowhere; only for fakes that never dial out
pub fn test_api_config() -> ApiConfig {
    ApiConfig::new("http://127.0.0.1:9/v2", "test-token")
}

/// Sync settings with the default interval and fallback
pub fn test_sync_config() -> SyncConfig {
    SyncConfig::default()
}

/// Holds a scripted response until opened
#[derive(Clone)]
pub struct Gate {
    inner: Arc<GateInner>,
}

struct GateInner {
    started: Notify,
    open: watch::Sender<bool>,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    pub fn new() -> Self {
        let (open, _) = watch::channel(false);
        Self {
            inner: Arc::new(GateInner {
                started: Notify::new(),
                open,
            }),
        }
    }

    /// Resolves once a call has reached the gate
    pub async fn started(&self) {
        self.inner.started.notified().await;
    }

    /// Let the held call complete
    pub fn open(&self) {
        self.inner.open.send_replace(true);
    }

    async fn pass(&self) {
        self.inner.started.notify_one();
        let mut rx = self.inner.open.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// A call observed by `ScriptedApi`
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Category),
    Delete(Category, String),
    CreateDroplet(DropletPayload),
    CreateDomain(DomainRequest),
}

struct ListStep {
    gate: Option<Gate>,
    result: Result<Vec<Value>, CloudError>,
}

/// `ResourceApi` fake with per-category queued responses
///
/// Queued list responses are consumed in order; once a category's queue is
/// empty its steady response (empty by default) repeats. Deletes succeed
/// unless a result is queued.
#[derive(Default)]
pub struct ScriptedApi {
    lists: Mutex<HashMap<Category, VecDeque<ListStep>>>,
    steady: Mutex<HashMap<Category, Result<Vec<Value>, CloudError>>>,
    deletes: Mutex<VecDeque<Result<(), CloudError>>>,
    creations: Mutex<VecDeque<Result<Value, CloudError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push_list(&self, category: Category, step: ListStep) {
        self.lists.lock().entry(category).or_default().push_back(step);
    }

    /// Queue a list response
    pub fn then_list(&self, category: Category, records: Vec<Value>) {
        self.push_list(category, ListStep { gate: None, result: Ok(records) });
    }

    /// Queue a list failure
    pub fn then_list_error(&self, category: Category, error: CloudError) {
        self.push_list(category, ListStep { gate: None, result: Err(error) });
    }

    /// Queue a list response that waits for the returned gate
    pub fn then_list_gated(&self, category: Category, records: Vec<Value>) -> Gate {
        let gate = Gate::new();
        self.push_list(
            category,
            ListStep {
                gate: Some(gate.clone()),
                result: Ok(records),
            },
        );
        gate
    }

    /// Response repeated once the queue for `category` is drained
    pub fn steady_list(&self, category: Category, result: Result<Vec<Value>, CloudError>) {
        self.steady.lock().insert(category, result);
    }

    /// Queue a delete result
    pub fn then_delete(&self, result: Result<(), CloudError>) {
        self.deletes.lock().push_back(result);
    }

    /// Queue a create result (droplet or domain)
    pub fn then_create(&self, result: Result<Value, CloudError>) {
        self.creations.lock().push_back(result);
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Number of list calls for a category
    pub fn list_calls(&self, category: Category) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::List(listed) if *listed == category))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ResourceApi for ScriptedApi {
    async fn list(&self, category: Category) -> Result<Vec<Value>, CloudError> {
        self.record(Call::List(category));
        let step = self
            .lists
            .lock()
            .get_mut(&category)
            .and_then(VecDeque::pop_front);

        match step {
            Some(ListStep { gate, result }) => {
                if let Some(gate) = gate {
                    gate.pass().await;
                }
                result
            }
            None => self
                .steady
                .lock()
                .get(&category)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new())),
        }
    }

    async fn delete(&self, category: Category, id: &str) -> Result<(), CloudError> {
        self.record(Call::Delete(category, id.to_string()));
        self.deletes.lock().pop_front().unwrap_or(Ok(()))
    }

    async fn create_droplet(&self, payload: &DropletPayload) -> Result<Value, CloudError> {
        self.record(Call::CreateDroplet(payload.clone()));
        self.creations
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "droplet": { "name": payload.name } })))
    }

    async fn create_domain(&self, request: &DomainRequest) -> Result<Value, CloudError> {
        self.record(Call::CreateDomain(request.clone()));
        self.creations
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "domain": { "name": request.name } })))
    }
}
