//! Dashboard: the set of active views plus cross-view queries
//!
//! Views are keyed by the category they were activated with. Creation
//! calls leave every view untouched.

use crate::state::ViewSnapshot;
use crate::view::{ResourceView, SyncContext};
use chrono::{DateTime, Utc};
use cloudview_client::{DomainRequest, DropletRequest};
use cloudview_core::{Category, CloudError, Overview, Resource, ResourceDetails};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Active views over one upstream account
#[derive(Debug)]
pub struct Dashboard {
    context: SyncContext,
    views: Mutex<BTreeMap<Category, Arc<ResourceView>>>,
}

impl Dashboard {
    /// Create dashboard with no active views
    #[must_use]
    pub fn new(context: SyncContext) -> Self {
        Self {
            context,
            views: Mutex::new(BTreeMap::new()),
        }
    }

    /// Shared context
    #[inline]
    #[must_use]
    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    /// Activate a view, or return the one already polling this category
    pub fn activate(&self, category: Category) -> Arc<ResourceView> {
        let mut views = self.views.lock();
        if let Some(view) = views.get(&category).filter(|v| v.is_active()) {
            return Arc::clone(view);
        }
        let view = Arc::new(ResourceView::activate(category, self.context.clone()));
        if let Some(stale) = views.insert(category, Arc::clone(&view)) {
            stale.deactivate();
        }
        view
    }

    /// View activated for a category
    #[must_use]
    pub fn view(&self, category: Category) -> Option<Arc<ResourceView>> {
        self.views.lock().get(&category).cloned()
    }

    /// Deactivate and forget a view; returns whether one existed
    pub fn deactivate(&self, category: Category) -> bool {
        let removed = self.views.lock().remove(&category);
        match removed {
            Some(view) => {
                view.deactivate();
                true
            }
            None => false,
        }
    }

    /// Categories with a live view
    #[must_use]
    pub fn active_categories(&self) -> Vec<Category> {
        self.views
            .lock()
            .iter()
            .filter(|(_, v)| v.is_active())
            .map(|(c, _)| *c)
            .collect()
    }

    /// Snapshots of all live views
    #[must_use]
    pub fn snapshots(&self) -> Vec<ViewSnapshot> {
        self.live_views().iter().map(|v| v.snapshot()).collect()
    }

    fn live_views(&self) -> Vec<Arc<ResourceView>> {
        self.views
            .lock()
            .values()
            .filter(|v| v.is_active())
            .cloned()
            .collect()
    }

    fn known_resources(&self) -> Vec<Resource> {
        self.snapshots()
            .into_iter()
            .flat_map(|snap| snap.resources)
            .collect()
    }

    /// Aggregate figures across every live view
    #[must_use]
    pub fn overview(&self, now: DateTime<Utc>) -> Overview {
        let resources = self.known_resources();
        Overview::from_resources(&resources, now)
    }

    /// Details for any id; unknown ids yield the unknown record
    #[must_use]
    pub fn details(&self, id: &str, now: DateTime<Utc>) -> ResourceDetails {
        let known = self.known_resources();
        ResourceDetails::lookup(id, &known, &**self.context.metrics(), now)
    }

    /// Delete through the view showing `category`, or directly upstream
    ///
    /// # Errors
    /// - `CloudError::Configuration` / `CloudError::Mutation` from the upstream call
    pub async fn delete(&self, category: Category, id: &str) -> Result<(), CloudError> {
        let view = self
            .live_views()
            .into_iter()
            .find(|v| v.category() == category);
        match view {
            Some(view) => view.delete(id).await,
            None => self.context.mutator().delete(category, id).await,
        }
    }

    /// Create a droplet; views pick it up on their next cycle
    ///
    /// # Errors
    /// - `CloudError::Configuration` / `CloudError::Mutation` from the upstream call
    pub async fn create_droplet(&self, request: DropletRequest) -> Result<Value, CloudError> {
        self.context.mutator().create_droplet(request).await
    }

    /// Create a domain; views pick it up on their next cycle
    ///
    /// # Errors
    /// - `CloudError::Configuration` / `CloudError::Mutation` from the upstream call
    pub async fn create_domain(&self, request: DomainRequest) -> Result<Value, CloudError> {
        self.context.mutator().create_domain(request).await
    }

    /// Deactivate every view and wait for their tasks
    pub async fn shutdown(&self) {
        let views: Vec<_> = std::mem::take(&mut *self.views.lock())
            .into_values()
            .collect();
        for view in views {
            view.shutdown().await;
        }
    }
}
