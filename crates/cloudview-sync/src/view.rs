//! Resource view: one category, polled on a fixed interval
//!
//! A view owns its polling task. Every cycle fetches, normalizes and
//! replaces the resource list wholesale. Deactivation marks the published
//! state terminated under the channel lock before aborting the task, so a
//! cycle that finishes late can never write into a torn-down view.
//!
//! Polling and deletion are not coordinated: a cycle that started before a
//! delete resolved may bring the deleted record back (last writer wins).

use crate::state::{ViewPhase, ViewSnapshot};
use chrono::Utc;
use cloudview_client::{Fetcher, Mutator, ResourceApi};
use cloudview_core::{
    placeholders, Category, CloudError, FallbackPolicy, MetricSource, Normalizer,
    SimulatedMetrics, SyncConfig,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Collaborators shared by the views of a dashboard
#[derive(Clone)]
pub struct SyncContext {
    fetcher: Fetcher,
    mutator: Mutator,
    normalizer: Normalizer<Arc<dyn MetricSource>>,
    config: SyncConfig,
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SyncContext {
    /// Create context with simulated metrics and default polling
    #[must_use]
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        let metrics: Arc<dyn MetricSource> = Arc::new(SimulatedMetrics);
        Self {
            fetcher: Fetcher::new(Arc::clone(&api)),
            mutator: Mutator::new(api),
            normalizer: Normalizer::new(metrics),
            config: SyncConfig::default(),
        }
    }

    /// With sync configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// With metric source
    #[inline]
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricSource>) -> Self {
        self.normalizer = Normalizer::new(metrics);
        self
    }

    /// Sync configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Fetcher
    #[inline]
    #[must_use]
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Mutator for create/delete calls
    #[inline]
    #[must_use]
    pub fn mutator(&self) -> &Mutator {
        &self.mutator
    }

    /// Metric source
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> &Arc<dyn MetricSource> {
        self.normalizer.metrics()
    }
}

struct Shared {
    context: SyncContext,
    state: watch::Sender<ViewSnapshot>,
}

impl Shared {
    /// Apply `f` only if the view is alive and still on `generation`
    fn apply(&self, generation: u64, f: impl FnOnce(&mut ViewSnapshot)) -> bool {
        self.state.send_if_modified(|snap| {
            if snap.is_terminated() || snap.generation != generation {
                return false;
            }
            f(snap);
            true
        })
    }

    fn current(&self) -> Option<(Category, u64)> {
        let snap = self.state.borrow();
        (!snap.is_terminated()).then_some((snap.category, snap.generation))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current().is_some_and(|(_, current)| current == generation)
    }

    /// One fetch-normalize-replace cycle
    async fn cycle(&self, category: Category, generation: u64) -> Result<(), CloudError> {
        let fetched = self.context.fetcher.fetch(category).await;
        let now = Utc::now();

        match fetched {
            Ok(records) => {
                let resources = self
                    .context
                    .normalizer
                    .normalize_at(category, &records, now)
                    .select(self.context.config.fallback);
                let count = resources.len();

                let applied = self.apply(generation, move |snap| {
                    snap.resources = resources;
                    snap.loading = false;
                    snap.phase = ViewPhase::Ready;
                    snap.error = None;
                    snap.refreshed_at = Some(now);
                });
                if applied {
                    debug!(%category, generation, count, "Applied poll cycle");
                } else {
                    debug!(%category, generation, "Discarded stale poll cycle");
                }
                Ok(())
            }
            Err(e) => {
                error!(%category, "Poll cycle failed: {}", e);
                let defaults = match self.context.config.fallback {
                    FallbackPolicy::DefaultsWhenEmpty => placeholders(category),
                    FallbackPolicy::LiveOnly => Vec::new(),
                };
                let reported = e.clone();
                self.apply(generation, move |snap| {
                    if snap.resources.is_empty() {
                        snap.resources = defaults;
                    }
                    snap.loading = false;
                    snap.phase = ViewPhase::Ready;
                    snap.error = Some(reported);
                    snap.refreshed_at = Some(now);
                });
                Err(e)
            }
        }
    }
}

async fn poll(shared: Arc<Shared>, category: Category, generation: u64) {
    let mut ticker = tokio::time::interval(shared.context.config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !shared.is_current(generation) {
            break;
        }
        // Read failures other than configuration never reach here.
        if let Err(e) = shared.cycle(category, generation).await {
            if e.is_configuration() {
                break;
            }
        }
    }
    debug!(%category, generation, "Poll loop stopped");
}

/// A polled view over one category
///
/// Must be activated inside a tokio runtime. Dropping the view cancels its
/// polling task.
pub struct ResourceView {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for ResourceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.shared.state.borrow();
        f.debug_struct("ResourceView")
            .field("category", &snap.category)
            .field("phase", &snap.phase)
            .field("generation", &snap.generation)
            .finish_non_exhaustive()
    }
}

impl ResourceView {
    /// Activate a view and start polling immediately
    #[must_use]
    pub fn activate(category: Category, context: SyncContext) -> Self {
        let (state, _) = watch::channel(ViewSnapshot::idle(category));
        let view = Self {
            shared: Arc::new(Shared { context, state }),
            task: Mutex::new(None),
        };
        // A fresh view is never terminated.
        let _ = view.start(category);
        view
    }

    fn start(&self, category: Category) -> Result<(), CloudError> {
        let mut generation = 0;
        let started = self.shared.state.send_if_modified(|snap| {
            if snap.is_terminated() {
                return false;
            }
            snap.generation += 1;
            generation = snap.generation;
            snap.category = category;
            snap.resources.clear();
            snap.loading = true;
            snap.phase = ViewPhase::Loading;
            snap.error = None;
            snap.refreshed_at = None;
            true
        });
        if !started {
            return Err(CloudError::Terminated);
        }

        let handle = tokio::spawn(poll(Arc::clone(&self.shared), category, generation));
        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }
        info!(%category, generation, "View activated");
        Ok(())
    }

    /// Switch category; restarts polling with a fresh first cycle
    ///
    /// # Errors
    /// - `CloudError::Terminated` if the view was deactivated
    pub fn set_category(&self, category: Category) -> Result<(), CloudError> {
        self.start(category)
    }

    /// Category currently shown
    #[must_use]
    pub fn category(&self) -> Category {
        self.shared.state.borrow().category
    }

    /// Copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every applied change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.shared.state.subscribe()
    }

    /// Whether the view is still polling
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.current().is_some()
    }

    /// Wait for the first cycle after activation to complete
    ///
    /// # Errors
    /// - `CloudError::Terminated` if the view is deactivated first
    pub async fn ready(&self) -> Result<ViewSnapshot, CloudError> {
        let mut rx = self.subscribe();
        let snap = rx
            .wait_for(|s| s.phase != ViewPhase::Loading)
            .await
            .map_err(|_| CloudError::Terminated)?
            .clone();
        if snap.is_terminated() {
            return Err(CloudError::Terminated);
        }
        Ok(snap)
    }

    /// Run one cycle now, outside the interval
    ///
    /// # Errors
    /// - `CloudError::Terminated` if the view was deactivated
    /// - `CloudError::Configuration` if credentials are missing
    pub async fn refresh(&self) -> Result<(), CloudError> {
        let (category, generation) = self.shared.current().ok_or(CloudError::Terminated)?;
        self.shared.cycle(category, generation).await
    }

    /// Delete a resource of the shown category
    ///
    /// The entry is removed locally only after the upstream confirms.
    ///
    /// # Errors
    /// - `CloudError::Terminated` if the view was deactivated
    /// - `CloudError::Configuration` / `CloudError::Mutation` from the upstream call;
    ///   local state is unchanged
    pub async fn delete(&self, id: &str) -> Result<(), CloudError> {
        let (category, _) = self.shared.current().ok_or(CloudError::Terminated)?;
        self.shared.context.mutator.delete(category, id).await?;

        let removed = self.shared.state.send_if_modified(|snap| {
            if snap.is_terminated() || snap.category != category {
                return false;
            }
            let before = snap.resources.len();
            snap.resources.retain(|r| r.id != id);
            snap.resources.len() != before
        });
        debug!(%category, id, removed, "Applied confirmed deletion");
        Ok(())
    }

    fn terminate(&self) -> Option<JoinHandle<()>> {
        let changed = self.shared.state.send_if_modified(|snap| {
            if snap.is_terminated() {
                return false;
            }
            snap.phase = ViewPhase::Terminated;
            snap.loading = false;
            true
        });
        let task = self.task.lock().take();
        if let Some(task) = &task {
            task.abort();
        }
        if changed {
            info!(category = %self.category(), "View deactivated");
        }
        task
    }

    /// Stop polling; no state changes after this returns
    pub fn deactivate(&self) {
        let _ = self.terminate();
    }

    /// Deactivate and wait for the polling task to finish
    pub async fn shutdown(&self) {
        if let Some(task) = self.terminate() {
            let _ = task.await;
        }
    }
}

impl Drop for ResourceView {
    fn drop(&mut self) {
        self.deactivate();
    }
}
