//! Command handlers

use crate::output;
use anyhow::{Context, Result};
use chrono::Utc;
use cloudview_client::{DomainRequest, DropletRequest, HttpApi};
use cloudview_core::{Category, CloudviewConfig};
use cloudview_sync::{Dashboard, SyncContext, ViewPhase, ViewSnapshot};
use std::sync::Arc;
use tracing::{debug, info};

/// Dashboard over the live API
pub(crate) struct App {
    dashboard: Dashboard,
}

impl App {
    pub(crate) fn new(config: &CloudviewConfig) -> Self {
        let api = HttpApi::new(config.api.clone());
        let context = SyncContext::new(Arc::new(api)).with_config(config.sync);
        Self {
            dashboard: Dashboard::new(context),
        }
    }

    async fn ready(&self, category: Category) -> Result<ViewSnapshot> {
        let snapshot = self
            .dashboard
            .activate(category)
            .ready()
            .await
            .with_context(|| format!("{category} view stopped before loading"))?;
        if let Some(err) = &snapshot.error {
            return Err(err.clone()).with_context(|| format!("failed to load {category}"));
        }
        Ok(snapshot)
    }

    async fn ready_all(&self) -> Result<()> {
        for category in Category::ALL {
            let snapshot = self.ready(category).await?;
            debug!(%category, count = snapshot.resources.len(), "Loaded");
        }
        Ok(())
    }

    pub(crate) async fn list(&self, category: Category, json: bool) -> Result<()> {
        let snapshot = self.ready(category).await?;
        output::print_resources(&snapshot.resources, json)
    }

    pub(crate) async fn watch(&self, category: Category, json: bool) -> Result<()> {
        let view = self.dashboard.activate(category);
        let mut rx = view.subscribe();
        rx.mark_changed();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!(%category, "Interrupted");
                    break;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rx.borrow_and_update().clone();
                    match snapshot.phase {
                        ViewPhase::Ready => print_cycle(&snapshot, json)?,
                        ViewPhase::Terminated => break,
                        ViewPhase::Idle | ViewPhase::Loading => {}
                    }
                    if let Some(err) = snapshot.error {
                        return Err(err).with_context(|| format!("stopped watching {category}"));
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) async fn show(&self, id: &str, json: bool) -> Result<()> {
        self.ready_all().await?;
        output::print_details(&self.dashboard.details(id, Utc::now()), json)
    }

    pub(crate) async fn overview(&self, json: bool) -> Result<()> {
        self.ready_all().await?;
        output::print_overview(&self.dashboard.overview(Utc::now()), json)
    }

    pub(crate) async fn create_droplet(&self, request: DropletRequest) -> Result<()> {
        let body = self.dashboard.create_droplet(request).await?;
        output::print_json(&body)
    }

    pub(crate) async fn create_domain(&self, request: DomainRequest) -> Result<()> {
        let body = self.dashboard.create_domain(request).await?;
        output::print_json(&body)
    }

    pub(crate) async fn delete(&self, category: Category, id: &str) -> Result<()> {
        self.dashboard
            .delete(category, id)
            .await
            .with_context(|| format!("could not delete {category} {id}"))?;
        println!("Deleted {category} {id}");
        Ok(())
    }

    pub(crate) async fn shutdown(&self) {
        self.dashboard.shutdown().await;
    }
}

fn print_cycle(snapshot: &ViewSnapshot, json: bool) -> Result<()> {
    if json {
        return output::print_json(snapshot);
    }
    let at = snapshot
        .refreshed_at
        .map_or_else(String::new, |t| t.format("%H:%M:%S").to_string());
    println!("== {} @ {at} ==", snapshot.category);
    output::print_resources(&snapshot.resources, false)
}
