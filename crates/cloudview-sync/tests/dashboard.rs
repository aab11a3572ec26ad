//! Dashboard queries and mutations across several views

use chrono::{Duration, Utc};
use cloudview_client::{DomainRequest, DropletRequest, ResourceApi};
use cloudview_core::{Category, CloudError, FallbackPolicy, FixedMetrics, SyncConfig};
use cloudview_sync::{Dashboard, SyncContext};
use cloudview_test_utils::{database, domain, droplet, Call, ScriptedApi};
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;
use std::sync::Arc;

fn dashboard(api: &Arc<ScriptedApi>) -> Dashboard {
    let api: Arc<dyn ResourceApi> = api.clone();
    Dashboard::new(
        SyncContext::new(api)
            .with_metrics(Arc::new(FixedMetrics::new(20, 70)))
            .with_config(SyncConfig::default().with_fallback(FallbackPolicy::LiveOnly)),
    )
}

#[tokio::test]
async fn overview_spans_all_live_views() {
    let api = ScriptedApi::new();
    api.steady_list(Category::Compute, Ok(vec![droplet(7, "web-7")]));
    api.steady_list(Category::Database, Ok(vec![database("db-a", "orders")]));
    api.steady_list(Category::Domain, Ok(vec![domain("example.com")]));
    let dashboard = dashboard(&api);

    for category in Category::ALL {
        dashboard.activate(category).ready().await.unwrap();
    }

    let now = Utc::now();
    let overview = dashboard.overview(now);
    assert_eq!(overview.total_resources, 3);
    assert_eq!(overview.cpu_usage, 20);
    assert_eq!(overview.memory_usage, 70);

    // The domain is active since `now`; the droplet since 2023.
    let expected_days = (now - chrono::DateTime::parse_from_rfc3339("2023-01-15T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc))
    .num_days();
    assert!(overview.total_uptime.starts_with(&format!("{expected_days}d ")));

    dashboard.shutdown().await;
    assert!(dashboard.active_categories().is_empty());
}

#[tokio::test]
async fn overview_without_views_is_zero() {
    let api = ScriptedApi::new();
    let overview = dashboard(&api).overview(Utc::now() + Duration::days(1));

    assert_eq!(overview.total_resources, 0);
    assert_eq!(overview.cpu_usage, 0);
    assert_eq!(overview.total_uptime, "0d 0h 0m");
}

#[tokio::test]
async fn create_droplet_leaves_views_alone() {
    let api = ScriptedApi::new();
    api.then_list(Category::Compute, Vec::new());
    api.then_list(Category::Compute, vec![droplet(99, "my-droplet")]);
    let dashboard = dashboard(&api);
    let view = dashboard.activate(Category::Compute);
    view.ready().await.unwrap();

    let body = dashboard
        .create_droplet(DropletRequest::new().with_tag_list("web, prod"))
        .await
        .unwrap();

    assert_eq!(body["droplet"]["name"], "my-droplet");
    assert!(view.snapshot().resources.is_empty());
    assert_eq!(api.list_calls(Category::Compute), 1);

    view.refresh().await.unwrap();
    assert!(view.snapshot().contains("99"));

    let created = api.calls().into_iter().find_map(|c| match c {
        Call::CreateDroplet(payload) => Some(payload),
        _ => None,
    });
    assert_eq!(created.unwrap().tags, vec!["web", "prod"]);
}

#[tokio::test]
async fn create_domain_failure_is_reported() {
    let api = ScriptedApi::new();
    api.then_create(Err(CloudError::Status {
        status: 422,
        message: "Name already exists".to_string(),
    }));
    let dashboard = dashboard(&api);

    let err = dashboard
        .create_domain(DomainRequest::new("example.com", Ipv4Addr::new(1, 2, 3, 4)))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CloudError::mutation("Domain creation failed: Name already exists")
    );
}

#[tokio::test]
async fn delete_routes_through_matching_view() {
    let api = ScriptedApi::new();
    api.steady_list(Category::Compute, Ok(vec![droplet(7, "web-7")]));
    let dashboard = dashboard(&api);
    let view = dashboard.activate(Category::Compute);
    view.ready().await.unwrap();

    dashboard.delete(Category::Compute, "7").await.unwrap();
    assert!(!view.snapshot().contains("7"));
}
