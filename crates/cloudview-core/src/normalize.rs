//! Normalization of upstream records
//!
//! Maps the heterogeneous JSON records of each upstream collection into the
//! uniform `Resource` shape. Absent fields fall back per field; a record is
//! only dropped when it is not a JSON object at all.

use crate::config::FallbackPolicy;
use crate::error::CloudError;
use crate::metrics::{MetricSource, SimulatedMetrics};
use crate::placeholder::placeholders;
use crate::timestamp::Timestamp;
use crate::types::{Category, Resource, ResourceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Offset added to the position of a domain to build its id
pub const DOMAIN_ID_OFFSET: usize = 100;

/// Output of one normalization pass
///
/// Both sets are always populated independently; choosing between them is
/// the caller's policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSet {
    /// Category of every record in both sets
    pub category: Category,
    /// Records mapped from the live upstream response
    pub fetched: Vec<Resource>,
    /// Fixed placeholder records
    pub defaults: Vec<Resource>,
}

impl NormalizedSet {
    /// Select the set to display
    #[must_use]
    pub fn select(self, policy: FallbackPolicy) -> Vec<Resource> {
        match policy {
            FallbackPolicy::DefaultsWhenEmpty if self.fetched.is_empty() => self.defaults,
            _ => self.fetched,
        }
    }
}

/// Record normalizer
#[derive(Debug, Clone, Default)]
pub struct Normalizer<M = SimulatedMetrics> {
    metrics: M,
}

impl Normalizer<SimulatedMetrics> {
    /// Create normalizer with simulated metrics
    #[inline]
    #[must_use]
    pub fn simulated() -> Self {
        Self::new(SimulatedMetrics)
    }
}

impl<M: MetricSource> Normalizer<M> {
    /// Create normalizer over a metric source
    #[inline]
    #[must_use]
    pub fn new(metrics: M) -> Self {
        Self { metrics }
    }

    /// Metric source in use
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Normalize a raw upstream collection, stamping fallbacks with the current time
    #[must_use]
    pub fn normalize(&self, category: Category, records: &[Value]) -> NormalizedSet {
        self.normalize_at(category, records, Utc::now())
    }

    /// Normalize a raw upstream collection with an explicit "now"
    #[must_use]
    pub fn normalize_at(
        &self,
        category: Category,
        records: &[Value],
        now: DateTime<Utc>,
    ) -> NormalizedSet {
        let fetched = records
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match raw.as_object() {
                Some(record) => Some(self.map_record(category, index, record, now)),
                None => {
                    let err = CloudError::MalformedRecord(format!(
                        "{} entry {index} is not an object",
                        category.endpoint()
                    ));
                    warn!(%category, "Skipping upstream entry: {}", err);
                    None
                }
            })
            .collect();

        NormalizedSet {
            category,
            fetched,
            defaults: placeholders(category),
        }
    }

    fn map_record(
        &self,
        category: Category,
        index: usize,
        record: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Resource {
        let name = match string_field(record, "name") {
            Some(name) => name,
            None => {
                warn!(%category, index, "Upstream record has no name");
                String::new()
            }
        };

        match category {
            Category::Compute => {
                let id = id_field(record).unwrap_or_else(|| synthetic_id(category));
                let region = record
                    .get("region")
                    .and_then(Value::as_object)
                    .and_then(|region| string_field(region, "slug"))
                    .unwrap_or_else(|| "unknown".to_string());
                let status = string_field(record, "status")
                    .map_or(ResourceStatus::Unknown, |s| ResourceStatus::from_upstream(&s));
                let usage = self.metrics.sample(category, &id);

                Resource::new(id, name, category, created_at(record, now))
                    .with_region(region)
                    .with_status(status)
                    .with_usage(usage.cpu, usage.memory)
            }
            Category::Database => {
                let id = id_field(record).unwrap_or_else(|| synthetic_id(category));
                let region = string_field(record, "region").unwrap_or_else(|| "unknown".to_string());
                let status = string_field(record, "status")
                    .map_or(ResourceStatus::Active, |s| ResourceStatus::from_upstream(&s));
                let usage = self.metrics.sample(category, &id);

                Resource::new(id, name, category, created_at(record, now))
                    .with_region(region)
                    .with_status(status)
                    .with_usage(usage.cpu, usage.memory)
            }
            Category::Domain => {
                let id = format!("{}-{}", category.id_prefix(), index + DOMAIN_ID_OFFSET);
                Resource::new(id, name, category, now)
                    .with_region("Global")
                    .with_status(ResourceStatus::Active)
            }
        }
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Upstream ids are numeric for droplets and strings for databases
fn id_field(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn synthetic_id(category: Category) -> String {
    format!("{}-{}", category.id_prefix(), uuid::Uuid::new_v4().simple())
}

fn created_at(record: &Map<String, Value>, now: DateTime<Utc>) -> Timestamp {
    let Some(raw) = string_field(record, "created_at").filter(|raw| !raw.trim().is_empty()) else {
        return Timestamp::from(now);
    };
    let created = Timestamp::parse(raw);
    if created.instant().is_none() {
        warn!("Keeping unreadable created_at '{}' as given", created);
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedMetrics;
    use crate::types::Cost;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixed() -> Normalizer<FixedMetrics> {
        Normalizer::new(FixedMetrics::new(11, 22))
    }

    #[test]
    fn compute_record_maps_all_fields() {
        let now = Utc::now();
        let records = vec![json!({
            "id": 7,
            "name": "web-1",
            "region": { "slug": "nyc1", "name": "New York 1" },
            "status": "active",
            "created_at": "2023-01-15T10:00:00Z"
        })];

        let set = fixed().normalize_at(Category::Compute, &records, now);
        let created = Timestamp::parse("2023-01-15T10:00:00Z");

        assert_eq!(
            set.fetched,
            vec![Resource::new("7", "web-1", Category::Compute, created)
                .with_region("nyc1")
                .with_status(ResourceStatus::Active)
                .with_usage(11, 22)]
        );
        assert_eq!(set.fetched[0].cost, Cost::new(0.0119, 10.0));
    }

    #[test]
    fn compute_record_fallbacks() {
        let now = Utc::now();
        let records = vec![json!({ "id": 12, "name": "bare" })];

        let resource = &fixed().normalize_at(Category::Compute, &records, now).fetched[0];
        assert_eq!(resource.id, "12");
        assert_eq!(resource.region, "unknown");
        assert_eq!(resource.status, ResourceStatus::Unknown);
        assert_eq!(resource.created_at, Timestamp::from(now));
    }

    #[test]
    fn compute_without_id_gets_synthetic_id() {
        let records = vec![json!({ "name": "no-id" }), json!({ "name": "no-id" })];
        let set = fixed().normalize(Category::Compute, &records);

        assert!(set.fetched[0].id.starts_with("droplet-"));
        assert_ne!(set.fetched[0].id, set.fetched[1].id);
    }

    #[test]
    fn database_record_fallbacks() {
        let now = Utc::now();
        let records = vec![
            json!({
                "id": "9cc10173-e9ea-4176-9dbc-a4cee4c4ff30",
                "name": "pg-main",
                "region": "fra1",
                "status": "online",
                "created_at": "2023-05-01T08:30:00Z"
            }),
            json!({ "name": "pg-bare" }),
        ];

        let set = fixed().normalize_at(Category::Database, &records, now);
        assert_eq!(set.fetched[0].id, "9cc10173-e9ea-4176-9dbc-a4cee4c4ff30");
        assert_eq!(set.fetched[0].region, "fra1");
        assert_eq!(set.fetched[0].status, ResourceStatus::Active);

        let bare = &set.fetched[1];
        assert!(bare.id.starts_with("db-"));
        assert_eq!(bare.region, "unknown");
        assert_eq!(bare.status, ResourceStatus::Active);
        assert_eq!(bare.created_at, Timestamp::from(now));
        assert_eq!(bare.cost, Cost::new(0.0595, 50.0));
    }

    #[test]
    fn domain_ids_are_positional() {
        let now = Utc::now();
        let records = vec![
            json!({ "name": "example.com", "ttl": 1800 }),
            json!({ "name": "example.org", "ttl": 1800 }),
        ];

        let set = Normalizer::simulated().normalize_at(Category::Domain, &records, now);
        let ids: Vec<_> = set.fetched.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["domain-100", "domain-101"]);

        for domain in &set.fetched {
            assert_eq!(domain.region, "Global");
            assert_eq!(domain.status, ResourceStatus::Active);
            assert_eq!((domain.cpu_usage, domain.memory_usage), (0, 0));
            assert_eq!(domain.cost, Cost::FREE);
            assert_eq!(domain.created_at, Timestamp::from(now));
        }
    }

    #[test]
    fn missing_name_is_kept_empty() {
        let set = fixed().normalize(Category::Compute, &[json!({ "id": 3 })]);
        assert_eq!(set.fetched.len(), 1);
        assert_eq!(set.fetched[0].name, "");
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let records = vec![json!(42), json!({ "id": 1, "name": "a" }), json!(null)];
        let set = fixed().normalize(Category::Compute, &records);
        assert_eq!(set.fetched.len(), 1);
        assert_eq!(set.fetched[0].id, "1");
    }

    #[test]
    fn unreadable_timestamp_is_kept_as_given() {
        let now = Utc::now();
        let records = vec![
            json!({ "id": 1, "name": "a", "created_at": "yesterday" }),
            json!({ "id": 2, "name": "b", "created_at": "" }),
        ];
        let set = fixed().normalize_at(Category::Compute, &records, now);
        assert_eq!(set.fetched[0].created_at.as_str(), "yesterday");
        assert_eq!(set.fetched[0].created_at.instant(), None);
        assert_eq!(set.fetched[1].created_at, Timestamp::from(now));
    }

    #[test]
    fn upstream_timestamps_serialize_unchanged() {
        let now = Utc::now();
        let inputs = [
            "2023-01-15T10:00:00+02:00",
            "2023-01-15T10:00:00.000Z",
            "2023-01-15T10:00:00",
        ];
        let records: Vec<_> = inputs
            .iter()
            .enumerate()
            .map(|(i, created)| json!({ "id": i, "name": "web", "created_at": created }))
            .collect();

        for category in [Category::Compute, Category::Database] {
            let set = fixed().normalize_at(category, &records, now);
            let written: Vec<Value> = set
                .fetched
                .iter()
                .map(|r| serde_json::to_value(r).unwrap()["createdAt"].clone())
                .collect();
            let expected: Vec<Value> = inputs.iter().map(|s| json!(s)).collect();
            assert_eq!(written, expected);
            assert!(set.fetched.iter().all(|r| r.created_at.instant().is_some()));
        }
    }

    #[test]
    fn empty_input_still_has_defaults() {
        let set = fixed().normalize(Category::Database, &[]);
        assert!(set.fetched.is_empty());
        assert_eq!(set.defaults, placeholders(Category::Database));
    }

    #[test]
    fn select_follows_policy() {
        let empty = fixed().normalize(Category::Domain, &[]);
        assert_eq!(
            empty.clone().select(FallbackPolicy::DefaultsWhenEmpty).len(),
            3
        );
        assert!(empty.select(FallbackPolicy::LiveOnly).is_empty());

        let live = fixed().normalize(Category::Domain, &[json!({ "name": "a.io" })]);
        let selected = live.select(FallbackPolicy::DefaultsWhenEmpty);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "a.io");
    }
}
