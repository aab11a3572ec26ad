use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use cloudview_core::{Category, FixedMetrics, Normalizer, ResourceStatus, SimulatedMetrics};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Compute),
        Just(Category::Domain),
        Just(Category::Database)
    ]
}

fn id_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        (0u64..1_000_000).prop_map(|n| Some(json!(n))),
        "[a-z0-9-]{0,12}".prop_map(|s| Some(json!(s))),
    ]
}

fn region_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        "[a-z]{3}[0-9]".prop_map(|s| Some(json!(s))),
        "[a-z]{3}[0-9]".prop_map(|s| Some(json!({ "slug": s }))),
        Just(Some(json!({ "name": "no slug" }))),
    ]
}

fn status_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        prop::sample::select(vec!["active", "off", "archive", "new", "online", ""])
            .prop_map(|s| Some(json!(s))),
        Just(Some(json!(3))),
    ]
}

fn created_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        (0i64..2_000_000_000).prop_map(|secs| {
            let ts = Utc.timestamp_opt(secs, 0).unwrap();
            Some(json!(ts.to_rfc3339()))
        }),
        (0i64..2_000_000_000, -12i32..=14).prop_map(|(secs, hours)| {
            let offset = FixedOffset::east_opt(hours * 3600).unwrap();
            Some(json!(Utc.timestamp_opt(secs, 0).unwrap().with_timezone(&offset).to_rfc3339()))
        }),
        (0i64..2_000_000_000).prop_map(|secs| {
            let ts = Utc.timestamp_opt(secs, 0).unwrap();
            Some(json!(ts.format("%Y-%m-%dT%H:%M:%S").to_string()))
        }),
        Just(Some(json!("not a date"))),
    ]
}

fn record() -> impl Strategy<Value = Value> {
    (
        id_value(),
        prop::option::of("[a-z][a-z0-9.-]{0,20}"),
        region_value(),
        status_value(),
        created_value(),
    )
        .prop_map(|(id, name, region, status, created_at)| {
            let mut map = Map::new();
            let fields = [
                ("id", id),
                ("name", name.map(Value::String)),
                ("region", region),
                ("status", status),
                ("created_at", created_at),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    map.insert(key.to_string(), value);
                }
            }
            Value::Object(map)
        })
}

fn upstream() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(prop_oneof![9 => record(), 1 => Just(json!("garbage"))], 0..12)
}

proptest! {
    #[test]
    fn every_record_keeps_its_category(category in category(), records in upstream()) {
        let set = Normalizer::simulated().normalize(category, &records);
        for resource in set.fetched.iter().chain(set.defaults.iter()) {
            prop_assert_eq!(resource.category, category);
        }
    }

    #[test]
    fn usage_is_always_a_percentage(category in category(), records in upstream()) {
        let set = Normalizer::new(SimulatedMetrics).normalize(category, &records);
        for resource in &set.fetched {
            prop_assert!(resource.cpu_usage <= 100);
            prop_assert!(resource.memory_usage <= 100);
        }
    }

    #[test]
    fn ids_are_never_empty(category in category(), records in upstream()) {
        let set = Normalizer::simulated().normalize(category, &records);
        for resource in &set.fetched {
            prop_assert!(!resource.id.is_empty());
        }
    }

    #[test]
    fn object_records_are_never_dropped(category in category(), records in upstream()) {
        let objects = records.iter().filter(|r| r.is_object()).count();
        let set = Normalizer::simulated().normalize(category, &records);
        prop_assert_eq!(set.fetched.len(), objects);
    }

    #[test]
    fn upstream_creation_text_is_kept(
        category in prop_oneof![Just(Category::Compute), Just(Category::Database)],
        records in upstream(),
    ) {
        let objects: Vec<&Value> = records.iter().filter(|r| r.is_object()).collect();
        let set = Normalizer::simulated().normalize(category, &records);
        for (record, resource) in objects.iter().zip(&set.fetched) {
            if let Some(raw) = record.get("created_at").and_then(Value::as_str) {
                prop_assert_eq!(resource.created_at.as_str(), raw);
                let json = serde_json::to_value(resource).unwrap();
                prop_assert_eq!(json["createdAt"].as_str(), Some(raw));
            }
        }
    }

    #[test]
    fn normalizing_twice_differs_only_in_placeholders(records in upstream()) {
        // Records with upstream ids normalize identically apart from usage.
        let now = Utc::now();
        let with_ids: Vec<Value> = records
            .into_iter()
            .filter(|r| r.get("id").is_some_and(|id| id.is_u64()))
            .collect();

        let normalizer = Normalizer::simulated();
        let mut first = normalizer.normalize_at(Category::Compute, &with_ids, now).fetched;
        let mut second = normalizer.normalize_at(Category::Compute, &with_ids, now).fetched;
        for resource in first.iter_mut().chain(second.iter_mut()) {
            resource.cpu_usage = 0;
            resource.memory_usage = 0;
        }
        prop_assert_eq!(first, second);
    }
}

#[test]
fn complete_records_round_trip() {
    let created = "2023-06-01T12:34:56Z";
    let expected_created: DateTime<Utc> = DateTime::parse_from_rfc3339(created)
        .unwrap()
        .with_timezone(&Utc);
    let normalizer = Normalizer::new(FixedMetrics::new(1, 2));

    let compute = normalizer.normalize(
        Category::Compute,
        &[json!({
            "id": 3164494,
            "name": "example.com",
            "region": { "slug": "nyc3" },
            "status": "off",
            "created_at": created
        })],
    );
    let r = &compute.fetched[0];
    assert_eq!(
        (r.id.as_str(), r.name.as_str(), r.region.as_str(), r.status, r.created_at.instant()),
        ("3164494", "example.com", "nyc3", ResourceStatus::Off, Some(expected_created))
    );

    let database = normalizer.normalize(
        Category::Database,
        &[json!({
            "id": "db-cluster-1",
            "name": "pg",
            "region": "ams3",
            "status": "archived",
            "created_at": created
        })],
    );
    let r = &database.fetched[0];
    assert_eq!(
        (r.id.as_str(), r.name.as_str(), r.region.as_str(), r.status, r.created_at.instant()),
        ("db-cluster-1", "pg", "ams3", ResourceStatus::Archived, Some(expected_created))
    );
}
