//! Resource detail records
//!
//! Extends a normalized `Resource` with hardware, metric summaries and log
//! lines for the detail view.

use crate::metrics::{MetricKind, MetricPoint, MetricSource, HISTORY_POINTS};
use crate::placeholder::find_placeholder;
use crate::timestamp::Timestamp;
use crate::types::{Category, Cost, Resource, ResourceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name shown for ids that resolve to nothing
pub const UNKNOWN_RESOURCE_NAME: &str = "Unknown Resource";

/// Hardware profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    /// Virtual CPUs
    pub vcpus: u32,
    /// Memory in GB
    pub memory_gb: u32,
    /// Disk in GB
    pub disk_gb: u32,
    /// Storage medium
    pub storage_type: String,
}

impl Hardware {
    fn new(vcpus: u32, memory_gb: u32, disk_gb: u32, storage_type: &str) -> Self {
        Self {
            vcpus,
            memory_gb,
            disk_gb,
            storage_type: storage_type.to_string(),
        }
    }

    /// Default profile for a category
    #[must_use]
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Compute => Self::new(1, 2, 50, "SSD"),
            Category::Database => Self::new(2, 4, 100, "SSD"),
            Category::Domain => Self::new(0, 0, 0, "N/A"),
        }
    }

    /// Profile for an unresolved id
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(0, 0, 0, "unknown")
    }
}

/// Current, average and peak of one metric plus its history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Latest value
    pub current: u8,
    /// Mean over the history
    pub average: u8,
    /// Highest value seen
    pub peak: u8,
    /// Hourly samples, oldest first
    pub history: Vec<MetricPoint>,
}

impl MetricSummary {
    /// Summarize a history around a current value
    #[must_use]
    pub fn from_history(current: u8, history: Vec<MetricPoint>) -> Self {
        let (sum, peak) = history
            .iter()
            .fold((0u64, current), |(sum, peak), p| (sum + u64::from(p.value), peak.max(p.value)));
        let average = if history.is_empty() {
            current
        } else {
            let len = history.len() as u64;
            u8::try_from((sum + len / 2) / len).unwrap_or(100)
        };
        Self {
            current,
            average,
            peak,
            history,
        }
    }

    fn fixed(current: u8, average: u8, peak: u8, history: Vec<MetricPoint>) -> Self {
        Self {
            current,
            average,
            peak,
            history,
        }
    }
}

/// CPU and memory summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    /// CPU
    pub cpu: MetricSummary,
    /// Memory
    pub memory: MetricSummary,
}

/// Detail view record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetails {
    /// Resource id
    pub id: String,
    /// Resource name
    pub name: String,
    /// Category, absent for unresolved ids
    pub category: Option<Category>,
    /// Region
    pub region: String,
    /// Status
    pub status: ResourceStatus,
    /// Creation time as the upstream wrote it
    pub created_at: Timestamp,
    /// Cost
    pub cost: Cost,
    /// Hardware profile
    pub hardware: Hardware,
    /// Metric summaries
    pub metrics: ResourceMetrics,
    /// Public address, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Recent log lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,
}

impl ResourceDetails {
    /// Describe a normalized resource
    #[must_use]
    pub fn describe(resource: &Resource, source: &dyn MetricSource, now: DateTime<Utc>) -> Self {
        let history = |kind| source.history(resource.category, &resource.id, kind, now, HISTORY_POINTS);
        let metrics = ResourceMetrics {
            cpu: MetricSummary::from_history(resource.cpu_usage, history(MetricKind::Cpu)),
            memory: MetricSummary::from_history(resource.memory_usage, history(MetricKind::Memory)),
        };

        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
            category: Some(resource.category),
            region: resource.region.clone(),
            status: resource.status,
            created_at: resource.created_at.clone(),
            cost: resource.cost,
            hardware: Hardware::for_category(resource.category),
            metrics,
            ip_address: None,
            logs: Vec::new(),
        }
    }

    /// Record for an id that resolves to nothing
    #[must_use]
    pub fn unknown(id: impl Into<String>, source: &dyn MetricSource, now: DateTime<Utc>) -> Self {
        let id = id.into();
        let history = |kind| source.history(Category::Compute, &id, kind, now, HISTORY_POINTS);
        let metrics = ResourceMetrics {
            cpu: MetricSummary::fixed(0, 0, 0, history(MetricKind::Cpu)),
            memory: MetricSummary::fixed(0, 0, 0, history(MetricKind::Memory)),
        };

        Self {
            name: UNKNOWN_RESOURCE_NAME.to_string(),
            category: None,
            region: "unknown".to_string(),
            status: ResourceStatus::Unknown,
            created_at: Timestamp::from(now),
            cost: Cost::FREE,
            hardware: Hardware::unknown(),
            metrics,
            ip_address: None,
            logs: Vec::new(),
            id,
        }
    }

    /// Resolve details for an id
    ///
    /// Placeholder ids with a recorded profile win, then any resource in
    /// `known`, then the unknown record.
    #[must_use]
    pub fn lookup(
        id: &str,
        known: &[Resource],
        source: &dyn MetricSource,
        now: DateTime<Utc>,
    ) -> Self {
        if let Some(details) = placeholder_details(id, source, now) {
            return details;
        }
        match known.iter().find(|r| r.id == id) {
            Some(resource) => Self::describe(resource, source, now),
            None => Self::unknown(id, source, now),
        }
    }
}

struct Profile {
    hardware: Hardware,
    cpu: (u8, u8, u8),
    memory: (u8, u8, u8),
    ip_address: Option<&'static str>,
    logs: &'static [&'static str],
}

const DROPLET_LOGS: &[&str] = &[
    "2023-04-15T10:00:00Z [INFO] System started",
    "2023-04-15T10:05:23Z [INFO] Nginx service started",
    "2023-04-15T11:15:45Z [WARN] High CPU usage detected",
    "2023-04-15T12:30:12Z [INFO] Backup completed successfully",
    "2023-04-15T14:22:36Z [ERROR] Failed to connect to database",
    "2023-04-15T14:25:18Z [INFO] Database connection restored",
    "2023-04-15T16:45:02Z [INFO] System update available",
    "2023-04-15T18:12:45Z [INFO] Scheduled maintenance started",
    "2023-04-15T18:30:22Z [INFO] Scheduled maintenance completed",
];

const DATABASE_LOGS: &[&str] = &[
    "2023-04-15T10:00:00Z [INFO] Database started",
    "2023-04-15T10:05:23Z [INFO] Connection pool initialized",
    "2023-04-15T11:15:45Z [WARN] Slow query detected",
    "2023-04-15T12:30:12Z [INFO] Backup completed successfully",
    "2023-04-15T14:22:36Z [ERROR] Connection timeout",
    "2023-04-15T14:25:18Z [INFO] Connection restored",
    "2023-04-15T16:45:02Z [INFO] Index optimization completed",
    "2023-04-15T18:12:45Z [INFO] Vacuum process started",
    "2023-04-15T18:30:22Z [INFO] Vacuum process completed",
];

fn profile(id: &str) -> Option<Profile> {
    match id {
        "droplet-1" => Some(Profile {
            hardware: Hardware::new(1, 2, 50, "SSD"),
            cpu: (42, 38, 87),
            memory: (58, 52, 76),
            ip_address: Some("192.168.1.101"),
            logs: DROPLET_LOGS,
        }),
        "domain-1" => Some(Profile {
            hardware: Hardware::new(0, 0, 0, "N/A"),
            cpu: (0, 0, 0),
            memory: (0, 0, 0),
            ip_address: Some("192.168.1.100"),
            logs: &[],
        }),
        "db-1" => Some(Profile {
            hardware: Hardware::new(2, 4, 100, "SSD"),
            cpu: (35, 32, 68),
            memory: (42, 40, 65),
            ip_address: None,
            logs: DATABASE_LOGS,
        }),
        _ => None,
    }
}

fn placeholder_details(
    id: &str,
    source: &dyn MetricSource,
    now: DateTime<Utc>,
) -> Option<ResourceDetails> {
    let profile = profile(id)?;
    let resource = find_placeholder(id)?;
    let history = |kind| source.history(resource.category, id, kind, now, HISTORY_POINTS);
    let (cpu, memory) = (profile.cpu, profile.memory);

    let mut details = ResourceDetails::describe(&resource, source, now);
    details.hardware = profile.hardware;
    details.metrics = ResourceMetrics {
        cpu: MetricSummary::fixed(cpu.0, cpu.1, cpu.2, history(MetricKind::Cpu)),
        memory: MetricSummary::fixed(memory.0, memory.1, memory.2, history(MetricKind::Memory)),
    };
    details.ip_address = profile.ip_address.map(str::to_string);
    details.logs = profile.logs.iter().map(|line| (*line).to_string()).collect();
    Some(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{FixedMetrics, SimulatedMetrics};

    #[test]
    fn placeholder_profile_wins() {
        let details = ResourceDetails::lookup("droplet-1", &[], &SimulatedMetrics, Utc::now());
        assert_eq!(details.name, "web-server-prod-01");
        assert_eq!(details.hardware, Hardware::new(1, 2, 50, "SSD"));
        assert_eq!(details.metrics.cpu.peak, 87);
        assert_eq!(details.metrics.cpu.history.len(), HISTORY_POINTS);
        assert_eq!(details.ip_address.as_deref(), Some("192.168.1.101"));
        assert_eq!(details.logs.len(), 9);
    }

    #[test]
    fn domain_placeholder_has_flat_history() {
        let details = ResourceDetails::lookup("domain-1", &[], &SimulatedMetrics, Utc::now());
        assert_eq!(details.hardware.storage_type, "N/A");
        assert!(details.metrics.memory.history.iter().all(|p| p.value == 0));
        assert!(details.logs.is_empty());
    }

    #[test]
    fn known_resource_uses_category_profile() {
        let now = Utc::now();
        let resource = Resource::new("42", "api", Category::Compute, now).with_usage(90, 10);
        let details = ResourceDetails::lookup("42", &[resource], &FixedMetrics::new(30, 50), now);

        assert_eq!(details.category, Some(Category::Compute));
        assert_eq!(details.hardware, Hardware::for_category(Category::Compute));
        assert_eq!(details.metrics.cpu.current, 90);
        assert_eq!(details.metrics.cpu.average, 30);
        assert_eq!(details.metrics.cpu.peak, 90);
        assert_eq!(details.metrics.memory.peak, 50);
    }

    #[test]
    fn unknown_id_yields_unknown_record() {
        let now = Utc::now();
        let details = ResourceDetails::lookup("nope", &[], &SimulatedMetrics, now);
        assert_eq!(details.id, "nope");
        assert_eq!(details.name, UNKNOWN_RESOURCE_NAME);
        assert_eq!(details.category, None);
        assert_eq!(details.status, ResourceStatus::Unknown);
        assert_eq!(details.created_at, Timestamp::from(now));
        assert_eq!(details.metrics.cpu.current, 0);
    }

    #[test]
    fn summary_of_empty_history() {
        let summary = MetricSummary::from_history(12, Vec::new());
        assert_eq!((summary.current, summary.average, summary.peak), (12, 12, 12));
    }
}
