//! Dashboard overview aggregation

use crate::types::{Resource, ResourceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary numbers shown above the resource lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Number of resources across all categories
    pub total_resources: usize,
    /// Mean CPU usage of resources that report usage
    pub cpu_usage: u8,
    /// Mean memory usage of resources that report usage
    pub memory_usage: u8,
    /// Time since the oldest active resource was created, `"{d}d {h}h {m}m"`
    pub total_uptime: String,
}

impl Overview {
    /// Aggregate a set of resources
    #[must_use]
    pub fn from_resources<'a>(
        resources: impl IntoIterator<Item = &'a Resource>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut total = 0usize;
        let mut measured = 0u64;
        let mut cpu_sum = 0u64;
        let mut memory_sum = 0u64;
        let mut oldest_active: Option<DateTime<Utc>> = None;

        for resource in resources {
            total += 1;
            if resource.category.has_usage() {
                measured += 1;
                cpu_sum += u64::from(resource.cpu_usage);
                memory_sum += u64::from(resource.memory_usage);
            }
            if resource.status == ResourceStatus::Active {
                if let Some(created) = resource.created_at.instant() {
                    oldest_active = Some(oldest_active.map_or(created, |oldest| oldest.min(created)));
                }
            }
        }

        let uptime = oldest_active.map_or(chrono::Duration::zero(), |oldest| now - oldest);

        Self {
            total_resources: total,
            cpu_usage: rounded_mean(cpu_sum, measured),
            memory_usage: rounded_mean(memory_sum, measured),
            total_uptime: format_uptime(uptime),
        }
    }
}

fn rounded_mean(sum: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    u8::try_from((sum + count / 2) / count).unwrap_or(100).min(100)
}

/// Format a duration as `"{d}d {h}h {m}m"`; negative durations format as zero
#[must_use]
pub fn format_uptime(uptime: chrono::Duration) -> String {
    let minutes = uptime.num_minutes().max(0);
    format!(
        "{}d {}h {}m",
        minutes / (24 * 60),
        (minutes / 60) % 24,
        minutes % 60
    )
}
