//! Usage metric sources
//!
//! The upstream API does not return live utilization with the resource
//! listing, so normalization asks a `MetricSource` for usage values. The
//! simulated source stands in for real telemetry; a real source implements
//! the same trait.

use crate::types::Category;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of points in a metric history (one per hour)
pub const HISTORY_POINTS: usize = 24;

/// Point-in-time CPU and memory usage, both in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageSample {
    /// CPU percentage
    pub cpu: u8,
    /// Memory percentage
    pub memory: u8,
}

impl UsageSample {
    /// Zero usage
    pub const IDLE: UsageSample = UsageSample { cpu: 0, memory: 0 };

    /// Create sample, clamping both values to 100
    #[inline]
    #[must_use]
    pub fn new(cpu: u8, memory: u8) -> Self {
        Self {
            cpu: cpu.min(100),
            memory: memory.min(100),
        }
    }
}

/// Which metric a history describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// CPU usage
    Cpu,
    /// Memory usage
    Memory,
}

/// One history sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Sample time
    pub timestamp: DateTime<Utc>,
    /// Percentage in `[0, 100]`
    pub value: u8,
}

/// Source of usage values for normalized resources
pub trait MetricSource: Send + Sync {
    /// Current usage for a resource
    fn sample(&self, category: Category, resource_id: &str) -> UsageSample;

    /// Hourly history ending at `now`, oldest first
    fn history(
        &self,
        category: Category,
        resource_id: &str,
        metric: MetricKind,
        now: DateTime<Utc>,
        points: usize,
    ) -> Vec<MetricPoint> {
        hourly_timestamps(now, points)
            .map(|timestamp| {
                let sample = self.sample(category, resource_id);
                let value = match metric {
                    MetricKind::Cpu => sample.cpu,
                    MetricKind::Memory => sample.memory,
                };
                MetricPoint { timestamp, value }
            })
            .collect()
    }
}

impl<M: MetricSource + ?Sized> MetricSource for std::sync::Arc<M> {
    fn sample(&self, category: Category, resource_id: &str) -> UsageSample {
        (**self).sample(category, resource_id)
    }

    fn history(
        &self,
        category: Category,
        resource_id: &str,
        metric: MetricKind,
        now: DateTime<Utc>,
        points: usize,
    ) -> Vec<MetricPoint> {
        (**self).history(category, resource_id, metric, now, points)
    }
}

fn hourly_timestamps(now: DateTime<Utc>, points: usize) -> impl Iterator<Item = DateTime<Utc>> {
    (0..points).map(move |i| {
        let hours_back = i64::try_from(points - 1 - i).unwrap_or(i64::MAX);
        now - Duration::hours(hours_back)
    })
}

/// Simulated metrics: uniformly random placeholders
///
/// Categories without usage (domains) always report zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMetrics;

impl SimulatedMetrics {
    /// Lower bound (inclusive) of simulated history values
    pub const HISTORY_MIN: u8 = 20;
    /// Upper bound (exclusive) of simulated history values
    pub const HISTORY_MAX: u8 = 80;
}

impl MetricSource for SimulatedMetrics {
    fn sample(&self, category: Category, _resource_id: &str) -> UsageSample {
        if !category.has_usage() {
            return UsageSample::IDLE;
        }
        let mut rng = rand::rng();
        UsageSample::new(rng.random_range(0..=100), rng.random_range(0..=100))
    }

    fn history(
        &self,
        category: Category,
        _resource_id: &str,
        _metric: MetricKind,
        now: DateTime<Utc>,
        points: usize,
    ) -> Vec<MetricPoint> {
        let mut rng = rand::rng();
        hourly_timestamps(now, points)
            .map(|timestamp| MetricPoint {
                timestamp,
                value: if category.has_usage() {
                    rng.random_range(Self::HISTORY_MIN..Self::HISTORY_MAX)
                } else {
                    0
                },
            })
            .collect()
    }
}

/// Deterministic metrics: the same sample for every resource with usage
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMetrics(pub UsageSample);

impl FixedMetrics {
    /// Create fixed source
    #[inline]
    #[must_use]
    pub fn new(cpu: u8, memory: u8) -> Self {
        Self(UsageSample::new(cpu, memory))
    }
}

impl MetricSource for FixedMetrics {
    fn sample(&self, category: Category, _resource_id: &str) -> UsageSample {
        if category.has_usage() {
            self.0
        } else {
            UsageSample::IDLE
        }
    }
}
