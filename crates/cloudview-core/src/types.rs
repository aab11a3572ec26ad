//! Core types for Cloudview
//!
//! Defines the uniform shape the display layer consumes:
//! - Resource categories and their upstream vocabulary
//! - Resource status
//! - Per-category cost constants
//! - The normalized `Resource` record

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource category (fixed at fetch time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Virtual machine ("droplet" upstream)
    Compute,
    /// DNS domain
    Domain,
    /// Managed database cluster
    Database,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [Category::Compute, Category::Domain, Category::Database];

    /// Name used in the normalized record
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Compute => "compute",
            Category::Domain => "domain",
            Category::Database => "database",
        }
    }

    /// Upstream collection path segment and response key
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::Compute => "droplets",
            Category::Domain => "domains",
            Category::Database => "databases",
        }
    }

    /// Prefix for synthesized ids
    #[inline]
    #[must_use]
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::Compute => "droplet",
            Category::Domain => "domain",
            Category::Database => "db",
        }
    }

    /// Fixed per-category cost
    #[inline]
    #[must_use]
    pub fn cost(&self) -> Cost {
        match self {
            Category::Compute => Cost::new(0.0119, 10.0),
            Category::Domain => Cost::FREE,
            Category::Database => Cost::new(0.0595, 50.0),
        }
    }

    /// Whether resources of this category report live usage
    #[inline]
    #[must_use]
    pub fn has_usage(&self) -> bool {
        !matches!(self, Category::Domain)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compute" | "droplets" | "droplet" => Ok(Category::Compute),
            "domain" | "domains" => Ok(Category::Domain),
            "database" | "databases" | "db" => Ok(Category::Database),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// Resource status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Running / online
    Active,
    /// Powered off
    Off,
    /// Archived
    Archived,
    /// Anything else, or absent
    #[default]
    Unknown,
}

impl ResourceStatus {
    /// Parse an upstream status string
    ///
    /// Unrecognized values map to `Unknown`.
    #[must_use]
    pub fn from_upstream(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" | "online" => ResourceStatus::Active,
            "off" => ResourceStatus::Off,
            "archived" | "archive" => ResourceStatus::Archived,
            _ => ResourceStatus::Unknown,
        }
    }

    /// Status name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Active => "active",
            ResourceStatus::Off => "off",
            ResourceStatus::Archived => "archived",
            ResourceStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource cost (per-category constant, not derived from upstream)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cost {
    /// Hourly price in USD
    pub hourly: f64,
    /// Monthly price in USD
    pub monthly: f64,
}

impl Cost {
    /// Zero cost
    pub const FREE: Cost = Cost {
        hourly: 0.0,
        monthly: 0.0,
    };

    /// Create new cost
    #[inline]
    #[must_use]
    pub const fn new(hourly: f64, monthly: f64) -> Self {
        Self { hourly, monthly }
    }
}

/// Normalized resource record
///
/// Constructed fresh on every poll cycle. Identity across cycles is only
/// `id` equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique within its category, never empty
    pub id: String,
    /// Human-readable label
    pub name: String,
    /// Resource category
    pub category: Category,
    /// Region slug, `"unknown"` or `"Global"`
    pub region: String,
    /// Resource status
    pub status: ResourceStatus,
    /// CPU usage percentage in `[0, 100]`
    pub cpu_usage: u8,
    /// Memory usage percentage in `[0, 100]`
    pub memory_usage: u8,
    /// Creation time as the upstream wrote it
    pub created_at: Timestamp,
    /// Cost
    pub cost: Cost,
}

impl Resource {
    /// Create a resource with the category's cost and zero usage
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        created_at: impl Into<Timestamp>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            region: "unknown".to_string(),
            status: ResourceStatus::Unknown,
            cpu_usage: 0,
            memory_usage: 0,
            created_at: created_at.into(),
            cost: category.cost(),
        }
    }

    /// With region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    /// With usage, clamped to `[0, 100]`
    #[inline]
    #[must_use]
    pub fn with_usage(mut self, cpu: u8, memory: u8) -> Self {
        self.cpu_usage = cpu.min(100);
        self.memory_usage = memory.min(100);
        self
    }

    /// With cost
    #[inline]
    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }
}
