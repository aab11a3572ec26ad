//! Placeholder records
//!
//! Fixed sample data returned next to every live set, so a caller can keep
//! a populated view when the upstream call fails or returns nothing.

use crate::types::{Category, Cost, Resource, ResourceStatus};
use chrono::{DateTime, TimeZone, Utc};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Placeholder records for a category
#[must_use]
pub fn placeholders(category: Category) -> Vec<Resource> {
    match category {
        Category::Compute => vec![
            Resource::new("droplet-1", "web-server-prod-01", category, at(2023, 1, 15, 10, 0))
                .with_region("nyc1")
                .with_status(ResourceStatus::Active)
                .with_usage(42, 58),
            Resource::new("droplet-2", "db-server-prod-01", category, at(2023, 2, 20, 14, 30))
                .with_region("sfo2")
                .with_status(ResourceStatus::Active)
                .with_usage(78, 82)
                .with_cost(Cost::new(0.0238, 20.0)),
            Resource::new("droplet-3", "cache-server-prod-01", category, at(2023, 3, 10, 9, 15))
                .with_region("ams3")
                .with_status(ResourceStatus::Off),
        ],
        Category::Database => vec![
            Resource::new("db-1", "postgres-prod-01", category, at(2023, 1, 25, 13, 10))
                .with_region("nyc1")
                .with_status(ResourceStatus::Active)
                .with_usage(35, 42),
        ],
        Category::Domain => [
            ("domain-1", "example.com", at(2023, 1, 5, 11, 20)),
            ("domain-2", "test-api.com", at(2023, 2, 15, 16, 45)),
            ("domain-3", "anjali.com", at(2023, 2, 20, 12, 0)),
        ]
        .into_iter()
        .map(|(id, name, created_at)| {
            Resource::new(id, name, category, created_at)
                .with_region("Global")
                .with_status(ResourceStatus::Active)
        })
        .collect(),
    }
}

/// Find a placeholder record by id in any category
#[must_use]
pub fn find_placeholder(id: &str) -> Option<Resource> {
    Category::ALL
        .into_iter()
        .flat_map(placeholders)
        .find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_counts() {
        assert_eq!(placeholders(Category::Compute).len(), 3);
        assert_eq!(placeholders(Category::Database).len(), 1);
        assert_eq!(placeholders(Category::Domain).len(), 3);
    }

    #[test]
    fn placeholders_are_deterministic() {
        for category in Category::ALL {
            assert_eq!(placeholders(category), placeholders(category));
        }
    }

    #[test]
    fn placeholders_match_their_category() {
        for category in Category::ALL {
            for resource in placeholders(category) {
                assert_eq!(resource.category, category);
                assert!(!resource.id.is_empty());
                assert!(resource.cpu_usage <= 100 && resource.memory_usage <= 100);
            }
        }
    }

    #[test]
    fn compute_placeholder_values() {
        let compute = placeholders(Category::Compute);
        assert_eq!(compute[0].created_at.as_str(), "2023-01-15T10:00:00Z");
        assert_eq!(compute[1].cost, Cost::new(0.0238, 20.0));
        assert_eq!(compute[2].status, ResourceStatus::Off);
        assert_eq!(compute[2].cpu_usage, 0);
    }

    #[test]
    fn find_placeholder_across_categories() {
        assert_eq!(find_placeholder("db-1").unwrap().name, "postgres-prod-01");
        assert_eq!(find_placeholder("domain-3").unwrap().region, "Global");
        assert!(find_placeholder("droplet-9").is_none());
    }
}
