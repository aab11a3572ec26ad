//! View state published to the presentation layer

use chrono::{DateTime, Utc};
use cloudview_core::{Category, CloudError, Resource};
use serde::Serialize;

/// Lifecycle of a view
///
/// `Idle → Loading → Ready ⇄ Ready (poll ticks) → Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPhase {
    /// Constructed, no cycle started
    Idle,
    /// First cycle after activation in flight
    Loading,
    /// At least one cycle applied
    Ready,
    /// Deactivated; no further mutation
    Terminated,
}

/// Current content of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    /// Category shown
    pub category: Category,
    /// Resources, replaced wholesale each cycle
    pub resources: Vec<Resource>,
    /// True only during the first cycle after activation
    pub loading: bool,
    /// Lifecycle phase
    pub phase: ViewPhase,
    /// Bumped on activation and category change; stale cycles are discarded
    pub generation: u64,
    /// Last fatal read error (configuration)
    #[serde(skip)]
    pub error: Option<CloudError>,
    /// Time the last cycle was applied
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl ViewSnapshot {
    /// Empty, idle snapshot
    #[must_use]
    pub fn idle(category: Category) -> Self {
        Self {
            category,
            resources: Vec::new(),
            loading: false,
            phase: ViewPhase::Idle,
            generation: 0,
            error: None,
            refreshed_at: None,
        }
    }

    /// Find a resource by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Whether a resource with this id is shown
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Whether the view has been deactivated
    #[inline]
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.phase == ViewPhase::Terminated
    }
}
