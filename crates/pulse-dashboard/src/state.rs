//! Read-model state shared between the fetch components and the view layer.
//!
//! Each slice is written by exactly one component; the view layer only ever
//! reads cloned snapshots.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use pulse_api::types::{AqiReport, SavedLocation, WeatherAlert, WeatherBundle};

use crate::suggest::SuggestionCandidate;

/// How the current value for a resource was obtained.
///
/// Exactly one outcome is visible per resource at a time; `Stale` and
/// `Failed` are mutually exclusive terminal states for a fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Live network result from the current operation.
    Fresh(T),
    /// Cache fallback after a failed live call.
    Stale {
        value: T,
        served_at: DateTime<Utc>,
    },
    /// Live call failed and no usable cache entry existed.
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// The displayable value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            FetchOutcome::Fresh(value) | FetchOutcome::Stale { value, .. } => Some(value),
            FetchOutcome::Failed(_) => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FetchOutcome::Stale { .. })
    }

    /// The error message for a failed fetch, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One dashboard resource slice.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub loading: bool,
    pub outcome: Option<FetchOutcome<T>>,
    /// Degraded-mode banner ("Showing cached ..."); set only when the
    /// fallback should be announced.
    pub notice: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            outcome: None,
            notice: None,
        }
    }
}

impl<T> ResourceState<T> {
    /// Enter the loading state, clearing the prior value, error and notice.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.outcome = None;
        self.notice = None;
    }

    pub fn value(&self) -> Option<&T> {
        self.outcome.as_ref().and_then(FetchOutcome::value)
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(FetchOutcome::error)
    }
}

/// Suggestion slice: the candidates of the most recent completed cycle.
#[derive(Debug, Clone, Default)]
pub struct SuggestState {
    pub loading: bool,
    pub items: Vec<SuggestionCandidate>,
    pub error: Option<String>,
}

/// Comparison entry for one saved location.
#[derive(Debug, Clone)]
pub struct CompareEntry {
    pub location: SavedLocation,
    pub weather: WeatherBundle,
}

/// Comparison slice, keyed by saved-location id.
#[derive(Debug, Clone, Default)]
pub struct CompareState {
    pub loading: bool,
    pub entries: HashMap<i64, CompareEntry>,
    pub error: Option<String>,
}

/// The dashboard read model.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub weather: ResourceState<WeatherBundle>,
    pub air_quality: ResourceState<AqiReport>,
    pub alerts: ResourceState<Vec<WeatherAlert>>,
    pub suggest: SuggestState,
    pub compare: CompareState,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_outcome_value_access() {
        let fresh = FetchOutcome::Fresh(1);
        assert_eq!(fresh.value(), Some(&1));
        assert!(!fresh.is_stale());

        let stale = FetchOutcome::Stale {
            value: 2,
            served_at: Utc::now(),
        };
        assert_eq!(stale.value(), Some(&2));
        assert!(stale.is_stale());

        let failed: FetchOutcome<i32> = FetchOutcome::Failed("nope".into());
        assert_eq!(failed.value(), None);
        assert_eq!(failed.error(), Some("nope"));
    }

    #[test]
    fn test_begin_clears_prior_state() {
        let mut slice: ResourceState<i32> = ResourceState::default();
        slice.outcome = Some(FetchOutcome::Failed("old error".into()));
        slice.notice = Some("old notice".into());

        slice.begin();

        assert!(slice.loading);
        assert!(slice.outcome.is_none());
        assert!(slice.notice.is_none());
    }
}
