//! Dashboard selection state and its transitions.
//!
//! The view owns one [`Selection`]; controls and chart brushing turn into
//! [`SelectionAction`]s applied here. No transition is terminal.

use serde::{Deserialize, Serialize};
use topsql_types::TimeRange;

use crate::query::SeriesKey;

/// Current control values. Empty strings come from placeholder options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub instance: Option<String>,
    /// Cardinality cap; `Some("")` means no cap
    pub top: Option<String>,
    /// Bucket width label, passed through to the backend
    pub window: Option<String>,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    SelectInstance(String),
    SelectTop(String),
    SelectWindow(String),
    /// Drag-selection on the chart's time axis
    BrushTimeRange(TimeRange),
    /// Clear the brushed range back to the unbounded query
    ResetTimeRange,
}

impl Selection {
    /// Apply an action. Returns `true` when the series fetch key changed.
    pub fn apply(&mut self, action: SelectionAction) -> bool {
        let before = self.series_key();

        match action {
            SelectionAction::SelectInstance(instance) => self.instance = Some(instance),
            SelectionAction::SelectTop(top) => self.top = Some(top),
            SelectionAction::SelectWindow(window) => self.window = Some(window),
            SelectionAction::BrushTimeRange(range) => {
                self.time_range = Some(TimeRange::new(range.start_ms, range.end_ms));
            }
            SelectionAction::ResetTimeRange => self.time_range = None,
        }

        let changed = before != self.series_key();
        if changed {
            tracing::debug!(selection = ?self, "Selection changed");
        }
        changed
    }

    /// Fetch key for the series query; `None` until an instance is chosen
    pub fn series_key(&self) -> Option<SeriesKey> {
        SeriesKey::new(
            self.instance.as_deref(),
            self.top.as_deref(),
            self.time_range,
            self.window.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_instance(instance: &str) -> Selection {
        let mut selection = Selection::default();
        selection.apply(SelectionAction::SelectInstance(instance.to_string()));
        selection
    }

    #[test]
    fn test_initial_state_issues_no_query() {
        let selection = Selection::default();
        assert_eq!(selection.series_key(), None);
        assert!(selection.time_range.is_none());
    }

    #[test]
    fn test_selecting_instance_enables_query() {
        let mut selection = Selection::default();
        assert!(selection.apply(SelectionAction::SelectInstance("db:10080".into())));

        let key = selection.series_key().unwrap();
        assert_eq!(key.instance, "db:10080");
        assert_eq!(key.top, None);
        assert_eq!(key.window, None);
        assert_eq!(key.time_range, None);
    }

    #[test]
    fn test_placeholder_instance_disables_query() {
        let mut selection = with_instance("db:10080");
        assert!(selection.apply(SelectionAction::SelectInstance(String::new())));
        assert_eq!(selection.series_key(), None);
    }

    #[test]
    fn test_top_and_window_change_key() {
        let mut selection = with_instance("db:10080");
        assert!(selection.apply(SelectionAction::SelectTop("5".into())));
        assert!(selection.apply(SelectionAction::SelectWindow("1h".into())));
        assert!(!selection.apply(SelectionAction::SelectWindow("1h".into())));

        let key = selection.series_key().unwrap();
        assert_eq!(key.top.as_deref(), Some("5"));
        assert_eq!(key.window.as_deref(), Some("1h"));
    }

    #[test]
    fn test_top_change_without_instance_keeps_query_disabled() {
        let mut selection = Selection::default();
        assert!(!selection.apply(SelectionAction::SelectTop("10".into())));
        assert_eq!(selection.top.as_deref(), Some("10"));
    }

    #[test]
    fn test_brush_then_reset() {
        let mut selection = with_instance("db:10080");

        assert!(selection.apply(SelectionAction::BrushTimeRange(TimeRange::new(1_000, 5_000))));
        assert!(selection.time_range.is_some());
        assert_eq!(
            selection.series_key().unwrap().time_range,
            Some(TimeRange::new(1_000, 5_000))
        );

        assert!(selection.apply(SelectionAction::ResetTimeRange));
        assert!(selection.time_range.is_none());
        assert_eq!(selection.series_key().unwrap().time_range, None);
    }

    #[test]
    fn test_brush_reversed_extent_normalized() {
        let mut selection = with_instance("db:10080");
        selection.apply(SelectionAction::BrushTimeRange(TimeRange {
            start_ms: 9_000,
            end_ms: 2_000,
        }));
        assert_eq!(selection.time_range, Some(TimeRange::new(2_000, 9_000)));
    }

    #[test]
    fn test_selection_round_trips_through_json() {
        let mut selection = with_instance("db:10080");
        selection.apply(SelectionAction::BrushTimeRange(TimeRange::new(1, 2)));
        let json = serde_json::to_string(&selection).unwrap();
        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
