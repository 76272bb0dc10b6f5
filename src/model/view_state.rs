use serde::{Deserialize, Serialize};

use crate::model::task::Selector;

/// Status toggle applied after list filtering, independent of the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// How the derived view is ordered. `Manual` applies no comparator: the
/// collection's insertion order (maintained by explicit reorders) shows
/// through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    CreatedAsc,
    #[default]
    CreatedDesc,
    DueAsc,
    DueDesc,
    PriorityDesc,
    PriorityAsc,
    Manual,
}

impl SortMode {
    /// The bare string persisted under the sort-mode key.
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::CreatedAsc => "created_asc",
            SortMode::CreatedDesc => "created_desc",
            SortMode::DueAsc => "due_asc",
            SortMode::DueDesc => "due_desc",
            SortMode::PriorityDesc => "priority_desc",
            SortMode::PriorityAsc => "priority_asc",
            SortMode::Manual => "manual",
        }
    }

    pub fn parse(value: &str) -> Option<SortMode> {
        match value {
            "created_asc" => Some(SortMode::CreatedAsc),
            "created_desc" => Some(SortMode::CreatedDesc),
            "due_asc" => Some(SortMode::DueAsc),
            "due_desc" => Some(SortMode::DueDesc),
            "priority_desc" => Some(SortMode::PriorityDesc),
            "priority_asc" => Some(SortMode::PriorityAsc),
            "manual" => Some(SortMode::Manual),
            _ => None,
        }
    }
}

/// The immutable UI state a view is derived from. The presentation layer
/// owns transitions and passes a fresh value on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selector: Selector,
    pub filter: StatusFilter,
    pub sort: SortMode,
    /// Case-insensitive substring match over title and description;
    /// empty means no search.
    pub search: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            selector: Selector::MyDay,
            filter: StatusFilter::All,
            sort: SortMode::CreatedDesc,
            search: String::new(),
        }
    }
}

impl ViewState {
    pub fn new(selector: Selector) -> Self {
        ViewState {
            selector,
            ..ViewState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_mode_string_round_trip() {
        for mode in [
            SortMode::CreatedAsc,
            SortMode::CreatedDesc,
            SortMode::DueAsc,
            SortMode::DueDesc,
            SortMode::PriorityDesc,
            SortMode::PriorityAsc,
            SortMode::Manual,
        ] {
            assert_eq!(SortMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn sort_mode_parse_rejects_unknown() {
        assert_eq!(SortMode::parse("alphabetical"), None);
        assert_eq!(SortMode::parse(""), None);
    }

    #[test]
    fn sort_mode_serde_matches_bare_strings() {
        let json = serde_json::to_string(&SortMode::DueAsc).unwrap();
        assert_eq!(json, "\"due_asc\"");
        let back: SortMode = serde_json::from_str("\"priority_desc\"").unwrap();
        assert_eq!(back, SortMode::PriorityDesc);
    }

    #[test]
    fn default_view_state() {
        let state = ViewState::default();
        assert_eq!(state.selector, Selector::MyDay);
        assert_eq!(state.filter, StatusFilter::All);
        assert_eq!(state.sort, SortMode::CreatedDesc);
        assert!(state.search.is_empty());
    }
}
