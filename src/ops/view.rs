use chrono::NaiveDate;

use crate::model::task::{ListId, Priority, Selector, Task};
use crate::model::view_state::{SortMode, StatusFilter, ViewState};

/// Open-task counts shown next to each list tab. Always computed over the
/// full collection, ignoring the active selector, status filter and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListCounts {
    pub my_day: usize,
    pub important: usize,
    pub planned: usize,
    pub all_tasks: usize,
}

/// The ordered projection to display plus the per-list counts.
///
/// `items` is an owned snapshot; mutating it never touches the stored
/// collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView {
    pub items: Vec<Task>,
    pub counts: ListCounts,
}

/// Derive the view for the given UI state: list filter, then status filter,
/// then search, then sort. An empty collection yields an empty view.
pub fn derive_view(tasks: &[Task], state: &ViewState, today: NaiveDate) -> DerivedView {
    let needle = state.search.to_lowercase();
    let mut items: Vec<Task> = tasks
        .iter()
        .filter(|t| matches_list(t, state.selector, today))
        .filter(|t| matches_status(t, state.filter))
        .filter(|t| needle.is_empty() || matches_search(t, &needle))
        .cloned()
        .collect();
    sort_tasks(&mut items, state.sort);

    DerivedView {
        items,
        counts: list_counts(tasks, today),
    }
}

/// List membership predicate. `AllTasks` skips list filtering entirely.
pub fn matches_list(task: &Task, selector: Selector, today: NaiveDate) -> bool {
    match selector {
        Selector::AllTasks => true,
        Selector::MyDay => {
            task.due_date == Some(today)
                || task.list == ListId::MyDay
                || (!task.completed
                    && task.due_date.is_none()
                    && task.list != ListId::Planned
                    && task.list != ListId::Important)
        }
        Selector::Important => {
            task.priority == Priority::High
                || task.is_important
                || task.list == ListId::Important
        }
        Selector::Planned => {
            task.due_date.is_some() || task.is_planned || task.list == ListId::Planned
        }
    }
}

fn matches_status(task: &Task, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Active => !task.completed,
        StatusFilter::Completed => task.completed,
    }
}

/// `needle` must already be lowercased.
fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
}

/// Sort in place, stably: equal keys keep their current relative order.
/// `Manual` leaves the order untouched.
pub fn sort_tasks(tasks: &mut [Task], mode: SortMode) {
    match mode {
        SortMode::Manual => {}
        SortMode::CreatedAsc => tasks.sort_by_key(|t| t.created_at),
        SortMode::CreatedDesc => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        // Missing due dates sort last in both directions: ascending as if
        // 9999-12-31 (None last), descending as if 0000-01-01 (None last,
        // via Option's None-is-least ordering reversed).
        SortMode::DueAsc => tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date)),
        SortMode::DueDesc => tasks.sort_by(|a, b| b.due_date.cmp(&a.due_date)),
        SortMode::PriorityDesc => tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortMode::PriorityAsc => tasks.sort_by_key(|t| t.priority.rank()),
    }
}

/// Per-list counts: each list's membership predicate restricted to open
/// tasks. The status filter is deliberately not applied here.
pub fn list_counts(tasks: &[Task], today: NaiveDate) -> ListCounts {
    let open = || tasks.iter().filter(|t| !t.completed);
    ListCounts {
        my_day: open()
            .filter(|t| matches_list(t, Selector::MyDay, today))
            .count(),
        important: open()
            .filter(|t| matches_list(t, Selector::Important, today))
            .count(),
        planned: open()
            .filter(|t| matches_list(t, Selector::Planned, today))
            .count(),
        all_tasks: open().count(),
    }
}
