//! End-to-end flows against a file-backed store in a temp directory:
//! everything a session does, across a reopen.

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use daymark::io::FileStore;
use daymark::model::{
    ListId, Priority, Selector, SortMode, StatusFilter, TaskDraft, TaskPatch, ViewState,
};
use daymark::store::TaskStore;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 23, 9, 0, 0).unwrap()
}

fn open(dir: &TempDir) -> TaskStore<FileStore> {
    TaskStore::open(FileStore::open(dir.path().join("storage.json")))
}

#[test]
fn full_session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let today = now().date_naive();

    let mut store = open(&dir);
    store
        .create_at(TaskDraft::quick("Pack for the trip", ListId::Planned, today), now())
        .unwrap();
    let groceries = store
        .create_at(TaskDraft::new("Groceries", ListId::MyDay), now())
        .unwrap()
        .id;
    store.toggle_completed(groceries).unwrap();
    store.set_sort_mode(SortMode::DueAsc).unwrap();

    let reopened = open(&dir);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.sort_mode(), SortMode::DueAsc);
    let groceries_back = reopened.find(groceries).unwrap();
    assert!(groceries_back.completed);
    assert_eq!(reopened.tasks()[1].title, "Pack for the trip");
    assert!(reopened.tasks()[1].is_planned);
}

#[test]
fn edit_delete_undo_flow() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    let id = store
        .create_at(TaskDraft::new("Draft title", ListId::MyDay), now())
        .unwrap()
        .id;
    store
        .create_at(TaskDraft::new("Bystander", ListId::MyDay), now())
        .unwrap();

    store
        .update(
            id,
            TaskPatch {
                title: Some("Final title".into()),
                priority: Some(Priority::High),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    let removed = store.delete(id).unwrap();
    assert_eq!(removed.title, "Final title");
    assert!(removed.is_important);

    // Crash-and-restart between delete and undo loses only the undo slot.
    let reopened = open(&dir);
    assert_eq!(reopened.len(), 1);

    store.undo_delete().unwrap().unwrap();
    assert_eq!(store.tasks()[0].id, id);

    let reopened = open(&dir);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.tasks()[0].title, "Final title");
}

#[test]
fn manual_order_persists_across_reopen() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    for title in ["three", "two", "one"] {
        store
            .create_at(TaskDraft::new(title, ListId::MyDay), now())
            .unwrap();
    }
    store.set_sort_mode(SortMode::Manual).unwrap();

    // Drag "three" to the top of the displayed list.
    let three = store.tasks()[2].id;
    let one = store.tasks()[0].id;
    let two = store.tasks()[1].id;
    store.reconcile_order(&[three, one, two]).unwrap();

    let reopened = open(&dir);
    assert_eq!(reopened.sort_mode(), SortMode::Manual);
    let titles: Vec<&str> = reopened.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["three", "one", "two"]);

    // Manual sort shows the stored order as-is.
    let state = ViewState {
        selector: Selector::AllTasks,
        filter: StatusFilter::All,
        sort: SortMode::Manual,
        search: String::new(),
    };
    let view = reopened.view(&state, now().date_naive());
    let shown: Vec<&str> = view.items.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(shown, vec!["three", "one", "two"]);
}

#[test]
fn seeding_happens_once_per_storage_file() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    assert!(store.seed_welcome_tasks(now()).unwrap());
    let seeded: Vec<String> = store.tasks().iter().map(|t| t.title.clone()).collect();

    let mut reopened = open(&dir);
    assert!(!reopened.seed_welcome_tasks(now()).unwrap());
    let still: Vec<String> = reopened.tasks().iter().map(|t| t.title.clone()).collect();
    assert_eq!(still, seeded);

    // Even after the user clears every task, the samples stay gone.
    let ids: Vec<_> = reopened.tasks().iter().map(|t| t.id).collect();
    for id in ids {
        reopened.delete(id).unwrap();
    }
    assert!(!reopened.seed_welcome_tasks(now()).unwrap());
    assert!(reopened.is_empty());
}

#[test]
fn counts_follow_the_stored_collection() {
    let dir = TempDir::new().unwrap();
    let today = now().date_naive();

    let mut store = open(&dir);
    store
        .create_at(TaskDraft::quick("today", ListId::MyDay, today), now())
        .unwrap();
    store
        .create_at(TaskDraft::quick("urgent", ListId::Important, today), now())
        .unwrap();
    let done = store
        .create_at(TaskDraft::new("done already", ListId::MyDay), now())
        .unwrap()
        .id;
    store.toggle_completed(done).unwrap();

    let view = store.view(&ViewState::default(), today);
    assert_eq!(view.counts.all_tasks, 2);
    assert_eq!(view.counts.my_day, 1);
    assert_eq!(view.counts.important, 1);
    assert_eq!(view.counts.planned, 1); // quick-add under My Day gets today as due date
}
