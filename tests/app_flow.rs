use std::rc::Rc;

use chrono::{Duration, Local, Utc};
use daylist::App;
use daylist::days::day_key;
use daylist::model::{AppConfig, SpliceMode, Task, TaskStatus};
use daylist::reorder::{DropTarget, Edge};
use daylist::storage::{DARK_MODE_KEY, FileStorage, MemoryStorage, Storage, TASKS_KEY, USER_NAME_KEY};
use tempfile::tempdir;

fn task(id: &str, created_at: chrono::DateTime<Utc>) -> Task {
    Task {
        id: id.to_string(),
        title: format!("task {id}"),
        status: TaskStatus::Pending,
        created_at,
    }
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

fn seeded(tasks: &[Task]) -> Rc<MemoryStorage> {
    let raw = serde_json::to_string(tasks).expect("encode");
    Rc::new(MemoryStorage::new().with_value(TASKS_KEY, &raw))
}

fn two_days() -> Vec<Task> {
    let now = Utc::now();
    let yesterday = now - Duration::days(1);
    vec![
        task("t1", now),
        task("y1", yesterday),
        task("t2", now),
        task("y2", yesterday),
    ]
}

fn open_with_splice(storage: Rc<MemoryStorage>, splice: SpliceMode) -> App {
    let config = AppConfig {
        splice,
        ..AppConfig::default()
    };
    App::open(storage, config, false).expect("open app")
}

#[test]
fn celebration_fires_once_per_completion_run() {
    let storage = Rc::new(MemoryStorage::new());
    let mut app = App::open(storage, AppConfig::default(), false).expect("open app");

    app.add_task("A").expect("add");
    app.add_task("B").expect("add");
    let a = app.resolve_task("2").expect("position 2 is A");
    let b = app.resolve_task("1").expect("position 1 is B");

    assert!(!app.set_status(&a, TaskStatus::Completed).expect("status").celebrate);
    assert!(app.set_status(&b, TaskStatus::Completed).expect("status").celebrate);
    assert!(!app.set_status(&b, TaskStatus::Completed).expect("status").celebrate);

    assert!(!app.set_status(&a, TaskStatus::Pending).expect("status").celebrate);
    assert!(app.set_status(&a, TaskStatus::Completed).expect("status").celebrate);
}

#[test]
fn missing_task_status_change_reports_not_found() {
    let storage = Rc::new(MemoryStorage::new());
    let mut app = App::open(storage, AppConfig::default(), false).expect("open app");

    let change = app.set_status("nope", TaskStatus::Completed).expect("status");
    assert!(!change.found);
    assert!(!change.celebrate);
}

#[test]
fn past_days_are_read_only_for_additions() {
    let tasks = two_days();
    let yesterday = day_key(&tasks[1].created_at, &Local);
    let mut app = open_with_splice(seeded(&tasks), SpliceMode::InPlace);

    app.select_day(yesterday);
    assert!(!app.can_add_tasks());
    assert!(app.add_task("late idea").is_err());
    assert_eq!(app.tasks().len(), 4);

    let y1 = app.resolve_task("y1").expect("id lookup");
    assert!(app.set_status(&y1, TaskStatus::Closed).expect("status").found);
    assert!(app.delete_task(&y1).expect("delete").is_some());

    app.select_day(app.today());
    assert!(app.can_add_tasks());
}

#[test]
fn displayed_tasks_follow_the_selected_day() {
    let tasks = two_days();
    let yesterday = day_key(&tasks[1].created_at, &Local);
    let mut app = open_with_splice(seeded(&tasks), SpliceMode::InPlace);

    let today: Vec<&str> = app.displayed_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(today, vec!["t1", "t2"]);

    app.select_day(yesterday);
    let past: Vec<&str> = app.displayed_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(past, vec!["y1", "y2"]);

    let groups = app.day_groups();
    assert_eq!(groups.days(), vec![app.today(), yesterday]);
}

#[test]
fn moving_within_a_day_keeps_other_days_in_place() {
    let tasks = two_days();
    let yesterday = day_key(&tasks[1].created_at, &Local);
    let storage = seeded(&tasks);
    let mut app = open_with_splice(storage.clone(), SpliceMode::InPlace);

    app.select_day(yesterday);
    let y2 = app.resolve_task("2").expect("second task of yesterday");
    app.move_task(&y2, DropTarget::Container { edge: Edge::Before })
        .expect("move");

    assert_eq!(ids(app.tasks()), vec!["t1", "y2", "t2", "y1"]);

    let raw = storage.load(TASKS_KEY).expect("load").expect("saved");
    let persisted: Vec<Task> = serde_json::from_str(&raw).expect("json");
    assert_eq!(ids(&persisted), vec!["t1", "y2", "t2", "y1"]);
}

#[test]
fn append_splice_moves_the_day_to_the_front() {
    let tasks = two_days();
    let yesterday = day_key(&tasks[1].created_at, &Local);
    let mut app = open_with_splice(seeded(&tasks), SpliceMode::Append);

    app.select_day(yesterday);
    let y2 = app.resolve_task("y2").expect("id lookup");
    app.move_task(&y2, DropTarget::Container { edge: Edge::Before })
        .expect("move");

    assert_eq!(ids(app.tasks()), vec!["y2", "y1", "t1", "t2"]);
}

#[test]
fn dragging_a_today_task_after_the_last() {
    let storage = Rc::new(MemoryStorage::new());
    let mut app = App::open(storage, AppConfig::default(), false).expect("open app");
    for title in ["C", "B", "A"] {
        app.add_task(title).expect("add");
    }

    let a = app.resolve_task("1").expect("A is first");
    app.move_task(
        &a,
        DropTarget::Item {
            index: 2,
            edge: Edge::After,
        },
    )
    .expect("move");

    let titles: Vec<&str> = app.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "C", "A"]);
}

#[test]
fn opening_prunes_expired_tasks() {
    let now = Utc::now();
    let tasks = vec![
        task("fresh", now),
        task("recent", now - Duration::days(29)),
        task("expired", now - Duration::days(31)),
    ];
    let storage = seeded(&tasks);
    let app = App::open(storage.clone(), AppConfig::default(), false).expect("open app");

    assert_eq!(ids(app.tasks()), vec!["fresh", "recent"]);
    let raw = storage.load(TASKS_KEY).expect("load").expect("saved");
    assert!(!raw.contains("expired"));
}

#[test]
fn preferences_round_trip_through_file_storage() {
    let temp = tempdir().expect("tempdir");

    {
        let storage = FileStorage::open(temp.path()).expect("open storage");
        let mut app = App::open(Rc::new(storage), AppConfig::default(), false).expect("open app");
        assert!(!app.prefs().dark_mode());
        assert!(app.toggle_theme().expect("toggle"));
        assert!(app.set_user_name(" Grace ").expect("name"));
        app.add_task("Persist me").expect("add");
        app.add_note("remember this").expect("note");
    }

    let storage = FileStorage::open(temp.path()).expect("reopen storage");
    assert_eq!(storage.load(DARK_MODE_KEY).expect("load").as_deref(), Some("true"));
    assert_eq!(storage.load(USER_NAME_KEY).expect("load").as_deref(), Some("Grace"));

    let app = App::open(Rc::new(storage), AppConfig::default(), false).expect("reopen app");
    assert!(app.prefs().dark_mode());
    assert_eq!(app.prefs().user_name(), Some("Grace"));
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.notes().len(), 1);

    let note = app.resolve_note("1").expect("first note");
    assert_eq!(note, app.notes()[0].id);
}
