// Integration tests for schedule persistence and the gesture pipeline
use chrono::{NaiveDate, NaiveDateTime};
use weekplan::config::PlannerConfig;
use weekplan::interaction::{grid_click, resolve_drag, GridMetrics, GridPoint, Intent};
use weekplan::models::event::{Category, EventDraft};
use weekplan::models::goal::GoalDraft;
use weekplan::models::task::TaskDraft;
use weekplan::services::auth::StaticIdentity;
use weekplan::services::database::Database;
use weekplan::services::storage::sqlite::{SqliteEvents, SqliteGoals, SqliteTasks};
use weekplan::store::catalog::{GoalCatalog, TaskCatalog};
use weekplan::store::{LoadStatus, ScheduleStore};
use weekplan::view::{load_workspace, Orchestrator};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dt(y: i32, mo: u32, d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[tokio::test]
async fn test_event_persistence_across_reopen() {
    init_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("events.db");
    let db_path = db_path.to_str().unwrap();

    // Simulate first app launch: create, update and delete some events
    let created_id;
    {
        let db = Database::new(db_path).expect("Failed to create database");
        db.initialize_schema().expect("Failed to initialize schema");

        let store = ScheduleStore::new(SqliteEvents::new(db.connection()));
        let created = store
            .create(EventDraft::new(
                "Morning run",
                Category::Exercise,
                dt(2025, 4, 7, 7, 0),
                dt(2025, 4, 7, 7, 45),
            ))
            .await
            .expect("Failed to create event");
        created_id = created.id.clone();

        let doomed = store
            .create(EventDraft::new(
                "Placeholder",
                Category::Relax,
                dt(2025, 4, 7, 20, 0),
                dt(2025, 4, 7, 21, 0),
            ))
            .await
            .expect("Failed to create event");
        store
            .delete(&doomed.id)
            .await
            .expect("Failed to delete event");

        let mut moved = created.clone();
        moved.title = "Morning run (long)".to_string();
        moved.end = dt(2025, 4, 7, 8, 0);
        store.update(moved).await.expect("Failed to update event");
    } // Database connection closed

    // Simulate second app launch: the edited event survives, the deleted
    // one does not
    {
        let db = Database::new(db_path).expect("Failed to open database");
        let store = ScheduleStore::new(SqliteEvents::new(db.connection()));
        let loaded = store.load().await.expect("Failed to load events");

        assert_eq!(loaded.len(), 1, "Only the surviving event should persist");
        assert_eq!(loaded[0].id, created_id);
        assert_eq!(loaded[0].title, "Morning run (long)");
        assert_eq!(loaded[0].end, dt(2025, 4, 7, 8, 0));
        assert_eq!(store.status(), LoadStatus::Succeeded);
    }
}

#[tokio::test]
async fn test_workspace_load_and_goal_task_links() {
    init_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("workspace.db");
    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");

    let events = ScheduleStore::new(SqliteEvents::new(db.connection()));
    let goals = GoalCatalog::new(SqliteGoals::new(db.connection()));
    let tasks = TaskCatalog::new(SqliteTasks::new(db.connection()));

    let goal = goals
        .create(GoalDraft::new("Get fit", "bg-goal-fit"))
        .await
        .expect("Failed to create goal");
    let task = tasks
        .create(TaskDraft::new("Book a class", &goal.id))
        .await
        .expect("Failed to create task");

    load_workspace(&events, &goals, &tasks, &StaticIdentity::user("u-1"))
        .await
        .expect("Failed to load workspace");

    assert_eq!(goals.goals().len(), 1);
    assert_eq!(tasks.for_goal(&goal.id).len(), 1);
    assert_eq!(tasks.for_goal(&goal.id)[0].id, task.id);
    assert_eq!(events.status(), LoadStatus::Succeeded);
}

#[tokio::test]
async fn test_drag_pipeline_moves_event_between_days() {
    init_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("drag.db");
    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");

    let store = ScheduleStore::new(SqliteEvents::new(db.connection()));
    let mut orchestrator = Orchestrator::new(NaiveDate::from_ymd_opt(2025, 4, 8).unwrap());
    let identity = StaticIdentity::user("u-1");
    let config = PlannerConfig::default();

    let created = store
        .create(EventDraft::new(
            "Team sync",
            Category::Work,
            dt(2025, 4, 8, 10, 0),
            dt(2025, 4, 8, 11, 0),
        ))
        .await
        .expect("Failed to create event");

    // Drag the event from Tuesday's column onto Thursday
    let intent = resolve_drag(
        &store.events(),
        &created.id,
        "day-2025-04-08",
        "day-2025-04-10",
        dt(2025, 4, 8, 10, 30),
        "",
        &config,
    )
    .expect("Drag should resolve to an intent");
    let updated = orchestrator
        .apply_intent(&store, &identity, intent)
        .await
        .expect("Failed to apply intent")
        .expect("Update should return the stored event");

    // Same time of day and duration, new date
    assert_eq!(updated.start, dt(2025, 4, 10, 10, 0));
    assert_eq!(updated.end, dt(2025, 4, 10, 11, 0));

    // Re-reading from disk confirms the move was persisted
    let reloaded = store.load().await.expect("Failed to reload events");
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].start, dt(2025, 4, 10, 10, 0));
}

#[tokio::test]
async fn test_task_drop_creates_linked_event() {
    init_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("drop.db");
    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");

    let events = ScheduleStore::new(SqliteEvents::new(db.connection()));
    let goals = GoalCatalog::new(SqliteGoals::new(db.connection()));
    let tasks = TaskCatalog::new(SqliteTasks::new(db.connection()));
    let mut orchestrator = Orchestrator::new(NaiveDate::from_ymd_opt(2025, 4, 8).unwrap());
    let identity = StaticIdentity::user("u-1");
    let config = PlannerConfig::default();

    let goal = goals
        .create(GoalDraft::new("Ship v1", "bg-goal-work"))
        .await
        .expect("Failed to create goal");
    let task = tasks
        .create(TaskDraft::new("Write release notes", &goal.id))
        .await
        .expect("Failed to create task");

    // Drag the task from the sidebar onto Wednesday at 14:10
    let intent = resolve_drag(
        &events.events(),
        &format!("task-{}", task.id),
        "tasks-list",
        "day-2025-04-09",
        dt(2025, 4, 8, 14, 10),
        task.name.as_str(),
        &config,
    )
    .expect("Task drop should resolve to an intent");
    let created = orchestrator
        .apply_intent(&events, &identity, intent)
        .await
        .expect("Failed to apply intent")
        .expect("Create should return the stored event");

    assert_eq!(created.title, "Write release notes");
    assert_eq!(created.category, Category::Work);
    assert_eq!(created.task_id.as_deref(), Some(task.id.as_str()));
    assert_eq!(created.created_by.as_deref(), Some("u-1"));
    // 14:10 now, within working hours, so the drop lands on the hour
    assert_eq!(created.start, dt(2025, 4, 9, 14, 0));
    assert_eq!(created.end, dt(2025, 4, 9, 14, 30));
}

#[tokio::test]
async fn test_grid_click_through_modal_submit() {
    init_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("click.db");
    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");

    let store = ScheduleStore::new(SqliteEvents::new(db.connection()));
    let mut orchestrator = Orchestrator::new(NaiveDate::from_ymd_opt(2025, 4, 8).unwrap());
    let identity = StaticIdentity::user("u-1");
    let config = PlannerConfig::default();

    // Click in the third column, a bit past two hours below the header
    let metrics = GridMetrics::new(700.0);
    let point = GridPoint { x: 215.0, y: 192.0 };
    let intent = grid_click(
        point,
        &metrics,
        &orchestrator.view.week_days(),
        config.day_window(),
        &config,
    )
    .expect("Grid click should propose a timespan");
    assert!(matches!(intent, Intent::OpenCreateModal(_)));

    orchestrator
        .apply_intent(&store, &identity, intent)
        .await
        .expect("Failed to apply intent");
    assert!(orchestrator.is_modal_open());

    // An empty title is rejected inline; the modal stays open
    assert!(orchestrator.submit(&store, &identity).await.is_err());
    assert!(orchestrator.is_modal_open());
    assert!(store.events().is_empty());

    // Filling the title lets the submit through and closes the modal
    orchestrator.form_mut().expect("Modal should be open").title = "Dentist".to_string();
    let stored = orchestrator
        .submit(&store, &identity)
        .await
        .expect("Failed to submit")
        .expect("Submit should return the stored event");
    assert!(!orchestrator.is_modal_open());
    // Wednesday column, 09:15 after snapping (header 60px, rows 60px/hour)
    assert_eq!(stored.start, dt(2025, 4, 9, 9, 15));
    assert_eq!(stored.end, dt(2025, 4, 9, 9, 45));
}
