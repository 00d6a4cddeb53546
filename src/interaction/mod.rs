//! Drag/drop and click resolution.
//!
//! Interprets completed pointer gestures against the grid geometry and the
//! current event snapshot, producing mutation *intents*. Nothing here
//! commits to storage: intents are applied by the view orchestrator so the
//! store enforces invariants uniformly regardless of gesture origin.
//!
//! Drag identifiers follow the composite wire format of the UI layer:
//! sources from the sidebar are `task-<id>`, day columns are
//! `day-<YYYY-MM-DD>`.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::config::PlannerConfig;
use crate::geometry::{snap_to_quarter_hour, time_from_offset, DayWindow};
use crate::models::event::{Category, Event, EventDraft};

/// Default hour for a task dropped outside working hours.
const FALLBACK_HOUR: u32 = 12;

/// Fallback title when the dragged task label is empty.
const UNTITLED_TASK: &str = "New Task";

/// Where a drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// `tasks-list`: the sidebar task list; the dragged item carries a
    /// composite `task-<id>` identifier.
    TaskList,
    /// `day-<YYYY-MM-DD>`: a day column; the dragged item is an event id.
    DayColumn { day: NaiveDate },
}

impl DragSource {
    pub fn parse(id: &str) -> Option<Self> {
        if id == "tasks-list" {
            return Some(DragSource::TaskList);
        }
        parse_day_id(id).map(|day| DragSource::DayColumn { day })
    }
}

/// Where a drag ended. Only day columns accept drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub day: NaiveDate,
}

impl DropTarget {
    pub fn parse(id: &str) -> Option<Self> {
        parse_day_id(id).map(|day| DropTarget { day })
    }
}

fn parse_day_id(id: &str) -> Option<NaiveDate> {
    let raw = id.strip_prefix("day-")?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// A proposed mutation, applied only after store validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Replace an existing event (gesture A: move between days).
    UpdateEvent(Event),
    /// Create a new event directly (gesture B: task promoted by drop).
    CreateEvent(EventDraft),
    /// Open the create modal with prefilled times (gesture C: grid click).
    OpenCreateModal(EventSeed),
}

/// Prefill payload for the create modal.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSeed {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub goal_id: Option<String>,
    pub task_id: Option<String>,
}

impl EventSeed {
    pub fn timespan(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: None,
            category: None,
            start,
            end,
            goal_id: None,
            task_id: None,
        }
    }
}

/// Pixel geometry of the rendered grid, supplied per gesture by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Total width of the seven day columns.
    pub width: f32,
    /// Height of the sticky day-header strip above the time rows.
    pub header_height: f32,
    /// Pixel height of one hour row.
    pub row_height: f32,
}

impl GridMetrics {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            header_height: 60.0,
            row_height: 60.0,
        }
    }
}

/// A pointer position relative to the grid's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f32,
    pub y: f32,
}

/// Gesture A: move an existing event to another day.
///
/// Duration is preserved exactly and the wall-clock time-of-day is invariant;
/// only the date component changes. A stale id (the event vanished since the
/// drag started) resolves to `None` and the gesture is dropped.
pub fn move_event(events: &[Event], event_id: &str, destination: DropTarget) -> Option<Intent> {
    let Some(event) = events.iter().find(|e| e.id == event_id) else {
        log::debug!("drag of stale event id '{}' dropped", event_id);
        return None;
    };

    let duration = event.end - event.start;
    let time_of_day = NaiveTime::from_hms_opt(event.start.hour(), event.start.minute(), 0)
        .expect("hour/minute taken from a valid timestamp");
    let new_start = destination.day.and_time(time_of_day);

    let mut moved = event.clone();
    moved.start = new_start;
    moved.end = new_start + duration;
    Some(Intent::UpdateEvent(moved))
}

/// Gesture B: promote a task into an event on the destination day.
///
/// The start hour is the current hour when it falls inside the configured
/// work window, noon otherwise; snapped to the quarter hour, with the
/// configured default duration. Category defaults to work.
pub fn task_drop(
    task_id: &str,
    label: &str,
    destination: DropTarget,
    now: NaiveDateTime,
    config: &PlannerConfig,
) -> Intent {
    let current_hour = now.hour();
    let default_hour =
        if current_hour >= config.work_start_hour && current_hour <= config.work_end_hour {
            current_hour
        } else {
            FALLBACK_HOUR
        };

    let start = snap_to_quarter_hour(
        destination
            .day
            .and_hms_opt(default_hour, 0, 0)
            .expect("work-window hour is a valid time"),
    );
    let end = start + Duration::minutes(config.default_duration_minutes);

    let title = label.trim();
    let title = if title.is_empty() { UNTITLED_TASK } else { title };

    Intent::CreateEvent(EventDraft::new(title, Category::Work, start, end).with_task(task_id))
}

/// Dispatch a completed drag by its composite source/destination ids.
///
/// Returns `None` for malformed ids, drops outside a day column, and the
/// documented stale-event case.
pub fn resolve_drag(
    events: &[Event],
    dragged_id: &str,
    source_id: &str,
    destination_id: &str,
    now: NaiveDateTime,
    task_label: &str,
    config: &PlannerConfig,
) -> Option<Intent> {
    let destination = DropTarget::parse(destination_id)?;

    match DragSource::parse(source_id)? {
        DragSource::TaskList => {
            let task_id = dragged_id.strip_prefix("task-").filter(|id| !id.is_empty())?;
            Some(task_drop(task_id, task_label, destination, now, config))
        }
        DragSource::DayColumn { .. } => move_event(events, dragged_id, destination),
    }
}

/// Gesture C: a click on empty grid space proposes a draft timespan.
///
/// The day column comes from dividing the grid width by seven; clicks above
/// the header strip or outside the columns resolve to `None`. Creation is
/// finalized only on explicit form submission, so this emits a modal-open
/// intent rather than a mutation.
pub fn grid_click(
    point: GridPoint,
    metrics: &GridMetrics,
    week_days: &[NaiveDate; 7],
    window: DayWindow,
    config: &PlannerConfig,
) -> Option<Intent> {
    if metrics.width <= 0.0 || metrics.row_height <= 0.0 {
        return None;
    }

    let day_width = metrics.width / 7.0;
    let day_index = (point.x / day_width).floor();
    if !(0.0..7.0).contains(&day_index) {
        return None;
    }
    let day = week_days[day_index as usize];

    if point.y <= metrics.header_height {
        return None;
    }
    let offset_minutes = ((point.y - metrics.header_height) / metrics.row_height * 60.0) as i64;

    let start = snap_to_quarter_hour(time_from_offset(offset_minutes, day, window));
    let end = start + Duration::minutes(config.default_duration_minutes);
    Some(Intent::OpenCreateModal(EventSeed::timespan(start, end)))
}
