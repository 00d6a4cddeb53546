//! Temporal geometry for the weekly time grid.
//!
//! Pure conversions between calendar timestamps and grid coordinates. All
//! functions are total over whole-minute inputs: an event starting before
//! the visible window yields a negative offset for the renderer to clip,
//! never an error.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::event::Event;

/// The visible daily time range rendered by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for DayWindow {
    /// Reference behavior: 07:00–23:00.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(7, 0, 0).expect("valid window start"),
            end: NaiveTime::from_hms_opt(23, 0, 0).expect("valid window end"),
        }
    }
}

impl DayWindow {
    pub fn from_hours(start_hour: u32, end_hour: u32) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start_hour, 0, 0)?;
        let end = NaiveTime::from_hms_opt(end_hour, 0, 0)?;
        (end > start).then_some(Self { start, end })
    }

    /// Slot timestamps for rendering hour rows, inclusive of the window end.
    pub fn time_slots(&self, step_minutes: u32) -> Vec<NaiveTime> {
        let step = Duration::minutes(i64::from(step_minutes.max(1)));
        let count = (self.end - self.start).num_minutes() / step.num_minutes() + 1;
        (0..count)
            .map(|i| self.start + step * i as i32)
            .collect()
    }
}

/// Vertical placement of an event within a day column, in grid minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPosition {
    /// Minutes from the window start to the event start. Negative when the
    /// event begins before the window.
    pub offset_minutes: i64,
    /// Event duration in minutes.
    pub height_minutes: i64,
}

/// The calendar week containing `date`, Monday first.
pub fn week_days_of(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// Where an event sits vertically within its day column.
pub fn position(event: &Event, window: DayWindow) -> EventPosition {
    let offset_minutes = (event.start.time() - window.start).num_minutes();
    let height_minutes = (event.end - event.start).num_minutes();
    EventPosition {
        offset_minutes,
        height_minutes,
    }
}

/// Inverse of [`position`]: a vertical grid offset on `day` back to a clock
/// time, anchored at the window start.
pub fn time_from_offset(offset_minutes: i64, day: NaiveDate, window: DayWindow) -> NaiveDateTime {
    day.and_time(window.start) + Duration::minutes(offset_minutes)
}

/// Round the minute component to the nearest multiple of 15, half-up.
/// Seconds are dropped; rounding past :59 carries into the next hour.
pub fn snap_to_quarter_hour(t: NaiveDateTime) -> NaiveDateTime {
    let snapped = (i64::from(t.minute()) + 7) / 15 * 15;
    let hour_start = t
        .date()
        .and_hms_opt(t.hour(), 0, 0)
        .expect("hour taken from a valid timestamp");
    hour_start + Duration::minutes(snapped)
}
