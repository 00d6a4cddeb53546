// Date utility functions

use chrono::{NaiveDate, NaiveDateTime};

pub fn is_same_day(timestamp: NaiveDateTime, day: NaiveDate) -> bool {
    timestamp.date() == day
}
