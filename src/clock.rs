// Local clock. The only place that reads the system time.

use chrono::{Local, NaiveDate};

use crate::models::Timestamp;

// Local -> FixedOffset (current system offset)
pub fn now_fixed_offset() -> Timestamp {
    Local::now().fixed_offset()
}

// Today's local calendar date
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
