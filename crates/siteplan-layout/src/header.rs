//! Timeline header columns, one per calendar day

use chrono::{Datelike, Weekday};

use crate::timeline::TimelineRange;
use crate::TimelineHeader;

/// Columns from the origin to the far edge, both inclusive.
pub fn generate_headers(range: &TimelineRange) -> Vec<TimelineHeader> {
    let days = range.total_days().max(0) as usize + 1;

    range
        .origin
        .iter_days()
        .take(days)
        .enumerate()
        .map(|(index, date)| TimelineHeader {
            date,
            left: range.date_to_x(date),
            label: date.format("%d %b").to_string(),
            is_alternate_shade: index % 2 == 1,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_month_start: date.day() == 1,
        })
        .collect()
}
