//! Time axis and bar geometry
//!
//! Dates are calendar days. A bar starts at the start date's column and ends at
//! the finish date's column; spans under half a day (same-day tasks and
//! inverted ranges) are drawn one day wide.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use siteplan_core::{LayoutConfig, TaskNode};

use crate::VisualRow;

/// Days shown before the earliest start
pub const LEAD_IN_DAYS: i64 = 7;
/// Days shown after the latest finish
pub const TRAILING_DAYS: i64 = 30;
/// Without dated tasks the window opens this many days before today
pub const FALLBACK_LOOKBACK_DAYS: i64 = 14;
/// ... and closes this many days after it
pub const FALLBACK_LOOKAHEAD_DAYS: i64 = 30;

/// Spans shorter than this many days are drawn as one day
const MIN_DURATION_DAYS: f64 = 0.5;

/// The horizontal axis shared by every row, header and connector
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineRange {
    /// Date at x = 0
    pub origin: NaiveDate,
    /// Last date column
    pub far_edge: NaiveDate,
    pub pixels_per_day: f64,
}

impl TimelineRange {
    /// Derive the window from the dated tasks, padded on both sides. Falls back
    /// to a window around `today` when no task carries a date.
    pub fn for_tasks<'a>(
        tasks: impl IntoIterator<Item = &'a TaskNode>,
        pixels_per_day: f64,
        today: NaiveDate,
    ) -> Self {
        let mut min_date: Option<NaiveDate> = None;
        let mut max_date: Option<NaiveDate> = None;

        for task in tasks {
            for date in [task.start_date, task.finish_date].into_iter().flatten() {
                min_date = Some(min_date.map_or(date, |current| current.min(date)));
                max_date = Some(max_date.map_or(date, |current| current.max(date)));
            }
        }

        let (origin, far_edge) = match (min_date, max_date) {
            (Some(min), Some(max)) => (
                shift_days(min, -LEAD_IN_DAYS),
                shift_days(max, TRAILING_DAYS),
            ),
            _ => (
                shift_days(today, -FALLBACK_LOOKBACK_DAYS),
                shift_days(today, FALLBACK_LOOKAHEAD_DAYS),
            ),
        };

        Self {
            origin,
            far_edge,
            pixels_per_day,
        }
    }

    /// X offset of the start of `date`
    pub fn date_to_x(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64 * self.pixels_per_day
    }

    /// Days from origin to far edge
    pub fn total_days(&self) -> i64 {
        (self.far_edge - self.origin).num_days()
    }

    pub fn width(&self) -> f64 {
        self.total_days() as f64 * self.pixels_per_day
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.origin <= date && date <= self.far_edge
    }
}

/// Move `date` by `days`, stopping at the first or last representable date.
fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Rendered duration in days, never below one day.
///
/// The record keeps its dates; only the drawing is clamped.
pub fn duration_days(task: &TaskNode) -> f64 {
    let days = match (task.start_date, task.finish_date) {
        (Some(start), Some(finish)) => (finish - start).num_days() as f64,
        _ => 1.0,
    };
    if days < MIN_DURATION_DAYS {
        1.0
    } else {
        days
    }
}

/// Geometry for the task at display position `row_index`, from its own dates.
///
/// Hierarchy fields (`indent_level`, `is_expandable`, `is_expanded`) are left
/// at their defaults for the caller to fill; summary spans are applied later.
pub fn layout_row(
    task: &TaskNode,
    row_index: usize,
    range: &TimelineRange,
    config: &LayoutConfig,
) -> VisualRow {
    let ppd = range.pixels_per_day;
    let left = task
        .start_date
        .or(task.finish_date)
        .map_or(0.0, |date| (date - range.origin).num_days().max(0) as f64 * ppd);
    let width = duration_days(task) * ppd;

    let top = row_index as f64 * config.row_height;
    let height = config.row_height;
    let bar_height = (height - 2.0 * config.top_padding).max(1.0);

    let mut row = VisualRow {
        id: task.id.clone(),
        name: task.name.clone(),
        row_index,
        indent_level: 0,
        left: 0.0,
        width: 0.0,
        right: 0.0,
        top,
        height,
        bar_top: top + config.top_padding,
        bar_height,
        progress_width: 0.0,
        percent_complete: task.effective_percent_complete(),
        is_summary: false,
        is_expandable: false,
        is_expanded: false,
        is_on_hold: task.is_on_hold,
        assignees: task.assignees.clone(),
    };
    row.set_span(left, width);
    row
}

/// Canvas width and height in pixels
pub fn canvas_size(range: &TimelineRange, visible_count: usize, config: &LayoutConfig) -> (f64, f64) {
    let width = range.width().max(config.min_canvas_width);
    let height = (visible_count as f64 * config.row_height + config.bottom_margin)
        .max(config.min_canvas_height);
    (width, height)
}
