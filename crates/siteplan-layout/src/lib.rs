//! # siteplan-layout
//!
//! Gantt layout engine: turns a flat snapshot of task records into render-ready
//! geometry.
//!
//! This crate provides:
//! - Hierarchy building from parent references (`hierarchy`)
//! - Expand/collapse aware row flattening (`flatten`)
//! - Time axis and bar geometry (`timeline`)
//! - Summary bars spanning their children (`summary`)
//! - Orthogonal dependency connectors (`routing`)
//! - Per-day header columns (`header`)
//! - A host view model applying commands with last-write-wins results (`view`)
//!
//! The engine is a pure function of `(tasks, expanded ids, config, today)`. It
//! performs no I/O, holds no state between calls and never fails: bad records
//! are clamped, skipped or promoted and reported as [`Notice`]s.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use chrono::NaiveDate;
//! use siteplan_core::{LayoutConfig, TaskNode};
//! use siteplan_layout::compute_layout;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
//! let tasks = vec![
//!     TaskNode::new("site").name("Site prep").dates(day(3), day(5)),
//!     TaskNode::new("slab").name("Slab").dates(day(6), day(8)).after("site"),
//! ];
//!
//! let layout = compute_layout(&tasks, &HashSet::new(), &LayoutConfig::default(), day(1));
//! assert_eq!(layout.rows.len(), 2);
//! assert_eq!(layout.links.len(), 1);
//! ```

pub mod audit;
pub mod flatten;
pub mod header;
pub mod hierarchy;
pub mod routing;
pub mod summary;
pub mod timeline;
pub mod view;

pub use hierarchy::Forest;
pub use timeline::TimelineRange;
pub use view::{GanttView, LayoutJob, LayoutOutcome, ViewCommand};

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use siteplan_core::{DependencyType, LayoutConfig, Notice, TaskId, TaskNode};
use tracing::{debug, warn};

// ============================================================================
// Geometry
// ============================================================================

/// A point on the canvas, in pixels from the timeline origin
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry and display data for one visible task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualRow {
    /// Task ID
    pub id: TaskId,
    /// Task name
    pub name: String,
    /// Position in the flattened, visible order
    pub row_index: usize,
    /// Depth in the hierarchy (root = 0)
    pub indent_level: usize,
    /// Bar start, pixels from the timeline origin
    pub left: f64,
    /// Bar width in pixels
    pub width: f64,
    /// Always `left + width`
    pub right: f64,
    /// Top of the row slot
    pub top: f64,
    /// Height of the row slot
    pub height: f64,
    /// Top of the bar, inset by the configured padding
    pub bar_top: f64,
    /// Height of the bar
    pub bar_height: f64,
    /// Width of the completed portion of the bar
    pub progress_width: f64,
    /// Completion percentage (0-100)
    pub percent_complete: f32,
    /// Bar spans visible children instead of the task's own dates
    pub is_summary: bool,
    /// Task has children in the hierarchy (shown with an expand toggle)
    pub is_expandable: bool,
    /// Task is in the expanded set
    pub is_expanded: bool,
    /// Work on this task is paused
    pub is_on_hold: bool,
    /// Display names of the people assigned
    pub assignees: Vec<String>,
}

impl VisualRow {
    /// Vertical center of the row, where connectors attach
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Replace the horizontal span, keeping `right` and progress in step.
    pub fn set_span(&mut self, left: f64, width: f64) {
        self.left = left;
        self.width = width;
        self.right = left + width;
        self.progress_width = width * f64::from(self.percent_complete) / 100.0;
    }
}

/// A routed connector between two visible rows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DependencyLink {
    /// Predecessor task
    pub from_row_id: TaskId,
    /// Successor task
    pub to_row_id: TaskId,
    /// Type of dependency
    pub dep_type: DependencyType,
    /// Orthogonal polyline from predecessor to successor
    pub path: Vec<Point>,
    /// Filled triangle, tip first
    pub arrowhead: Vec<Point>,
}

impl DependencyLink {
    /// Number of straight segments in the path
    pub fn segment_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// One day column of the timeline header
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineHeader {
    pub date: NaiveDate,
    /// Pixels from the timeline origin
    pub left: f64,
    /// Day label, e.g. `06 Jan`
    pub label: String,
    /// Odd columns get the alternate background
    pub is_alternate_shade: bool,
    pub is_weekend: bool,
    pub is_month_start: bool,
}

// ============================================================================
// Layout Output
// ============================================================================

/// Everything a renderer needs for one frame of the Gantt view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GanttLayout {
    /// Visible rows in display order
    pub rows: Vec<VisualRow>,
    /// Connectors between visible rows
    pub links: Vec<DependencyLink>,
    /// One column per day from origin to far edge
    pub headers: Vec<TimelineHeader>,
    /// Time axis used for every x coordinate
    pub timeline: TimelineRange,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// X of the status date marker, if configured and on screen
    pub now_line: Option<f64>,
    /// Data issues absorbed while building the layout
    pub notices: Vec<Notice>,
}

impl GanttLayout {
    /// Find a visible row by task ID
    pub fn row(&self, id: &str) -> Option<&VisualRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// IDs of visible rows in display order
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id.as_str()).collect()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Compute the full layout for a snapshot.
///
/// `expanded` holds the IDs whose children are shown. `today` anchors the
/// fallback window used when no visible task has dates. Calling this twice
/// with the same arguments yields equal layouts.
pub fn compute_layout(
    tasks: &[TaskNode],
    expanded: &HashSet<TaskId>,
    config: &LayoutConfig,
    today: NaiveDate,
) -> GanttLayout {
    let fallback;
    let config = match config.validate() {
        Ok(()) => config,
        Err(err) => {
            warn!(error = %err, "invalid layout config, using defaults");
            fallback = LayoutConfig::default();
            &fallback
        }
    };

    let mut notices = Vec::new();
    let forest = Forest::build(tasks, &mut notices);
    notices.extend(audit::audit_records(&forest));

    let visible = flatten::flatten_visible(&forest, expanded);
    let range = TimelineRange::for_tasks(
        visible.iter().map(|&idx| forest.node(idx)),
        config.pixels_per_day,
        today,
    );

    let mut rows: Vec<VisualRow> = visible
        .iter()
        .enumerate()
        .map(|(row_index, &idx)| {
            let mut row = timeline::layout_row(forest.node(idx), row_index, &range, config);
            row.indent_level = forest.indent_level(idx);
            row.is_expandable = !forest.children(idx).is_empty();
            row.is_expanded = expanded.contains(&row.id);
            row
        })
        .collect();

    summary::bubble_summaries(&mut rows, config);

    let links = routing::resolve_links(&forest, &visible, &rows);
    let headers = header::generate_headers(&range);
    let (canvas_width, canvas_height) = timeline::canvas_size(&range, rows.len(), config);
    let now_line = config
        .status_date
        .filter(|date| range.contains(*date))
        .map(|date| range.date_to_x(date));

    debug!(
        tasks = tasks.len(),
        rows = rows.len(),
        links = links.len(),
        notices = notices.len(),
        origin = %range.origin,
        far_edge = %range.far_edge,
        "layout computed"
    );

    GanttLayout {
        rows,
        links,
        headers,
        timeline: range,
        canvas_width,
        canvas_height,
        now_line,
        notices,
    }
}

/// [`compute_layout`] anchored on the local calendar date.
pub fn recompute(
    tasks: &[TaskNode],
    expanded: &HashSet<TaskId>,
    config: &LayoutConfig,
) -> GanttLayout {
    compute_layout(tasks, expanded, config, chrono::Local::now().date_naive())
}

/// Expansion set seeded from each record's own `is_expanded` flag
pub fn initial_expansion(tasks: &[TaskNode]) -> HashSet<TaskId> {
    tasks
        .iter()
        .filter(|t| t.is_expanded)
        .map(|t| t.id.clone())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn set_span_keeps_right_and_progress_in_step() {
        let mut row = timeline::layout_row(
            &TaskNode::new("a").dates(date(3), date(4)).complete(50.0),
            0,
            &TimelineRange::for_tasks(std::iter::empty(), 50.0, date(10)),
            &LayoutConfig::default(),
        );
        row.set_span(10.0, 40.0);
        assert_eq!(row.right, 50.0);
        assert_eq!(row.progress_width, 20.0);
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let tasks = vec![TaskNode::new("a").dates(date(3), date(3))];
        let bad = LayoutConfig::new().pixels_per_day(-1.0);
        let layout = compute_layout(&tasks, &HashSet::new(), &bad, date(1));
        assert_eq!(layout.rows[0].width, 50.0);
        assert_eq!(layout.timeline.pixels_per_day, 50.0);
    }

    #[test]
    fn empty_snapshot_still_renders() {
        let layout = compute_layout(&[], &HashSet::new(), &LayoutConfig::default(), date(20));
        assert!(layout.rows.is_empty());
        assert!(layout.links.is_empty());
        assert_eq!(layout.headers.len(), 45);
        assert_eq!(layout.canvas_height, 400.0);
        assert_eq!(layout.canvas_width, 44.0 * 50.0);
    }

    #[test]
    fn now_line_only_inside_window() {
        let tasks = vec![TaskNode::new("a").dates(date(10), date(12))];
        let inside = LayoutConfig::new().with_status_date(date(11));
        let layout = compute_layout(&tasks, &HashSet::new(), &inside, date(1));
        assert_eq!(layout.now_line, Some(8.0 * 50.0));

        let outside = LayoutConfig::new().with_status_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let layout = compute_layout(&tasks, &HashSet::new(), &outside, date(1));
        assert_eq!(layout.now_line, None);
    }

    #[test]
    fn initial_expansion_uses_record_flags() {
        let tasks = vec![
            TaskNode::new("a"),
            TaskNode::new("b").expanded(false),
        ];
        let expanded = initial_expansion(&tasks);
        assert!(expanded.contains("a"));
        assert!(!expanded.contains("b"));
    }
}
