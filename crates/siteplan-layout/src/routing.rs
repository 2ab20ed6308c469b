//! Dependency connectors
//!
//! Connectors leave the predecessor at its right-center and enter the
//! successor at its left-center, using only horizontal and vertical segments.
//! All dependency types share this rule.

use std::collections::HashMap;

use siteplan_core::{PredecessorLink, TaskNode};
use tracing::{debug, trace};

use crate::hierarchy::Forest;
use crate::{DependencyLink, Point, VisualRow};

/// Successor must start this far right of the predecessor's end for the
/// direct three-segment route
pub const DIRECT_ROUTE_GAP: f64 = 20.0;
/// Horizontal stub at both ends of a wrap-around route
pub const WRAP_STUB: f64 = 10.0;
/// Rows closer than this vertically are treated as the same level
pub const SAME_LEVEL_TOLERANCE: f64 = 10.0;
/// Detour below the start row when both ends sit on the same level
pub const SAME_LEVEL_DETOUR: f64 = 15.0;
/// Arrowhead length along the direction of travel
pub const ARROW_LENGTH: f64 = 6.0;
/// Arrowhead half-width across the direction of travel
pub const ARROW_HALF_WIDTH: f64 = 4.0;

/// Resolve predecessor tokens of every visible row into routed links.
///
/// Tokens that do not decode, name the row itself, or point to a row that is
/// not visible produce no link. Issues with the records are reported by
/// [`crate::audit`]; this pass only skips.
pub fn resolve_links(forest: &Forest, visible: &[usize], rows: &[VisualRow]) -> Vec<DependencyLink> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        positions.entry(row.id.as_str()).or_insert(pos);
    }

    let mut links = Vec::new();
    for (to_pos, &idx) in visible.iter().enumerate() {
        let successor: &TaskNode = forest.node(idx);
        for decoded in successor.predecessor_links() {
            let link: PredecessorLink = match decoded {
                Ok(link) => link,
                Err(err) => {
                    debug!(task = %successor.id, error = %err, "skipping predecessor token");
                    continue;
                }
            };
            if link.predecessor_id == successor.id {
                continue;
            }
            let Some(&from_pos) = positions.get(link.predecessor_id.as_str()) else {
                trace!(
                    task = %successor.id,
                    predecessor = %link.predecessor_id,
                    "predecessor not visible"
                );
                continue;
            };

            let from = &rows[from_pos];
            let to = &rows[to_pos];
            let path = route(from, to);
            let arrowhead = arrowhead(&path);
            links.push(DependencyLink {
                from_row_id: from.id.clone(),
                to_row_id: to.id.clone(),
                dep_type: link.dep_type,
                path,
                arrowhead,
            });
        }
    }
    links
}

/// Orthogonal path from `from`'s right-center to `to`'s left-center.
pub fn route(from: &VisualRow, to: &VisualRow) -> Vec<Point> {
    let start = Point::new(from.right, from.center_y());
    let end = Point::new(to.left, to.center_y());

    if end.x > start.x + DIRECT_ROUTE_GAP {
        let mid_x = (start.x + end.x) / 2.0;
        return vec![
            start,
            Point::new(mid_x, start.y),
            Point::new(mid_x, end.y),
            end,
        ];
    }

    // Successor starts at or before the predecessor's end: step out, cross
    // over between the rows, and come back in from the left.
    let mid_y = if (end.y - start.y).abs() < SAME_LEVEL_TOLERANCE {
        start.y + SAME_LEVEL_DETOUR
    } else {
        (start.y + end.y) / 2.0
    };
    let out_x = start.x + WRAP_STUB;
    let in_x = end.x - WRAP_STUB;

    vec![
        start,
        Point::new(out_x, start.y),
        Point::new(out_x, mid_y),
        Point::new(in_x, mid_y),
        Point::new(in_x, end.y),
        end,
    ]
}

/// Triangle with its tip on the last point, pointing along the last segment.
pub fn arrowhead(path: &[Point]) -> Vec<Point> {
    let Some(&tip) = path.last() else {
        return Vec::new();
    };

    // Direction of the last non-degenerate segment; rightward if none.
    let (dx, dy) = path
        .windows(2)
        .rev()
        .map(|w| (w[1].x - w[0].x, w[1].y - w[0].y))
        .find(|(dx, dy)| dx.hypot(*dy) > f64::EPSILON)
        .map_or((1.0, 0.0), |(dx, dy)| {
            let len = dx.hypot(dy);
            (dx / len, dy / len)
        });

    let base_x = tip.x - dx * ARROW_LENGTH;
    let base_y = tip.y - dy * ARROW_LENGTH;
    // perpendicular
    let (px, py) = (-dy * ARROW_HALF_WIDTH, dx * ARROW_HALF_WIDTH);

    vec![
        tip,
        Point::new(base_x + px, base_y + py),
        Point::new(base_x - px, base_y - py),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bar(row_index: usize, left: f64, width: f64) -> VisualRow {
        let top = row_index as f64 * 24.0;
        VisualRow {
            id: format!("r{row_index}"),
            name: String::new(),
            row_index,
            indent_level: 0,
            left,
            width,
            right: left + width,
            top,
            height: 24.0,
            bar_top: top + 4.0,
            bar_height: 16.0,
            progress_width: 0.0,
            percent_complete: 0.0,
            is_summary: false,
            is_expandable: false,
            is_expanded: false,
            is_on_hold: false,
            assignees: Vec::new(),
        }
    }

    fn is_orthogonal(path: &[Point]) -> bool {
        path.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
    }

    #[test]
    fn clear_gap_uses_three_segments() {
        let path = route(&bar(0, 0.0, 100.0), &bar(1, 150.0, 50.0));
        assert_eq!(
            path,
            vec![
                Point::new(100.0, 12.0),
                Point::new(125.0, 12.0),
                Point::new(125.0, 36.0),
                Point::new(150.0, 36.0),
            ]
        );
    }

    #[test]
    fn overlap_wraps_with_five_segments() {
        let path = route(&bar(0, 0.0, 200.0), &bar(2, 100.0, 50.0));
        assert_eq!(
            path,
            vec![
                Point::new(200.0, 12.0),
                Point::new(210.0, 12.0),
                Point::new(210.0, 36.0),
                Point::new(90.0, 36.0),
                Point::new(90.0, 60.0),
                Point::new(100.0, 60.0),
            ]
        );
        assert!(is_orthogonal(&path));
    }

    #[test]
    fn gap_of_exactly_twenty_still_wraps() {
        let path = route(&bar(0, 0.0, 100.0), &bar(1, 120.0, 50.0));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn same_level_wrap_detours_below_start() {
        let from = bar(0, 0.0, 100.0);
        let mut to = bar(0, 50.0, 20.0);
        to.id = "other".into();
        let path = route(&from, &to);
        assert_eq!(path[2].y, 12.0 + SAME_LEVEL_DETOUR);
        assert!(path.windows(2).all(|w| w[0] != w[1]), "zero-length segment in {path:?}");
    }

    #[test]
    fn rightward_arrowhead() {
        let head = arrowhead(&[Point::new(0.0, 10.0), Point::new(50.0, 10.0)]);
        assert_eq!(
            head,
            vec![
                Point::new(50.0, 10.0),
                Point::new(44.0, 14.0),
                Point::new(44.0, 6.0),
            ]
        );
    }

    #[test]
    fn arrowhead_skips_zero_length_tail() {
        let head = arrowhead(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 30.0),
            Point::new(0.0, 30.0),
        ]);
        assert_eq!(head[0], Point::new(0.0, 30.0));
        assert_eq!(head[1].y, 24.0);
        assert_eq!(head[2].y, 24.0);
    }

    #[test]
    fn empty_path_has_no_arrowhead() {
        assert!(arrowhead(&[]).is_empty());
    }
}
