//! Summary bars
//!
//! A row with visible children is drawn across the union of its children's
//! bars, not across its own dates. Parent/child pairs are recovered from the
//! flattened order and indent levels alone, then rows are resolved last to
//! first so every child is final before its parent reads it.

use siteplan_core::LayoutConfig;

use crate::VisualRow;

/// Overwrite the span of every row that has visible children.
pub fn bubble_summaries(rows: &mut [VisualRow], config: &LayoutConfig) {
    let children = visible_children(rows);

    for idx in (0..rows.len()).rev() {
        let kids = &children[idx];
        if kids.is_empty() {
            continue;
        }

        let left = kids.iter().map(|&c| rows[c].left).fold(f64::INFINITY, f64::min);
        let right = kids
            .iter()
            .map(|&c| rows[c].right)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut width = right - left;
        if width < config.summary_width_floor {
            width = config.summary_min_width;
        }

        let row = &mut rows[idx];
        row.set_span(left, width);
        row.is_summary = true;
    }
}

/// Direct children of each row, found with a stack of open ancestors.
fn visible_children(rows: &[VisualRow]) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); rows.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        while let Some(&top) = stack.last() {
            if rows[top].indent_level >= row.indent_level {
                stack.pop();
            } else {
                break;
            }
        }
        if let Some(&parent) = stack.last() {
            children[parent].push(idx);
        }
        stack.push(idx);
    }

    children
}
