//! Record-level checks
//!
//! Reports, for the whole snapshot, the issues the layout silently absorbs:
//! undecodable or self-referencing predecessor tokens, predecessors that are
//! not loaded, and inverted date ranges. The result does not depend on which
//! rows are expanded.

use siteplan_core::{Notice, NoticeCode};
use tracing::debug;

use crate::hierarchy::Forest;

pub fn audit_records(forest: &Forest) -> Vec<Notice> {
    let mut notices = Vec::new();

    for idx in 0..forest.len() {
        let task = forest.node(idx);

        if task.has_inverted_range() {
            notices.push(
                Notice::new(
                    NoticeCode::L003InvertedRange,
                    "finish date is before start date; drawn as a one-day bar",
                )
                .on_task(task.id.clone()),
            );
        }

        for (position, decoded) in task.predecessor_links().enumerate() {
            match decoded {
                Err(err) => notices.push(
                    Notice::new(
                        NoticeCode::L001MalformedPredecessor,
                        format!("predecessor #{}: {}", position + 1, err),
                    )
                    .on_task(task.id.clone()),
                ),
                Ok(link) if link.predecessor_id == task.id => notices.push(
                    Notice::new(NoticeCode::L007SelfDependency, "task lists itself as predecessor")
                        .on_task(task.id.clone()),
                ),
                Ok(link) if forest.lookup(&link.predecessor_id).is_none() => notices.push(
                    Notice::new(
                        NoticeCode::L002DanglingPredecessor,
                        format!("predecessor '{}' is not loaded", link.predecessor_id),
                    )
                    .on_task(task.id.clone()),
                ),
                Ok(_) => {}
            }
        }
    }

    if !notices.is_empty() {
        debug!(count = notices.len(), "record issues absorbed");
    }
    notices
}
