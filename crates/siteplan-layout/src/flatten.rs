//! Visible row order
//!
//! Pre-order walk of the forest. A node's children are visited only when its
//! id is in the expanded set; collapsed descendants stay in the forest and
//! simply do not produce rows.

use std::collections::HashSet;

use siteplan_core::TaskId;

use crate::hierarchy::Forest;

/// Arena indices of the rows to display, in display order.
///
/// The walk keeps its own stack, so hierarchy depth is bounded by memory and
/// not by the thread's call stack.
pub fn flatten_visible(forest: &Forest, expanded: &HashSet<TaskId>) -> Vec<usize> {
    let mut visible = Vec::with_capacity(forest.len());
    let mut emitted = vec![false; forest.len()];
    let mut stack: Vec<usize> = forest.roots().iter().rev().copied().collect();

    while let Some(idx) = stack.pop() {
        // Never re-enter a node; guards against any parent loop the builder missed.
        if emitted[idx] {
            continue;
        }
        emitted[idx] = true;
        visible.push(idx);

        if expanded.contains(&forest.node(idx).id) {
            stack.extend(forest.children(idx).iter().rev());
        }
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use siteplan_core::TaskNode;

    fn flatten_ids(nodes: &[TaskNode], expanded: &[&str]) -> Vec<String> {
        let forest = Forest::build(nodes, &mut Vec::new());
        let expanded: HashSet<TaskId> = expanded.iter().map(|s| s.to_string()).collect();
        flatten_visible(&forest, &expanded)
            .into_iter()
            .map(|i| forest.node(i).id.clone())
            .collect()
    }

    fn project() -> Vec<TaskNode> {
        vec![
            TaskNode::new("p").group(),
            TaskNode::new("x").parent("p"),
            TaskNode::new("x1").parent("x"),
            TaskNode::new("y").parent("p"),
            TaskNode::new("q"),
        ]
    }

    #[test]
    fn fully_expanded_is_pre_order() {
        assert_eq!(
            flatten_ids(&project(), &["p", "x", "y", "q"]),
            vec!["p", "x", "x1", "y", "q"]
        );
    }

    #[test]
    fn collapsed_parent_hides_whole_subtree() {
        assert_eq!(flatten_ids(&project(), &["x"]), vec!["p", "q"]);
    }

    #[test]
    fn collapsed_middle_level() {
        assert_eq!(flatten_ids(&project(), &["p"]), vec!["p", "x", "y", "q"]);
    }

    #[test]
    fn leaves_visible_regardless_of_flag() {
        let nodes = vec![TaskNode::new("leaf").expanded(false)];
        assert_eq!(flatten_ids(&nodes, &[]), vec!["leaf"]);
    }

    #[test]
    fn same_input_same_order() {
        let nodes = project();
        let first = flatten_ids(&nodes, &["p", "x"]);
        let second = flatten_ids(&nodes, &["p", "x"]);
        assert_eq!(first, second);
    }

    #[test]
    fn deep_parent_chain_does_not_exhaust_the_stack() {
        let depth = 50_000;
        let nodes: Vec<TaskNode> = (0..depth)
            .map(|i| {
                let node = TaskNode::new(format!("t{i}"));
                if i == 0 {
                    node
                } else {
                    node.parent(format!("t{}", i - 1))
                }
            })
            .collect();
        let forest = Forest::build(&nodes, &mut Vec::new());
        let expanded: HashSet<TaskId> = nodes.iter().map(|n| n.id.clone()).collect();

        let visible = flatten_visible(&forest, &expanded);
        assert_eq!(visible.len(), depth);
        assert!(visible.iter().enumerate().all(|(pos, &idx)| pos == idx));
        assert_eq!(forest.indent_level(depth - 1), depth - 1);
    }
}
