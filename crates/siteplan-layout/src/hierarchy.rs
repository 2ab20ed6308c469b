//! Hierarchy construction from parent references
//!
//! Task records reference their parent by id. The [`Forest`] is an arena over
//! the borrowed records: relations are stored as indices into the input slice,
//! so nothing is cloned and the records stay untouched.
//!
//! Policies for bad references:
//! - unknown parent id: the task becomes a root (no task disappears)
//! - self or cyclic parent chain: the task where the chain closes becomes a root
//! - duplicate id: every record keeps its own slot, lookups resolve to the first

use std::collections::HashMap;

use siteplan_core::{Notice, NoticeCode, TaskNode};
use tracing::{debug, warn};

/// Arena view of a task snapshot
#[derive(Debug)]
pub struct Forest<'a> {
    nodes: &'a [TaskNode],
    index: HashMap<&'a str, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    depth: Vec<usize>,
}

impl<'a> Forest<'a> {
    /// Build the forest, appending a notice for every reference it had to repair.
    pub fn build(nodes: &'a [TaskNode], notices: &mut Vec<Notice>) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if index.contains_key(node.id.as_str()) {
                warn!(task = %node.id, "duplicate task id");
                notices.push(
                    Notice::new(
                        NoticeCode::L006DuplicateId,
                        format!("id '{}' appears more than once; links resolve to the first", node.id),
                    )
                    .on_task(node.id.clone()),
                );
            } else {
                index.insert(node.id.as_str(), idx);
            }
        }

        let mut parent: Vec<Option<usize>> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let parent_id = node.parent_id.as_deref()?;
                match index.get(parent_id) {
                    Some(&p) if p == idx => {
                        warn!(task = %node.id, "task is its own parent");
                        notices.push(
                            Notice::new(NoticeCode::L005ParentCycle, "task names itself as parent; shown as root")
                                .on_task(node.id.clone()),
                        );
                        None
                    }
                    Some(&p) => Some(p),
                    None => {
                        debug!(task = %node.id, parent = parent_id, "orphaned task promoted to root");
                        notices.push(
                            Notice::new(
                                NoticeCode::L004OrphanedParent,
                                format!("parent '{}' is not loaded; shown as root", parent_id),
                            )
                            .on_task(node.id.clone()),
                        );
                        None
                    }
                }
            })
            .collect();

        break_parent_cycles(nodes, &mut parent, notices);

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (idx, p) in parent.iter().enumerate() {
            match *p {
                Some(p) => children[p].push(idx),
                None => roots.push(idx),
            }
        }

        let mut depth = vec![0; nodes.len()];
        let mut stack: Vec<usize> = roots.clone();
        while let Some(idx) = stack.pop() {
            for &child in &children[idx] {
                depth[child] = depth[idx] + 1;
                stack.push(child);
            }
        }

        Self {
            nodes,
            index,
            parent,
            children,
            roots,
            depth,
        }
    }

    /// Number of records in the snapshot
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &'a TaskNode {
        &self.nodes[idx]
    }

    /// Root indices in input order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Child indices in input order
    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parent[idx]
    }

    /// Depth below the root (root = 0)
    pub fn indent_level(&self, idx: usize) -> usize {
        self.depth[idx]
    }

    /// Arena index of the first record with this id
    pub fn lookup(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

/// Walk every parent chain once. When a chain reaches a node already on the
/// current walk, that node's parent link is cut.
fn break_parent_cycles(nodes: &[TaskNode], parent: &mut [Option<usize>], notices: &mut Vec<Notice>) {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parent.len()];
    let mut path = Vec::new();

    for start in 0..parent.len() {
        let mut cur = start;
        loop {
            match marks[cur] {
                Mark::Done => break,
                Mark::OnPath => {
                    warn!(task = %nodes[cur].id, "parent cycle broken");
                    notices.push(
                        Notice::new(NoticeCode::L005ParentCycle, "parent chain loops back here; shown as root")
                            .on_task(nodes[cur].id.clone()),
                    );
                    parent[cur] = None;
                    break;
                }
                Mark::Unvisited => {
                    marks[cur] = Mark::OnPath;
                    path.push(cur);
                    match parent[cur] {
                        Some(p) => cur = p,
                        None => break,
                    }
                }
            }
        }
        for idx in path.drain(..) {
            marks[idx] = Mark::Done;
        }
    }
}
