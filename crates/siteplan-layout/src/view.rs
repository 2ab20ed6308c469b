//! Host-side view model
//!
//! [`GanttView`] owns the state that survives between layouts: the current
//! snapshot, the set of expanded task ids and the configuration. Hosts feed it
//! discrete [`ViewCommand`]s and ask for a new layout after each one.
//!
//! Layouts can run off the UI thread. [`GanttView::job`] captures an owned
//! [`LayoutJob`] tagged with the current generation; [`GanttView::accept`]
//! publishes a finished [`LayoutOutcome`] only if no newer command has arrived
//! since, so the last triggered recompute always wins.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use siteplan_core::{LayoutConfig, TaskNode};
//! use siteplan_layout::{GanttView, ViewCommand};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//! let mut view = GanttView::new(LayoutConfig::default());
//! view.apply(ViewCommand::Load(vec![
//!     TaskNode::new("shell").group(),
//!     TaskNode::new("roof").parent("shell"),
//! ]));
//! assert_eq!(view.refresh_as_of(today).rows.len(), 2);
//!
//! view.apply(ViewCommand::Toggle("shell".into()));
//! assert_eq!(view.refresh_as_of(today).rows.len(), 1);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use siteplan_core::{LayoutConfig, TaskId, TaskNode};
use tracing::debug;

use crate::{compute_layout, GanttLayout};

/// A discrete trigger for recomputing the view
#[derive(Clone, Debug)]
pub enum ViewCommand {
    /// Replace the snapshot and reseed expansion from the records' flags
    Load(Vec<TaskNode>),
    /// Replace the snapshot, keeping expansion for ids seen before
    TasksChanged(Vec<TaskNode>),
    /// Flip one task between expanded and collapsed
    Toggle(TaskId),
    Expand(TaskId),
    Collapse(TaskId),
    ExpandAll,
    CollapseAll,
    SetConfig(LayoutConfig),
}

/// Everything one layout needs, detached from the view
#[derive(Clone, Debug)]
pub struct LayoutJob {
    generation: u64,
    tasks: Arc<Vec<TaskNode>>,
    expanded: HashSet<TaskId>,
    config: LayoutConfig,
    today: NaiveDate,
}

impl LayoutJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn run(self) -> LayoutOutcome {
        let layout = compute_layout(&self.tasks, &self.expanded, &self.config, self.today);
        LayoutOutcome {
            generation: self.generation,
            layout,
        }
    }
}

/// A finished layout and the generation it was computed for
#[derive(Clone, Debug)]
pub struct LayoutOutcome {
    pub generation: u64,
    pub layout: GanttLayout,
}

/// View state carried between layouts
#[derive(Debug, Default)]
pub struct GanttView {
    tasks: Arc<Vec<TaskNode>>,
    expanded: HashSet<TaskId>,
    known: HashSet<TaskId>,
    config: LayoutConfig,
    generation: u64,
    current: Option<LayoutOutcome>,
}

impl GanttView {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Apply a command and advance the generation. Any layout still running
    /// for an earlier generation will be rejected by [`accept`](Self::accept).
    pub fn apply(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Load(tasks) => {
                self.expanded = crate::initial_expansion(&tasks);
                self.known = tasks.iter().map(|t| t.id.clone()).collect();
                self.tasks = Arc::new(tasks);
            }
            ViewCommand::TasksChanged(tasks) => {
                let present: HashSet<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
                self.expanded.retain(|id| present.contains(id));
                for task in &tasks {
                    if !self.known.contains(&task.id) && task.is_expanded {
                        self.expanded.insert(task.id.clone());
                    }
                }
                self.known = present;
                self.tasks = Arc::new(tasks);
            }
            ViewCommand::Toggle(id) => {
                if !self.known.contains(&id) {
                    debug!(task = %id, "toggle for unknown task ignored");
                } else if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }
            ViewCommand::Expand(id) => {
                if self.known.contains(&id) {
                    self.expanded.insert(id);
                }
            }
            ViewCommand::Collapse(id) => {
                self.expanded.remove(&id);
            }
            ViewCommand::ExpandAll => {
                self.expanded = self.known.clone();
            }
            ViewCommand::CollapseAll => {
                self.expanded.clear();
            }
            ViewCommand::SetConfig(config) => {
                self.config = config;
            }
        }
        self.generation += 1;
    }

    /// Snapshot the current state into a job for the current generation.
    pub fn job(&self, today: NaiveDate) -> LayoutJob {
        LayoutJob {
            generation: self.generation,
            tasks: Arc::clone(&self.tasks),
            expanded: self.expanded.clone(),
            config: self.config.clone(),
            today,
        }
    }

    /// Publish a finished layout. Returns `false` and drops it when a newer
    /// command has been applied since its job was taken.
    pub fn accept(&mut self, outcome: LayoutOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding stale layout"
            );
            return false;
        }
        self.current = Some(outcome);
        true
    }

    /// Recompute synchronously as of `today` and publish the result.
    pub fn refresh_as_of(&mut self, today: NaiveDate) -> &GanttLayout {
        let outcome = self.job(today).run();
        &self.current.insert(outcome).layout
    }

    /// Recompute synchronously as of the local date.
    pub fn refresh(&mut self) -> &GanttLayout {
        self.refresh_as_of(chrono::Local::now().date_naive())
    }

    /// Most recently published layout
    pub fn layout(&self) -> Option<&GanttLayout> {
        self.current.as_ref().map(|o| &o.layout)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_ids(&self) -> &HashSet<TaskId> {
        &self.expanded
    }

    pub fn tasks(&self) -> &[TaskNode] {
        &self.tasks
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}
