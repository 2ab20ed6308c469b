//! # siteplan-core
//!
//! Core domain model for the siteplan Gantt layout engine.
//!
//! This crate provides:
//! - Domain types: `TaskNode`, `DependencyType`, `PredecessorLink`
//! - The `"id|type"` predecessor token codec
//! - Layout configuration (`LayoutConfig`) with TOML loading
//! - Notices describing data issues the engine absorbed
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use siteplan_core::{DependencyType, PredecessorLink, TaskNode};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
//!
//! let foundations = TaskNode::new("foundations")
//!     .name("Pour foundations")
//!     .dates(day(3), day(7));
//! let framing = TaskNode::new("framing")
//!     .name("Timber framing")
//!     .dates(day(10), day(21))
//!     .after("foundations");
//!
//! let link: PredecessorLink = framing.predecessors[0].parse().unwrap();
//! assert_eq!(link.predecessor_id, foundations.id);
//! assert_eq!(link.dep_type, DependencyType::FinishToStart);
//! ```

pub mod config;
pub mod notice;

pub use config::LayoutConfig;
pub use notice::{Notice, NoticeCode, Severity};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task record
pub type TaskId = String;

// ============================================================================
// Task
// ============================================================================

/// One task record from the project schedule.
///
/// Records arrive as a flat list; the hierarchy is expressed only through
/// `parent_id`. The engine never modifies a `TaskNode`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskNode {
    /// Unique identifier
    pub id: TaskId,
    /// Parent task, `None` for a root
    pub parent_id: Option<TaskId>,
    /// Human-readable name
    pub name: String,
    /// Completion percentage (0-100)
    pub percent_complete: f32,
    /// Marked as a group (summary) task by the source system.
    ///
    /// Carried for hosts only; the layout never reads it. A row becomes a
    /// summary bar only when it has visible children, so a flagged group
    /// with none of its children loaded is drawn from its own dates.
    pub is_group: bool,
    /// Work on this task is paused
    pub is_on_hold: bool,
    /// Planned start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Planned finish (inclusive)
    pub finish_date: Option<NaiveDate>,
    /// Depth as reported by the source. Not trusted; the hierarchy builder
    /// recomputes depth from parent references.
    pub indent_level: usize,
    /// Initial expansion state for a task seen for the first time
    pub is_expanded: bool,
    /// Predecessor tokens in `"id|type"` form
    pub predecessors: Vec<String>,
    /// Display names of the people assigned
    pub assignees: Vec<String>,
}

impl Default for TaskNode {
    fn default() -> Self {
        Self {
            id: TaskId::new(),
            parent_id: None,
            name: String::new(),
            percent_complete: 0.0,
            is_group: false,
            is_on_hold: false,
            start_date: None,
            finish_date: None,
            indent_level: 0,
            is_expanded: true,
            predecessors: Vec::new(),
            assignees: Vec::new(),
        }
    }
}

impl TaskNode {
    /// Create a new task with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Set the task name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the parent task
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Set planned start and finish
    pub fn dates(mut self, start: NaiveDate, finish: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.finish_date = Some(finish);
        self
    }

    /// Set the completion percentage
    pub fn complete(mut self, pct: f32) -> Self {
        self.percent_complete = pct;
        self
    }

    /// Mark as a group task
    pub fn group(mut self) -> Self {
        self.is_group = true;
        self
    }

    /// Mark as on hold
    pub fn on_hold(mut self) -> Self {
        self.is_on_hold = true;
        self
    }

    /// Set the initial expansion state
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = expanded;
        self
    }

    /// Add a Finish-to-Start predecessor
    pub fn after(mut self, predecessor: impl Into<String>) -> Self {
        let link = PredecessorLink::new(predecessor, DependencyType::FinishToStart);
        self.predecessors.push(link.to_string());
        self
    }

    /// Add a raw predecessor token (not validated)
    pub fn predecessor(mut self, token: impl Into<String>) -> Self {
        self.predecessors.push(token.into());
        self
    }

    /// Assign a person by display name
    pub fn assign(mut self, name: impl Into<String>) -> Self {
        self.assignees.push(name.into());
        self
    }

    /// Decode every predecessor token, in order.
    pub fn predecessor_links(
        &self,
    ) -> impl Iterator<Item = Result<PredecessorLink, TokenError>> + '_ {
        self.predecessors.iter().map(|token| token.parse())
    }

    /// True when both dates are present and finish is before start
    pub fn has_inverted_range(&self) -> bool {
        matches!((self.start_date, self.finish_date), (Some(s), Some(f)) if f < s)
    }

    /// Completion clamped to 0-100
    pub fn effective_percent_complete(&self) -> f32 {
        if self.percent_complete.is_nan() {
            return 0.0;
        }
        self.percent_complete.clamp(0.0, 100.0)
    }
}

// ============================================================================
// Dependencies
// ============================================================================

/// Types of task dependencies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Finish-to-Start: successor starts after predecessor finishes
    #[default]
    FinishToStart,
    /// Start-to-Start: successor starts when predecessor starts
    StartToStart,
    /// Finish-to-Finish: successor finishes when predecessor finishes
    FinishToFinish,
    /// Start-to-Finish: successor finishes when predecessor starts
    StartToFinish,
}

impl DependencyType {
    /// Two-letter code used in predecessor tokens
    pub const fn code(self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "FS",
            DependencyType::StartToStart => "SS",
            DependencyType::FinishToFinish => "FF",
            DependencyType::StartToFinish => "SF",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DependencyType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "" | "fs" | "finishtostart" => Ok(DependencyType::FinishToStart),
            "ss" | "starttostart" => Ok(DependencyType::StartToStart),
            "ff" | "finishtofinish" => Ok(DependencyType::FinishToFinish),
            "sf" | "starttofinish" => Ok(DependencyType::StartToFinish),
            _ => Err(TokenError::UnknownType(s.trim().to_string())),
        }
    }
}

/// A decoded predecessor reference
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredecessorLink {
    /// ID of the predecessor task
    pub predecessor_id: TaskId,
    /// Type of dependency
    pub dep_type: DependencyType,
}

impl PredecessorLink {
    pub fn new(predecessor_id: impl Into<String>, dep_type: DependencyType) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            dep_type,
        }
    }
}

/// Tokens are `"id"` or `"id|type"`. A bare id, or an empty type after the
/// separator, means Finish-to-Start.
impl FromStr for PredecessorLink {
    type Err = TokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        let (id, dep_type) = match token.split_once('|') {
            Some((id, kind)) => (id.trim(), kind.parse()?),
            None => (token, DependencyType::FinishToStart),
        };

        if id.is_empty() {
            return Err(TokenError::MissingId(token.to_string()));
        }

        Ok(Self::new(id, dep_type))
    }
}

impl fmt::Display for PredecessorLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.predecessor_id, self.dep_type)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Predecessor token could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("empty predecessor token")]
    Empty,

    #[error("predecessor token '{0}' has no task id")]
    MissingId(String),

    #[error("unknown dependency type '{0}'")]
    UnknownType(String),
}

/// Configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Tests
// ============================================================================
