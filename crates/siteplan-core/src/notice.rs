//! Notices for data issues absorbed during layout
//!
//! The layout engine never fails on bad input. Instead it clamps, skips or
//! promotes, and records what it did as a [`Notice`] so a host can surface
//! data-quality problems without blocking the view.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TaskId;

/// How serious an absorbed issue is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable notice codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeCode {
    /// Predecessor token could not be decoded; the link was skipped
    L001MalformedPredecessor,
    /// Predecessor id is not in the loaded snapshot; the link was dropped
    L002DanglingPredecessor,
    /// Finish before start; rendered as a one-day bar
    L003InvertedRange,
    /// Parent id is not in the loaded snapshot; promoted to root
    L004OrphanedParent,
    /// Parent references form a cycle; broken by promoting a root
    L005ParentCycle,
    /// Two records share an id
    L006DuplicateId,
    /// Task lists itself as its own predecessor
    L007SelfDependency,
}

impl NoticeCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NoticeCode::L001MalformedPredecessor => "L001",
            NoticeCode::L002DanglingPredecessor => "L002",
            NoticeCode::L003InvertedRange => "L003",
            NoticeCode::L004OrphanedParent => "L004",
            NoticeCode::L005ParentCycle => "L005",
            NoticeCode::L006DuplicateId => "L006",
            NoticeCode::L007SelfDependency => "L007",
        }
    }

    pub const fn severity(&self) -> Severity {
        match self {
            NoticeCode::L005ParentCycle | NoticeCode::L006DuplicateId => Severity::Error,
            NoticeCode::L001MalformedPredecessor
            | NoticeCode::L003InvertedRange
            | NoticeCode::L007SelfDependency => Severity::Warning,
            NoticeCode::L002DanglingPredecessor | NoticeCode::L004OrphanedParent => Severity::Info,
        }
    }
}

impl fmt::Display for NoticeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One absorbed data issue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: NoticeCode,
    /// Task the issue was found on
    pub task_id: Option<TaskId>,
    pub message: String,
}

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            task_id: None,
            message: message.into(),
        }
    }

    /// Attach the task the issue belongs to
    pub fn on_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Renders as `warning[L001]: task 'B': ...`
impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: ", self.severity(), self.code)?;
        if let Some(ref id) = self.task_id {
            write!(f, "task '{}': ", id)?;
        }
        f.write_str(&self.message)
    }
}
