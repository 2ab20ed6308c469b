//! Notice reporting for CLI output
//!
//! `siteplan check` (and `layout` on stderr) prints notices in the form
//! `severity[CODE]: task 'ID': message`, or as a JSON array with `--format json`.
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings/info allowed) |
//! | 1 | Failure: one or more errors reported |
//!
//! `--strict` escalates warnings to errors and info to warnings before the
//! exit code is decided.

use std::io::{self, Write};
use std::process;

use serde::Serialize;
use siteplan_core::{Notice, Severity};

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// No errors after policy
    Success = 0,
    /// One or more errors after policy
    Failure = 1,
}

impl ExitCode {
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Policy
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPolicy {
    /// Escalate severities: warnings become errors, info becomes warnings
    pub strict: bool,
    /// Print only errors (after escalation); does not affect the exit code
    pub quiet: bool,
}

impl ReportPolicy {
    pub fn effective_severity(&self, severity: Severity) -> Severity {
        if self.strict {
            match severity {
                Severity::Warning => Severity::Error,
                Severity::Info => Severity::Warning,
                s => s,
            }
        } else {
            severity
        }
    }

    pub fn should_show(&self, severity: Severity) -> bool {
        !self.quiet || self.effective_severity(severity) == Severity::Error
    }
}

// ============================================================================
// Report
// ============================================================================

/// JSON representation of a notice
#[derive(Debug, Serialize)]
pub struct JsonNotice<'a> {
    pub code: &'static str,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<&'a str>,
    pub message: &'a str,
}

/// Notices with the policy applied
#[derive(Debug)]
pub struct Report<'a> {
    notices: &'a [Notice],
    policy: ReportPolicy,
}

impl<'a> Report<'a> {
    pub fn new(notices: &'a [Notice], policy: ReportPolicy) -> Self {
        Self { notices, policy }
    }

    /// Errors after escalation, whether shown or not
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.notices
            .iter()
            .filter(|n| self.policy.effective_severity(n.severity()) == severity)
            .count()
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count())
    }

    fn visible(&self) -> impl Iterator<Item = &'a Notice> + '_ {
        self.notices
            .iter()
            .filter(|n| self.policy.should_show(n.severity()))
    }

    /// Human-readable lines followed by a summary line
    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for notice in self.visible() {
            write!(
                writer,
                "{}[{}]: ",
                self.policy.effective_severity(notice.severity()),
                notice.code
            )?;
            if let Some(id) = &notice.task_id {
                write!(writer, "task '{}': ", id)?;
            }
            writeln!(writer, "{}", notice.message)?;
        }

        let errors = self.error_count();
        let warnings = self.warning_count();
        if errors == 0 && warnings == 0 {
            writeln!(writer, "ok: {} notice(s), no problems", self.notices.len())
        } else {
            writeln!(writer, "{} error(s), {} warning(s)", errors, warnings)
        }
    }

    pub fn to_json(&self) -> Vec<JsonNotice<'a>> {
        self.visible()
            .map(|n| JsonNotice {
                code: n.code.as_str(),
                severity: self.policy.effective_severity(n.severity()),
                task_id: n.task_id.as_deref(),
                message: &n.message,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteplan_core::NoticeCode;

    fn notices() -> Vec<Notice> {
        vec![
            Notice::new(NoticeCode::L002DanglingPredecessor, "predecessor 'x' is not loaded")
                .on_task("b"),
            Notice::new(NoticeCode::L003InvertedRange, "finish before start").on_task("c"),
        ]
    }

    #[test]
    fn warnings_pass_by_default() {
        let notices = notices();
        let report = Report::new(&notices, ReportPolicy::default());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 1);
        assert!(report.exit_code().is_success());
    }

    #[test]
    fn strict_escalates_warnings() {
        let notices = notices();
        let policy = ReportPolicy {
            strict: true,
            ..Default::default()
        };
        let report = Report::new(&notices, policy);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn errors_fail_without_strict() {
        let notices = vec![Notice::new(NoticeCode::L006DuplicateId, "id 'a' appears 2 times")];
        let report = Report::new(&notices, ReportPolicy::default());
        assert_eq!(report.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn text_output_lists_notices_and_summary() {
        let notices = notices();
        let mut out = Vec::new();
        Report::new(&notices, ReportPolicy::default())
            .write_text(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("info[L002]: task 'b': predecessor 'x' is not loaded"));
        assert!(text.contains("warning[L003]: task 'c': finish before start"));
        assert!(text.ends_with("0 error(s), 1 warning(s)\n"));
    }

    #[test]
    fn quiet_hides_non_errors_but_keeps_exit_code() {
        let notices = notices();
        let policy = ReportPolicy {
            strict: true,
            quiet: true,
        };
        let report = Report::new(&notices, policy);
        let json = report.to_json();
        assert_eq!(json.len(), 1);
        assert_eq!(json[0].code, "L003");
        assert_eq!(json[0].severity, Severity::Error);
        assert_eq!(report.exit_code(), ExitCode::Failure);
    }
}
