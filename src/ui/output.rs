//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Diagnostics (`[debug]`, `warning:`, `error:`) go to stderr so that
//! stdout carries only the report. When `--json` is enabled, the report is
//! machine-readable JSON.
//!
//! Report renderers return strings and never print, which keeps them
//! testable.

use std::fmt::Display;

use serde::Serialize;

use crate::core::report::{AuditReport, CleanupPlan, ExecuteResult};

/// Width of the tag column in the audit table.
const TAG_COLUMN: usize = 30;

/// Width of the classification column in the audit table.
const CLASS_COLUMN: usize = 15;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a value as pretty JSON on stdout.
///
/// JSON is the requested output, so quiet mode does not suppress it.
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the audit table with its summary line.
pub fn render_audit(report: &AuditReport) -> String {
    let rule = "-".repeat(TAG_COLUMN + CLASS_COLUMN);
    let mut lines = vec![
        format!("{:<TAG_COLUMN$} {:<CLASS_COLUMN$}", "Tag", "Classification")
            .trim_end()
            .to_string(),
        rule.clone(),
    ];
    for tag in &report.tags {
        lines.push(format!(
            "{:<TAG_COLUMN$} {}",
            tag.name,
            tag.classification.label()
        ));
    }
    lines.push(rule);
    lines.push(format!(
        "Total: {}  |  Rename: {}  |  Delete: {}",
        report.total(),
        report.rename_count(),
        report.delete_count()
    ));
    lines.join("\n")
}

/// Render the planned renames and deletions.
pub fn render_plan(plan: &CleanupPlan) -> String {
    let mut out = format!("Tags to RENAME ({}):", plan.to_rename.len());
    for entry in &plan.to_rename {
        out.push_str(&format!("\n  ~ {} -> {}", entry.old_name, entry.new_name));
    }

    out.push_str(&format!("\n\nTags to DELETE ({}):", plan.to_delete.len()));
    for tag in &plan.to_delete {
        out.push_str(&format!("\n  - {}", tag.name));
    }
    out
}

/// Render what a run changed and what failed.
///
/// Empty sections are left out; a run that changed nothing renders as
/// a single line.
pub fn render_result(result: &ExecuteResult) -> String {
    let mut sections = Vec::new();

    if !result.renamed.is_empty() {
        sections.push(format!(
            "Renamed {} tag(s):\n{}",
            result.renamed_count(),
            format_list(&result.renamed, "  ~ ")
        ));
    }
    if !result.deleted.is_empty() {
        sections.push(format!(
            "Deleted {} tag(s):\n{}",
            result.deleted_count(),
            format_list(&result.deleted, "  - ")
        ));
    }
    if !result.errors.is_empty() {
        sections.push(format!(
            "Errors ({}):\n{}",
            result.errors.len(),
            format_list(&result.errors, "  ! ")
        ));
    }

    if sections.is_empty() {
        return "Nothing to do.".to_string();
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::naming::Classification;
    use crate::core::report::{ClassifiedTag, RenameEntry, RenameOutcome, RunFailure};

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn audit_table() {
        let report = AuditReport {
            tags: vec![
                ClassifiedTag {
                    name: "nWave_v1.1.21".into(),
                    classification: Classification::Rename,
                },
                ClassifiedTag {
                    name: "v2.17.0".into(),
                    classification: Classification::Delete,
                },
            ],
        };

        let out = render_audit(&report);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("{:<30} Classification", "Tag"));
        assert_eq!(lines[1], "-".repeat(45));
        assert_eq!(lines[2], format!("{:<30} RENAME", "nWave_v1.1.21"));
        assert_eq!(lines[3], format!("{:<30} DELETE", "v2.17.0"));
        assert_eq!(lines[5], "Total: 2  |  Rename: 1  |  Delete: 1");
    }

    #[test]
    fn plan_listing() {
        let plan = CleanupPlan {
            to_rename: vec![RenameEntry {
                old_name: "nWave_v1.1.21".into(),
                new_name: "v1.1.21".into(),
            }],
            to_delete: vec![ClassifiedTag {
                name: "v2.17.0".into(),
                classification: Classification::Delete,
            }],
        };

        assert_eq!(
            render_plan(&plan),
            "Tags to RENAME (1):\n  ~ nWave_v1.1.21 -> v1.1.21\n\nTags to DELETE (1):\n  - v2.17.0"
        );
    }

    #[test]
    fn empty_plan_listing() {
        assert_eq!(
            render_plan(&CleanupPlan::default()),
            "Tags to RENAME (0):\n\nTags to DELETE (0):"
        );
    }

    #[test]
    fn result_sections() {
        let result = ExecuteResult {
            renamed: vec![RenameOutcome {
                old_name: "nWave_v1".into(),
                new_name: "v1".into(),
                conflict_resolved: true,
            }],
            deleted: vec![],
            errors: vec![RunFailure::DeleteLocal {
                name: "v2".into(),
                reason: "locked".into(),
            }],
        };

        assert_eq!(
            render_result(&result),
            "Renamed 1 tag(s):\n  ~ nWave_v1 -> v1 (conflict resolved)\n\n\
             Errors (1):\n  ! Failed to delete local tag v2: locked"
        );
    }

    #[test]
    fn empty_result() {
        assert_eq!(render_result(&ExecuteResult::default()), "Nothing to do.");
    }
}
