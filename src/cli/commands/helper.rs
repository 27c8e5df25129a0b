use super::{CommandResult, CommandSummary};
use crate::core::RunReport;
use crate::issues::{Issue, Severity};

/// Scan totals of one run. Every command that scans projects reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub endpoints: usize,
    pub files: usize,
    /// Source files that could not be read.
    pub unreadable: usize,
}

impl RunTotals {
    pub fn of(report: &RunReport) -> Self {
        Self {
            endpoints: report.declared_count(),
            files: report.files_scanned,
            unreadable: report.failures.len(),
        }
    }
}

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    totals: RunTotals,
    exit_on_errors: bool,
) -> CommandResult {
    issues.sort();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        error_count,
        exit_on_errors,
        issues,
        read_error_count: totals.unreadable,
        endpoints_checked: totals.endpoints,
        files_checked: totals.files,
    }
}
