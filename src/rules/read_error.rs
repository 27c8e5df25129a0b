//! Unreadable source file reporting.

use crate::{
    core::{RunReport, ScanFailure},
    issues::ReadErrorIssue,
};

pub fn check_read_errors_issues(report: &RunReport) -> Vec<ReadErrorIssue> {
    check_read_errors(&report.failures)
}

pub fn check_read_errors(failures: &[ScanFailure]) -> Vec<ReadErrorIssue> {
    failures
        .iter()
        .map(|failure| ReadErrorIssue {
            failure: failure.clone(),
        })
        .collect()
}
