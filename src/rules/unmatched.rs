//! Unmatched path detection rule.
//!
//! Path-like literals seen in code that no declaration accounts for. Useful
//! for spotting drift between clients and the spec.

use crate::{
    core::{Candidate, RunReport},
    issues::UnmatchedPathIssue,
};

pub fn check_unmatched_paths_issues(report: &RunReport) -> Vec<UnmatchedPathIssue> {
    check_unmatched_paths(&report.usage.unmatched)
}

pub fn check_unmatched_paths(unmatched: &[Candidate]) -> Vec<UnmatchedPathIssue> {
    unmatched
        .iter()
        .map(|candidate| UnmatchedPathIssue {
            candidate: candidate.clone(),
        })
        .collect()
}
