use anyhow::Result;
use clap::ValueEnum;

use super::super::args::CheckCommand;
use super::{
    helper::{RunTotals, finish},
    {CommandResult, CommandSummary},
};

use crate::{
    core::{RunContext, RunReport},
    issues::Issue,
    rules::{
        duplicate::check_duplicate_endpoints_issues,
        malformed::check_malformed_templates_issues, read_error::check_read_errors_issues,
        unmatched::check_unmatched_paths_issues, unused::check_unused_endpoints_issues,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CheckRule {
    Unused,
    Unmatched,
    Malformed,
    Duplicate,
}

impl CheckRule {
    /// Rules run when none are named. `unmatched` is opt-in: asset paths and
    /// client-side routes look like API paths too.
    pub fn defaults() -> Vec<CheckRule> {
        vec![CheckRule::Unused, CheckRule::Malformed, CheckRule::Duplicate]
    }
}

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.common)?;
    let report = ctx.run()?;

    let checks = if cmd.checks.is_empty() {
        CheckRule::defaults()
    } else {
        cmd.checks.clone()
    };

    Ok(finish(
        CommandSummary::Check,
        collect_issues(&report, &checks),
        RunTotals::of(&report),
        true,
    ))
}

pub fn collect_issues(report: &RunReport, checks: &[CheckRule]) -> Vec<Issue> {
    let mut all_issues: Vec<Issue> = Vec::new();

    for check in checks {
        match check {
            CheckRule::Unused => {
                let issues = check_unused_endpoints_issues(report);
                all_issues.extend(issues.into_iter().map(Issue::UnusedEndpoint));
            }
            CheckRule::Unmatched => {
                let issues = check_unmatched_paths_issues(report);
                all_issues.extend(issues.into_iter().map(Issue::UnmatchedPath));
            }
            CheckRule::Malformed => {
                let issues = check_malformed_templates_issues(report);
                all_issues.extend(issues.into_iter().map(Issue::MalformedTemplate));
            }
            CheckRule::Duplicate => {
                let issues = check_duplicate_endpoints_issues(report);
                all_issues.extend(issues.into_iter().map(Issue::DuplicateEndpoint));
            }
        }
    }

    // Unreadable files are always reported: the report is partial without them.
    let read_errors = check_read_errors_issues(report);
    all_issues.extend(read_errors.into_iter().map(Issue::ReadError));

    all_issues
}
