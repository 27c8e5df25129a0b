use anyhow::{Context, Result};

use super::super::args::{ListCommand, OutputFormat, StatusFilter};
use super::{
    CommandResult, CommandSummary, ListSummary, StatusCounts,
    helper::{RunTotals, finish},
};
use crate::core::{EndpointUsage, RunContext, UsageStatus};

pub fn list(cmd: ListCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.common)?;
    let report = ctx.run()?;

    let json = match cmd.format {
        OutputFormat::Json => Some(
            serde_json::to_string_pretty(&report).context("Failed to serialize usage report")?,
        ),
        OutputFormat::Text => None,
    };

    let summary = ListSummary {
        format: cmd.format,
        counts: status_counts(&report.usage.endpoints),
        endpoints: filter_endpoints(&report.usage.endpoints, cmd.status, cmd.search.as_deref()),
        json,
    };

    Ok(finish(
        CommandSummary::List(summary),
        Vec::new(),
        RunTotals::of(&report),
        false,
    ))
}

pub fn status_counts(endpoints: &[EndpointUsage]) -> StatusCounts {
    let count = |status| endpoints.iter().filter(|e| e.status == status).count();
    StatusCounts {
        all: endpoints.len(),
        used: count(UsageStatus::Used),
        unused: count(UsageStatus::Unused),
        unparseable: count(UsageStatus::Unparseable),
    }
}

/// Keep endpoints with the wanted status whose template contains `search`,
/// ignoring case.
pub fn filter_endpoints(
    endpoints: &[EndpointUsage],
    status: StatusFilter,
    search: Option<&str>,
) -> Vec<EndpointUsage> {
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    endpoints
        .iter()
        .filter(|e| match status {
            StatusFilter::All => true,
            StatusFilter::Used => e.status == UsageStatus::Used,
            StatusFilter::Unused => e.status == UsageStatus::Unused,
            StatusFilter::Unparseable => e.status == UsageStatus::Unparseable,
        })
        .filter(|e| {
            needle
                .as_ref()
                .is_none_or(|n| e.declaration.template.to_lowercase().contains(n.as_str()))
        })
        .cloned()
        .collect()
}
