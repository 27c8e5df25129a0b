//! Malformed template detection rule.

use crate::{
    core::{EndpointUsage, RunReport},
    issues::MalformedTemplateIssue,
};

pub fn check_malformed_templates_issues(report: &RunReport) -> Vec<MalformedTemplateIssue> {
    check_malformed_templates(&report.spec_path, &report.usage.endpoints)
}

pub fn check_malformed_templates(
    spec_path: &str,
    endpoints: &[EndpointUsage],
) -> Vec<MalformedTemplateIssue> {
    endpoints
        .iter()
        .filter_map(|e| {
            e.error.as_ref().map(|error| MalformedTemplateIssue {
                spec_path: spec_path.to_string(),
                declaration: e.declaration.clone(),
                error: error.clone(),
            })
        })
        .collect()
}
