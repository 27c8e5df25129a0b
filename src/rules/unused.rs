//! Unused endpoint detection rule.
//!
//! Detects endpoints that are declared in the spec but never referenced by
//! any scanned project.

use crate::{
    core::{EndpointUsage, RunReport, UsageStatus},
    issues::UnusedEndpointIssue,
};

pub fn check_unused_endpoints_issues(report: &RunReport) -> Vec<UnusedEndpointIssue> {
    check_unused_endpoints(&report.spec_path, &report.usage.endpoints)
}

/// Check for unused endpoints.
///
/// Unparseable declarations are never matched, so they are reported by the
/// malformed-template rule instead of here.
///
/// # Arguments
/// * `spec_path` - Spec file the declarations were loaded from
/// * `endpoints` - Usage of every distinct endpoint, in declaration order
pub fn check_unused_endpoints(
    spec_path: &str,
    endpoints: &[EndpointUsage],
) -> Vec<UnusedEndpointIssue> {
    endpoints
        .iter()
        .filter(|e| e.status == UsageStatus::Unused)
        .map(|e| UnusedEndpointIssue {
            spec_path: spec_path.to_string(),
            declaration: e.declaration.clone(),
        })
        .collect()
}
