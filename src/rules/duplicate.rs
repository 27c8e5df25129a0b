//! Duplicate endpoint detection rule.
//!
//! Two declarations are the same endpoint when method and segment shape agree,
//! regardless of placeholder syntax or parameter names.

use crate::{
    core::{DuplicateDeclaration, EndpointUsage, RunReport},
    issues::DuplicateEndpointIssue,
};

pub fn check_duplicate_endpoints_issues(report: &RunReport) -> Vec<DuplicateEndpointIssue> {
    check_duplicate_endpoints(
        &report.spec_path,
        &report.usage.endpoints,
        &report.usage.duplicates,
    )
}

/// Pair every duplicate with the declaration that owns its record.
pub fn check_duplicate_endpoints(
    spec_path: &str,
    endpoints: &[EndpointUsage],
    duplicates: &[DuplicateDeclaration],
) -> Vec<DuplicateEndpointIssue> {
    duplicates
        .iter()
        .filter_map(|duplicate| {
            let original = endpoints
                .iter()
                .find(|e| e.declaration.index == duplicate.duplicate_of)?;
            Some(DuplicateEndpointIssue {
                spec_path: spec_path.to_string(),
                declaration: duplicate.declaration.clone(),
                original: original.declaration.clone(),
            })
        })
        .collect()
}
