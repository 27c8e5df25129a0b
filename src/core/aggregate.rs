//! Usage aggregation across projects.
//!
//! [`UsageAggregator`] is a single-writer fold: it owns the per-endpoint
//! records for one run, consumes candidates in emission order, and yields an
//! immutable [`UsageReport`] when finished.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::{
    endpoint::{EndpointDeclaration, EndpointKey, HttpMethod},
    matcher::{MatchOptions, Matcher},
    pattern::{DeclarationStatus, MalformedTemplateError, PatternSet},
};

/// Where a candidate was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Project display name.
    pub project: String,
    /// File path relative to the project root, `/`-separated.
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl Location {
    pub fn new(
        project: impl Into<String>,
        file_path: impl Into<String>,
        line: usize,
        col: usize,
    ) -> Self {
        Self {
            project: project.into(),
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// A raw path-like string seen in source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub location: Location,
    pub text: String,
    /// Method inferred from the call site, when known.
    pub method: Option<HttpMethod>,
    /// The full source line, kept for diagnostics.
    #[serde(skip)]
    pub source_line: Option<String>,
}

impl Candidate {
    pub fn new(location: Location, text: impl Into<String>, method: Option<HttpMethod>) -> Self {
        Self {
            location,
            text: text.into(),
            method,
            source_line: None,
        }
    }

    pub fn with_source_line(mut self, source_line: impl Into<String>) -> Self {
        self.source_line = Some(source_line.into());
        self
    }
}

/// Aggregated usage of one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub occurrence_count: usize,
    /// In scan order.
    pub locations: Vec<Location>,
}

impl UsageRecord {
    pub fn is_used(&self) -> bool {
        self.occurrence_count > 0
    }

    fn push(&mut self, location: Location) {
        self.occurrence_count += 1;
        self.locations.push(location);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Used,
    Unused,
    /// The template could not be compiled, so it was never matched.
    Unparseable,
}

impl std::fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageStatus::Used => write!(f, "used"),
            UsageStatus::Unused => write!(f, "unused"),
            UsageStatus::Unparseable => write!(f, "unparseable"),
        }
    }
}

/// One distinct declared endpoint and its usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointUsage {
    pub declaration: EndpointDeclaration,
    pub status: UsageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MalformedTemplateError>,
    #[serde(flatten)]
    pub record: UsageRecord,
}

/// A declaration structurally equal to an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateDeclaration {
    pub declaration: EndpointDeclaration,
    /// Loader index of the declaration that owns the record.
    pub duplicate_of: usize,
}

/// Terminal output of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// One entry per distinct endpoint, in declaration order.
    pub endpoints: Vec<EndpointUsage>,
    /// Candidates that matched no declaration, in scan order.
    pub unmatched: Vec<Candidate>,
    pub duplicates: Vec<DuplicateDeclaration>,
    #[serde(skip)]
    by_key: HashMap<EndpointKey, usize>,
}

impl UsageReport {
    /// Look up the usage of an endpoint by identity.
    pub fn get(&self, key: &EndpointKey) -> Option<&EndpointUsage> {
        self.by_key.get(key).map(|&i| &self.endpoints[i])
    }

    pub fn count(&self, status: UsageStatus) -> usize {
        self.endpoints.iter().filter(|e| e.status == status).count()
    }
}

/// Single-writer accumulator for one aggregation pass.
pub struct UsageAggregator<'a> {
    set: &'a PatternSet,
    matcher: Matcher<'a>,
    /// Indexed like `set.patterns()`.
    records: Vec<UsageRecord>,
    unmatched: Vec<Candidate>,
}

impl<'a> UsageAggregator<'a> {
    pub fn new(set: &'a PatternSet, options: &'a MatchOptions) -> Self {
        Self {
            set,
            matcher: Matcher::new(set, options),
            records: vec![UsageRecord::default(); set.patterns().len()],
            unmatched: Vec::new(),
        }
    }

    /// Fold one candidate. Returns the matched declaration, if any.
    pub fn push(&mut self, candidate: Candidate) -> Option<&'a EndpointDeclaration> {
        let position = self
            .matcher
            .find_pattern(&candidate.text, candidate.method)
            .and_then(|pattern| match self.set.statuses()[pattern.index] {
                DeclarationStatus::Compiled(position) => Some(position),
                _ => None,
            });

        match position {
            Some(position) => {
                self.records[position].push(candidate.location);
                Some(self.set.declaration(self.set.patterns()[position].index))
            }
            None => {
                self.unmatched.push(candidate);
                None
            }
        }
    }

    pub fn finish(self) -> UsageReport {
        let mut records: Vec<Option<UsageRecord>> = self.records.into_iter().map(Some).collect();
        let mut endpoints = Vec::new();
        let mut duplicates = Vec::new();
        let mut by_key = HashMap::new();

        for (declaration, status) in self.set.declarations().iter().zip(self.set.statuses()) {
            match status {
                DeclarationStatus::Compiled(position) => {
                    let record = records[*position].take().unwrap_or_default();
                    by_key.insert(self.set.patterns()[*position].key(), endpoints.len());
                    endpoints.push(EndpointUsage {
                        declaration: declaration.clone(),
                        status: if record.is_used() {
                            UsageStatus::Used
                        } else {
                            UsageStatus::Unused
                        },
                        error: None,
                        record,
                    });
                }
                DeclarationStatus::Malformed(err) => endpoints.push(EndpointUsage {
                    declaration: declaration.clone(),
                    status: UsageStatus::Unparseable,
                    error: Some(err.clone()),
                    record: UsageRecord::default(),
                }),
                DeclarationStatus::Duplicate { of } => duplicates.push(DuplicateDeclaration {
                    declaration: declaration.clone(),
                    duplicate_of: *of,
                }),
            }
        }

        UsageReport {
            endpoints,
            unmatched: self.unmatched,
            duplicates,
            by_key,
        }
    }
}

/// Fold a candidate sequence into a usage report.
pub fn aggregate(
    candidates: impl IntoIterator<Item = Candidate>,
    set: &PatternSet,
    options: &MatchOptions,
) -> UsageReport {
    let mut aggregator = UsageAggregator::new(set, options);
    for candidate in candidates {
        aggregator.push(candidate);
    }
    aggregator.finish()
}
