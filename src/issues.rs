//! Issue types for endpoint usage diagnostics.
//!
//! Each issue is self-contained with all information the reporter needs.

use enum_dispatch::enum_dispatch;

use crate::core::{Candidate, EndpointDeclaration, Location, MalformedTemplateError, ScanFailure};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UnusedEndpoint,
    UnmatchedPath,
    MalformedTemplate,
    DuplicateEndpoint,
    ReadError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::UnusedEndpoint => write!(f, "unused-endpoint"),
            Rule::UnmatchedPath => write!(f, "unmatched-path"),
            Rule::MalformedTemplate => write!(f, "malformed-template"),
            Rule::DuplicateEndpoint => write!(f, "duplicate-endpoint"),
            Rule::ReadError => write!(f, "read-error"),
        }
    }
}

// ============================================================
// Issue Types - Spec File
// ============================================================

/// Declared endpoint never referenced by any scanned project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedEndpointIssue {
    pub spec_path: String,
    pub declaration: EndpointDeclaration,
}

impl UnusedEndpointIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnusedEndpoint
    }
}

/// Declared template that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTemplateIssue {
    pub spec_path: String,
    pub declaration: EndpointDeclaration,
    pub error: MalformedTemplateError,
}

impl MalformedTemplateIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MalformedTemplate
    }
}

/// Declaration structurally equal to an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEndpointIssue {
    pub spec_path: String,
    pub declaration: EndpointDeclaration,
    /// The earlier declaration that owns the usage record.
    pub original: EndpointDeclaration,
}

impl DuplicateEndpointIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateEndpoint
    }
}

// ============================================================
// Issue Types - Source Code
// ============================================================

/// Path-like literal in source code that matches no declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedPathIssue {
    pub candidate: Candidate,
}

impl UnmatchedPathIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnmatchedPath
    }
}

/// Source file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadErrorIssue {
    pub failure: ScanFailure,
}

impl ReadErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ReadError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// An endpoint usage issue found during analysis.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    UnusedEndpoint(UnusedEndpointIssue),
    UnmatchedPath(UnmatchedPathIssue),
    MalformedTemplate(MalformedTemplateIssue),
    DuplicateEndpoint(DuplicateEndpointIssue),
    ReadError(ReadErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::UnusedEndpoint(_) => UnusedEndpointIssue::severity(),
            Issue::UnmatchedPath(_) => UnmatchedPathIssue::severity(),
            Issue::MalformedTemplate(_) => MalformedTemplateIssue::severity(),
            Issue::DuplicateEndpoint(_) => DuplicateEndpointIssue::severity(),
            Issue::ReadError(_) => ReadErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::UnusedEndpoint(_) => UnusedEndpointIssue::rule(),
            Issue::UnmatchedPath(_) => UnmatchedPathIssue::rule(),
            Issue::MalformedTemplate(_) => MalformedTemplateIssue::rule(),
            Issue::DuplicateEndpoint(_) => DuplicateEndpointIssue::rule(),
            Issue::ReadError(_) => ReadErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location, with the source line when it was captured.
    Source {
        location: &'a Location,
        source_line: Option<&'a str>,
    },
    /// Spec file location; `line` is 0 when the declaration line is unknown.
    Spec { path: &'a str, line: usize },
    /// File-level only (no line context).
    File { project: &'a str, path: &'a str },
}

impl ReportLocation<'_> {
    /// Displayed path: spec path, or `project/file` for source files.
    pub fn display_path(&self) -> String {
        match self {
            ReportLocation::Source { location, .. } => {
                format!("{}/{}", location.project, location.file_path)
            }
            ReportLocation::Spec { path, .. } => path.to_string(),
            ReportLocation::File { project, path } => format!("{}/{}", project, path),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ReportLocation::Source { location, .. } => location.line,
            ReportLocation::Spec { line, .. } => *line,
            ReportLocation::File { .. } => 0,
        }
    }

    pub fn col(&self) -> usize {
        match self {
            ReportLocation::Source { location, .. } => location.col,
            ReportLocation::Spec { line, .. } if *line > 0 => 1,
            _ => 0,
        }
    }

    pub fn source_line(&self) -> Option<&str> {
        match self {
            ReportLocation::Source { source_line, .. } => *source_line,
            _ => None,
        }
    }
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types; `enum_dispatch` forwards calls on [`Issue`].
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display (endpoint label, path, error).
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

fn spec_location<'a>(spec_path: &'a str, declaration: &EndpointDeclaration) -> ReportLocation<'a> {
    ReportLocation::Spec {
        path: spec_path,
        line: declaration.line.unwrap_or(0),
    }
}

impl Report for UnusedEndpointIssue {
    fn location(&self) -> ReportLocation<'_> {
        spec_location(&self.spec_path, &self.declaration)
    }

    fn message(&self) -> String {
        self.declaration.label()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("no references found in any scanned project".to_string())
    }
}

impl Report for MalformedTemplateIssue {
    fn location(&self) -> ReportLocation<'_> {
        spec_location(&self.spec_path, &self.declaration)
    }

    fn message(&self) -> String {
        self.declaration.label()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.error.reason.to_string())
    }

    fn hint(&self) -> Option<&str> {
        Some("parameters are whole segments written as {name} or :name")
    }
}

impl Report for DuplicateEndpointIssue {
    fn location(&self) -> ReportLocation<'_> {
        spec_location(&self.spec_path, &self.declaration)
    }

    fn message(&self) -> String {
        self.declaration.label()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(match self.original.line {
            Some(line) => format!(
                "same endpoint as {} (line {})",
                self.original.label(),
                line
            ),
            None => format!("same endpoint as {}", self.original.label()),
        })
    }
}

impl Report for UnmatchedPathIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source {
            location: &self.candidate.location,
            source_line: self.candidate.source_line.as_deref(),
        }
    }

    fn message(&self) -> String {
        self.candidate.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        self.candidate
            .method
            .map(|method| format!("called with {}", method))
    }
}

impl Report for ReadErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            project: &self.failure.project,
            path: &self.failure.file_path,
        }
    }

    fn message(&self) -> String {
        self.failure.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: path, line, col, rule, message
        let (a, b) = (self.location(), other.location());
        a.display_path()
            .cmp(&b.display_path())
            .then_with(|| a.line().cmp(&b.line()))
            .then_with(|| a.col().cmp(&b.col()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
