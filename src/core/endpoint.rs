//! Endpoint declaration types.
//!
//! An endpoint is identified by its (optional) HTTP method and the shape of its
//! normalized path template. Parameter names are kept for display but do not
//! take part in identity: `/users/{id}` and `/users/:userId` are the same endpoint.

use std::{fmt, str::FromStr};

use serde::Serialize;

/// HTTP method of a declaration or of an inferred call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is case-insensitive: `get`, `Get` and `GET` are all accepted.
impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown HTTP method: {}", s))
    }
}

/// One segment of a normalized path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Text that must appear verbatim in a candidate.
    Literal(String),
    /// A placeholder (`{name}` or `:name`) that matches any non-empty segment.
    Parameter(String),
}

impl Segment {
    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// Identity-relevant view of a segment: parameter names are erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentShape {
    Literal(String),
    Parameter,
}

impl From<&Segment> for SegmentShape {
    fn from(segment: &Segment) -> Self {
        match segment {
            Segment::Literal(text) => SegmentShape::Literal(text.clone()),
            Segment::Parameter(_) => SegmentShape::Parameter,
        }
    }
}

/// Stable identity of an endpoint across the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey {
    pub method: Option<HttpMethod>,
    pub shape: Vec<SegmentShape>,
}

impl EndpointKey {
    pub fn new(method: Option<HttpMethod>, segments: &[Segment]) -> Self {
        Self {
            method,
            shape: segments.iter().map(SegmentShape::from).collect(),
        }
    }
}

/// An endpoint as declared by the loader (method + raw path template).
///
/// `index` is the position in loader order and is used as the final tie-breaker
/// when several patterns match the same candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDeclaration {
    pub index: usize,
    pub method: Option<HttpMethod>,
    pub template: String,
    /// Line of the declaration in the spec file (1-indexed), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl EndpointDeclaration {
    pub fn new(index: usize, method: Option<HttpMethod>, template: impl Into<String>) -> Self {
        Self {
            index,
            method,
            template: template.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Display form used in reports: `GET /users/{id}` or just `/users/{id}`.
    pub fn label(&self) -> String {
        match self.method {
            Some(method) => format!("{} {}", method, self.template),
            None => self.template.clone(),
        }
    }
}
