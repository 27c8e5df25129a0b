//! Candidate-to-pattern matching.
//!
//! Matching is purely structural over normalized segments:
//! - segment counts must be equal;
//! - a parameter segment matches any non-empty candidate segment;
//! - a literal segment must equal the candidate segment.
//!
//! When several patterns match, the highest specificity wins, then the earliest
//! declaration. A known method on both sides must agree.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::core::{
    endpoint::{EndpointDeclaration, HttpMethod, Segment},
    pattern::{CompiledPattern, PatternSet, split_segments},
};

/// Matching behavior that is configurable per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Compare literal segments case-sensitively (ASCII folding otherwise).
    pub case_sensitive: bool,
    /// Percent-decode candidate segments before comparison.
    pub decode_percent: bool,
    /// Base paths a candidate may carry in front of a declared template.
    pub strip_prefixes: Vec<String>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            decode_percent: false,
            strip_prefixes: Vec::new(),
        }
    }
}

/// Matcher over one [`PatternSet`]. Holds no mutable state.
pub struct Matcher<'a> {
    set: &'a PatternSet,
    options: &'a MatchOptions,
    prefixes: Vec<Vec<&'a str>>,
}

impl<'a> Matcher<'a> {
    pub fn new(set: &'a PatternSet, options: &'a MatchOptions) -> Self {
        let prefixes = options
            .strip_prefixes
            .iter()
            .map(|p| split_segments(p))
            .filter(|segments| segments.iter().any(|s| !s.is_empty()))
            .collect();

        Self {
            set,
            options,
            prefixes,
        }
    }

    /// Find the declaration a candidate refers to, if any.
    pub fn find(
        &self,
        candidate: &str,
        method: Option<HttpMethod>,
    ) -> Option<&'a EndpointDeclaration> {
        self.find_pattern(candidate, method)
            .map(|pattern| self.set.declaration(pattern.index))
    }

    /// Find the winning compiled pattern for a candidate.
    pub fn find_pattern(
        &self,
        candidate: &str,
        method: Option<HttpMethod>,
    ) -> Option<&'a CompiledPattern> {
        let segments = self.candidate_segments(candidate);

        if let Some(found) = self.best_match(&segments, method) {
            return Some(found);
        }

        self.prefixes.iter().find_map(|prefix| {
            let rest = self.strip_prefix(&segments, prefix)?;
            self.best_match(&rest, method)
        })
    }

    fn candidate_segments<'c>(&self, candidate: &'c str) -> Vec<Cow<'c, str>> {
        split_segments(candidate)
            .into_iter()
            .map(|segment| {
                if self.options.decode_percent {
                    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
                } else {
                    Cow::Borrowed(segment)
                }
            })
            .collect()
    }

    fn strip_prefix<'c>(
        &self,
        segments: &[Cow<'c, str>],
        prefix: &[&str],
    ) -> Option<Vec<Cow<'c, str>>> {
        if segments.len() < prefix.len() {
            return None;
        }
        let matches_prefix = prefix
            .iter()
            .zip(segments)
            .all(|(p, s)| self.literal_eq(p, s));
        if !matches_prefix {
            return None;
        }

        let rest = segments[prefix.len()..].to_vec();
        if rest.is_empty() {
            Some(vec![Cow::Borrowed("")])
        } else {
            Some(rest)
        }
    }

    fn best_match(
        &self,
        segments: &[Cow<'_, str>],
        method: Option<HttpMethod>,
    ) -> Option<&'a CompiledPattern> {
        let mut best: Option<&'a CompiledPattern> = None;

        // Patterns are in declaration order, so a strict `>` keeps the earliest on ties.
        for pattern in self.set.patterns() {
            if !method_compatible(pattern.method, method) || !self.matches(pattern, segments) {
                continue;
            }
            if best.is_none_or(|b| pattern.specificity > b.specificity) {
                best = Some(pattern);
            }
        }

        best
    }

    fn matches(&self, pattern: &CompiledPattern, segments: &[Cow<'_, str>]) -> bool {
        pattern.segments.len() == segments.len()
            && pattern
                .segments
                .iter()
                .zip(segments)
                .all(|(expected, actual)| match expected {
                    Segment::Parameter(_) => !actual.is_empty(),
                    Segment::Literal(text) => self.literal_eq(text, actual),
                })
    }

    fn literal_eq(&self, expected: &str, actual: &str) -> bool {
        if self.options.case_sensitive {
            expected == actual
        } else {
            expected.eq_ignore_ascii_case(actual)
        }
    }
}

/// A method mismatch disqualifies only when both sides are known.
fn method_compatible(declared: Option<HttpMethod>, inferred: Option<HttpMethod>) -> bool {
    match (declared, inferred) {
        (Some(declared), Some(inferred)) => declared == inferred,
        _ => true,
    }
}

/// Match a single candidate string against a pattern set.
pub fn match_candidate<'a>(
    candidate: &str,
    method: Option<HttpMethod>,
    set: &'a PatternSet,
    options: &MatchOptions,
) -> Option<&'a EndpointDeclaration> {
    Matcher::new(set, options)
        .find_pattern(candidate, method)
        .map(|pattern| set.declaration(pattern.index))
}
