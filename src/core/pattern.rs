//! Pattern compilation for declared path templates.
//!
//! Both placeholder syntaxes (`{name}` and `:name`) are normalized into
//! [`Segment::Parameter`] here, so the matcher only ever sees typed segments.
//!
//! Normalization rules shared by templates and candidates:
//! 1. Everything from the first `?` or `#` onward is discarded.
//! 2. One trailing slash is removed (`/users/` ≡ `/users`, but not `/users//`).
//! 3. A single leading slash is removed, then the rest is split on `/`.
//!
//! `/` alone therefore normalizes to one empty segment.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::core::endpoint::{EndpointDeclaration, EndpointKey, HttpMethod, Segment};

/// Why a template could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TemplateErrorKind {
    #[error("unclosed '{{' in segment \"{segment}\"")]
    UnclosedBrace { segment: String },
    #[error("unexpected '}}' in segment \"{segment}\"")]
    UnopenedBrace { segment: String },
    #[error("placeholder must span the whole segment: \"{segment}\"")]
    EmbeddedPlaceholder { segment: String },
    #[error("empty parameter name in segment \"{segment}\"")]
    EmptyParameter { segment: String },
    #[error("invalid parameter name \"{name}\"")]
    InvalidParameterName { name: String },
    #[error("':' is not followed by a parameter name in segment \"{segment}\"")]
    BareColon { segment: String },
}

/// A declared template with invalid placeholder syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("malformed template \"{template}\": {reason}")]
pub struct MalformedTemplateError {
    pub template: String,
    pub reason: TemplateErrorKind,
}

/// Matchable form of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPattern {
    /// Index of the source declaration (loader order).
    pub index: usize,
    pub method: Option<HttpMethod>,
    pub segments: Vec<Segment>,
    /// Number of literal segments; higher wins when several patterns match.
    pub specificity: usize,
}

impl CompiledPattern {
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(self.method, &self.segments)
    }
}

/// Strip query string, fragment, one trailing slash and one leading slash.
pub fn normalize_path(raw: &str) -> &str {
    let raw = raw.trim();
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let path = &raw[..end];
    let path = path.strip_suffix('/').unwrap_or(path);
    path.strip_prefix('/').unwrap_or(path)
}

/// Normalize and split a path into raw segments.
pub fn split_segments(raw: &str) -> Vec<&str> {
    normalize_path(raw).split('/').collect()
}

/// Compile a declaration into a pattern.
pub fn compile(
    declaration: &EndpointDeclaration,
) -> Result<CompiledPattern, MalformedTemplateError> {
    let segments = split_segments(&declaration.template)
        .into_iter()
        .map(classify_segment)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|reason| MalformedTemplateError {
            template: declaration.template.clone(),
            reason,
        })?;

    let specificity = segments.iter().filter(|s| s.is_literal()).count();

    Ok(CompiledPattern {
        index: declaration.index,
        method: declaration.method,
        segments,
        specificity,
    })
}

fn classify_segment(segment: &str) -> Result<Segment, TemplateErrorKind> {
    if let Some(inner) = segment.strip_prefix('{') {
        return match inner.strip_suffix('}') {
            Some(name) => parse_parameter_name(segment, name, true).map(Segment::Parameter),
            None if inner.contains('}') => Err(TemplateErrorKind::EmbeddedPlaceholder {
                segment: segment.to_string(),
            }),
            None => Err(TemplateErrorKind::UnclosedBrace {
                segment: segment.to_string(),
            }),
        };
    }

    if let Some(open) = segment.find('{') {
        return Err(if segment[open..].contains('}') {
            TemplateErrorKind::EmbeddedPlaceholder {
                segment: segment.to_string(),
            }
        } else {
            TemplateErrorKind::UnclosedBrace {
                segment: segment.to_string(),
            }
        });
    }

    if segment.contains('}') {
        return Err(TemplateErrorKind::UnopenedBrace {
            segment: segment.to_string(),
        });
    }

    if let Some(name) = segment.strip_prefix(':') {
        if name.is_empty() {
            return Err(TemplateErrorKind::BareColon {
                segment: segment.to_string(),
            });
        }
        return parse_parameter_name(segment, name, false).map(Segment::Parameter);
    }

    // A ':' inside a literal (e.g. `books:batchGet`) is allowed as long as it
    // is followed by an identifier character.
    for (pos, _) in segment.match_indices(':') {
        let next = segment[pos + 1..].chars().next();
        if !next.is_some_and(is_identifier_char) {
            return Err(TemplateErrorKind::BareColon {
                segment: segment.to_string(),
            });
        }
    }

    Ok(Segment::Literal(segment.to_string()))
}

/// Brace names additionally allow `-` and `.` (common in OpenAPI documents).
fn parse_parameter_name(
    segment: &str,
    name: &str,
    allow_punctuation: bool,
) -> Result<String, TemplateErrorKind> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(TemplateErrorKind::EmptyParameter {
            segment: segment.to_string(),
        });
    };

    let valid_rest =
        chars.all(|c| is_identifier_char(c) || (allow_punctuation && matches!(c, '-' | '.')));
    if (first.is_ascii_alphabetic() || first == '_') && valid_rest {
        Ok(name.to_string())
    } else {
        Err(TemplateErrorKind::InvalidParameterName {
            name: name.to_string(),
        })
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Outcome of compiling one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationStatus {
    /// Compiled; the value indexes into [`PatternSet::patterns`].
    Compiled(usize),
    Malformed(MalformedTemplateError),
    /// Structurally equal to the earlier declaration at this index.
    Duplicate { of: usize },
}

/// All declarations of a run together with their compiled patterns.
///
/// Patterns are kept in declaration order and are never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct PatternSet {
    declarations: Vec<EndpointDeclaration>,
    statuses: Vec<DeclarationStatus>,
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile every declaration. Indices are reassigned to loader order.
    pub fn compile_all(declarations: impl IntoIterator<Item = EndpointDeclaration>) -> Self {
        let mut seen: HashMap<EndpointKey, usize> = HashMap::new();
        let mut kept = Vec::new();
        let mut statuses = Vec::new();
        let mut patterns = Vec::new();

        for (index, mut declaration) in declarations.into_iter().enumerate() {
            declaration.index = index;

            let status = match compile(&declaration) {
                Ok(pattern) => match seen.get(&pattern.key()) {
                    Some(&of) => DeclarationStatus::Duplicate { of },
                    None => {
                        seen.insert(pattern.key(), index);
                        patterns.push(pattern);
                        DeclarationStatus::Compiled(patterns.len() - 1)
                    }
                },
                Err(err) => {
                    tracing::warn!("{}", err);
                    DeclarationStatus::Malformed(err)
                }
            };

            kept.push(declaration);
            statuses.push(status);
        }

        Self {
            declarations: kept,
            statuses,
            patterns,
        }
    }

    pub fn declarations(&self) -> &[EndpointDeclaration] {
        &self.declarations
    }

    pub fn statuses(&self) -> &[DeclarationStatus] {
        &self.statuses
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn declaration(&self, index: usize) -> &EndpointDeclaration {
        &self.declarations[index]
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
