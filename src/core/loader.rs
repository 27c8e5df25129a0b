//! Endpoint declaration loading.
//!
//! Supported inputs:
//! - OpenAPI / Swagger documents in JSON (`.json`) or YAML (`.yaml`, `.yml`):
//!   one declaration per operation under the top-level `paths` object.
//! - Plain endpoint lists (any other extension): one endpoint per line,
//!   optionally prefixed by a method (`GET /users`). `#` starts a comment line.

use std::{fs, path::Path};

use thiserror::Error;

use crate::core::endpoint::{EndpointDeclaration, HttpMethod};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid YAML in {path}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("{path} has no top-level \"paths\" object")]
    MissingPaths { path: String },
    #[error("{path} must contain a mapping at the document root, found {found}")]
    UnsupportedRoot { path: String, found: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    OpenApiJson,
    OpenApiYaml,
    EndpointList,
}

impl SpecFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => SpecFormat::OpenApiJson,
            Some("yaml" | "yml") => SpecFormat::OpenApiYaml,
            _ => SpecFormat::EndpointList,
        }
    }
}

/// Load declarations from a spec file, in document order.
pub fn load_endpoints(path: &Path) -> Result<Vec<EndpointDeclaration>, LoadError> {
    let spec_path = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: spec_path.clone(),
        source,
    })?;

    let format = SpecFormat::from_path(path);
    let declarations = parse_endpoints(&content, format, &spec_path)?;
    tracing::debug!(
        "loaded {} endpoint(s) from {} ({:?})",
        declarations.len(),
        spec_path,
        format
    );
    Ok(declarations)
}

/// Parse spec content in the given format. `path` is only used in errors.
pub fn parse_endpoints(
    content: &str,
    format: SpecFormat,
    path: &str,
) -> Result<Vec<EndpointDeclaration>, LoadError> {
    match format {
        SpecFormat::OpenApiJson => {
            let doc: serde_json::Value =
                serde_json::from_str(content).map_err(|source| LoadError::Json {
                    path: path.to_string(),
                    source,
                })?;
            if !doc.is_object() {
                return Err(LoadError::UnsupportedRoot {
                    path: path.to_string(),
                    found: json_kind(&doc),
                });
            }
            let paths = doc
                .get("paths")
                .and_then(|p| p.as_object())
                .ok_or_else(|| LoadError::MissingPaths {
                    path: path.to_string(),
                })?;

            let mut declarations = collect_operations(paths.iter().map(|(template, item)| {
                let keys = item
                    .as_object()
                    .map(|o| o.keys().cloned().collect())
                    .unwrap_or_default();
                (template.clone(), keys)
            }));
            locate_path_keys(content, &mut declarations);
            Ok(declarations)
        }
        SpecFormat::OpenApiYaml => {
            // Parsed as YAML values: response codes like `200:` are integer keys.
            let doc: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
                    path: path.to_string(),
                    source,
                })?;
            if !doc.is_mapping() {
                return Err(LoadError::UnsupportedRoot {
                    path: path.to_string(),
                    found: yaml_kind(&doc),
                });
            }
            let paths = doc
                .get("paths")
                .and_then(|p| p.as_mapping())
                .ok_or_else(|| LoadError::MissingPaths {
                    path: path.to_string(),
                })?;

            let mut declarations = collect_operations(paths.iter().filter_map(
                |(template, item)| {
                    let template = template.as_str()?.to_string();
                    let keys = item
                        .as_mapping()
                        .map(|m| {
                            m.keys()
                                .filter_map(|k| k.as_str().map(String::from))
                                .collect()
                        })
                        .unwrap_or_default();
                    Some((template, keys))
                },
            ));
            locate_path_keys(content, &mut declarations);
            Ok(declarations)
        }
        SpecFormat::EndpointList => Ok(parse_endpoint_list(content)),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "an empty document",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Turn `(path, path-item keys)` pairs into declarations.
///
/// Non-operation keys (`parameters`, `summary`, `x-*`, ...) are skipped. A path
/// item without any operation still yields one method-less declaration.
fn collect_operations(
    paths: impl IntoIterator<Item = (String, Vec<String>)>,
) -> Vec<EndpointDeclaration> {
    let mut declarations = Vec::new();

    for (template, keys) in paths {
        let methods: Vec<HttpMethod> = keys.iter().filter_map(|k| k.parse().ok()).collect();

        if methods.is_empty() {
            declarations.push(EndpointDeclaration::new(
                declarations.len(),
                None,
                template.clone(),
            ));
        }
        for method in methods {
            declarations.push(EndpointDeclaration::new(
                declarations.len(),
                Some(method),
                template.clone(),
            ));
        }
    }

    declarations
}

/// Attach the spec-file line of each path key. Keys are searched forward in
/// document order; a minified document leaves lines unknown past the first key.
fn locate_path_keys(content: &str, declarations: &mut [EndpointDeclaration]) {
    let lines: Vec<&str> = content.lines().collect();
    let mut cursor = 0;

    for declaration in declarations.iter_mut() {
        let found =
            (cursor..lines.len()).find(|&i| is_path_key_line(lines[i], &declaration.template));
        if let Some(i) = found {
            cursor = i;
            declaration.line = Some(i + 1);
        }
    }
}

fn is_path_key_line(line: &str, template: &str) -> bool {
    let trimmed = line.trim_start();
    [
        format!("\"{}\"", template),
        format!("'{}'", template),
        template.to_string(),
    ]
    .iter()
    .any(|key| {
        trimmed
            .strip_prefix(key.as_str())
            .is_some_and(|rest| rest.trim_start().starts_with(':'))
    })
}

fn parse_endpoint_list(content: &str) -> Vec<EndpointDeclaration> {
    content
        .lines()
        .enumerate()
        .map(|(number, line)| (number + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .enumerate()
        .map(|(index, (number, line))| {
            let (method, template) = match line.split_once(char::is_whitespace) {
                Some((first, rest)) => match first.parse::<HttpMethod>() {
                    Ok(method) => (Some(method), rest.trim()),
                    Err(_) => (None, line),
                },
                None => (None, line),
            };
            EndpointDeclaration::new(index, method, template).at_line(number)
        })
        .collect()
}
