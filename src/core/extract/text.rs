//! Line-based extraction for files without an AST parser (Dart, Vue, ...).
//!
//! Quoted literals on each line are candidates. Interpolations in the
//! `${expr}` and `$name` forms render as `{}`.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{
    endpoint::HttpMethod,
    extract::{
        RawCandidate,
        method::{is_fetch_like, method_from_call_name, parse_method_value},
        to_candidate_path,
    },
};

/// Single-line quoted literals in `'`, `"` or `` ` ``, honoring backslash escapes.
static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)"|`((?:[^`\\]|\\.)*)`"#)
        .expect("valid quoted literal regex")
});

static BRACED_INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("valid interpolation regex"));

static BARE_INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*").expect("valid interpolation regex"));

/// `.get(`, `.post<User>(`
static CALL_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.([a-z]+)\s*(?:<[^>()]*>)?\s*\(").expect("valid call method regex")
});

/// `fetch(`, `$fetch(` not preceded by a member access.
static FETCH_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^.\w$])(\$?[A-Za-z]+)\s*\(").expect("valid fetch call regex")
});

static METHOD_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"method\s*:\s*['"`]([A-Za-z]+)['"`]"#).expect("valid method option regex")
});

pub fn extract(source: &str) -> Vec<RawCandidate> {
    let mut candidates = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let mut method_on_line = None;
        let mut method_resolved = false;

        for caps in QUOTED.captures_iter(line) {
            let Some(body) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
                continue;
            };
            let Some(path) = to_candidate_path(&render_interpolations(body.as_str())) else {
                continue;
            };

            if !method_resolved {
                method_on_line = infer_line_method(line);
                method_resolved = true;
            }

            let start = caps.get(0).map_or(0, |m| m.start());
            candidates.push(RawCandidate {
                line: index + 1,
                col: line[..start].chars().count() + 1,
                text: path,
                method: method_on_line,
            });
        }
    }

    candidates
}

/// Replace interpolations with `{}`, dropping a leading base-URL interpolation.
fn render_interpolations(body: &str) -> String {
    let rendered = BRACED_INTERPOLATION.replace_all(body, "{}");
    let rendered = BARE_INTERPOLATION.replace_all(&rendered, "{}");
    match rendered.strip_prefix("{}") {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => rendered.into_owned(),
    }
}

/// Method for every candidate on the line: an explicit `method:` option wins,
/// then a client call name, then a fetch-like call.
fn infer_line_method(line: &str) -> Option<HttpMethod> {
    if let Some(caps) = METHOD_OPTION.captures(line) {
        return parse_method_value(&caps[1]);
    }
    if let Some(method) = CALL_METHOD
        .captures_iter(line)
        .find_map(|caps| method_from_call_name(&caps[1]))
    {
        return Some(method);
    }
    FETCH_CALL
        .captures_iter(line)
        .any(|caps| is_fetch_like(&caps[1]))
        .then_some(HttpMethod::Get)
}
