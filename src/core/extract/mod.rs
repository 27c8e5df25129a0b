//! Candidate extraction from project source trees.
//!
//! Each project is scanned independently and its files are extracted in
//! parallel. Results are reassembled in `(project, file, line, col)` order so a
//! run over the same inputs always yields the same candidate sequence.

pub mod file_scanner;
pub mod js;
pub mod method;
pub mod text;

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use serde::Serialize;

use crate::core::{
    aggregate::{Candidate, Location},
    endpoint::HttpMethod,
};

pub use file_scanner::{ScanResult, scan_files};

/// A source tree scanned for candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Display name, the basename of the canonical root.
    pub name: String,
    pub root: PathBuf,
}

impl Project {
    /// Resolve a project directory. Fails if it does not exist.
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let root = dir.canonicalize()?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());
        Ok(Self { name, root })
    }
}

/// A path-like literal found by an extractor, before it gets a project location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub line: usize,
    pub col: usize,
    pub text: String,
    pub method: Option<HttpMethod>,
}

/// Reduce a literal to the path it names, if it names one.
///
/// Accepted: absolute paths (`/users`, but not protocol-relative `//host`) and
/// `http(s)://` URLs, whose scheme and host are stripped. Literals containing
/// whitespace are never paths.
pub fn to_candidate_path(text: &str) -> Option<String> {
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return None;
    }

    if let Some(rest) = strip_scheme(text) {
        let start = rest.find(['/', '?', '#'])?;
        return rest[start..].starts_with('/').then(|| rest[start..].to_string());
    }

    (text.starts_with('/') && !text.starts_with("//")).then(|| text.to_string())
}

fn strip_scheme(text: &str) -> Option<&str> {
    ["https://", "http://"].iter().find_map(|scheme| {
        text.get(..scheme.len())
            .filter(|head| head.eq_ignore_ascii_case(scheme))
            .map(|_| &text[scheme.len()..])
    })
}

/// A file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub project: String,
    pub file_path: String,
    pub error: String,
}

/// File selection shared by every project in a run.
#[derive(Debug, Clone, Copy)]
pub struct ScanSettings<'a> {
    pub extensions: &'a [String],
    pub ignores: &'a [String],
    pub ignore_test_files: bool,
}

#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// In `(project, file, line, col)` order.
    pub candidates: Vec<Candidate>,
    pub failures: Vec<ScanFailure>,
    pub files_scanned: usize,
    /// Directory entries the walker could not access.
    pub skipped: usize,
}

enum FileOutcome {
    Extracted(Vec<Candidate>),
    Failed(ScanFailure),
}

pub fn extract_projects(projects: &[Project], settings: ScanSettings<'_>) -> ExtractionResult {
    let per_project: Vec<(usize, usize, Vec<FileOutcome>)> = projects
        .par_iter()
        .map(|project| {
            let scan = scan_files(
                &project.root,
                settings.extensions,
                settings.ignores,
                settings.ignore_test_files,
            );
            tracing::debug!(
                "project {}: {} file(s) to scan",
                project.name,
                scan.files.len()
            );
            let outcomes: Vec<FileOutcome> = scan
                .files
                .par_iter()
                .map(|file| extract_file(project, file))
                .collect();
            (scan.files.len(), scan.skipped_count, outcomes)
        })
        .collect();

    let mut result = ExtractionResult::default();
    for (files, skipped, outcomes) in per_project {
        result.files_scanned += files;
        result.skipped += skipped;
        for outcome in outcomes {
            match outcome {
                FileOutcome::Extracted(candidates) => result.candidates.extend(candidates),
                FileOutcome::Failed(failure) => result.failures.push(failure),
            }
        }
    }
    result
}

fn relative_path(root: &Path, file: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}

fn extract_file(project: &Project, file: &Path) -> FileOutcome {
    let file_path = relative_path(&project.root, file);

    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", file.display(), e);
            return FileOutcome::Failed(ScanFailure {
                project: project.name.clone(),
                file_path,
                error: e.to_string(),
            });
        }
    };

    let raw = extract_source(&source, &file_path);
    let lines: Vec<&str> = source.lines().collect();

    FileOutcome::Extracted(
        raw.into_iter()
            .map(|c| {
                let location = Location::new(&project.name, &file_path, c.line, c.col);
                let candidate = Candidate::new(location, c.text, c.method);
                match lines.get(c.line.saturating_sub(1)) {
                    Some(line) => candidate.with_source_line(*line),
                    None => candidate,
                }
            })
            .collect(),
    )
}

/// Extract raw candidates from one file's content, choosing the extractor by
/// extension. JS-family files that fail to parse fall back to line extraction.
pub fn extract_source(source: &str, file_path: &str) -> Vec<RawCandidate> {
    if !js::is_js_family(Path::new(file_path)) {
        return text::extract(source);
    }
    match js::extract(source, file_path) {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::debug!("{}; falling back to line extraction", e);
            text::extract(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_candidate_path() {
        assert_eq!(to_candidate_path("/users"), Some("/users".to_string()));
        assert_eq!(to_candidate_path("/"), Some("/".to_string()));
        assert_eq!(
            to_candidate_path("https://api.example.com/v1/users?x=1"),
            Some("/v1/users?x=1".to_string())
        );
        assert_eq!(
            to_candidate_path("HTTP://localhost:8080/health"),
            Some("/health".to_string())
        );
        assert_eq!(to_candidate_path("https://api.example.com"), None);
        assert_eq!(to_candidate_path("https://api.example.com?x=/y"), None);
        assert_eq!(to_candidate_path("//cdn.example.com/a.js"), None);
        assert_eq!(to_candidate_path("users/1"), None);
        assert_eq!(to_candidate_path("/a b"), None);
        assert_eq!(to_candidate_path(""), None);
    }

    #[test]
    fn test_extract_source_falls_back_on_parse_error() {
        let broken = "const = ;\nfetch('/health');\n";
        let found = extract_source(broken, "broken.js");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "/health");
        assert_eq!(found[0].method, Some(HttpMethod::Get));
    }

    #[test]
    fn test_extract_projects_orders_by_project_then_file() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();

        fs::create_dir_all(first.path().join("src")).unwrap();
        fs::write(
            first.path().join("src/b.ts"),
            "api.get('/b');\napi.post('/b2');\n",
        )
        .unwrap();
        fs::write(first.path().join("a.ts"), "fetch('/a');\n").unwrap();
        fs::write(second.path().join("main.dart"), "dio.get('/dart');\n").unwrap();
        fs::write(second.path().join("notes.md"), "'/ignored'\n").unwrap();

        let projects = vec![
            Project::from_dir(first.path()).unwrap(),
            Project::from_dir(second.path()).unwrap(),
        ];
        let extensions = strings(&["ts", "dart"]);
        let result = extract_projects(
            &projects,
            ScanSettings {
                extensions: &extensions,
                ignores: &[],
                ignore_test_files: false,
            },
        );

        let seen: Vec<(String, String, usize)> = result
            .candidates
            .iter()
            .map(|c| {
                (
                    c.location.file_path.clone(),
                    c.text.clone(),
                    c.location.line,
                )
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                ("a.ts".to_string(), "/a".to_string(), 1),
                ("src/b.ts".to_string(), "/b".to_string(), 1),
                ("src/b.ts".to_string(), "/b2".to_string(), 2),
                ("main.dart".to_string(), "/dart".to_string(), 1),
            ]
        );
        assert_eq!(result.files_scanned, 3);
        assert!(result.failures.is_empty());
        assert_eq!(result.candidates[0].location.project, projects[0].name);
        assert_eq!(
            result.candidates[1].source_line.as_deref(),
            Some("api.get('/b');")
        );
    }

    #[test]
    fn test_project_from_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(Project::from_dir(&dir.path().join("missing")).is_err());
    }
}
