use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use serde::Serialize;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        aggregate::{UsageReport, aggregate},
        extract::{Project, ScanFailure, ScanSettings, extract_projects},
        loader::load_endpoints,
        pattern::PatternSet,
    },
};

/// Everything one run produced, ready for rules and reporters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Spec file as given on the command line or in the config file.
    pub spec_path: String,
    pub projects: Vec<String>,
    #[serde(flatten)]
    pub usage: UsageReport,
    /// Source files that could not be read.
    pub failures: Vec<ScanFailure>,
    pub files_scanned: usize,
}

impl RunReport {
    /// Number of loaded declarations, duplicates included.
    pub fn declared_count(&self) -> usize {
        self.usage.endpoints.len() + self.usage.duplicates.len()
    }
}

/// Analysis context for one run.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g., `--spec openapi.yaml`)
/// 2. `.apiusagerc.json` config file
/// 3. Built-in defaults
///
/// Relative paths from the config file resolve against the config file's
/// directory; relative paths from the CLI resolve against the working directory.
pub struct RunContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,
    pub spec_path: PathBuf,
    pub projects: Vec<Project>,
    pub verbose: bool,
}

impl RunContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        Self::from_dir(common_args, Path::new("."))
    }

    /// Build a context, searching for the config file from `start_dir`.
    pub fn from_dir(common_args: &CommonArgs, start_dir: &Path) -> Result<Self> {
        let config_result = load_config(start_dir)?;
        if !config_result.from_file {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
        }
        let base_dir = config_result.base_dir;
        let mut config = config_result.config;

        // CLI overrides
        if let Some(spec) = &common_args.spec {
            config.spec = Some(spec.to_string_lossy().into_owned());
        }
        if common_args.case_insensitive {
            config.case_sensitive = false;
        }
        if common_args.decode_percent {
            config.decode_percent = true;
        }
        if !common_args.strip_prefixes.is_empty() {
            config.strip_prefixes = common_args.strip_prefixes.clone();
        }

        let spec_path = match (&common_args.spec, &config.spec) {
            (Some(cli), _) => cli.clone(),
            (None, Some(from_config)) => base_dir.join(from_config),
            (None, None) => bail!(
                "No endpoint spec configured. Pass --spec or set \"spec\" in {}",
                CONFIG_FILE_NAME
            ),
        };

        let project_dirs: Vec<PathBuf> = if common_args.projects.is_empty() {
            config.projects.iter().map(|p| base_dir.join(p)).collect()
        } else {
            config.projects = common_args
                .projects
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            common_args.projects.clone()
        };
        if project_dirs.is_empty() {
            bail!(
                "No projects configured. Pass --project or set \"projects\" in {}",
                CONFIG_FILE_NAME
            );
        }

        let projects = project_dirs
            .iter()
            .map(|dir| {
                Project::from_dir(dir)
                    .with_context(|| format!("Project directory not found: {}", dir.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            spec_path,
            projects,
            verbose: common_args.verbose,
        })
    }

    /// Load, compile, scan and aggregate.
    pub fn run(&self) -> Result<RunReport> {
        let declarations = load_endpoints(&self.spec_path)?;
        let set = PatternSet::compile_all(declarations);

        let extraction = extract_projects(
            &self.projects,
            ScanSettings {
                extensions: &self.config.extensions,
                ignores: &self.config.ignores,
                ignore_test_files: self.config.ignore_test_files,
            },
        );
        if extraction.skipped > 0 {
            tracing::warn!(
                "{} path(s) skipped due to access errors",
                extraction.skipped
            );
        }
        tracing::debug!(
            "{} candidate(s) from {} file(s)",
            extraction.candidates.len(),
            extraction.files_scanned
        );

        let options = self.config.match_options();
        let usage = aggregate(extraction.candidates, &set, &options);

        Ok(RunReport {
            spec_path: self.spec_path.to_string_lossy().replace('\\', "/"),
            projects: self.projects.iter().map(|p| p.name.clone()).collect(),
            usage,
            failures: extraction.failures,
            files_scanned: extraction.files_scanned,
        })
    }
}
