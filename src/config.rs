use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::MatchOptions;

pub const CONFIG_FILE_NAME: &str = ".apiusagerc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/*_test.dart",
    "**/__tests__/**",
    "**/__mocks__/**",
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Endpoint spec file: OpenAPI JSON/YAML or a plain endpoint list.
    #[serde(default)]
    pub spec: Option<String>,
    /// Project roots to scan, in reporting order.
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub ignore_test_files: bool,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
    #[serde(default)]
    pub decode_percent: bool,
    #[serde(default)]
    pub strip_prefixes: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    ["js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "dart"]
        .map(String::from)
        .to_vec()
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/dist/**", "**/build/**", "**/.git/**"]
        .map(String::from)
        .to_vec()
}

fn default_case_sensitive() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec: None,
            projects: Vec::new(),
            extensions: default_extensions(),
            ignores: default_ignores(),
            ignore_test_files: false,
            case_sensitive: default_case_sensitive(),
            decode_percent: false,
            strip_prefixes: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Ignore patterns with wildcards must be valid globs; extensions are bare
    /// names such as `ts`.
    pub fn validate(&self) -> Result<()> {
        // Patterns without wildcards are literal paths, so `[id]` stays valid.
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'ignores': \"{}\"", pattern)
                })?;
            }
        }

        for ext in &self.extensions {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                bail!(
                    "Invalid entry in 'extensions': \"{}\" (use a bare extension like \"ts\")",
                    ext
                );
            }
        }

        Ok(())
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.case_sensitive,
            decode_percent: self.decode_percent,
            strip_prefixes: self.strip_prefixes.clone(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config {
        spec: Some("openapi.yaml".to_string()),
        projects: vec!["./".to_string()],
        ..Default::default()
    };
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory that relative `spec` and `projects` entries resolve against:
    /// the config file's directory, or the start directory for defaults.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!("loaded config from {}", path.display());
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                base_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
