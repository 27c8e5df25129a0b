use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;
mod export;
mod init;
mod list;

const BIN_NAME: &str = "apiusage";

pub const ORDERS_SPEC: &str = r#"openapi: 3.0.0
paths:
  /orders/{orderId}:
    get: {}
  /orders:
    post: {}
  /health:
    get: {}
"#;

pub const ORDERS_CLIENT: &str = r#"export const createOrder = (body) => api.post('/orders', body);
export const getOrder = (id) => api.get(`/orders/${id}`);
export const listInvoices = () => fetch('/invoices');
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stops config discovery from walking above the test directory
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    /// Spec at `openapi.yaml` and one client project at `web/`.
    pub fn with_orders() -> Result<Self> {
        let test = Self::with_file("openapi.yaml", ORDERS_SPEC)?;
        test.write_file("web/src/api.ts", ORDERS_CLIENT)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd.env("RUST_LOG", "off"); // Log lines carry absolute temp paths
        cmd
    }

    /// `<subcommand> --spec openapi.yaml --project web`
    pub fn orders_command(&self, subcommand: &str) -> Command {
        let mut cmd = self.command();
        cmd.args([subcommand, "--spec", "openapi.yaml", "--project", "web"]);
        cmd
    }

    pub fn check_command(&self) -> Command {
        self.orders_command("check")
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}
