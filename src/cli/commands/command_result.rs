use crate::{
    cli::{args::OutputFormat, exit_status::ExitStatus},
    core::EndpointUsage,
    issues::Issue,
};

#[derive(Debug)]
pub enum CommandSummary {
    Check,
    List(ListSummary),
    Export(ExportSummary),
    Init(InitSummary),
}

/// Endpoint counts per status, over the whole report (not the filtered view).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub used: usize,
    pub unused: usize,
    pub unparseable: usize,
}

#[derive(Debug)]
pub struct ListSummary {
    pub format: OutputFormat,
    pub counts: StatusCounts,
    /// Endpoints left after the status and search filters.
    pub endpoints: Vec<EndpointUsage>,
    /// Full report rendered as JSON when `format` is JSON.
    pub json: Option<String>,
}

#[derive(Debug)]
pub struct ExportSummary {
    /// Output file, or `None` when the CSV went to stdout.
    pub path: Option<String>,
    pub row_count: usize,
    pub endpoint_count: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    /// Why the config file was not created.
    pub error: Option<String>,
}

/// Result of running apiusage commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    /// If false, always exit 0 (listing and exporting never fail on findings).
    pub exit_on_errors: bool,
    /// All issues found during the check.
    /// Empty for non-check commands.
    pub issues: Vec<Issue>,
    /// Number of source files that could not be read.
    pub read_error_count: usize,
    /// Number of endpoint declarations that were loaded.
    pub endpoints_checked: usize,
    /// Number of source files that were scanned.
    pub files_checked: usize,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_findings(self.error_count, self.exit_on_errors)
    }
}
