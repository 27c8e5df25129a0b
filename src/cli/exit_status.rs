use std::process::ExitCode;

/// Process exit status of `apiusage`.
///
/// Only error-severity findings fail a run: malformed templates and unreadable
/// source files reported by `check`, or an existing config file for `init`.
/// Warning-severity findings never change the status,
/// and `list` and `export` exit 0 whatever the report contains.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// No error-severity findings.
    Success,
    /// `check` reported at least one error, or `init` refused to overwrite.
    Failure,
    /// The run could not complete: bad config, unreadable or invalid spec file.
    Error,
}

impl ExitStatus {
    /// Status of a command that finished, given its error count.
    pub fn from_findings(error_count: usize, fail_on_errors: bool) -> Self {
        if fail_on_errors && error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
