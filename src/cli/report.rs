//! Report formatting and printing utilities.
//!
//! This module provides functions to display issues in cargo-style format and
//! to render the endpoint list. Separate from core logic to allow apiusage to
//! be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::{
    args::OutputFormat,
    commands::{
        CommandResult, CommandSummary, ExportSummary, InitSummary, ListSummary, StatusCounts,
    },
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{EndpointUsage, UsageStatus};
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
///
/// Issues are sorted and displayed with severity, location, source context,
/// and details.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success(endpoints: usize, files: usize) {
    print_success_to(endpoints, files, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(endpoints: usize, files: usize, writer: &mut W) {
    let msg = format!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} in {} {} - no issues found",
            endpoints,
            if endpoints == 1 {
                "endpoint"
            } else {
                "endpoints"
            },
            files,
            if files == 1 { "file" } else { "files" }
        )
        .green()
    );
    let _ = writeln!(writer, "{}", msg);
}

/// Print a warning about files that could not be read.
pub fn print_read_warning(count: usize, verbose: bool) {
    print_read_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a read warning to a custom writer.
pub fn print_read_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    // Print severity and message (cargo-style)
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Print clickable location: --> path:line:col
    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    // Print source context if available
    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix = if col > 1 {
            source_line.chars().take(col - 1).collect::<String>()
        } else {
            String::new()
        };
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    // Print details if present (cargo-style note)
    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    // Print hint if present
    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (String, usize, usize, Option<&'a str>) {
    (loc.display_path(), loc.line(), loc.col(), loc.source_line())
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .map(|i| i.location().line())
        .filter(|&line| line > 0)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

pub fn print(result: &CommandResult, verbose: bool) {
    print_command_output(result);

    if matches!(result.summary, CommandSummary::Check) && result.issues.is_empty() {
        print_success(result.endpoints_checked, result.files_checked);
    }

    print_read_warning(result.read_error_count, verbose);
}

fn print_command_output(result: &CommandResult) {
    match &result.summary {
        CommandSummary::Check => {
            report(&result.issues);
        }
        CommandSummary::List(summary) => {
            print_list_to(summary, &mut io::stdout().lock());
        }
        CommandSummary::Export(summary) => {
            print_export(summary);
        }
        CommandSummary::Init(summary) => {
            print_init(summary);
        }
    }
}

// ============================================================
// List
// ============================================================

pub fn print_list_to<W: Write>(summary: &ListSummary, writer: &mut W) {
    if summary.format == OutputFormat::Json {
        if let Some(json) = &summary.json {
            let _ = writeln!(writer, "{}", json);
        }
        return;
    }

    let _ = writeln!(writer, "{}", format_counts(&summary.counts));
    let _ = writeln!(writer);

    if summary.endpoints.is_empty() {
        let _ = writeln!(writer, "{}", "No endpoints match the current filter.".dimmed());
        return;
    }

    let status_width = summary
        .endpoints
        .iter()
        .map(|e| e.status.to_string().len())
        .max()
        .unwrap_or(0);

    for endpoint in &summary.endpoints {
        print_endpoint(endpoint, status_width, writer);
    }
}

fn format_counts(counts: &StatusCounts) -> String {
    let mut parts = vec![
        format!("All ({})", counts.all).bold().to_string(),
        format!("Used ({})", counts.used).green().to_string(),
        format!("Unused ({})", counts.unused).yellow().to_string(),
    ];
    if counts.unparseable > 0 {
        parts.push(
            format!("Unparseable ({})", counts.unparseable)
                .red()
                .to_string(),
        );
    }
    parts.join("  ")
}

fn print_endpoint<W: Write>(endpoint: &EndpointUsage, status_width: usize, writer: &mut W) {
    let status = format!("{:<width$}", endpoint.status.to_string(), width = status_width);
    let status = match endpoint.status {
        UsageStatus::Used => status.green(),
        UsageStatus::Unused => status.yellow(),
        UsageStatus::Unparseable => status.red(),
    };

    let count = endpoint.record.occurrence_count;
    if count > 0 {
        let _ = writeln!(
            writer,
            "{}  {}  {}",
            status,
            endpoint.declaration.label(),
            format!(
                "({} {})",
                count,
                if count == 1 {
                    "occurrence"
                } else {
                    "occurrences"
                }
            )
            .dimmed()
        );
    } else {
        let _ = writeln!(writer, "{}  {}", status, endpoint.declaration.label());
    }

    for location in &endpoint.record.locations {
        let _ = writeln!(
            writer,
            "    {} {}/{}:{}:{}",
            "-->".blue(),
            location.project,
            location.file_path,
            location.line,
            location.col
        );
    }

    if let Some(error) = &endpoint.error {
        let _ = writeln!(
            writer,
            "    {} {} {}",
            "=".blue(),
            "note:".bold(),
            error.reason
        );
    }
}

// ============================================================
// Export / Init
// ============================================================

fn print_export(summary: &ExportSummary) {
    // CSV written to stdout must stay clean
    let Some(path) = &summary.path else {
        return;
    };
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Exported {} row(s) for {} endpoint(s) to {}",
            summary.row_count, summary.endpoint_count, path
        )
        .green()
    );
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(error) = &summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
    }
}

// ============================================================
// Tests
// ============================================================
