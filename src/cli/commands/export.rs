use std::{
    fs::File,
    io::{self, Write},
};

use anyhow::{Context, Result};

use super::super::args::ExportCommand;
use super::{
    CommandResult, CommandSummary, ExportSummary,
    helper::{RunTotals, finish},
};
use crate::core::{RunContext, UsageReport};

pub const CSV_HEADER: [&str; 7] = [
    "method",
    "path",
    "used",
    "occurrenceCount",
    "project",
    "file",
    "line",
];

pub fn export(cmd: ExportCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.common)?;
    let report = ctx.run()?;

    let to_stdout = cmd.output.as_os_str() == "-";
    let row_count = if to_stdout {
        write_csv(&report.usage, io::stdout().lock())?
    } else {
        let file = File::create(&cmd.output)
            .with_context(|| format!("Failed to create {}", cmd.output.display()))?;
        write_csv(&report.usage, file)
            .with_context(|| format!("Failed to write {}", cmd.output.display()))?
    };

    let summary = ExportSummary {
        path: (!to_stdout).then(|| cmd.output.to_string_lossy().into_owned()),
        row_count,
        endpoint_count: report.usage.endpoints.len(),
    };

    Ok(finish(
        CommandSummary::Export(summary),
        Vec::new(),
        RunTotals::of(&report),
        false,
    ))
}

/// Write the usage table as CSV and return the number of data rows.
///
/// One row per location; an endpoint without locations gets one summary row
/// with empty `project`, `file` and `line`. Rows follow declaration order,
/// then location order.
pub fn write_csv<W: Write>(usage: &UsageReport, writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for endpoint in &usage.endpoints {
        let method = endpoint.declaration.method.map_or("", |m| m.as_str());
        let path = endpoint.declaration.template.as_str();
        let status = endpoint.status.to_string();
        let count = endpoint.record.occurrence_count.to_string();

        if endpoint.record.locations.is_empty() {
            csv.write_record([method, path, status.as_str(), count.as_str(), "", "", ""])?;
            rows += 1;
        }
        for location in &endpoint.record.locations {
            let line = location.line.to_string();
            csv.write_record([
                method,
                path,
                status.as_str(),
                count.as_str(),
                location.project.as_str(),
                location.file_path.as_str(),
                line.as_str(),
            ])?;
            rows += 1;
        }
    }

    csv.flush()?;
    Ok(rows)
}
