//! Output formatting utilities for CLI operations.

use std::io::Write;

use camino::Utf8Path;
use pullbox::{IntakeError, PipelineSummary, RepositoryLocator};

/// Writes the end-of-run summary to the given writer.
pub fn write_run_summary<W: Write>(
    writer: &mut W,
    locator: &RepositoryLocator,
    dir: &Utf8Path,
    summary: &PipelineSummary,
) -> Result<(), IntakeError> {
    writeln!(
        writer,
        "Archived {} pull requests from {locator} into {dir} ({} succeeded, {} failed)",
        summary.dispatched, summary.succeeded, summary.failed
    )
    .map_err(|error| IntakeError::Io {
        message: error.to_string(),
    })
}
