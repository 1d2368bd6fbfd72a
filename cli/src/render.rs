//! Rendering extracted diagnostics for the terminal.

use std::io::{self, Write};

use anyhow::Result;
use buildlens_build::DiagnosticsSnapshot;
use buildlens_config::OutputFormat;
use buildlens_types::DiagnosticsByLocation;

/// Write `diagnostics` to `out` in `format`.
pub fn write_diagnostics<W: Write>(
    out: &mut W,
    diagnostics: &DiagnosticsByLocation,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for diagnostic in diagnostics.diagnostics() {
                writeln!(out, "{}", diagnostic.display_line())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, diagnostics)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// One-line summary for stderr, e.g. `E:1 W:2, 1 malformed block skipped`.
#[must_use]
pub fn summary_line(snapshot: &DiagnosticsSnapshot, skipped: usize) -> String {
    let mut line = if snapshot.is_empty() {
        "no diagnostics".to_string()
    } else {
        snapshot.status_string()
    };
    match skipped {
        0 => {}
        1 => line.push_str(", 1 malformed block skipped"),
        n => line.push_str(&format!(", {n} malformed blocks skipped")),
    }
    line
}

pub fn write_summary(snapshot: &DiagnosticsSnapshot, skipped: usize) -> io::Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "{}", summary_line(snapshot, skipped))
}
