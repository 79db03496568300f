//! YAML report export

use std::io::Write;

use crate::error::{TreasuryError, TreasuryResult};
use crate::reports::TreasuryReport;

/// Write a report as YAML, preceded by a comment header
pub fn export_report_yaml<W: Write>(report: &TreasuryReport, writer: &mut W) -> TreasuryResult<()> {
    writeln!(
        writer,
        "# Treasury report {} [{}, {})",
        report.company_id, report.window_from, report.window_to
    )
    .map_err(|e| TreasuryError::Export(e.to_string()))?;
    writeln!(writer, "# Generated by treasury {}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| TreasuryError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, report).map_err(|e| TreasuryError::Export(e.to_string()))?;

    Ok(())
}
