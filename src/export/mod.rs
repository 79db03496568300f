//! Report output formats
//!
//! - Table: aligned terminal table
//! - JSON: machine-readable report
//! - YAML: human-readable report
//! - CSV: one line per category, spreadsheet-compatible

pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{TreasuryError, TreasuryResult};
use crate::reports::TreasuryReport;

pub use json::export_report_json;
pub use yaml::export_report_yaml;

/// How a report is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Terminal table
    #[default]
    Table,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
    /// CSV rows
    Csv,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Write `report` to `writer` in `format`
pub fn write_report<W: Write>(
    report: &TreasuryReport,
    format: ReportFormat,
    settings: &Settings,
    writer: &mut W,
) -> TreasuryResult<()> {
    match format {
        ReportFormat::Table => {
            let table = crate::display::format_report(report, settings);
            writer
                .write_all(table.as_bytes())
                .map_err(|e| TreasuryError::Export(e.to_string()))
        }
        ReportFormat::Json => export_report_json(report, writer, true),
        ReportFormat::Yaml => export_report_yaml(report, writer),
        ReportFormat::Csv => report.export_csv(writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, ReportWindow};

    fn empty_report() -> TreasuryReport {
        let acme = Company::new("Acme");
        TreasuryReport::assemble(
            acme.id,
            ReportWindow::month(2024, 1).unwrap(),
            &[],
            &[],
            &[],
            &[],
        )
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ReportFormat::Yaml.to_string(), "yaml");
        let parsed: ReportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(parsed, ReportFormat::Csv);
    }

    #[test]
    fn test_every_format_writes_something() {
        let report = empty_report();
        let settings = Settings::default();

        for format in [
            ReportFormat::Table,
            ReportFormat::Json,
            ReportFormat::Yaml,
            ReportFormat::Csv,
        ] {
            let mut out = Vec::new();
            write_report(&report, format, &settings, &mut out).unwrap();
            assert!(!out.is_empty(), "{} produced no output", format);
        }
    }
}
