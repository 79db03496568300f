//! JSON report export

use std::io::Write;

use crate::error::{TreasuryError, TreasuryResult};
use crate::reports::TreasuryReport;

/// Write a report as JSON
pub fn export_report_json<W: Write>(
    report: &TreasuryReport,
    writer: &mut W,
    pretty: bool,
) -> TreasuryResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, report)
    } else {
        serde_json::to_writer(&mut *writer, report)
    }
    .map_err(|e| TreasuryError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| TreasuryError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Company, Money, ReportWindow, Transaction};
    use chrono::NaiveDate;

    #[test]
    fn test_json_shape() {
        let acme = Company::new("Acme");
        let ops = Category::new("Operations", acme.id);
        let txn = Transaction::new(
            acme.id,
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            Money::from_cents(-2550),
        )
        .in_category(ops.id);
        let report = TreasuryReport::assemble(
            acme.id,
            ReportWindow::month(2024, 1).unwrap(),
            &[ops],
            &[txn],
            &[],
            &[],
        );

        let mut out = Vec::new();
        export_report_json(&report, &mut out, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["window_from"], "2024-01-01");
        assert_eq!(value["window_to"], "2024-02-01");
        assert_eq!(value["net"], -25.5);
        assert_eq!(value["categories"][0]["name"], "Operations");
        assert_eq!(value["categories"][0]["rolled_total"], -25.5);
        assert!(value["diagnostics"].as_array().unwrap().is_empty());
    }
}
