//! CLI command handlers
//!
//! Bridges clap argument parsing with storage and the report builder.

pub mod company;
pub mod import;
pub mod occurrences;
pub mod report;
pub mod tree;

pub use company::{handle_company_command, CompanyCommands};
pub use import::handle_import_command;
pub use occurrences::handle_occurrences_command;
pub use report::{handle_report_command, ReportArgs};
pub use tree::handle_tree_command;

use chrono::{Datelike, NaiveDate};
use clap::Args;

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{Company, ReportWindow};
use crate::storage::Storage;

/// Ways to pick a report window on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// First day included (YYYY-MM-DD)
    #[arg(long, requires = "to", conflicts_with_all = ["month", "year"])]
    pub from: Option<String>,

    /// First day no longer included (YYYY-MM-DD)
    #[arg(long, requires = "from", conflicts_with_all = ["month", "year"])]
    pub to: Option<String>,

    /// A calendar month (YYYY-MM)
    #[arg(short, long, conflicts_with = "year")]
    pub month: Option<String>,

    /// A calendar year (YYYY)
    #[arg(short, long)]
    pub year: Option<i32>,
}

impl WindowArgs {
    /// Resolve to a window; the current month when nothing was given
    pub fn resolve(&self) -> TreasuryResult<ReportWindow> {
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            return ReportWindow::new(parse_date(from)?, parse_date(to)?);
        }
        if let Some(month) = &self.month {
            return ReportWindow::parse_period(month);
        }
        if let Some(year) = self.year {
            return ReportWindow::year(year);
        }

        let today = chrono::Local::now().date_naive();
        ReportWindow::month(today.year(), today.month())
    }
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> TreasuryResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        TreasuryError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
    })
}

/// Look up a company by id, short id or name
pub fn find_company(storage: &Storage, identifier: &str) -> TreasuryResult<Company> {
    storage
        .companies
        .find(identifier)?
        .ok_or_else(|| TreasuryError::company_not_found(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_range() {
        let args = WindowArgs {
            from: Some("2024-01-01".into()),
            to: Some("2024-04-01".into()),
            ..WindowArgs::default()
        };
        let window = args.resolve().unwrap();
        assert_eq!(window.num_days(), 91);
    }

    #[test]
    fn test_reversed_range_is_empty_window() {
        let args = WindowArgs {
            from: Some("2024-04-01".into()),
            to: Some("2024-01-01".into()),
            ..WindowArgs::default()
        };
        assert!(args.resolve().unwrap_err().is_empty_window());
    }

    #[test]
    fn test_month_and_year() {
        let month = WindowArgs {
            month: Some("2024-02".into()),
            ..WindowArgs::default()
        };
        assert_eq!(month.resolve().unwrap().num_days(), 29);

        let year = WindowArgs {
            year: Some(2023),
            ..WindowArgs::default()
        };
        assert_eq!(year.resolve().unwrap().num_days(), 365);
    }

    #[test]
    fn test_default_is_current_month() {
        let window = WindowArgs::default().resolve().unwrap();
        assert!(window.is_calendar_month());
        assert!(window.contains(chrono::Local::now().date_naive()));
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }
}
