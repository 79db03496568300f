//! Reports for the treasury dashboard
//!
//! The report assembler wires the engine stages together for one company and
//! one window; the cache keeps finished reports around until the company's
//! ledger changes.

pub mod cache;
pub mod treasury;

pub use cache::ReportCache;
pub use treasury::{build_report, CategoryRow, ContributionListing, TreasuryReport};
