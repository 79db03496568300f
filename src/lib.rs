//! Treasury - multi-tenant treasury dashboard
//!
//! Projects recurring costs and revenues into a reporting window, merges them
//! with recorded transactions and rolls the totals up each company's category
//! tree.
//!
//! # Architecture
//!
//! - `models`: companies, categories, entries, transactions, money, windows
//! - `engine`: category tree, recurrence expansion, aggregation, rollup
//! - `reports`: the treasury report and its cache
//! - `storage`: the ledger repository trait, JSON file store, snapshots
//! - `config`: data paths and user settings
//! - `display`, `export`: terminal tables and JSON/YAML/CSV output
//! - `cli`: command handlers for the `treasury` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use treasury::reports::build_report;
//! use treasury::storage::LedgerSnapshot;
//!
//! let snapshot = LedgerSnapshot::load("ledger.yaml".as_ref())?;
//! let report = build_report(&snapshot, company_id, from, to)?;
//! println!("{}", report.format_terminal());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::{TreasuryError, TreasuryResult};
