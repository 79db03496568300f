//! Display formatting for terminal output
//!
//! Reports and listings as tables, the category forest as a tree.

pub mod category;
pub mod report;

pub use category::{format_category_tree, format_company_list};
pub use report::{format_contributions, format_diagnostics, format_report};
