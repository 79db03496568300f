//! Projection and rollup engine
//!
//! The pure part of report building. Given one company's categories,
//! transactions, costs and revenues plus a window, the stages run in order:
//!
//! 1. [`tree`] arranges the categories into a forest
//! 2. [`recurrence`] expands costs and revenues into dated occurrences
//! 3. [`aggregate`] totals everything inside the window per category
//! 4. [`rollup`] sums each category's totals into its ancestors
//!
//! Nothing here touches storage or the clock.

pub mod aggregate;
pub mod diagnostics;
pub mod recurrence;
pub mod rollup;
pub mod tree;

pub use aggregate::{aggregate, collect_contributions, Bucket, BucketTotal, CategoryTotals, Contribution, Source};
pub use diagnostics::{Diagnostic, Diagnostics, RuleViolation};
pub use recurrence::{expand, Occurrence, RecurrenceRule, Schedule};
pub use rollup::{Rollup, RollupEntry};
pub use tree::{CategoryNode, CategoryTree};
