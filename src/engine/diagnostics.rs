//! Recoverable data problems found while building a report
//!
//! A malformed row never blocks a whole report. The engine excludes the
//! offending record, records a [`Diagnostic`] and carries on; the caller
//! decides how to surface the list (warning banner, log line, ...).

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::models::{CategoryId, CompanyId, EntryId, Money};

/// Why a cost/revenue entry could not be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleViolation {
    /// No start date (recurring) or no occurrence date (one-off)
    MissingStartDate,
    /// Recurring entry without a frequency
    MissingFrequency,
    /// End date lies before the start date
    EndBeforeStart,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartDate => write!(f, "missing start date"),
            Self::MissingFrequency => write!(f, "recurring entry has no frequency"),
            Self::EndBeforeStart => write!(f, "end date is before start date"),
        }
    }
}

/// A non-fatal data error attached to a report
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The category's parent chain loops back on itself
    #[error("Category {category_id} is part of a parent cycle; its subtree is excluded")]
    CycleDetected { category_id: CategoryId },

    /// The parent is not a category of the same company.
    ///
    /// Covers both a parent owned by another company and a parent id that
    /// matches no category at all.
    #[error("Category {category_id} references parent {parent_id} outside its company; its subtree is excluded")]
    CrossTenantReference {
        category_id: CategoryId,
        parent_id: CategoryId,
    },

    /// A cost/revenue rule cannot be expanded
    #[error("Entry {entry_id} skipped: {reason}")]
    InvalidRecurrenceRule {
        entry_id: EntryId,
        reason: RuleViolation,
    },

    /// A record handed over for one company belongs to another
    #[error("{entity_type} {id} belongs to company {company_id}; ignored")]
    ForeignRecord {
        entity_type: &'static str,
        id: String,
        company_id: CompanyId,
    },

    /// Amounts attached to a category that is not part of the valid tree
    #[error("{amount} attached to category {category_id} outside the category tree; counted as uncategorized")]
    DetachedAmount {
        category_id: CategoryId,
        amount: Money,
    },
}

impl Diagnostic {
    /// Whether this diagnostic comes from the shape of the category tree
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected { .. } | Self::CrossTenantReference { .. }
        )
    }
}

/// Ordered collection of diagnostics gathered during one report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Count diagnostics matching a predicate
    pub fn count_where(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.0.iter().filter(|d| pred(*d)).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
