//! Entry aggregator
//!
//! Merges realized transactions with the expanded occurrences of costs and
//! revenues, keeps what falls inside the window and totals it per category.
//! Every contribution lands in exactly one bucket: its own category, or the
//! uncategorized bucket when it has none. Ancestors are not touched here;
//! that is the rollup's job.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{
    CategoryId, CompanyId, EntryId, EntryKind, MonetaryEntry, Money, ReportWindow, Transaction,
    TransactionId,
};

use super::diagnostics::{Diagnostic, Diagnostics};
use super::recurrence;

/// Where an amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Source {
    Transaction(TransactionId),
    Revenue(EntryId),
    Cost(EntryId),
}

impl Source {
    fn entry(kind: EntryKind, id: EntryId) -> Self {
        match kind {
            EntryKind::Cost => Self::Cost(id),
            EntryKind::Revenue => Self::Revenue(id),
        }
    }
}

/// The single bucket an amount is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Category(CategoryId),
    Uncategorized,
}

impl From<Option<CategoryId>> for Bucket {
    fn from(category_id: Option<CategoryId>) -> Self {
        category_id.map_or(Self::Uncategorized, Self::Category)
    }
}

/// One signed amount dated inside the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub date: NaiveDate,
    pub source: Source,
    pub label: String,
    pub bucket: Bucket,
    /// Positive for inflow, negative for outflow
    pub amount: Money,
}

/// Running inflow/outflow totals of a bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotal {
    pub inflow: Money,
    pub outflow: Money,
    /// Number of contributions
    pub count: usize,
}

impl BucketTotal {
    /// Record one signed amount
    pub fn record(&mut self, amount: Money) {
        if amount.is_negative() {
            self.outflow += amount;
        } else {
            self.inflow += amount;
        }
        self.count += 1;
    }

    /// Inflow plus (negative) outflow
    pub fn net(&self) -> Money {
        self.inflow + self.outflow
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Add for BucketTotal {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            inflow: self.inflow + other.inflow,
            outflow: self.outflow + other.outflow,
            count: self.count + other.count,
        }
    }
}

impl AddAssign for BucketTotal {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Per-category totals for one window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    by_category: BTreeMap<CategoryId, BucketTotal>,
    uncategorized: BucketTotal,
}

impl CategoryTotals {
    /// Fold a list of contributions into bucket totals
    pub fn from_contributions(contributions: &[Contribution]) -> Self {
        let mut totals = Self::default();
        for contribution in contributions {
            match contribution.bucket {
                Bucket::Category(id) => totals
                    .by_category
                    .entry(id)
                    .or_default()
                    .record(contribution.amount),
                Bucket::Uncategorized => totals.uncategorized.record(contribution.amount),
            }
        }
        totals
    }

    /// Totals attached directly to a category (zero when it has none)
    pub fn get(&self, id: CategoryId) -> BucketTotal {
        self.by_category.get(&id).copied().unwrap_or_default()
    }

    /// Categories with at least one contribution, ordered by id
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, BucketTotal)> + '_ {
        self.by_category.iter().map(|(id, total)| (*id, *total))
    }

    pub fn uncategorized(&self) -> BucketTotal {
        self.uncategorized
    }

    /// Sum over every bucket
    pub fn grand_total(&self) -> BucketTotal {
        self.by_category
            .values()
            .fold(self.uncategorized, |acc, total| acc + *total)
    }
}

/// List every contribution of a company inside the window, in canonical order
/// (date, then source kind, then id).
///
/// Records of other companies and entries with unusable rules are skipped
/// and reported through `diagnostics`.
pub fn collect_contributions(
    company_id: CompanyId,
    window: &ReportWindow,
    transactions: &[Transaction],
    costs: &[MonetaryEntry],
    revenues: &[MonetaryEntry],
    diagnostics: &mut Diagnostics,
) -> Vec<Contribution> {
    let mut contributions = Vec::new();

    for txn in transactions {
        if txn.company_id != company_id {
            diagnostics.push(Diagnostic::ForeignRecord {
                entity_type: "Transaction",
                id: txn.id.to_string(),
                company_id: txn.company_id,
            });
            continue;
        }
        if !window.contains(txn.date) {
            continue;
        }
        contributions.push(Contribution {
            date: txn.date,
            source: Source::Transaction(txn.id),
            label: txn.label.clone(),
            bucket: txn.category_id.into(),
            amount: txn.amount,
        });
    }

    expand_entries(EntryKind::Cost, company_id, window, costs, diagnostics, &mut contributions);
    expand_entries(
        EntryKind::Revenue,
        company_id,
        window,
        revenues,
        diagnostics,
        &mut contributions,
    );

    contributions.sort_by(|a, b| a.date.cmp(&b.date).then(a.source.cmp(&b.source)));

    debug!(
        "Collected {} contributions for {} in {}",
        contributions.len(),
        company_id,
        window
    );

    contributions
}

fn expand_entries(
    kind: EntryKind,
    company_id: CompanyId,
    window: &ReportWindow,
    entries: &[MonetaryEntry],
    diagnostics: &mut Diagnostics,
    contributions: &mut Vec<Contribution>,
) {
    let entity_type = match kind {
        EntryKind::Cost => "Cost",
        EntryKind::Revenue => "Revenue",
    };

    for entry in entries {
        if entry.company_id != company_id {
            diagnostics.push(Diagnostic::ForeignRecord {
                entity_type,
                id: entry.id.to_string(),
                company_id: entry.company_id,
            });
            continue;
        }
        if entry.kind != kind {
            warn!(
                "Entry {} is marked {} but listed as {}; treating it as {}",
                entry.id, entry.kind, kind, kind
            );
        }

        let occurrences = match recurrence::expand(entry, window) {
            Ok(occurrences) => occurrences,
            Err(reason) => {
                diagnostics.push(Diagnostic::InvalidRecurrenceRule {
                    entry_id: entry.id,
                    reason,
                });
                continue;
            }
        };

        let bucket = Bucket::from(entry.category_id);
        let source = Source::entry(kind, entry.id);
        contributions.extend(occurrences.map(|occurrence| Contribution {
            date: occurrence.date,
            source,
            label: entry.label.clone(),
            bucket,
            amount: kind.signed(occurrence.amount),
        }));
    }
}

/// Aggregate a company's ledger into per-category totals for `window`
pub fn aggregate(
    company_id: CompanyId,
    window: &ReportWindow,
    transactions: &[Transaction],
    costs: &[MonetaryEntry],
    revenues: &[MonetaryEntry],
    diagnostics: &mut Diagnostics,
) -> CategoryTotals {
    let contributions =
        collect_contributions(company_id, window, transactions, costs, revenues, diagnostics);
    CategoryTotals::from_contributions(&contributions)
}
