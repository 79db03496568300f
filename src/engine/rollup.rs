//! Rollup accumulator
//!
//! Sums every category's own totals into all of its ancestors. The tree hands
//! out its nodes bottom-up, so one pass sees each child before its parent and
//! each amount is added once per level.

use std::collections::HashMap;

use tracing::debug;

use crate::models::CategoryId;

use super::aggregate::{BucketTotal, CategoryTotals};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::tree::CategoryTree;

/// Totals of one category node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollupEntry {
    /// Amounts attached directly to the category
    pub self_total: BucketTotal,
    /// Own amounts plus those of every descendant
    pub rolled_total: BucketTotal,
}

/// Rolled-up totals for a whole category forest
#[derive(Debug, Clone, Default)]
pub struct Rollup {
    entries: HashMap<CategoryId, RollupEntry>,
    roots_total: BucketTotal,
    uncategorized: BucketTotal,
}

impl Rollup {
    /// Accumulate per-category totals over `tree`.
    ///
    /// Totals on categories outside the tree (excluded by a cycle or a bad
    /// parent, or not known at all) move to the uncategorized bucket with a
    /// [`Diagnostic::DetachedAmount`], so the grand total never changes.
    pub fn accumulate(
        tree: &CategoryTree,
        totals: &CategoryTotals,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut uncategorized = totals.uncategorized();
        for (category_id, total) in totals.iter() {
            if !tree.contains(category_id) {
                diagnostics.push(Diagnostic::DetachedAmount {
                    category_id,
                    amount: total.net(),
                });
                uncategorized += total;
            }
        }

        let mut entries: HashMap<CategoryId, RollupEntry> = HashMap::with_capacity(tree.len());
        for id in tree.bottom_up() {
            let self_total = totals.get(id);
            let rolled_total = tree
                .children(id)
                .iter()
                .filter_map(|child| entries.get(child))
                .fold(self_total, |acc, child| acc + child.rolled_total);
            entries.insert(
                id,
                RollupEntry {
                    self_total,
                    rolled_total,
                },
            );
        }

        let roots_total = tree
            .roots()
            .iter()
            .filter_map(|root| entries.get(root))
            .fold(BucketTotal::default(), |acc, root| acc + root.rolled_total);

        debug!(
            "Rolled up {} categories, roots net {}, uncategorized net {}",
            entries.len(),
            roots_total.net(),
            uncategorized.net()
        );

        Self {
            entries,
            roots_total,
            uncategorized,
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&RollupEntry> {
        self.entries.get(&id)
    }

    /// Amounts attached directly to a category (zero for unknown ids)
    pub fn self_total(&self, id: CategoryId) -> BucketTotal {
        self.entries
            .get(&id)
            .map(|e| e.self_total)
            .unwrap_or_default()
    }

    /// Amounts of a category and all of its descendants (zero for unknown ids)
    pub fn rolled_total(&self, id: CategoryId) -> BucketTotal {
        self.entries
            .get(&id)
            .map(|e| e.rolled_total)
            .unwrap_or_default()
    }

    /// Sum of every root's rolled total
    pub fn roots_total(&self) -> BucketTotal {
        self.roots_total
    }

    /// Amounts without a category in the tree
    pub fn uncategorized(&self) -> BucketTotal {
        self.uncategorized
    }

    /// Everything in the window: roots plus uncategorized
    pub fn grand_total(&self) -> BucketTotal {
        self.roots_total + self.uncategorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate::{collect_contributions, Contribution};
    use crate::models::{Category, CompanyId, Money, ReportWindow, Transaction};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> ReportWindow {
        ReportWindow::month(2024, 1).unwrap()
    }

    fn rollup_of(
        company: CompanyId,
        categories: &[Category],
        transactions: &[Transaction],
    ) -> (CategoryTree, Rollup, Vec<Contribution>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tree = CategoryTree::build(company, categories, &mut diagnostics);
        let contributions =
            collect_contributions(company, &january(), transactions, &[], &[], &mut diagnostics);
        let totals = CategoryTotals::from_contributions(&contributions);
        let rollup = Rollup::accumulate(&tree, &totals, &mut diagnostics);
        (tree, rollup, contributions, diagnostics)
    }

    #[test]
    fn test_parent_includes_child() {
        let company = CompanyId::new();
        let operations = Category::new("Operations", company);
        let software = Category::child_of("Software", company, operations.id);
        let transactions = vec![
            Transaction::new(company, date(2024, 1, 10), Money::from_major(100))
                .in_category(operations.id),
            Transaction::new(company, date(2024, 1, 11), Money::from_major(50))
                .in_category(software.id),
        ];

        let (_, rollup, _, diagnostics) =
            rollup_of(company, &[operations.clone(), software.clone()], &transactions);

        assert!(diagnostics.is_empty());
        assert_eq!(rollup.self_total(operations.id).net(), Money::from_major(100));
        assert_eq!(rollup.rolled_total(operations.id).net(), Money::from_major(150));
        assert_eq!(rollup.rolled_total(software.id).net(), Money::from_major(50));
        assert_eq!(rollup.rolled_total(operations.id).count, 2);
        assert_eq!(rollup.roots_total().net(), Money::from_major(150));
    }

    #[test]
    fn test_deep_tree_adds_each_amount_once_per_level() {
        let company = CompanyId::new();
        let root = Category::new("Root", company);
        let mid = Category::child_of("Mid", company, root.id);
        let leaf_a = Category::child_of("A", company, mid.id);
        let leaf_b = Category::child_of("B", company, mid.id);
        let transactions = vec![
            Transaction::new(company, date(2024, 1, 2), Money::from_cents(-250))
                .in_category(leaf_a.id),
            Transaction::new(company, date(2024, 1, 3), Money::from_cents(-750))
                .in_category(leaf_b.id),
            Transaction::new(company, date(2024, 1, 4), Money::from_cents(1000))
                .in_category(root.id),
        ];

        let (_, rollup, _, _) = rollup_of(
            company,
            &[root.clone(), mid.clone(), leaf_a.clone(), leaf_b.clone()],
            &transactions,
        );

        assert_eq!(rollup.rolled_total(mid.id).outflow, Money::from_cents(-1000));
        assert_eq!(rollup.self_total(mid.id), BucketTotal::default());
        let root_total = rollup.rolled_total(root.id);
        assert_eq!(root_total.inflow, Money::from_cents(1000));
        assert_eq!(root_total.outflow, Money::from_cents(-1000));
        assert_eq!(root_total.net(), Money::zero());
        assert_eq!(root_total.count, 3);
    }

    #[test]
    fn test_conservation_with_excluded_categories() {
        let company = CompanyId::new();
        let good = Category::new("Good", company);
        let mut loop_a = Category::new("Loop A", company);
        let loop_b = Category::child_of("Loop B", company, loop_a.id);
        loop_a.parent_id = Some(loop_b.id);
        let unknown = crate::models::CategoryId::new();

        let transactions = vec![
            Transaction::new(company, date(2024, 1, 1), Money::from_cents(101)).in_category(good.id),
            Transaction::new(company, date(2024, 1, 2), Money::from_cents(-202))
                .in_category(loop_a.id),
            Transaction::new(company, date(2024, 1, 3), Money::from_cents(303)).in_category(unknown),
            Transaction::new(company, date(2024, 1, 4), Money::from_cents(-404)),
        ];

        let (tree, rollup, contributions, diagnostics) =
            rollup_of(company, &[good.clone(), loop_a.clone(), loop_b], &transactions);

        let expected: Money = contributions.iter().map(|c| c.amount).sum();
        assert_eq!(rollup.grand_total().net(), expected);
        assert_eq!(rollup.grand_total().count, contributions.len());

        let root_sum: Money = tree
            .roots()
            .iter()
            .map(|id| rollup.rolled_total(*id).net())
            .sum();
        assert_eq!(root_sum + rollup.uncategorized().net(), expected);

        assert_eq!(rollup.uncategorized().net(), Money::from_cents(-202 + 303 - 404));
        assert_eq!(
            diagnostics.count_where(|d| matches!(d, Diagnostic::DetachedAmount { .. })),
            2
        );
        assert_eq!(
            diagnostics.count_where(|d| matches!(d, Diagnostic::CycleDetected { .. })),
            1
        );
    }

    #[test]
    fn test_long_chain_rolls_up_to_root() {
        let company = CompanyId::new();
        let mut categories = vec![Category::new("c0", company)];
        for i in 1..2000 {
            let parent = categories[i - 1].id;
            categories.push(Category::child_of(format!("c{}", i), company, parent));
        }
        let leaf = categories[categories.len() - 1].id;
        let root = categories[0].id;
        let transactions =
            vec![Transaction::new(company, date(2024, 1, 20), Money::from_major(7)).in_category(leaf)];

        let (_, rollup, _, _) = rollup_of(company, &categories, &transactions);
        assert_eq!(rollup.rolled_total(root).net(), Money::from_major(7));
        assert_eq!(rollup.rolled_total(leaf).net(), Money::from_major(7));
    }
}
