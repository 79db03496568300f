//! Treasury report
//!
//! One company, one window: every category with its own and rolled-up totals,
//! the uncategorized remainder, overall inflow/outflow and the diagnostics
//! raised while building it.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::engine::{
    aggregate, collect_contributions, CategoryTree, Contribution, Diagnostics, Rollup,
};
use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{
    Category, CategoryId, CompanyId, MonetaryEntry, Money, ReportWindow, Transaction,
};
use crate::storage::LedgerRepository;

/// One category line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub parent_id: Option<CategoryId>,
    /// Distance from the root (roots are 0)
    pub depth: usize,
    /// Net of the amounts attached directly to this category
    pub self_total: Money,
    /// Net of this category and all of its descendants
    pub rolled_total: Money,
    pub rolled_inflow: Money,
    pub rolled_outflow: Money,
    /// Occurrences and transactions attached directly to this category
    pub occurrences: usize,
    /// Occurrences and transactions in the whole subtree
    pub rolled_occurrences: usize,
}

impl CategoryRow {
    /// Whether nothing at all happened in this subtree during the window
    pub fn is_empty(&self) -> bool {
        self.rolled_occurrences == 0
    }
}

/// Aggregated treasury view of one company over one window
#[derive(Debug, Clone, Serialize)]
pub struct TreasuryReport {
    pub company_id: CompanyId,
    /// First day covered (inclusive)
    pub window_from: NaiveDate,
    /// Day after the last day covered (exclusive)
    pub window_to: NaiveDate,
    /// Categories in tree order, parents before children
    pub categories: Vec<CategoryRow>,
    /// Net of amounts without a category in the tree
    pub uncategorized: Money,
    pub uncategorized_occurrences: usize,
    pub total_inflow: Money,
    pub total_outflow: Money,
    pub net: Money,
    pub diagnostics: Diagnostics,
}

impl TreasuryReport {
    /// Fetch a company's ledger from `repo` and build its report for `window`
    pub fn generate<R: LedgerRepository + ?Sized>(
        repo: &R,
        company_id: CompanyId,
        window: ReportWindow,
    ) -> TreasuryResult<Self> {
        let categories = repo.list_categories(company_id)?;
        let transactions = repo.list_transactions(company_id, &window)?;
        let costs = repo.list_costs(company_id)?;
        let revenues = repo.list_revenues(company_id)?;

        debug!(
            "Loaded {} categories, {} transactions, {} costs, {} revenues for {}",
            categories.len(),
            transactions.len(),
            costs.len(),
            revenues.len(),
            company_id
        );

        Ok(Self::assemble(
            company_id,
            window,
            &categories,
            &transactions,
            &costs,
            &revenues,
        ))
    }

    /// Build a report from records already in memory
    pub fn assemble(
        company_id: CompanyId,
        window: ReportWindow,
        categories: &[Category],
        transactions: &[Transaction],
        costs: &[MonetaryEntry],
        revenues: &[MonetaryEntry],
    ) -> Self {
        let mut diagnostics = Diagnostics::new();

        let tree = CategoryTree::build(company_id, categories, &mut diagnostics);
        let totals = aggregate(
            company_id,
            &window,
            transactions,
            costs,
            revenues,
            &mut diagnostics,
        );
        let rollup = Rollup::accumulate(&tree, &totals, &mut diagnostics);

        let rows: Vec<CategoryRow> = tree
            .iter()
            .map(|node| {
                let entry = rollup.get(node.id()).copied().unwrap_or_default();
                CategoryRow {
                    id: node.id(),
                    name: node.category.name.clone(),
                    color: node.category.color.clone(),
                    parent_id: node.parent,
                    depth: node.depth,
                    self_total: entry.self_total.net(),
                    rolled_total: entry.rolled_total.net(),
                    rolled_inflow: entry.rolled_total.inflow,
                    rolled_outflow: entry.rolled_total.outflow,
                    occurrences: entry.self_total.count,
                    rolled_occurrences: entry.rolled_total.count,
                }
            })
            .collect();

        let grand = rollup.grand_total();
        let uncategorized = rollup.uncategorized();

        info!(
            "Report for {} over {}: net {}, {} categories, {} diagnostics",
            company_id,
            window,
            grand.net(),
            rows.len(),
            diagnostics.len()
        );

        Self {
            company_id,
            window_from: window.from(),
            window_to: window.to(),
            categories: rows,
            uncategorized: uncategorized.net(),
            uncategorized_occurrences: uncategorized.count,
            total_inflow: grand.inflow,
            total_outflow: grand.outflow,
            net: grand.net(),
            diagnostics,
        }
    }

    /// Sum of the rolled totals of every root category
    pub fn root_total(&self) -> Money {
        self.categories
            .iter()
            .filter(|row| row.depth == 0)
            .map(|row| row.rolled_total)
            .sum()
    }

    pub fn row(&self, id: CategoryId) -> Option<&CategoryRow> {
        self.categories.iter().find(|row| row.id == id)
    }

    /// The report's window
    pub fn window(&self) -> TreasuryResult<ReportWindow> {
        ReportWindow::new(self.window_from, self.window_to)
    }

    /// Format the report for terminal display with default settings
    pub fn format_terminal(&self) -> String {
        crate::display::format_report(self, &Settings::default())
    }

    /// Export the report to CSV: one line per category, then uncategorized and total
    pub fn export_csv<W: Write>(&self, writer: W) -> TreasuryResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record([
            "window_from",
            "window_to",
            "category_id",
            "category",
            "parent_id",
            "depth",
            "self_total",
            "rolled_total",
            "rolled_inflow",
            "rolled_outflow",
            "occurrences",
        ])?;

        let from = self.window_from.to_string();
        let to = self.window_to.to_string();

        for row in &self.categories {
            csv.write_record([
                from.clone(),
                to.clone(),
                row.id.as_uuid().to_string(),
                row.name.clone(),
                row.parent_id
                    .map(|p| p.as_uuid().to_string())
                    .unwrap_or_default(),
                row.depth.to_string(),
                decimal(row.self_total),
                decimal(row.rolled_total),
                decimal(row.rolled_inflow),
                decimal(row.rolled_outflow),
                row.occurrences.to_string(),
            ])?;
        }

        csv.write_record([
            from.clone(),
            to.clone(),
            String::new(),
            "UNCATEGORIZED".to_string(),
            String::new(),
            String::new(),
            decimal(self.uncategorized),
            decimal(self.uncategorized),
            String::new(),
            String::new(),
            self.uncategorized_occurrences.to_string(),
        ])?;

        csv.write_record([
            from,
            to,
            String::new(),
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            decimal(self.net),
            decimal(self.total_inflow),
            decimal(self.total_outflow),
            String::new(),
        ])?;

        csv.flush()
            .map_err(|e| TreasuryError::Export(e.to_string()))?;
        Ok(())
    }
}

fn decimal(amount: Money) -> String {
    format!("{:.2}", amount.to_decimal())
}

/// Build a report for `[from, to)`; fails with `EmptyWindow` when `to <= from`
pub fn build_report<R: LedgerRepository + ?Sized>(
    repo: &R,
    company_id: CompanyId,
    from: NaiveDate,
    to: NaiveDate,
) -> TreasuryResult<TreasuryReport> {
    let window = ReportWindow::new(from, to)?;
    TreasuryReport::generate(repo, company_id, window)
}

/// Every dated amount of a company inside a window, in canonical order
#[derive(Debug, Clone)]
pub struct ContributionListing {
    pub contributions: Vec<Contribution>,
    pub diagnostics: Diagnostics,
}

impl ContributionListing {
    pub fn generate<R: LedgerRepository + ?Sized>(
        repo: &R,
        company_id: CompanyId,
        window: ReportWindow,
    ) -> TreasuryResult<Self> {
        let transactions = repo.list_transactions(company_id, &window)?;
        let costs = repo.list_costs(company_id)?;
        let revenues = repo.list_revenues(company_id)?;

        let mut diagnostics = Diagnostics::new();
        let contributions = collect_contributions(
            company_id,
            &window,
            &transactions,
            &costs,
            &revenues,
            &mut diagnostics,
        );

        Ok(Self {
            contributions,
            diagnostics,
        })
    }

    /// Sum of every listed amount
    pub fn net(&self) -> Money {
        self.contributions.iter().map(|c| c.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Diagnostic;
    use crate::models::{Company, EntryKind, Frequency};
    use crate::storage::LedgerSnapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> (LedgerSnapshot, Company) {
        let acme = Company::new("Acme");
        let mut snapshot = LedgerSnapshot::default();
        snapshot.companies.push(acme.clone());
        (snapshot, acme)
    }

    #[test]
    fn test_operations_software_rollup() {
        let (mut snapshot, acme) = ledger();
        let operations = Category::new("Operations", acme.id);
        let software = Category::child_of("Software", acme.id, operations.id);
        snapshot.transactions.push(
            Transaction::new(acme.id, date(2024, 1, 5), Money::from_major(100))
                .in_category(operations.id),
        );
        snapshot.transactions.push(
            Transaction::new(acme.id, date(2024, 1, 6), Money::from_major(50))
                .in_category(software.id),
        );
        snapshot.categories.push(software.clone());
        snapshot.categories.push(operations.clone());

        let report = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 2, 1)).unwrap();

        let ops_row = report.row(operations.id).unwrap();
        assert_eq!(ops_row.rolled_total, Money::from_major(150));
        assert_eq!(ops_row.self_total, Money::from_major(100));
        assert_eq!(report.row(software.id).unwrap().rolled_total, Money::from_major(50));
        assert_eq!(report.row(software.id).unwrap().depth, 1);
        assert_eq!(report.categories[0].id, operations.id);
        assert_eq!(report.root_total(), Money::from_major(150));
        assert_eq!(report.net, Money::from_major(150));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_monthly_cost_over_a_quarter() {
        let (mut snapshot, acme) = ledger();
        snapshot.entries.push(MonetaryEntry::recurring(
            EntryKind::Cost,
            acme.id,
            "Rent",
            Money::from_major(1200),
            Frequency::Monthly,
            date(2024, 1, 15),
        ));

        let report = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 4, 1)).unwrap();

        assert_eq!(report.uncategorized, Money::from_major(-3600));
        assert_eq!(report.uncategorized_occurrences, 3);
        assert_eq!(report.total_outflow, Money::from_major(-3600));
        assert_eq!(report.total_inflow, Money::zero());
    }

    #[test]
    fn test_one_off_revenue_on_window_boundary() {
        let (mut snapshot, acme) = ledger();
        snapshot.entries.push(MonetaryEntry::revenue(
            acme.id,
            "Invoice",
            Money::from_major(500),
            date(2024, 2, 1),
        ));

        let january = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let february = build_report(&snapshot, acme.id, date(2024, 2, 1), date(2024, 3, 1)).unwrap();

        assert_eq!(january.net, Money::zero());
        assert_eq!(february.net, Money::from_major(500));
    }

    #[test]
    fn test_empty_window_is_fatal() {
        let (snapshot, acme) = ledger();
        let err = build_report(&snapshot, acme.id, date(2024, 2, 1), date(2024, 2, 1)).unwrap_err();
        assert!(err.is_empty_window());

        let err = build_report(&snapshot, acme.id, date(2024, 3, 1), date(2024, 2, 1)).unwrap_err();
        assert!(err.is_empty_window());
    }

    #[test]
    fn test_split_windows_add_up() {
        let (mut snapshot, acme) = ledger();
        let ops = Category::new("Operations", acme.id);
        snapshot.entries.push(
            MonetaryEntry::recurring(
                EntryKind::Cost,
                acme.id,
                "Hosting",
                Money::from_cents(4999),
                Frequency::Weekly,
                date(2023, 11, 29),
            )
            .in_category(ops.id),
        );
        snapshot.entries.push(MonetaryEntry::recurring(
            EntryKind::Revenue,
            acme.id,
            "Licence",
            Money::from_major(12000),
            Frequency::Annually,
            date(2020, 2, 29),
        ));
        snapshot.transactions.push(
            Transaction::new(acme.id, date(2024, 2, 15), Money::from_cents(-1234)).in_category(ops.id),
        );
        snapshot.categories.push(ops);

        let whole = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 7, 1)).unwrap();
        let first = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 2, 15)).unwrap();
        let second = build_report(&snapshot, acme.id, date(2024, 2, 15), date(2024, 7, 1)).unwrap();

        assert_eq!(whole.net, first.net + second.net);
        assert_eq!(whole.root_total(), first.root_total() + second.root_total());
        assert_eq!(whole.total_inflow, Money::from_major(12000));
    }

    #[test]
    fn test_cycle_does_not_break_report() {
        let (mut snapshot, acme) = ledger();
        let mut a = Category::new("A", acme.id);
        let b = Category::child_of("B", acme.id, a.id);
        a.parent_id = Some(b.id);
        let fine = Category::new("Fine", acme.id);
        snapshot.transactions.push(
            Transaction::new(acme.id, date(2024, 1, 3), Money::from_major(40)).in_category(b.id),
        );
        snapshot.transactions.push(
            Transaction::new(acme.id, date(2024, 1, 4), Money::from_major(2)).in_category(fine.id),
        );
        snapshot.categories.extend([a, b, fine.clone()]);

        let report = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 2, 1)).unwrap();

        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].id, fine.id);
        assert_eq!(report.net, Money::from_major(42));
        assert_eq!(report.root_total() + report.uncategorized, report.net);
        assert_eq!(
            report
                .diagnostics
                .count_where(|d| matches!(d, Diagnostic::CycleDetected { .. })),
            1
        );
    }

    #[test]
    fn test_records_of_other_companies_never_leak() {
        let (mut snapshot, acme) = ledger();
        let globex = Company::new("Globex");
        let globex_ops = Category::new("Operations", globex.id);
        let acme_child = Category::child_of("Stolen", acme.id, globex_ops.id);
        snapshot.transactions.push(
            Transaction::new(globex.id, date(2024, 1, 3), Money::from_major(99))
                .in_category(globex_ops.id),
        );
        snapshot.categories.extend([globex_ops, acme_child.clone()]);

        let report = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 2, 1)).unwrap();

        assert!(report.categories.is_empty());
        assert_eq!(report.net, Money::zero());
        assert!(report.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::CrossTenantReference { category_id, .. } if *category_id == acme_child.id
        )));
    }

    #[test]
    fn test_export_csv() {
        let (mut snapshot, acme) = ledger();
        let ops = Category::new("Operations, Global", acme.id);
        snapshot.transactions.push(
            Transaction::new(acme.id, date(2024, 1, 3), Money::from_cents(-1050)).in_category(ops.id),
        );
        snapshot.categories.push(ops);

        let report = build_report(&snapshot, acme.id, date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("window_from,window_to,category_id"));
        assert!(lines[1].contains("\"Operations, Global\""));
        assert!(lines[1].contains("-10.50"));
        assert!(lines[3].contains("TOTAL"));
    }

    #[test]
    fn test_contribution_listing_matches_report() {
        let (mut snapshot, acme) = ledger();
        snapshot.entries.push(MonetaryEntry::recurring(
            EntryKind::Revenue,
            acme.id,
            "Support plan",
            Money::from_major(30),
            Frequency::Daily,
            date(2024, 1, 25),
        ));
        snapshot.transactions.push(Transaction::new(
            acme.id,
            date(2024, 1, 2),
            Money::from_major(-5),
        ));
        let window = ReportWindow::month(2024, 1).unwrap();

        let listing = ContributionListing::generate(&snapshot, acme.id, window).unwrap();
        let report = TreasuryReport::generate(&snapshot, acme.id, window).unwrap();

        assert_eq!(listing.contributions.len(), 8);
        assert_eq!(listing.net(), report.net);
        assert_eq!(listing.contributions[0].date, date(2024, 1, 2));
    }
}
