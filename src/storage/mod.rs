//! Storage layer for the treasury dashboard
//!
//! JSON file storage with atomic writes, one file per entity kind. The report
//! engine only sees the [`LedgerRepository`] trait, implemented here by the
//! file-backed [`Storage`] and by the in-memory [`LedgerSnapshot`].

pub mod categories;
pub mod companies;
pub mod entries;
pub mod file_io;
pub mod snapshot;
pub mod transactions;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

pub use categories::CategoryRepository;
pub use companies::CompanyRepository;
pub use entries::EntryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use snapshot::LedgerSnapshot;
pub use transactions::TransactionRepository;

use crate::config::paths::TreasuryPaths;
use crate::error::TreasuryResult;
use crate::models::{Category, CompanyId, EntryKind, MonetaryEntry, ReportWindow, Transaction};
use crate::reports::{ReportCache, TreasuryReport};

/// Read access to one company's ledger
///
/// Implementations return records of the requested company only. The engine
/// still re-checks the company id of every record it is handed.
pub trait LedgerRepository {
    fn list_categories(&self, company_id: CompanyId) -> TreasuryResult<Vec<Category>>;

    /// Transactions dated inside `window`
    fn list_transactions(
        &self,
        company_id: CompanyId,
        window: &ReportWindow,
    ) -> TreasuryResult<Vec<Transaction>>;

    fn list_costs(&self, company_id: CompanyId) -> TreasuryResult<Vec<MonetaryEntry>>;

    fn list_revenues(&self, company_id: CompanyId) -> TreasuryResult<Vec<MonetaryEntry>>;
}

/// Counts of records written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub companies: usize,
    pub categories: usize,
    pub transactions: usize,
    pub entries: usize,
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TreasuryPaths,
    pub companies: CompanyRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub entries: EntryRepository,
    cache: ReportCache,
}

impl Storage {
    /// Create a storage rooted at `paths`, creating directories as needed
    pub fn new(paths: TreasuryPaths) -> TreasuryResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            companies: CompanyRepository::new(paths.companies_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            entries: EntryRepository::new(paths.entries_file()),
            cache: ReportCache::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &TreasuryPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> TreasuryResult<()> {
        self.companies.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        self.entries.load()?;
        self.cache.clear()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> TreasuryResult<()> {
        self.companies.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        self.entries.save()?;
        Ok(())
    }

    /// Merge a snapshot into the store and persist it.
    ///
    /// Records are upserted by id. Cached reports are dropped for every
    /// company the snapshot touches, and for every company a replaced record
    /// belonged to before the import.
    pub fn import_snapshot(&self, snapshot: &LedgerSnapshot) -> TreasuryResult<ImportSummary> {
        let mut touched: HashSet<CompanyId> = snapshot.touched_companies().into_iter().collect();

        for company in &snapshot.companies {
            self.companies.upsert(company.clone())?;
        }
        for category in &snapshot.categories {
            if let Some(previous) = self.categories.get(category.id)? {
                touched.insert(previous.company_id);
            }
            self.categories.upsert(category.clone())?;
        }
        for txn in &snapshot.transactions {
            if let Some(previous) = self.transactions.get(txn.id)? {
                touched.insert(previous.company_id);
            }
            self.transactions.upsert(txn.clone())?;
        }
        for entry in &snapshot.entries {
            if let Some(previous) = self.entries.get(entry.id)? {
                touched.insert(previous.company_id);
            }
            self.entries.upsert(entry.clone())?;
        }

        self.save_all()?;

        for company_id in touched {
            self.cache.invalidate_company(company_id)?;
        }

        let summary = ImportSummary {
            companies: snapshot.companies.len(),
            categories: snapshot.categories.len(),
            transactions: snapshot.transactions.len(),
            entries: snapshot.entries.len(),
        };
        info!(
            "Imported {} companies, {} categories, {} transactions, {} entries",
            summary.companies, summary.categories, summary.transactions, summary.entries
        );
        Ok(summary)
    }

    /// Report for one company and window, served from the cache when possible
    pub fn report(
        &self,
        company_id: CompanyId,
        window: ReportWindow,
    ) -> TreasuryResult<Arc<TreasuryReport>> {
        self.cache.get_or_build(self, company_id, window)
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// Whether settings were ever saved for this data directory
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

impl LedgerRepository for Storage {
    fn list_categories(&self, company_id: CompanyId) -> TreasuryResult<Vec<Category>> {
        self.categories.get_by_company(company_id)
    }

    fn list_transactions(
        &self,
        company_id: CompanyId,
        window: &ReportWindow,
    ) -> TreasuryResult<Vec<Transaction>> {
        self.transactions.get_in_window(company_id, window)
    }

    fn list_costs(&self, company_id: CompanyId) -> TreasuryResult<Vec<MonetaryEntry>> {
        self.entries.get_by_kind(company_id, EntryKind::Cost)
    }

    fn list_revenues(&self, company_id: CompanyId) -> TreasuryResult<Vec<MonetaryEntry>> {
        self.entries.get_by_kind(company_id, EntryKind::Revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TreasuryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_import_persists_and_reloads() {
        let (temp_dir, storage) = create_test_storage();
        let acme = Company::new("Acme");
        let mut snapshot = LedgerSnapshot::default();
        snapshot.companies.push(acme.clone());
        snapshot.entries.push(MonetaryEntry::cost(
            acme.id,
            "Audit",
            Money::from_major(900),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        ));

        let summary = storage.import_snapshot(&snapshot).unwrap();
        assert_eq!(summary.companies, 1);
        assert_eq!(summary.entries, 1);

        let paths = TreasuryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.list_costs(acme.id).unwrap().len(), 1);
        assert!(reopened.list_revenues(acme.id).unwrap().is_empty());
    }

    #[test]
    fn test_import_invalidates_cached_reports() {
        let (_temp_dir, storage) = create_test_storage();
        let acme = Company::new("Acme");
        let june = ReportWindow::month(2024, 6).unwrap();
        let mut snapshot = LedgerSnapshot::default();
        snapshot.companies.push(acme.clone());
        storage.import_snapshot(&snapshot).unwrap();

        let before = storage.report(acme.id, june).unwrap();
        assert_eq!(before.net, Money::zero());
        assert_eq!(storage.cache().len().unwrap(), 1);

        let mut update = LedgerSnapshot::default();
        update.transactions.push(Transaction::new(
            acme.id,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            Money::from_major(250),
        ));
        storage.import_snapshot(&update).unwrap();
        assert_eq!(storage.cache().len().unwrap(), 0);

        let after = storage.report(acme.id, june).unwrap();
        assert_eq!(after.net, Money::from_major(250));
    }

    #[test]
    fn test_moving_a_record_invalidates_its_old_company() {
        let (_temp_dir, storage) = create_test_storage();
        let acme = Company::new("Acme");
        let globex = Company::new("Globex");
        let june = ReportWindow::month(2024, 6).unwrap();

        let txn = Transaction::new(
            acme.id,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            Money::from_major(250),
        );
        let mut snapshot = LedgerSnapshot::default();
        snapshot.companies.push(acme.clone());
        snapshot.companies.push(globex.clone());
        snapshot.transactions.push(txn.clone());
        storage.import_snapshot(&snapshot).unwrap();

        let before = storage.report(acme.id, june).unwrap();
        assert_eq!(before.net, Money::from_major(250));

        let mut moved = txn;
        moved.company_id = globex.id;
        let mut update = LedgerSnapshot::default();
        update.transactions.push(moved);
        storage.import_snapshot(&update).unwrap();

        assert!(storage.cache().get(acme.id, &june).unwrap().is_none());
        assert_eq!(storage.report(acme.id, june).unwrap().net, Money::zero());
        assert_eq!(storage.report(globex.id, june).unwrap().net, Money::from_major(250));
    }
}
