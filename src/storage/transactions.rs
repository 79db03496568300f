//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with a
//! per-company index so report queries don't scan other tenants.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{CompanyId, ReportWindow, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a company index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: company_id -> transaction_ids
    by_company: RwLock<HashMap<CompanyId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_company: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> TreasuryResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_company = self
            .by_company
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_company.clear();

        for txn in file_data.transactions {
            by_company.entry(txn.company_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, ordered by date
    pub fn save(&self) -> TreasuryResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> TreasuryResult<Option<Transaction>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Transactions of a company dated inside `window`, ordered by date
    pub fn get_in_window(
        &self,
        company_id: CompanyId,
        window: &ReportWindow,
    ) -> TreasuryResult<Vec<Transaction>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_company = self
            .by_company
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = by_company
            .get(&company_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.get(id))
            .filter(|txn| window.contains(txn.date))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Insert or replace a transaction, keeping the index in step
    pub fn upsert(&self, txn: Transaction) -> TreasuryResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_company = self
            .by_company
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_company.get_mut(&old.company_id) {
                ids.retain(|id| *id != txn.id);
            }
        }

        by_company.entry(txn.company_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    pub fn count(&self) -> TreasuryResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
