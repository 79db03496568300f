//! Cost and revenue repository for JSON storage
//!
//! Both kinds live in entries.json; the `kind` field tells them apart.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{CompanyId, EntryId, EntryKind, MonetaryEntry};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<MonetaryEntry>,
}

/// Repository for cost and revenue persistence
pub struct EntryRepository {
    path: PathBuf,
    data: RwLock<HashMap<EntryId, MonetaryEntry>>,
}

impl EntryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk
    pub fn load(&self) -> TreasuryResult<()> {
        let file_data: EntryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for entry in file_data.entries {
            data.insert(entry.id, entry);
        }

        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> TreasuryResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| {
            a.company_id
                .cmp(&b.company_id)
                .then(a.kind.cmp(&b.kind))
                .then(a.id.cmp(&b.id))
        });

        write_json_atomic(&self.path, &EntryData { entries })
    }

    pub fn get(&self, id: EntryId) -> TreasuryResult<Option<MonetaryEntry>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Entries of one kind for one company, ordered by id
    pub fn get_by_kind(
        &self,
        company_id: CompanyId,
        kind: EntryKind,
    ) -> TreasuryResult<Vec<MonetaryEntry>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = data
            .values()
            .filter(|e| e.company_id == company_id && e.kind == kind)
            .cloned()
            .collect();
        list.sort_by_key(|e| e.id);
        Ok(list)
    }

    pub fn upsert(&self, entry: MonetaryEntry) -> TreasuryResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(entry.id, entry);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_kinds_are_kept_apart() {
        let temp_dir = TempDir::new().unwrap();
        let repo = EntryRepository::new(temp_dir.path().join("entries.json"));
        let acme = CompanyId::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        repo.upsert(MonetaryEntry::recurring(
            EntryKind::Cost,
            acme,
            "Rent",
            Money::from_major(1200),
            Frequency::Monthly,
            start,
        ))
        .unwrap();
        repo.upsert(MonetaryEntry::revenue(acme, "Invoice", Money::from_major(500), start))
            .unwrap();
        repo.upsert(MonetaryEntry::cost(CompanyId::new(), "Other", Money::from_major(1), start))
            .unwrap();

        let costs = repo.get_by_kind(acme, EntryKind::Cost).unwrap();
        let revenues = repo.get_by_kind(acme, EntryKind::Revenue).unwrap();
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].label, "Rent");
        assert_eq!(revenues.len(), 1);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_save_and_reload_keeps_rule() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entries.json");
        let acme = CompanyId::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let entry = MonetaryEntry::recurring(
            EntryKind::Revenue,
            acme,
            "Retainer",
            Money::from_cents(250_050),
            Frequency::Monthly,
            start,
        )
        .until(end);

        let repo = EntryRepository::new(path.clone());
        repo.upsert(entry.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = EntryRepository::new(path);
        reloaded.load().unwrap();
        let loaded = reloaded.get(entry.id).unwrap().unwrap();
        assert_eq!(loaded.frequency, Some(Frequency::Monthly));
        assert_eq!(loaded.end_date, Some(end));
        assert_eq!(loaded.amount, Money::from_cents(250_050));
    }
}
