//! Company repository for JSON storage
//!
//! Manages loading and saving companies to companies.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{Company, CompanyId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CompanyData {
    companies: Vec<Company>,
}

/// Repository for company persistence
pub struct CompanyRepository {
    path: PathBuf,
    data: RwLock<HashMap<CompanyId, Company>>,
}

impl CompanyRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load companies from disk
    pub fn load(&self) -> TreasuryResult<()> {
        let file_data: CompanyData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for company in file_data.companies {
            data.insert(company.id, company);
        }

        Ok(())
    }

    /// Save companies to disk
    pub fn save(&self) -> TreasuryResult<()> {
        let companies = self.get_all()?;
        write_json_atomic(&self.path, &CompanyData { companies })
    }

    pub fn get(&self, id: CompanyId) -> TreasuryResult<Option<Company>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All companies ordered by name
    pub fn get_all(&self) -> TreasuryResult<Vec<Company>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = data.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Case-insensitive lookup by name
    pub fn get_by_name(&self, name: &str) -> TreasuryResult<Option<Company>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Find a company by full id, short display id ("co-1234abcd") or name
    pub fn find(&self, identifier: &str) -> TreasuryResult<Option<Company>> {
        if let Ok(id) = identifier.parse::<CompanyId>() {
            if let Some(company) = self.get(id)? {
                return Ok(Some(company));
            }
        }

        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        if let Some(company) = data.values().find(|c| c.id.to_string() == identifier) {
            return Ok(Some(company.clone()));
        }
        drop(data);

        self.get_by_name(identifier)
    }

    pub fn upsert(&self, company: Company) -> TreasuryResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(company.id, company);
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
