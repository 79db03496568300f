//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. The repository
//! stores whatever it is given; parent links are only checked when a tree is
//! built for a report.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{Category, CategoryId, CompanyId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> TreasuryResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> TreasuryResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| {
            a.company_id
                .cmp(&b.company_id)
                .then_with(|| a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });

        write_json_atomic(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> TreasuryResult<Option<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Every category of one company
    pub fn get_by_company(&self, company_id: CompanyId) -> TreasuryResult<Vec<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = data
            .values()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    pub fn upsert(&self, category: Category) -> TreasuryResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(category.id, category);
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
