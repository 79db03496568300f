//! Ledger snapshots
//!
//! A snapshot is a whole ledger in one JSON or YAML document: companies,
//! categories, transactions and cost/revenue entries. It is the import format
//! of the file store and doubles as an in-memory [`LedgerRepository`].

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{
    Category, Company, CompanyId, EntryKind, MonetaryEntry, ReportWindow, Transaction,
};

use super::LedgerRepository;

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";

fn default_schema_version() -> String {
    SNAPSHOT_SCHEMA_VERSION.to_string()
}

/// A complete ledger document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Schema version for compatibility checking
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// When the snapshot was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub companies: Vec<Company>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// Costs and revenues
    #[serde(default)]
    pub entries: Vec<MonetaryEntry>,
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            exported_at: None,
            companies: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl LedgerSnapshot {
    /// Parse a JSON snapshot
    pub fn from_json_str(json: &str) -> TreasuryResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| TreasuryError::Import(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Parse a YAML snapshot
    pub fn from_yaml_str(yaml: &str) -> TreasuryResult<Self> {
        let snapshot: Self =
            serde_yaml::from_str(yaml).map_err(|e| TreasuryError::Import(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Read a snapshot file; `.yaml`/`.yml` is parsed as YAML, anything else as JSON
    pub fn load(path: &Path) -> TreasuryResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TreasuryError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Check the document can be read by this version.
    ///
    /// Only the schema version is checked. Broken parent links, foreign
    /// records and unusable recurrence rules are reported per report instead.
    pub fn validate(&self) -> TreasuryResult<()> {
        if self.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(TreasuryError::Import(format!(
                "Schema version mismatch: expected {}, got {}",
                SNAPSHOT_SCHEMA_VERSION, self.schema_version
            )));
        }
        Ok(())
    }

    /// Serialize as pretty JSON
    pub fn to_json_string(&self) -> TreasuryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Companies referenced by any record, in first-seen order
    pub fn touched_companies(&self) -> Vec<CompanyId> {
        let mut seen = Vec::new();
        let ids = self
            .companies
            .iter()
            .map(|c| c.id)
            .chain(self.categories.iter().map(|c| c.company_id))
            .chain(self.transactions.iter().map(|t| t.company_id))
            .chain(self.entries.iter().map(|e| e.company_id));
        for id in ids {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    fn entries_of(&self, company_id: CompanyId, kind: EntryKind) -> Vec<MonetaryEntry> {
        self.entries
            .iter()
            .filter(|e| e.company_id == company_id && e.kind == kind)
            .cloned()
            .collect()
    }
}

impl LedgerRepository for LedgerSnapshot {
    fn list_categories(&self, company_id: CompanyId) -> TreasuryResult<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect())
    }

    fn list_transactions(
        &self,
        company_id: CompanyId,
        window: &ReportWindow,
    ) -> TreasuryResult<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.company_id == company_id && window.contains(t.date))
            .cloned()
            .collect())
    }

    fn list_costs(&self, company_id: CompanyId) -> TreasuryResult<Vec<MonetaryEntry>> {
        Ok(self.entries_of(company_id, EntryKind::Cost))
    }

    fn list_revenues(&self, company_id: CompanyId) -> TreasuryResult<Vec<MonetaryEntry>> {
        Ok(self.entries_of(company_id, EntryKind::Revenue))
    }
}
