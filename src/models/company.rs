//! Company model
//!
//! A company is the tenant boundary: every category, transaction, cost and
//! revenue belongs to exactly one company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CompanyId;

/// A tenant of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier
    pub id: CompanyId,

    /// Display name
    pub name: String,

    /// When the company was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
