//! Transaction model
//!
//! A transaction is an already realized ledger line. Its amount is signed
//! (positive for inflow, negative for outflow) and it is never expanded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, CompanyId, TransactionId};
use super::money::Money;

/// A realized financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Short description
    #[serde(default)]
    pub label: String,

    /// Amount (positive for inflow, negative for outflow)
    pub amount: Money,

    /// Value date
    pub date: NaiveDate,

    /// Category ID (None when uncategorized)
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Owning company
    pub company_id: CompanyId,

    /// When the transaction was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new uncategorized transaction
    pub fn new(company_id: CompanyId, date: NaiveDate, amount: Money) -> Self {
        Self {
            id: TransactionId::new(),
            label: String::new(),
            amount,
            date,
            category_id: None,
            company_id,
            created_at: Utc::now(),
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Attach to a category
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn is_inflow(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.label, self.amount)
    }
}
