//! Category model
//!
//! Categories form a per-company hierarchy through an optional parent
//! reference. The reference is a plain id; resolving it into a tree is the job
//! of [`crate::engine::CategoryTree`], which also copes with malformed data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, CompanyId};

fn default_color() -> String {
    "#9e9e9e".to_string()
}

/// A bookkeeping category owned by a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Display color (hex string, e.g. "#ff8800")
    #[serde(default = "default_color")]
    pub color: String,

    /// Owning company
    pub company_id: CompanyId,

    /// Parent category, `None` for a root
    #[serde(default)]
    pub parent_id: Option<CategoryId>,

    /// When the category was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new root category
    pub fn new(name: impl Into<String>, company_id: CompanyId) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: default_color(),
            company_id,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new subcategory under `parent_id`
    pub fn child_of(name: impl Into<String>, company_id: CompanyId, parent_id: CategoryId) -> Self {
        let mut category = Self::new(name, company_id);
        category.parent_id = Some(parent_id);
        category
    }

    /// Set the display color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Whether the category has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Re-parent the category (or make it a root with `None`)
    pub fn move_to(&mut self, parent_id: Option<CategoryId>) {
        self.parent_id = parent_id;
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
