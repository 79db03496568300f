//! Cost and revenue entries
//!
//! Costs and revenues share one shape, [`MonetaryEntry`]. The amount is a
//! magnitude; the [`EntryKind`] decides whether it flows in or out. An entry is
//! either a one-off dated by `start_date` or a recurring rule stepping by a
//! [`Frequency`] from `start_date` until `end_date` (inclusive) or forever.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, CompanyId, EntryId};
use super::money::Money;

/// Whether an entry is money going out or coming in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Cost,
    Revenue,
}

impl EntryKind {
    /// Apply the kind's direction to a magnitude
    pub fn signed(&self, amount: Money) -> Money {
        let magnitude = amount.abs();
        match self {
            Self::Cost => -magnitude,
            Self::Revenue => magnitude,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cost => write!(f, "Cost"),
            Self::Revenue => write!(f, "Revenue"),
        }
    }
}

/// Calendar step of a recurring entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Annually,
}

impl Frequency {
    pub fn all() -> &'static [Self] {
        &[Self::Daily, Self::Weekly, Self::Monthly, Self::Annually]
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Annually => write!(f, "Annually"),
        }
    }
}

/// A cost or revenue, one-off or recurring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonetaryEntry {
    /// Unique identifier
    pub id: EntryId,

    /// Cost or revenue
    pub kind: EntryKind,

    /// Short description
    #[serde(default)]
    pub label: String,

    /// Magnitude of a single occurrence
    pub amount: Money,

    /// Whether the entry repeats
    #[serde(default)]
    pub is_recurring: bool,

    /// Occurrence date for one-offs, first occurrence for recurring entries
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// First day no occurrence may land on (exclusive)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Step between occurrences (recurring entries only)
    #[serde(default)]
    pub frequency: Option<Frequency>,

    /// Category the amount is attached to
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Owning company
    pub company_id: CompanyId,

    /// When the entry was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MonetaryEntry {
    /// Create a one-off entry dated `date`
    pub fn one_off(
        kind: EntryKind,
        company_id: CompanyId,
        label: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: EntryId::new(),
            kind,
            label: label.into(),
            amount,
            is_recurring: false,
            start_date: Some(date),
            end_date: None,
            frequency: None,
            category_id: None,
            company_id,
            created_at: Utc::now(),
        }
    }

    /// Create an open-ended recurring entry starting at `start`
    pub fn recurring(
        kind: EntryKind,
        company_id: CompanyId,
        label: impl Into<String>,
        amount: Money,
        frequency: Frequency,
        start: NaiveDate,
    ) -> Self {
        Self {
            is_recurring: true,
            frequency: Some(frequency),
            ..Self::one_off(kind, company_id, label, amount, start)
        }
    }

    /// Shorthand for a one-off cost
    pub fn cost(company_id: CompanyId, label: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self::one_off(EntryKind::Cost, company_id, label, amount, date)
    }

    /// Shorthand for a one-off revenue
    pub fn revenue(
        company_id: CompanyId,
        label: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::one_off(EntryKind::Revenue, company_id, label, amount, date)
    }

    /// Attach to a category
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Stop recurring at `end` (exclusive)
    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// The amount of one occurrence with the kind's direction applied
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }
}

impl fmt::Display for MonetaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_recurring, self.frequency) {
            (true, Some(frequency)) => {
                write!(f, "{} {} ({}, {})", self.kind, self.label, self.amount, frequency)
            }
            _ => write!(f, "{} {} ({})", self.kind, self.label, self.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_signed_amount() {
        let company = CompanyId::new();
        let cost = MonetaryEntry::cost(company, "Rent", Money::from_major(1200), date(2024, 1, 1));
        let revenue =
            MonetaryEntry::revenue(company, "Sale", Money::from_major(500), date(2024, 1, 1));

        assert_eq!(cost.signed_amount(), Money::from_major(-1200));
        assert_eq!(revenue.signed_amount(), Money::from_major(500));
    }

    #[test]
    fn test_sign_ignores_stored_sign() {
        assert_eq!(
            EntryKind::Cost.signed(Money::from_major(-10)),
            Money::from_major(-10)
        );
        assert_eq!(
            EntryKind::Revenue.signed(Money::from_major(-10)),
            Money::from_major(10)
        );
    }

    #[test]
    fn test_recurring_builder() {
        let company = CompanyId::new();
        let category = CategoryId::new();
        let entry = MonetaryEntry::recurring(
            EntryKind::Cost,
            company,
            "Hosting",
            Money::from_major(50),
            Frequency::Monthly,
            date(2024, 1, 31),
        )
        .in_category(category)
        .until(date(2024, 12, 31));

        assert!(entry.is_recurring);
        assert_eq!(entry.frequency, Some(Frequency::Monthly));
        assert_eq!(entry.start_date, Some(date(2024, 1, 31)));
        assert_eq!(entry.end_date, Some(date(2024, 12, 31)));
        assert_eq!(entry.category_id, Some(category));
    }

    #[test]
    fn test_frequency_serialization() {
        assert_eq!(
            serde_json::to_string(&Frequency::Annually).unwrap(),
            "\"ANNUALLY\""
        );
        let parsed: Frequency = serde_json::from_str("\"WEEKLY\"").unwrap();
        assert_eq!(parsed, Frequency::Weekly);
    }

    #[test]
    fn test_deserialize_minimal_entry() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "kind": "cost",
            "amount": 1200,
            "is_recurring": true,
            "start_date": "2024-01-15",
            "frequency": "MONTHLY",
            "company_id": "550e8400-e29b-41d4-a716-446655440001"
        }"#;
        let entry: MonetaryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.amount, Money::from_major(1200));
        assert_eq!(entry.frequency, Some(Frequency::Monthly));
        assert!(entry.end_date.is_none());
        assert!(entry.category_id.is_none());
    }
}
