//! Report window
//!
//! A window is the half-open date range `[from, to)` a report covers: the
//! first day is included, the last day is not. Windows are only ever built
//! through constructors that reject empty ranges.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::error::{TreasuryError, TreasuryResult};

/// Half-open reporting range `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReportWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl ReportWindow {
    /// Create a window, rejecting `to <= from`
    pub fn new(from: NaiveDate, to: NaiveDate) -> TreasuryResult<Self> {
        if to <= from {
            return Err(TreasuryError::EmptyWindow { from, to });
        }
        Ok(Self { from, to })
    }

    /// The calendar month `year-month`
    pub fn month(year: i32, month: u32) -> TreasuryResult<Self> {
        let from = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            TreasuryError::Validation(format!("Invalid month: {}-{:02}", year, month))
        })?;
        let to = from
            .checked_add_months(Months::new(1))
            .ok_or_else(|| TreasuryError::Validation(format!("Month out of range: {}", from)))?;
        Self::new(from, to)
    }

    /// The calendar year `year`
    pub fn year(year: i32) -> TreasuryResult<Self> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| TreasuryError::Validation(format!("Invalid year: {}", year)))?;
        let to = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| TreasuryError::Validation(format!("Year out of range: {}", year)))?;
        Self::new(from, to)
    }

    /// Parse "YYYY-MM" into a month window or "YYYY" into a year window
    pub fn parse_period(s: &str) -> TreasuryResult<Self> {
        let s = s.trim();
        let invalid = || {
            TreasuryError::Validation(format!(
                "Invalid period: {}. Use YYYY-MM or YYYY",
                s
            ))
        };

        match s.split_once('-') {
            Some((year, month)) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                Self::month(year, month)
            }
            None => {
                let year: i32 = s.parse().map_err(|_| invalid())?;
                Self::year(year)
            }
        }
    }

    /// First day of the window (inclusive)
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Day after the window (exclusive)
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Check whether a date falls inside `[from, to)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date < self.to
    }

    /// Number of days covered
    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Split into `[from, at)` and `[at, to)`; `None` when either half would be empty
    pub fn split_at(&self, at: NaiveDate) -> Option<(Self, Self)> {
        if !self.contains(at) || at == self.from {
            return None;
        }
        Some((
            Self { from: self.from, to: at },
            Self { from: at, to: self.to },
        ))
    }

    /// Whether the window is exactly one calendar month
    pub fn is_calendar_month(&self) -> bool {
        self.from.day() == 1 && self.from.checked_add_months(Months::new(1)) == Some(self.to)
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}
