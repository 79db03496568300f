//! Recurrence expander
//!
//! Expands a cost/revenue entry into the dated occurrences that fall inside a
//! report window. All calendar arithmetic lives in [`nth_occurrence`]: the
//! n-th date is always computed from the anchor (the start date), never from
//! the previous occurrence, so a rule anchored on Jan 31 lands on Feb 28/29,
//! Mar 31, Apr 30 and so on instead of drifting to the 28th.
//!
//! The window is half-open (`from` included, `to` excluded), and so is the
//! rule's active range: occurrences land in `[start_date, end_date)`.

use std::iter::FusedIterator;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::models::{Frequency, MonetaryEntry, Money, ReportWindow};

use super::diagnostics::RuleViolation;

/// One concrete dated instance of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    /// Magnitude of the entry, unchanged (no pro-rating)
    pub amount: Money,
}

/// The date of the `n`-th occurrence of a rule anchored at `anchor`.
///
/// Month and year steps clamp to the last valid day of the target month.
/// Returns `None` when the date would leave chrono's supported range.
pub fn nth_occurrence(anchor: NaiveDate, frequency: Frequency, n: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => anchor.checked_add_days(Days::new(u64::from(n))),
        Frequency::Weekly => anchor.checked_add_days(Days::new(u64::from(n) * 7)),
        Frequency::Monthly => anchor.checked_add_months(Months::new(n)),
        Frequency::Annually => n
            .checked_mul(12)
            .and_then(|months| anchor.checked_add_months(Months::new(months))),
    }
}

/// A validated recurring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    anchor: NaiveDate,
    frequency: Frequency,
    until: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Create a rule; `until` is the last day an occurrence may land on
    pub fn new(
        anchor: NaiveDate,
        frequency: Frequency,
        until: Option<NaiveDate>,
    ) -> Result<Self, RuleViolation> {
        if matches!(until, Some(end) if end < anchor) {
            return Err(RuleViolation::EndBeforeStart);
        }
        Ok(Self {
            anchor,
            frequency,
            until,
        })
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    /// The `n`-th occurrence date (0 is the anchor)
    pub fn nth(&self, n: u32) -> Option<NaiveDate> {
        nth_occurrence(self.anchor, self.frequency, n)
    }

    /// Smallest index whose date is on or after `date`
    fn first_index_on_or_after(&self, date: NaiveDate) -> Option<u32> {
        if date <= self.anchor {
            return Some(0);
        }

        let days = (date - self.anchor).num_days();
        let mut index = match self.frequency {
            Frequency::Daily => return u32::try_from(days).ok(),
            Frequency::Weekly => return u32::try_from((days + 6) / 7).ok(),
            Frequency::Monthly => months_between(self.anchor, date).saturating_sub(1),
            Frequency::Annually => {
                (i64::from(date.year()) - i64::from(self.anchor.year())).saturating_sub(1)
            }
        };
        index = index.max(0);

        // The estimate undershoots by at most two steps because of clamping.
        let mut index = u32::try_from(index).ok()?;
        while self.nth(index)? < date {
            index = index.checked_add(1)?;
        }
        Some(index)
    }
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    years * 12 + months
}

/// When an entry produces occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A one-off dated entry
    Once(NaiveDate),
    /// A recurring rule
    Recurring(RecurrenceRule),
}

impl Schedule {
    /// Derive the schedule of an entry, rejecting incomplete rules
    pub fn from_entry(entry: &MonetaryEntry) -> Result<Self, RuleViolation> {
        let start = entry.start_date.ok_or(RuleViolation::MissingStartDate)?;
        if !entry.is_recurring {
            return Ok(Self::Once(start));
        }
        let frequency = entry.frequency.ok_or(RuleViolation::MissingFrequency)?;
        RecurrenceRule::new(start, frequency, entry.end_date).map(Self::Recurring)
    }

    /// Lazily list the occurrence dates inside `window`
    pub fn dates(&self, window: &ReportWindow) -> OccurrenceDates {
        let state = match *self {
            Self::Once(date) => DatesState::Once(Some(date).filter(|d| window.contains(*d))),
            Self::Recurring(rule) => {
                let no_overlap = rule.anchor >= window.to()
                    || matches!(rule.until, Some(end) if end <= window.from());
                if no_overlap {
                    DatesState::Done
                } else {
                    match rule.first_index_on_or_after(window.from()) {
                        Some(index) => DatesState::Stepping {
                            rule,
                            index,
                            window_to: window.to(),
                        },
                        None => DatesState::Done,
                    }
                }
            }
        };
        OccurrenceDates { state }
    }
}

#[derive(Debug, Clone)]
enum DatesState {
    Once(Option<NaiveDate>),
    Stepping {
        rule: RecurrenceRule,
        index: u32,
        window_to: NaiveDate,
    },
    Done,
}

/// Iterator over the occurrence dates of a [`Schedule`] inside a window
#[derive(Debug, Clone)]
pub struct OccurrenceDates {
    state: DatesState,
}

impl Iterator for OccurrenceDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match &mut self.state {
            DatesState::Once(slot) => {
                let date = slot.take();
                self.state = DatesState::Done;
                date
            }
            DatesState::Stepping {
                rule,
                index,
                window_to,
            } => {
                let date = match rule.nth(*index) {
                    Some(date) if date < *window_to => date,
                    _ => {
                        self.state = DatesState::Done;
                        return None;
                    }
                };
                if matches!(rule.until, Some(end) if date >= end) {
                    self.state = DatesState::Done;
                    return None;
                }
                match index.checked_add(1) {
                    Some(next) => *index = next,
                    None => self.state = DatesState::Done,
                }
                Some(date)
            }
            DatesState::Done => None,
        }
    }
}

impl FusedIterator for OccurrenceDates {}

/// Iterator over the occurrences of one entry inside a window
#[derive(Debug, Clone)]
pub struct Occurrences {
    dates: OccurrenceDates,
    amount: Money,
}

impl Iterator for Occurrences {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        self.dates.next().map(|date| Occurrence {
            date,
            amount: self.amount,
        })
    }
}

impl FusedIterator for Occurrences {}

/// Expand an entry (one-off or recurring) into its occurrences inside `window`
pub fn expand(entry: &MonetaryEntry, window: &ReportWindow) -> Result<Occurrences, RuleViolation> {
    let schedule = Schedule::from_entry(entry)?;
    Ok(Occurrences {
        dates: schedule.dates(window),
        amount: entry.amount,
    })
}

/// Number of occurrences of an entry inside `window`
pub fn count_in_window(entry: &MonetaryEntry, window: &ReportWindow) -> Result<usize, RuleViolation> {
    Ok(Schedule::from_entry(entry)?.dates(window).count())
}
