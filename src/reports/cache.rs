//! Report cache
//!
//! Finished reports keyed by company and window. Entries never expire on
//! their own; whoever writes a company's ledger must drop that company's
//! entries with [`ReportCache::invalidate_company`].
//!
//! Every invalidation bumps the company's generation. A report is only stored
//! if the generation it was built under is still current, so a build that
//! overlaps a write never outlives it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{TreasuryError, TreasuryResult};
use crate::models::{CompanyId, ReportWindow};
use crate::storage::LedgerRepository;

use super::treasury::TreasuryReport;

type CacheKey = (CompanyId, NaiveDate, NaiveDate);

fn key(company_id: CompanyId, window: &ReportWindow) -> CacheKey {
    (company_id, window.from(), window.to())
}

#[derive(Debug, Default)]
struct CacheState {
    reports: HashMap<CacheKey, Arc<TreasuryReport>>,
    generations: HashMap<CompanyId, u64>,
    // Bumped by `clear`, which invalidates every company at once
    epoch: u64,
}

impl CacheState {
    fn generation(&self, company_id: CompanyId) -> (u64, u64) {
        let company = self.generations.get(&company_id).copied().unwrap_or(0);
        (self.epoch, company)
    }
}

/// Shared cache of built reports
#[derive(Debug, Default)]
pub struct ReportCache {
    state: RwLock<CacheState>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        company_id: CompanyId,
        window: &ReportWindow,
    ) -> TreasuryResult<Option<Arc<TreasuryReport>>> {
        let state = self
            .state
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(state.reports.get(&key(company_id, window)).cloned())
    }

    /// Return the cached report or build, store and return a fresh one.
    ///
    /// The build runs without holding the lock. If the company is invalidated
    /// meanwhile, the fresh report is returned but not stored.
    pub fn get_or_build<R: LedgerRepository + ?Sized>(
        &self,
        repo: &R,
        company_id: CompanyId,
        window: ReportWindow,
    ) -> TreasuryResult<Arc<TreasuryReport>> {
        let generation = {
            let state = self
                .state
                .read()
                .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;
            if let Some(report) = state.reports.get(&key(company_id, &window)) {
                debug!("Report cache hit for {} {}", company_id, window);
                return Ok(Arc::clone(report));
            }
            state.generation(company_id)
        };

        let report = Arc::new(TreasuryReport::generate(repo, company_id, window)?);

        let mut state = self
            .state
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        if state.generation(company_id) == generation {
            state.reports.insert(key(company_id, &window), Arc::clone(&report));
        } else {
            debug!(
                "Ledger of {} changed while building {}; not caching",
                company_id, window
            );
        }

        Ok(report)
    }

    /// Drop every cached report of a company; returns how many were dropped
    pub fn invalidate_company(&self, company_id: CompanyId) -> TreasuryResult<usize> {
        let mut state = self
            .state
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *state.generations.entry(company_id).or_insert(0) += 1;

        let before = state.reports.len();
        state.reports.retain(|(company, _, _), _| *company != company_id);
        let dropped = before - state.reports.len();

        if dropped > 0 {
            debug!("Dropped {} cached reports for {}", dropped, company_id);
        }
        Ok(dropped)
    }

    /// Drop every cached report
    pub fn clear(&self) -> TreasuryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        state.epoch += 1;
        state.reports.clear();
        Ok(())
    }

    pub fn len(&self) -> TreasuryResult<usize> {
        let state = self
            .state
            .read()
            .map_err(|e| TreasuryError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(state.reports.len())
    }

    pub fn is_empty(&self) -> TreasuryResult<bool> {
        Ok(self.len()? == 0)
    }
}
