//! Reservation Mutator.
//!
//! The only component allowed to write loans. Every mutation re-derives
//! availability and validates first, and the validate-then-write pair runs
//! under a per-item advisory lock so concurrent callers cannot both take
//! the last unit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};

use gearbook_core::{DomainError, DomainResult, ItemId, LoanId};

use crate::availability::AvailabilityReport;
use crate::loan::{Loan, LoanPatch, LoanProposal, LoanRecord};
use crate::period::LoanPeriod;
use crate::store::{ItemStore, LoanStore, RepairStore};
use crate::validate;

/// Per-item serialization points.
///
/// One mutex per item id, created lazily and never dropped; the registry
/// grows with the number of distinct items ever mutated, which is bounded
/// by the catalog size.
#[derive(Default)]
struct ItemLocks {
    inner: Mutex<HashMap<ItemId, Arc<Mutex<()>>>>,
}

impl ItemLocks {
    fn for_item(&self, item_id: ItemId) -> Arc<Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(item_id).or_default().clone()
    }
}

/// The loan engine: availability queries plus the four mutations.
pub struct LoanEngine {
    items: Arc<dyn ItemStore>,
    loans: Arc<dyn LoanStore>,
    repairs: Arc<dyn RepairStore>,
    locks: ItemLocks,
}

impl LoanEngine {
    pub fn new(
        items: Arc<dyn ItemStore>,
        loans: Arc<dyn LoanStore>,
        repairs: Arc<dyn RepairStore>,
    ) -> Self {
        Self {
            items,
            loans,
            repairs,
            locks: ItemLocks::default(),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Read-only availability snapshot for an item over a window.
    pub fn query_availability(
        &self,
        item_id: ItemId,
        window: &LoanPeriod,
        exclude: Option<LoanId>,
    ) -> DomainResult<AvailabilityReport> {
        crate::availability::query(
            self.items.as_ref(),
            self.loans.as_ref(),
            self.repairs.as_ref(),
            item_id,
            window,
            exclude,
        )
    }

    /// Validate and persist a new reservation.
    pub fn create(&self, proposal: LoanProposal) -> DomainResult<LoanRecord> {
        let lock = self.locks.for_item(proposal.item_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        validate::validate(
            self.items.as_ref(),
            self.loans.as_ref(),
            self.repairs.as_ref(),
            &proposal,
            None,
        )?;

        let loan = Loan::from_proposal(LoanId::new(), proposal);
        self.loans.insert(loan.clone());
        tracing::info!(
            "Created loan {} for item {} ({} unit(s))",
            loan.id_typed(),
            loan.item_id(),
            loan.quantity()
        );
        Ok(LoanRecord::derive(loan, Self::today()))
    }

    /// Merge a patch over an existing loan and persist it after
    /// re-validation that excludes the loan itself.
    pub fn update(&self, loan_id: LoanId, patch: LoanPatch) -> DomainResult<LoanRecord> {
        let existing = self.loans.get(loan_id).ok_or(DomainError::NotFound)?;
        let lock = self.locks.for_item(existing.item_id());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Re-read under the lock: another caller may have written between
        // the lookup above and the lock acquisition.
        let mut loan = self.loans.get(loan_id).ok_or(DomainError::NotFound)?;
        loan.apply_patch(patch);

        validate::validate(
            self.items.as_ref(),
            self.loans.as_ref(),
            self.repairs.as_ref(),
            &loan.to_proposal(),
            Some(loan_id),
        )?;

        if !self.loans.update(loan.clone()) {
            return Err(DomainError::NotFound);
        }
        tracing::info!("Updated loan {}", loan_id);
        Ok(LoanRecord::derive(loan, Self::today()))
    }

    /// Set the return date on a loan.
    ///
    /// No availability re-check: closing can only increase availability.
    pub fn close(&self, loan_id: LoanId, return_date: Option<NaiveDate>) -> DomainResult<LoanRecord> {
        let return_date = return_date.ok_or(DomainError::MissingReturnDate)?;
        let existing = self.loans.get(loan_id).ok_or(DomainError::NotFound)?;
        let lock = self.locks.for_item(existing.item_id());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut loan = self.loans.get(loan_id).ok_or(DomainError::NotFound)?;
        loan.mark_returned(return_date);
        if !self.loans.update(loan.clone()) {
            return Err(DomainError::NotFound);
        }
        tracing::info!("Closed loan {} (returned {})", loan_id, return_date);
        Ok(LoanRecord::derive(loan, Self::today()))
    }

    /// Remove a loan unconditionally. Returns whether a row existed.
    pub fn delete(&self, loan_id: LoanId) -> bool {
        let deleted = self.loans.delete(loan_id);
        if deleted {
            tracing::info!("Deleted loan {}", loan_id);
        } else {
            tracing::debug!("Delete requested for unknown loan {}", loan_id);
        }
        deleted
    }
}
