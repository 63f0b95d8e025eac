//! Contracts with the three collaborator stores.
//!
//! The engine does not own persistence; it reads items and repair blocks,
//! and reads/writes loans, through these traits. Implementations live in
//! the infrastructure layer. All operations are synchronous and bounded
//! (local table scans at worst).

use gearbook_core::{ItemId, LoanId};
use gearbook_inventory::{Item, RepairBlock};

use crate::loan::Loan;
use crate::period::LoanPeriod;

/// Read access to the item catalog (managed externally).
pub trait ItemStore: Send + Sync {
    fn get(&self, id: ItemId) -> Option<Item>;
}

/// Read/write access to the loan table. Only the engine writes.
pub trait LoanStore: Send + Sync {
    fn get(&self, id: LoanId) -> Option<Loan>;

    /// Loans for `item_id` whose effective period overlaps `window`,
    /// excluding `exclude` (used when re-validating an update against
    /// itself).
    fn list_overlapping(
        &self,
        item_id: ItemId,
        window: &LoanPeriod,
        exclude: Option<LoanId>,
    ) -> Vec<Loan>;

    fn insert(&self, loan: Loan);

    /// Replace a stored loan. Returns `false` when no row with that id
    /// exists.
    fn update(&self, loan: Loan) -> bool;

    /// Remove a loan. Returns whether a row existed.
    fn delete(&self, id: LoanId) -> bool;
}

/// Read access to open repair blocks (managed externally).
///
/// Deliberately unfiltered by date: repair rows carry no time bounds, so
/// every open row blocks every queried interval.
pub trait RepairStore: Send + Sync {
    fn list_open(&self, item_id: ItemId) -> Vec<RepairBlock>;
}
