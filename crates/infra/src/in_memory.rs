//! In-memory store adapters.
//!
//! Intended for tests/dev and embedded use. Not optimized for performance;
//! `list_overlapping` is a full scan over the item's loans, which matches
//! the bounded, local-table assumption the engine makes.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use gearbook_core::{ItemId, LoanId, RepairId};
use gearbook_inventory::{Item, RepairBlock};
use gearbook_loans::{ItemStore, Loan, LoanPeriod, LoanStore, RepairStore};

/// Item catalog. Items are managed externally, so the trait surface is
/// read-only; the inherent `put`/`remove` are the external management hooks.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, item: Item) {
        let mut items = self
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        items.insert(item.id_typed(), item);
    }

    pub fn remove(&self, id: ItemId) -> bool {
        let mut items = self
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        items.remove(&id).is_some()
    }
}

impl ItemStore for InMemoryItemStore {
    fn get(&self, id: ItemId) -> Option<Item> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.get(&id).cloned()
    }
}

/// Loan table. Only the engine writes through the trait.
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    loans: RwLock<HashMap<LoanId, Loan>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        let loans = self.loans.read().unwrap_or_else(PoisonError::into_inner);
        loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LoanStore for InMemoryLoanStore {
    fn get(&self, id: LoanId) -> Option<Loan> {
        let loans = self.loans.read().unwrap_or_else(PoisonError::into_inner);
        loans.get(&id).cloned()
    }

    fn list_overlapping(
        &self,
        item_id: ItemId,
        window: &LoanPeriod,
        exclude: Option<LoanId>,
    ) -> Vec<Loan> {
        let loans = self.loans.read().unwrap_or_else(PoisonError::into_inner);
        loans
            .values()
            .filter(|loan| loan.item_id() == item_id)
            .filter(|loan| Some(loan.id_typed()) != exclude)
            .filter(|loan| loan.effective_period().overlaps(window))
            .cloned()
            .collect()
    }

    fn insert(&self, loan: Loan) {
        let mut loans = self
            .loans
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        loans.insert(loan.id_typed(), loan);
    }

    fn update(&self, loan: Loan) -> bool {
        let mut loans = self
            .loans
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match loans.get_mut(&loan.id_typed()) {
            Some(slot) => {
                *slot = loan;
                true
            }
            None => false,
        }
    }

    fn delete(&self, id: LoanId) -> bool {
        let mut loans = self
            .loans
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        loans.remove(&id).is_some()
    }
}

/// Open repair blocks. Managed by the repair workflow; the engine only
/// reads, with no date filter by design.
#[derive(Debug, Default)]
pub struct InMemoryRepairStore {
    blocks: RwLock<HashMap<RepairId, RepairBlock>>,
}

impl InMemoryRepairStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, block: RepairBlock) {
        let mut blocks = self
            .blocks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        blocks.insert(block.id_typed(), block);
    }

    pub fn close(&self, id: RepairId) -> bool {
        let mut blocks = self
            .blocks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        blocks.remove(&id).is_some()
    }
}

impl RepairStore for InMemoryRepairStore {
    fn list_open(&self, item_id: ItemId) -> Vec<RepairBlock> {
        let blocks = self.blocks.read().unwrap_or_else(PoisonError::into_inner);
        blocks
            .values()
            .filter(|block| block.item_id() == item_id)
            .cloned()
            .collect()
    }
}
