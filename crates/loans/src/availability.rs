//! Availability Calculator.
//!
//! Reduces the item roster, every overlapping loan, and every open repair
//! block into one occupancy snapshot for a query window. Pure: same store
//! state and window, same report; no side effects.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gearbook_core::{DomainError, DomainResult, ItemId, LoanId};
use gearbook_inventory::{Item, RepairBlock, RepairScope};

use crate::loan::{Loan, UnitClaim};
use crate::period::{LoanPeriod, PeriodEnd};
use crate::store::{ItemStore, LoanStore, RepairStore};

/// Why a unit is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyReason {
    Loan,
    Repair,
}

/// One roster unit's availability over the queried window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAvailability {
    pub name: String,
    pub available: bool,
    /// When the unit frees up; `None` on an unavailable unit means
    /// indefinitely occupied (open-ended loan or repair).
    pub available_from: Option<NaiveDate>,
    pub reason: Option<OccupancyReason>,
}

/// Computed snapshot of per-unit and generic availability. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Every roster slot, in roster order, exactly once.
    pub units: Vec<UnitAvailability>,
    pub available_generic: u32,
    pub total_capacity: u32,
}

impl AvailabilityReport {
    pub fn unit(&self, name: &str) -> Option<&UnitAvailability> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Roster membership check, literal list semantics (placeholder slots
    /// included).
    pub fn has_roster_unit(&self, name: &str) -> bool {
        self.units.iter().any(|u| u.name == name)
    }
}

/// A unit's occupation while folding loans and repairs.
#[derive(Debug, Clone, Copy)]
struct Hold {
    free_at: PeriodEnd,
    reason: OccupancyReason,
}

/// Load collaborator state and compute the report for one item and window.
pub fn query(
    items: &dyn ItemStore,
    loans: &dyn LoanStore,
    repairs: &dyn RepairStore,
    item_id: ItemId,
    window: &LoanPeriod,
    exclude: Option<LoanId>,
) -> DomainResult<AvailabilityReport> {
    let item = items.get(item_id).ok_or(DomainError::NotFound)?;
    let overlapping = loans.list_overlapping(item_id, window, exclude);
    let open_repairs = repairs.list_open(item_id);
    Ok(compute(&item, &overlapping, &open_repairs, window))
}

/// Pure occupancy reduction over already-loaded state.
///
/// Loans are re-filtered by overlap here so the function is total over any
/// input slice; repair blocks are folded unconditionally (they carry no
/// dates). A unit held by several loans frees up at the maximum end date,
/// with an open end dominating every finite one; a repair dominates any
/// loan hold on the same unit.
pub fn compute(
    item: &Item,
    loans: &[Loan],
    repairs: &[RepairBlock],
    window: &LoanPeriod,
) -> AvailabilityReport {
    let mut occupied: HashMap<String, Hold> = HashMap::new();
    let mut generic_used: u64 = 0;

    for loan in loans {
        let period = loan.effective_period();
        if !period.overlaps(window) {
            continue;
        }
        match loan.claim() {
            UnitClaim::Named(units) => {
                for unit in units {
                    occupied
                        .entry(unit.clone())
                        .and_modify(|hold| hold.free_at = hold.free_at.max(period.end))
                        .or_insert(Hold {
                            free_at: period.end,
                            reason: OccupancyReason::Loan,
                        });
                }
            }
            UnitClaim::Generic(n) => generic_used += u64::from(n),
        }
    }

    for block in repairs {
        match block.scope() {
            RepairScope::Units(units) => {
                for unit in units {
                    occupied.insert(
                        unit.clone(),
                        Hold {
                            free_at: PeriodEnd::Open,
                            reason: OccupancyReason::Repair,
                        },
                    );
                }
            }
            RepairScope::Quantity(n) => generic_used += u64::from(*n),
        }
    }

    // Occupied names no longer on the roster (renamed slots) still consume
    // capacity; they just have no roster row to report on.
    let used = generic_used + occupied.len() as u64;
    let total = u64::from(item.quantity_total());
    let available_generic = total.saturating_sub(used) as u32;

    let units = item
        .unit_names()
        .iter()
        .map(|name| match occupied.get(name) {
            Some(hold) => UnitAvailability {
                name: name.clone(),
                available: false,
                available_from: hold.free_at.as_date(),
                reason: Some(hold.reason),
            },
            None => UnitAvailability {
                name: name.clone(),
                available: true,
                available_from: None,
                reason: None,
            },
        })
        .collect();

    AvailabilityReport {
        units,
        available_generic,
        total_capacity: item.quantity_total(),
    }
}
