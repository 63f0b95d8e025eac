//! Conflict Validator.
//!
//! Runs every check before anything is written; on failure nothing has been
//! mutated. Per-unit problems are batched within a step (all unknown names
//! together, then all busy names together) so a caller sees the full set of
//! offending names at once instead of discovering them one by one. Capacity
//! is checked last: unit-level errors are more specific and actionable.

use gearbook_core::{DomainError, DomainResult, LoanId, UnitConflict};

use crate::availability::{self, AvailabilityReport};
use crate::loan::LoanProposal;
use crate::period::{LoanPeriod, PeriodEnd};
use crate::store::{ItemStore, LoanStore, RepairStore};

/// Structural checks that need no store access: borrower identity, quantity,
/// date ordering.
pub fn check_shape(proposal: &LoanProposal) -> DomainResult<()> {
    if !proposal.borrower.is_complete() {
        return Err(DomainError::MissingBorrowerIdentity);
    }
    if proposal.quantity == 0 {
        return Err(DomainError::validation("quantity must be at least 1"));
    }
    if let PeriodEnd::On(end) = proposal.end {
        if end < proposal.start {
            return Err(DomainError::invalid_date_range(format!(
                "end {end} precedes start {}",
                proposal.start
            )));
        }
    }
    Ok(())
}

/// Checks of the proposal against a computed availability report.
pub fn check_against_report(
    proposal: &LoanProposal,
    report: &AvailabilityReport,
) -> DomainResult<()> {
    let unknown: Vec<String> = proposal
        .named_units
        .iter()
        .filter(|name| !report.has_roster_unit(name))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(DomainError::UnknownUnits(unknown));
    }

    let conflicts: Vec<UnitConflict> = proposal
        .named_units
        .iter()
        .filter_map(|name| {
            report
                .unit(name)
                .filter(|unit| !unit.available)
                .map(|unit| UnitConflict {
                    unit: name.clone(),
                    available_from: unit.available_from,
                })
        })
        .collect();
    if !conflicts.is_empty() {
        return Err(DomainError::UnitConflicts(conflicts));
    }

    // The named units were vetted individually above, so the report's
    // generic figure (computed without them) covers only the excess.
    let named = proposal.named_units.len() as u32;
    let extra = proposal.quantity.saturating_sub(named);
    if extra > report.available_generic {
        return Err(DomainError::insufficient_capacity(
            proposal.quantity,
            report.available_generic + named,
        ));
    }

    Ok(())
}

/// Full validation pipeline: shape, then availability, then conflicts.
///
/// Returns the report so callers that accept the proposal do not have to
/// recompute it. `exclude` carries the loan's own id when re-validating an
/// update so it cannot conflict with itself.
pub fn validate(
    items: &dyn ItemStore,
    loans: &dyn LoanStore,
    repairs: &dyn RepairStore,
    proposal: &LoanProposal,
    exclude: Option<LoanId>,
) -> DomainResult<AvailabilityReport> {
    check_shape(proposal)?;
    let window = LoanPeriod {
        start: proposal.start,
        end: proposal.end,
    };
    let report = availability::query(items, loans, repairs, proposal.item_id, &window, exclude)?;
    check_against_report(proposal, &report)?;
    Ok(report)
}
