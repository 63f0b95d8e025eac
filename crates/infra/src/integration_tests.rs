//! End-to-end tests for the loan engine over the in-memory stores.
//!
//! Covers the availability/validation scenarios and the concurrent
//! double-booking race the per-item lock exists to prevent.

use std::sync::{Arc, Barrier};

use chrono::NaiveDate;

use gearbook_core::{DomainError, ItemId, RepairId, UnitConflict};
use gearbook_inventory::{Item, RepairBlock, RepairScope};
use gearbook_loans::{
    Borrower, ItemStore, LoanEngine, LoanPatch, LoanPeriod, LoanProposal, OccupancyReason, Patch,
    PeriodEnd,
};

use crate::in_memory::{InMemoryItemStore, InMemoryLoanStore, InMemoryRepairStore};

struct Fixture {
    items: Arc<InMemoryItemStore>,
    repairs: Arc<InMemoryRepairStore>,
    engine: Arc<LoanEngine>,
    tripod: ItemId,
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Fixture {
    let items = Arc::new(InMemoryItemStore::new());
    let loans = Arc::new(InMemoryLoanStore::new());
    let repairs = Arc::new(InMemoryRepairStore::new());
    let engine = Arc::new(LoanEngine::new(
        items.clone(),
        loans.clone(),
        repairs.clone(),
    ));

    let mut tripod = Item::new(ItemId::new(), "Tripod", 3).unwrap();
    tripod.set_unit_names(vec!["A".into(), "B".into(), "C".into()]);
    let tripod_id = tripod.id_typed();
    items.put(tripod);

    Fixture {
        items,
        repairs,
        engine,
        tripod: tripod_id,
    }
}

fn proposal(item_id: ItemId, named_units: &[&str], quantity: u32) -> LoanProposal {
    LoanProposal {
        item_id,
        start: d(2024, 1, 10),
        end: PeriodEnd::On(d(2024, 1, 15)),
        quantity,
        named_units: named_units.iter().map(|s| s.to_string()).collect(),
        borrower: Borrower::Display("K. Svensson".into()),
        note: None,
    }
}

#[test]
fn empty_item_reports_full_availability() {
    let fx = setup();
    let window = LoanPeriod::bounded(d(2024, 1, 1), d(2024, 1, 31));
    let report = fx.engine.query_availability(fx.tripod, &window, None).unwrap();
    assert_eq!(report.available_generic, 3);
    assert_eq!(report.total_capacity, 3);
    assert!(report.units.iter().all(|u| u.available));
}

#[test]
fn unknown_item_is_not_found() {
    let fx = setup();
    let window = LoanPeriod::bounded(d(2024, 1, 1), d(2024, 1, 2));
    let err = fx
        .engine
        .query_availability(ItemId::new(), &window, None)
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[test]
fn reserved_unit_shows_occupied_with_available_from() {
    let fx = setup();
    fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();

    let window = LoanPeriod::bounded(d(2024, 1, 12), d(2024, 1, 13));
    let report = fx.engine.query_availability(fx.tripod, &window, None).unwrap();
    let a = report.unit("A").unwrap();
    assert!(!a.available);
    assert_eq!(a.available_from, Some(d(2024, 1, 15)));
    assert_eq!(a.reason, Some(OccupancyReason::Loan));
    assert!(report.unit("B").unwrap().available);
    assert!(report.unit("C").unwrap().available);
    assert_eq!(report.available_generic, 2);
}

#[test]
fn double_booking_a_unit_is_rejected_with_conflict() {
    let fx = setup();
    fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();

    let mut second = proposal(fx.tripod, &["A"], 1);
    second.start = d(2024, 1, 11);
    second.end = PeriodEnd::On(d(2024, 1, 12));
    let err = fx.engine.create(second).unwrap_err();
    assert_eq!(
        err,
        DomainError::UnitConflicts(vec![UnitConflict {
            unit: "A".into(),
            available_from: Some(d(2024, 1, 15)),
        }])
    );
}

#[test]
fn generic_request_succeeds_alongside_a_named_loan() {
    let fx = setup();
    fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();

    let record = fx.engine.create(proposal(fx.tripod, &[], 2)).unwrap();
    assert!(record.loan.named_units().is_empty());
    assert_eq!(record.loan.quantity(), 2);

    // The pool is now exhausted: A named plus 2 generic out of 3.
    let err = fx.engine.create(proposal(fx.tripod, &[], 1)).unwrap_err();
    assert_eq!(
        err,
        DomainError::InsufficientCapacity {
            requested: 1,
            available: 0,
        }
    );
}

#[test]
fn repair_block_makes_unit_unbookable_for_any_interval() {
    let fx = setup();
    fx.repairs.open(RepairBlock::new(
        RepairId::new(),
        fx.tripod,
        RepairScope::Units(vec!["B".into()]),
    ));

    for window in [
        LoanPeriod::bounded(d(2001, 6, 1), d(2001, 6, 2)),
        LoanPeriod::bounded(d(2024, 1, 12), d(2024, 1, 13)),
        LoanPeriod::open_ended(d(2099, 1, 1)),
    ] {
        let report = fx.engine.query_availability(fx.tripod, &window, None).unwrap();
        let b = report.unit("B").unwrap();
        assert!(!b.available);
        assert_eq!(b.available_from, None);
        assert_eq!(b.reason, Some(OccupancyReason::Repair));
    }

    let err = fx.engine.create(proposal(fx.tripod, &["B"], 1)).unwrap_err();
    assert!(matches!(err, DomainError::UnitConflicts(_)));
}

#[test]
fn update_may_extend_its_own_end_date() {
    let fx = setup();
    let record = fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();

    let updated = fx
        .engine
        .update(
            record.loan.id_typed(),
            LoanPatch {
                end: Patch::Set(d(2024, 1, 20)),
                ..LoanPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.loan.period().end, PeriodEnd::On(d(2024, 1, 20)));
}

#[test]
fn update_still_conflicts_with_other_loans() {
    let fx = setup();
    fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();
    let record = fx.engine.create(proposal(fx.tripod, &["B"], 1)).unwrap();

    let err = fx
        .engine
        .update(
            record.loan.id_typed(),
            LoanPatch {
                named_units: Some(vec!["A".into()]),
                ..LoanPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::UnitConflicts(_)));
}

#[test]
fn update_clearing_the_end_makes_the_loan_open_ended() {
    let fx = setup();
    let record = fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();

    let updated = fx
        .engine
        .update(
            record.loan.id_typed(),
            LoanPatch {
                end: Patch::Clear,
                ..LoanPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.loan.period().end, PeriodEnd::Open);

    // An open-ended loan now blocks arbitrarily late windows.
    let window = LoanPeriod::bounded(d(2030, 1, 1), d(2030, 1, 2));
    let report = fx.engine.query_availability(fx.tripod, &window, None).unwrap();
    assert!(!report.unit("A").unwrap().available);
}

#[test]
fn close_requires_a_return_date() {
    let fx = setup();
    let record = fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();
    let err = fx.engine.close(record.loan.id_typed(), None).unwrap_err();
    assert_eq!(err, DomainError::MissingReturnDate);
}

#[test]
fn closed_loan_frees_the_unit_after_the_return_date() {
    let fx = setup();
    let record = fx.engine.create(proposal(fx.tripod, &["A"], 1)).unwrap();
    fx.engine
        .close(record.loan.id_typed(), Some(d(2024, 1, 12)))
        .unwrap();

    let after = LoanPeriod::bounded(d(2024, 1, 13), d(2024, 1, 14));
    let report = fx.engine.query_availability(fx.tripod, &after, None).unwrap();
    assert!(report.unit("A").unwrap().available);

    // Within the shortened period the unit is still reported busy.
    let during = LoanPeriod::bounded(d(2024, 1, 11), d(2024, 1, 11));
    let report = fx.engine.query_availability(fx.tripod, &during, None).unwrap();
    assert!(!report.unit("A").unwrap().available);
}

#[test]
fn delete_reports_whether_a_row_existed() {
    let fx = setup();
    let record = fx.engine.create(proposal(fx.tripod, &[], 1)).unwrap();
    assert!(fx.engine.delete(record.loan.id_typed()));
    assert!(!fx.engine.delete(record.loan.id_typed()));
}

#[test]
fn missing_borrower_identity_blocks_creation() {
    let fx = setup();
    let mut p = proposal(fx.tripod, &[], 1);
    p.borrower = Borrower::Contact {
        name: "Kim".into(),
        surname: "".into(),
        phone: "555-0101".into(),
    };
    let err = fx.engine.create(p).unwrap_err();
    assert_eq!(err, DomainError::MissingBorrowerIdentity);
}

#[test]
fn unknown_units_are_reported_together() {
    let fx = setup();
    let err = fx
        .engine
        .create(proposal(fx.tripod, &["X", "Y"], 2))
        .unwrap_err();
    assert_eq!(err, DomainError::UnknownUnits(vec!["X".into(), "Y".into()]));
}

#[test]
fn roster_shrink_orphans_do_not_corrupt_reports() {
    let fx = setup();
    fx.engine.create(proposal(fx.tripod, &["C"], 1)).unwrap();

    // Inventory management shrinks the item; "C" is dropped from the roster
    // but the loan on it still consumes one unit of capacity.
    let mut item = fx.items.get(fx.tripod).unwrap();
    item.set_quantity_total(2);
    fx.items.put(item);

    let window = LoanPeriod::bounded(d(2024, 1, 12), d(2024, 1, 13));
    let report = fx.engine.query_availability(fx.tripod, &window, None).unwrap();
    assert_eq!(report.units.len(), 2);
    assert_eq!(report.available_generic, 1);
}

#[test]
fn concurrent_requests_for_the_same_unit_yield_one_winner() {
    let fx = setup();
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let engine = fx.engine.clone();
            let barrier = barrier.clone();
            let p = proposal(fx.tripod, &["A"], 1);
            std::thread::spawn(move || {
                barrier.wait();
                engine.create(p)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(DomainError::UnitConflicts(_)))));
}

#[test]
fn concurrent_generic_requests_cannot_overdraw_the_pool() {
    let fx = setup();
    let single = Item::new(ItemId::new(), "Projector", 1).unwrap();
    let item_id = single.id_typed();
    fx.items.put(single);

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = fx.engine.clone();
            let barrier = barrier.clone();
            let p = proposal(item_id, &[], 1);
            std::thread::spawn(move || {
                barrier.wait();
                engine.create(p)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    for failure in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            failure,
            Err(DomainError::InsufficientCapacity { .. })
        ));
    }
}
