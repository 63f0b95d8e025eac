//! Loan availability and allocation engine.
//!
//! Given an item split into named units plus an undifferentiated pool, this
//! crate computes which units are free over a date range, validates proposed
//! reservations against every overlapping loan and open repair block, and
//! performs the only writes in the system through [`LoanEngine`].
//!
//! The calculator ([`availability`]) is a pure function of store state; the
//! validator ([`validate`]) consumes its report; the engine serializes
//! validate-then-write per item so concurrent callers cannot double-book.

pub mod availability;
pub mod engine;
pub mod loan;
pub mod period;
pub mod store;
pub mod validate;

pub use availability::{AvailabilityReport, OccupancyReason, UnitAvailability};
pub use engine::LoanEngine;
pub use loan::{Borrower, Loan, LoanPatch, LoanProposal, LoanRecord, Patch, UnitClaim};
pub use period::{LoanPeriod, PeriodEnd};
pub use store::{ItemStore, LoanStore, RepairStore};
