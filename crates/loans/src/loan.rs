use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gearbook_core::{Entity, ItemId, LoanId};

use crate::period::{LoanPeriod, PeriodEnd};

/// Who holds the loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Borrower {
    /// A single free-form display string.
    Display(String),
    /// A structured name/surname/phone triple.
    Contact {
        name: String,
        surname: String,
        phone: String,
    },
}

impl Borrower {
    /// Whether the identity is usable: a non-blank display string, or all
    /// three contact fields non-blank.
    pub fn is_complete(&self) -> bool {
        match self {
            Borrower::Display(s) => !s.trim().is_empty(),
            Borrower::Contact {
                name,
                surname,
                phone,
            } => {
                !name.trim().is_empty() && !surname.trim().is_empty() && !phone.trim().is_empty()
            }
        }
    }
}

/// What a reservation takes out of the capacity pool.
///
/// Occupancy is reduced over this union rather than over the raw fields: a
/// loan carrying named units occupies exactly those units, while a loan
/// with no names consumes a bare count from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClaim<'a> {
    Named(&'a [String]),
    Generic(u32),
}

/// A stored reservation: a time-bounded claim on named units and/or generic
/// capacity of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    item_id: ItemId,
    period: LoanPeriod,
    /// Requested quantity. With named units present this means "at least
    /// `named_units.len()`"; the excess consumes generic capacity.
    quantity: u32,
    named_units: Vec<String>,
    borrower: Borrower,
    note: Option<String>,
    returned_at: Option<NaiveDate>,
}

impl Loan {
    pub fn from_proposal(id: LoanId, proposal: LoanProposal) -> Self {
        Self {
            id,
            item_id: proposal.item_id,
            period: LoanPeriod {
                start: proposal.start,
                end: proposal.end,
            },
            quantity: proposal.quantity,
            named_units: proposal.named_units,
            borrower: proposal.borrower,
            note: proposal.note,
            returned_at: None,
        }
    }

    pub fn id_typed(&self) -> LoanId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn period(&self) -> &LoanPeriod {
        &self.period
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn named_units(&self) -> &[String] {
        &self.named_units
    }

    pub fn borrower(&self) -> &Borrower {
        &self.borrower
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn returned_at(&self) -> Option<NaiveDate> {
        self.returned_at
    }

    pub fn is_closed(&self) -> bool {
        self.returned_at.is_some()
    }

    /// The capacity claim this loan makes while it overlaps a window.
    pub fn claim(&self) -> UnitClaim<'_> {
        if self.named_units.is_empty() {
            UnitClaim::Generic(self.quantity)
        } else {
            UnitClaim::Named(&self.named_units)
        }
    }

    /// The period this loan actually occupies capacity for.
    ///
    /// A returned loan ends at its return date even if the booked end was
    /// later (or open).
    pub fn effective_period(&self) -> LoanPeriod {
        match self.returned_at {
            Some(date) => LoanPeriod {
                start: self.period.start,
                end: PeriodEnd::On(date),
            },
            None => self.period,
        }
    }

    /// Record the physical return of the loaned units.
    pub fn mark_returned(&mut self, date: NaiveDate) {
        self.returned_at = Some(date);
    }

    /// Merge a patch over this loan. Unspecified fields keep their value;
    /// for the nullable fields (`end`, `note`) clearing is distinct from
    /// omitting.
    pub fn apply_patch(&mut self, patch: LoanPatch) {
        if let Some(start) = patch.start {
            self.period.start = start;
        }
        match patch.end {
            Patch::Keep => {}
            Patch::Set(end) => self.period.end = PeriodEnd::On(end),
            Patch::Clear => self.period.end = PeriodEnd::Open,
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(named_units) = patch.named_units {
            self.named_units = named_units;
        }
        if let Some(borrower) = patch.borrower {
            self.borrower = borrower;
        }
        match patch.note {
            Patch::Keep => {}
            Patch::Set(note) => self.note = Some(note),
            Patch::Clear => self.note = None,
        }
    }

    /// Re-express the loan as a proposal, for re-validation after a patch.
    pub fn to_proposal(&self) -> LoanProposal {
        LoanProposal {
            item_id: self.item_id,
            start: self.period.start,
            end: self.period.end,
            quantity: self.quantity,
            named_units: self.named_units.clone(),
            borrower: self.borrower.clone(),
            note: self.note.clone(),
        }
    }
}

impl Entity for Loan {
    type Id = LoanId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A reservation as proposed by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProposal {
    pub item_id: ItemId,
    pub start: NaiveDate,
    pub end: PeriodEnd,
    pub quantity: u32,
    pub named_units: Vec<String>,
    pub borrower: Borrower,
    pub note: Option<String>,
}

/// A three-state patch field: leave alone, set a value, or clear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Patch<T> {
    Keep,
    Set(T),
    Clear,
}

// Hand-written so `Patch<T>: Default` does not require `T: Default`.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

/// A partial update to a loan. `Option::None` / `Patch::Keep` fields are
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPatch {
    pub start: Option<NaiveDate>,
    pub end: Patch<NaiveDate>,
    pub quantity: Option<u32>,
    pub named_units: Option<Vec<String>>,
    pub borrower: Option<Borrower>,
    pub note: Patch<String>,
}

/// A stored loan together with its derived, non-persisted fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan: Loan,
    /// Booked length in days, endpoints inclusive. `None` for open-ended loans.
    pub total_days: Option<i64>,
    /// Days from `today` until the booked end; negative when overdue.
    /// `None` for open-ended loans.
    pub days_remaining: Option<i64>,
}

impl LoanRecord {
    pub fn derive(loan: Loan, today: NaiveDate) -> Self {
        let (total_days, days_remaining) = match loan.period().end {
            PeriodEnd::On(end) => (
                Some((end - loan.period().start).num_days() + 1),
                Some((end - today).num_days()),
            ),
            PeriodEnd::Open => (None, None),
        };
        Self {
            loan,
            total_days,
            days_remaining,
        }
    }
}
