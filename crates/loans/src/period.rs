//! Date ranges with an explicit open end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gearbook_core::ValueObject;

/// The end of a loan period or query window.
///
/// `Open` means "no end date": the loan is still out, or the query extends
/// indefinitely. It is a real variant rather than a sentinel date so that
/// comparisons are total; the derived ordering places `Open` above every
/// finite date, which is exactly the domination rule the availability
/// calculator needs when merging end dates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<NaiveDate>", into = "Option<NaiveDate>")]
pub enum PeriodEnd {
    On(NaiveDate),
    Open,
}

impl PeriodEnd {
    pub fn is_open(&self) -> bool {
        matches!(self, PeriodEnd::Open)
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PeriodEnd::On(date) => Some(*date),
            PeriodEnd::Open => None,
        }
    }
}

impl From<Option<NaiveDate>> for PeriodEnd {
    fn from(value: Option<NaiveDate>) -> Self {
        match value {
            Some(date) => PeriodEnd::On(date),
            None => PeriodEnd::Open,
        }
    }
}

impl From<PeriodEnd> for Option<NaiveDate> {
    fn from(value: PeriodEnd) -> Self {
        value.as_date()
    }
}

/// A loan period or availability query window: `[start, end]`, where the end
/// may be open.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPeriod {
    pub start: NaiveDate,
    pub end: PeriodEnd,
}

impl LoanPeriod {
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: PeriodEnd::On(end),
        }
    }

    pub fn open_ended(start: NaiveDate) -> Self {
        Self {
            start,
            end: PeriodEnd::Open,
        }
    }

    /// Interval overlap, end dates inclusive.
    ///
    /// Two periods overlap when each one starts on or before the other ends;
    /// an open end satisfies every such comparison.
    pub fn overlaps(&self, other: &LoanPeriod) -> bool {
        PeriodEnd::On(self.start) <= other.end && PeriodEnd::On(other.start) <= self.end
    }
}

impl ValueObject for LoanPeriod {}
