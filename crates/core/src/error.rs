//! Domain error model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A requested named unit that is currently occupied.
///
/// `available_from` is the date the unit frees up, or `None` when the
/// occupation is indefinite (open-ended loan or repair block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConflict {
    pub unit: String,
    pub available_from: Option<NaiveDate>,
}

impl core::fmt::Display for UnitConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.available_from {
            Some(date) => write!(f, "{} (available from {})", self.unit, date),
            None => write!(f, "{} (unavailable indefinitely)", self.unit),
        }
    }
}

/// Domain-level error.
///
/// Every variant is a validation-time, recoverable-by-caller failure; nothing
/// here is fatal to the process, and nothing is written to any store once one
/// of these is raised. Variants carry structured data so callers can map each
/// kind to a distinct response without string matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced item or loan does not exist.
    #[error("not found")]
    NotFound,

    /// Missing start date, or an end date before the start date.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Neither a display string nor the full name/surname/phone triple supplied.
    #[error("borrower identity is missing or incomplete")]
    MissingBorrowerIdentity,

    /// Requested named units absent from the item's roster.
    ///
    /// Batched: all bad names from one request are collected here.
    #[error("unknown units: {}", .0.join(", "))]
    UnknownUnits(Vec<String>),

    /// Requested named units currently occupied by another loan or a repair.
    ///
    /// Batched across all conflicting names in one request.
    #[error("unit conflicts: {}", format_conflicts(.0))]
    UnitConflicts(Vec<UnitConflict>),

    /// Requested generic quantity exceeds the remaining pool.
    #[error("insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: u32, available: u32 },

    /// Close requested without a return date.
    #[error("a return date is required to close a loan")]
    MissingReturnDate,

    /// A value failed a structural check not covered by the variants above
    /// (e.g. zero quantity, malformed identifier).
    #[error("validation failed: {0}")]
    Validation(String),
}

fn format_conflicts(conflicts: &[UnitConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DomainError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn invalid_date_range(msg: impl Into<String>) -> Self {
        Self::InvalidDateRange(msg.into())
    }

    pub fn unknown_units(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::UnknownUnits(names.into_iter().map(Into::into).collect())
    }

    pub fn unit_conflicts(conflicts: impl IntoIterator<Item = UnitConflict>) -> Self {
        Self::UnitConflicts(conflicts.into_iter().collect())
    }

    pub fn insufficient_capacity(requested: u32, available: u32) -> Self {
        Self::InsufficientCapacity {
            requested,
            available,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
