//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and defined entirely by their attribute
/// values; two instances with the same values are the same value. A loan
/// period is a value object; a loan is an entity.
///
/// To "modify" a value object, build a new one. This keeps values safe to
/// share and trivially comparable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
