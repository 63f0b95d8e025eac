//! Inventory domain module.
//!
//! This crate contains the item catalog side of the lending domain: items
//! with a fixed total quantity and a roster of individually named units, and
//! the open repair blocks that remove capacity from availability. It is pure
//! domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod repair;

pub use item::Item;
pub use repair::{RepairBlock, RepairScope};
