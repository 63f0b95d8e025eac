//! Infrastructure layer: store adapters and process wiring.
//!
//! The engine in `gearbook-loans` is persistence-agnostic; this crate
//! provides the in-memory store implementations used by tests and embedded
//! deployments, plus telemetry initialization.

pub mod in_memory;
pub mod telemetry;

#[cfg(test)]
mod integration_tests;

pub use in_memory::{InMemoryItemStore, InMemoryLoanStore, InMemoryRepairStore};
