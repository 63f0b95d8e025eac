use serde::{Deserialize, Serialize};

use gearbook_core::{Entity, ItemId, RepairId};

/// What an open repair row takes out of circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairScope {
    /// Specific named units from the item's roster.
    Units(Vec<String>),
    /// A slice of the undifferentiated pool.
    Quantity(u32),
}

/// An open maintenance record blocking part of an item's capacity.
///
/// Repair blocks carry no time bounds: as long as the row is open it blocks
/// every queried interval, past or future, and a named unit under repair has
/// no "available from" date. This mirrors the observed repair schema rather
/// than any inferred repair duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairBlock {
    id: RepairId,
    item_id: ItemId,
    scope: RepairScope,
    description: Option<String>,
}

impl RepairBlock {
    pub fn new(id: RepairId, item_id: ItemId, scope: RepairScope) -> Self {
        Self {
            id,
            item_id,
            scope,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id_typed(&self) -> RepairId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn scope(&self) -> &RepairScope {
        &self.scope
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Named units blocked by this row (empty for generic-quantity blocks).
    pub fn blocked_units(&self) -> &[String] {
        match &self.scope {
            RepairScope::Units(units) => units,
            RepairScope::Quantity(_) => &[],
        }
    }

    /// Generic quantity blocked by this row (zero for named-unit blocks).
    pub fn blocked_quantity(&self) -> u32 {
        match &self.scope {
            RepairScope::Units(_) => 0,
            RepairScope::Quantity(n) => *n,
        }
    }
}

impl Entity for RepairBlock {
    type Id = RepairId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
