use serde::{Deserialize, Serialize};

use gearbook_core::{DomainError, DomainResult, Entity, ItemId};

/// An inventory line: a total quantity split into individually named units.
///
/// The roster invariant holds after every mutation:
/// `unit_names.len() == quantity_total`. Units whose slot carries an empty
/// string are anonymous and only exist as generic capacity; named slots are
/// individually trackable by loans and repairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity_total: u32,
    unit_names: Vec<String>,
    notes: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, quantity_total: u32) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            quantity_total,
            unit_names: vec![String::new(); quantity_total as usize],
            notes: None,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity_total(&self) -> u32 {
        self.quantity_total
    }

    pub fn unit_names(&self) -> &[String] {
        &self.unit_names
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        self.name = name;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Resize the item's total quantity.
    ///
    /// Shrinking drops trailing unit names; growing appends empty-string
    /// placeholder slots. Loans or repairs referencing a dropped name are
    /// left as-is (a known inconsistency, see crate docs on orphaned names).
    pub fn set_quantity_total(&mut self, quantity_total: u32) {
        self.quantity_total = quantity_total;
        self.unit_names
            .resize(quantity_total as usize, String::new());
    }

    /// Replace the whole roster, padded/truncated to the current quantity.
    pub fn set_unit_names(&mut self, unit_names: Vec<String>) {
        self.unit_names = unit_names;
        self.unit_names
            .resize(self.quantity_total as usize, String::new());
    }

    /// Rename a single roster slot by index.
    pub fn rename_unit(&mut self, index: usize, name: impl Into<String>) -> DomainResult<()> {
        let slot = self
            .unit_names
            .get_mut(index)
            .ok_or_else(|| DomainError::validation(format!("no unit slot at index {index}")))?;
        *slot = name.into();
        Ok(())
    }

    /// Whether `name` currently appears on the roster (empty slots excluded).
    pub fn has_unit(&self, name: &str) -> bool {
        !name.is_empty() && self.unit_names.iter().any(|n| n == name)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
