//! Line items and the editable list that holds them.

use crate::model::coerce_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One billable row of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: u64,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
}

impl LineItem {
    /// Creates an item with an empty description, a quantity of 1 and a unit price of 0.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            description: String::new(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity × unit_price`, saturating rather than overflowing.
    pub fn line_total(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_price)
    }

    /// Applies a raw edit to one field. Numeric fields are coerced, see `coerce_number`.
    pub fn apply(&mut self, field: LineItemField, raw: &str) {
        match field {
            LineItemField::Description => self.description = raw.to_string(),
            LineItemField::Quantity => self.quantity = coerce_number(raw),
            LineItemField::UnitPrice => self.unit_price = coerce_number(raw),
        }
    }
}

/// The editable fields of a `LineItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemField {
    Description,
    Quantity,
    #[serde(alias = "unitPrice", alias = "price")]
    UnitPrice,
}

serde_plain::derive_display_from_serialize!(LineItemField);
serde_plain::derive_fromstr_from_deserialize!(LineItemField);

/// An ordered list of line items with stable, never-reused ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItems {
    items: Vec<LineItem>,
    next_id: u64,
}

impl LineItems {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Appends a default item and returns its id.
    pub fn add(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.items.push(LineItem::new(id));
        debug!("Added line item {id}");
        id
    }

    /// Removes the item with `id`, keeping the order of the others. Returns false if there was
    /// no such item.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            debug!("Removed line item {id}");
        } else {
            trace!("No line item {id} to remove");
        }
        removed
    }

    /// Edits one field of the item with `id`. Returns false if there was no such item.
    pub fn update(&mut self, id: u64, field: LineItemField, raw: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(field, raw);
                trace!("Set {field} of line item {id} from {raw:?}");
                true
            }
            None => {
                trace!("No line item {id} to update");
                false
            }
        }
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
