//! Ordered cart container and its mutation invariants.

use serde::{Deserialize, Serialize};

use crate::pricing::{TaxPolicy, Totals, calculate_totals};
use crate::types::{CartItem, CurrencyCode, ItemId};

/// An ordered cart snapshot.
///
/// Items keep the insertion order of their source (remote API order or
/// local snapshot order); quantity edits and removals never reorder the
/// survivors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create a cart from normalized items.
    #[must_use]
    pub const fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Current line items, in order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Set the quantity of a line item.
    ///
    /// Returns `false` without touching the cart when `quantity` is
    /// below the floor of 1 or the id is unknown. Dropping a line is an
    /// explicit [`Cart::remove`], never a side effect of a quantity
    /// edit.
    pub fn update_quantity(&mut self, id: &ItemId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line item. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Currency shared by every line, when the cart is single-currency.
    ///
    /// `None` for an empty cart or when lines disagree. Totals over a
    /// mixed-currency cart are not meaningful; checkout refuses them.
    #[must_use]
    pub fn currency(&self) -> Option<&CurrencyCode> {
        let first = &self.items.first()?.currency;
        self.items
            .iter()
            .all(|item| &item.currency == first)
            .then_some(first)
    }

    /// Whether lines disagree on currency.
    #[must_use]
    pub fn mixed_currencies(&self) -> bool {
        !self.items.is_empty() && self.currency().is_none()
    }

    /// Display totals for the current items.
    #[must_use]
    pub fn totals(&self, policy: &TaxPolicy) -> Totals {
        calculate_totals(&self.items, policy)
    }
}
