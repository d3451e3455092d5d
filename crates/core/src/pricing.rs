//! Cart totals under a flat tax policy.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::CartItem;

/// Flat-rate tax policy.
///
/// The rate is a policy parameter rather than a constant: jurisdiction-
/// aware taxation is out of scope, and the flat approximation has to be
/// tunable per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Tax as a fraction of the subtotal (0.08 = 8%).
    pub rate: Decimal,
}

impl TaxPolicy {
    /// Create a policy with the given rate.
    #[must_use]
    pub const fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl Default for TaxPolicy {
    /// 8% flat sales-tax approximation.
    fn default() -> Self {
        Self {
            rate: Decimal::new(8, 2),
        }
    }
}

/// Subtotal, tax, and grand total for a cart.
///
/// Values carry full precision; call [`Totals::rounded`] at the display
/// boundary. Totals are derived data - recomputed from the items on
/// every read, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// All-zero totals for an empty cart.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Display form: two decimal places, round half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round2(self.subtotal),
            tax: round2(self.tax),
            total: round2(self.total),
        }
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute cart totals.
///
/// Accumulation stays in full `Decimal` precision so rounding error
/// cannot compound across line items; rounding to currency sub-units
/// happens once, in [`Totals::rounded`]. All items are assumed to share
/// one currency - see [`Cart::currency`](crate::Cart::currency).
#[must_use]
pub fn calculate_totals(items: &[CartItem], policy: &TaxPolicy) -> Totals {
    let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
    let tax = subtotal * policy.rate;
    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}
