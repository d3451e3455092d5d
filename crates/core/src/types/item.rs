//! Canonical cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;
use super::id::ItemId;

/// Display category of a purchasable item.
///
/// Pricing treats the tag as opaque; it exists only so displays can group
/// lines. Unknown tags collapse to [`ItemType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Experience,
    Ticket,
    Package,
    #[default]
    #[serde(other)]
    Other,
}

impl ItemType {
    /// Parse a category tag, collapsing anything unknown to `Other`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "experience" => Self::Experience,
            "ticket" => Self::Ticket,
            "package" => Self::Package,
            _ => Self::Other,
        }
    }
}

/// Canonical cart line item.
///
/// Every external representation (remote API payload, persisted local
/// snapshot) is normalized into this shape before any pricing runs.
///
/// Invariants upheld by the normalizer and [`Cart`](crate::Cart):
/// `price >= 0`, `quantity >= 1`, `id` unique within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    /// Display label; never empty (falls back to the id).
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    /// Unit price in `currency`, at currency sub-unit precision.
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-form display data (date, venue, category); opaque to pricing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CartItem {
    /// Line total (unit price x quantity) in full precision.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ItemId::new("x"),
            name: "Test".to_string(),
            description: None,
            item_type: ItemType::Experience,
            price: price.parse().expect("price"),
            currency: CurrencyCode::usd(),
            quantity,
            image: None,
            metadata: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item("25.00", 2).line_total(), "50.00".parse().expect("dec"));
        assert_eq!(item("9.99", 1).line_total(), "9.99".parse().expect("dec"));
        assert_eq!(item("0", 7).line_total(), Decimal::ZERO);
    }

    #[test]
    fn test_item_type_from_tag() {
        assert_eq!(ItemType::from_tag("experience"), ItemType::Experience);
        assert_eq!(ItemType::from_tag(" Ticket "), ItemType::Ticket);
        assert_eq!(ItemType::from_tag("PACKAGE"), ItemType::Package);
        assert_eq!(ItemType::from_tag("workshop"), ItemType::Other);
        assert_eq!(ItemType::from_tag(""), ItemType::Other);
    }

    #[test]
    fn test_serde_uses_type_field() {
        let json = serde_json::to_value(item("12.50", 3)).expect("serialize");
        assert_eq!(json["type"], "experience");
        assert_eq!(json["price"], "12.50");
        assert_eq!(json["quantity"], 3);
        // Empty optionals are omitted entirely
        assert!(json.get("description").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_unknown_type_deserializes_to_other() {
        let json = serde_json::json!({
            "id": "a",
            "name": "A",
            "type": "mystery",
            "price": "1.00",
            "currency": "USD",
            "quantity": 1
        });
        let parsed: CartItem = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed.item_type, ItemType::Other);
    }
}
