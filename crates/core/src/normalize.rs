//! Line-item normalization from loosely-typed external records.
//!
//! Two sources feed a cart: the remote cart API and a previously
//! serialized local snapshot. Both arrive as JSON of uneven quality, so
//! every field of [`RawCartItem`] is optional and loosely typed. A
//! malformed field defaults, a record without an identity is dropped,
//! and neither can ever fail the batch.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{CartItem, CurrencyCode, ItemId, ItemType};

/// A cart line item as it appears on the wire, before validation.
///
/// Fields hold raw JSON values so that a record with, say, a string
/// where a number belongs still deserializes; coercion happens in
/// [`normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCartItem {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub description: Option<Value>,
    #[serde(rename = "type")]
    pub item_type: Option<Value>,
    pub price: Option<Value>,
    pub currency: Option<Value>,
    pub quantity: Option<Value>,
    pub image: Option<Value>,
    pub metadata: Option<Value>,
}

impl RawCartItem {
    /// Interpret an arbitrary JSON value as a raw record.
    ///
    /// Non-object values produce an empty record, which the normalizer
    /// then drops for lack of an id.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Normalize a batch of raw records into canonical items.
///
/// - records without a usable id are dropped (an item with no stable
///   identity cannot be targeted by quantity updates or removal)
/// - duplicate ids keep the first occurrence
/// - input order is preserved; skipped records leave no gaps
///
/// Pure function: no side effects, never fails for malformed records.
#[must_use]
pub fn normalize(raw: Vec<RawCartItem>, fallback_currency: &CurrencyCode) -> Vec<CartItem> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|record| normalize_item(record, fallback_currency))
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

fn normalize_item(raw: RawCartItem, fallback_currency: &CurrencyCode) -> Option<CartItem> {
    let RawCartItem {
        id,
        name,
        description,
        item_type,
        price,
        currency,
        quantity,
        image,
        metadata,
    } = raw;

    let id = id.as_ref().and_then(coerce_id)?;
    let name = name
        .as_ref()
        .and_then(coerce_string)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| id.as_str().to_string());

    Some(CartItem {
        name,
        description: description.as_ref().and_then(coerce_string),
        item_type: item_type
            .as_ref()
            .and_then(coerce_string)
            .map_or(ItemType::Other, |tag| ItemType::from_tag(&tag)),
        price: coerce_price(price.as_ref()),
        currency: currency
            .as_ref()
            .and_then(coerce_string)
            .and_then(|code| CurrencyCode::new(&code).ok())
            .unwrap_or_else(|| fallback_currency.clone()),
        quantity: coerce_quantity(quantity.as_ref()),
        image: image.as_ref().and_then(coerce_string),
        metadata,
        id,
    })
}

/// Ids may arrive as strings or bare numbers; anything else carries no
/// stable identity.
fn coerce_id(value: &Value) -> Option<ItemId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(ItemId::new(s.trim())),
        Value::Number(n) => Some(ItemId::new(n.to_string())),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Unit price from a number or numeric string.
///
/// Missing, non-numeric, or negative prices become zero: a bad price on
/// one line renders as 0 instead of blocking the whole cart.
fn coerce_price(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(Value::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed
        .filter(|price| !price.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Quantity floor: anything that does not resolve to an integer >= 1
/// becomes 1.
fn coerce_quantity(value: Option<&Value>) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // guarded by the f >= 1.0 check
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.trunc() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .filter(|&q| q >= 1)
        .map_or(1, |q| u32::try_from(q).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawCartItem {
        RawCartItem::from_value(value)
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::usd()
    }

    #[test]
    fn test_default_and_skip() {
        // No id -> dropped; bad price / zero quantity -> defaulted
        let items = normalize(
            vec![
                raw(json!({"id": "a"})),
                raw(json!({"price": 10, "quantity": 2})),
                raw(json!({"id": "b", "price": "bad", "quantity": 0})),
            ],
            &usd(),
        );

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::new("a"));
        assert_eq!(items[0].price, Decimal::ZERO);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].currency, CurrencyCode::usd());
        assert_eq!(items[1].id, ItemId::new("b"));
        assert_eq!(items[1].price, Decimal::ZERO);
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_full_record_passes_through() {
        let items = normalize(
            vec![raw(json!({
                "id": "exp-1",
                "name": "Sunset sail",
                "description": "Two hours on the bay",
                "type": "experience",
                "price": "149.50",
                "currency": "eur",
                "quantity": 3,
                "image": "https://cdn.atlvs.app/sail.jpg",
                "metadata": {"venue": "Pier 7", "date": "2026-09-01"}
            }))],
            &usd(),
        );

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.name, "Sunset sail");
        assert_eq!(item.item_type, ItemType::Experience);
        assert_eq!(item.price, "149.50".parse().expect("dec"));
        assert_eq!(item.currency.as_str(), "EUR");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.image.as_deref(), Some("https://cdn.atlvs.app/sail.jpg"));
        assert_eq!(
            item.metadata.as_ref().and_then(|m| m["venue"].as_str()),
            Some("Pier 7")
        );
    }

    #[test]
    fn test_price_coercion() {
        assert_eq!(coerce_price(Some(&json!(25))), "25".parse().expect("dec"));
        assert_eq!(
            coerce_price(Some(&json!("9.99"))),
            "9.99".parse().expect("dec")
        );
        assert_eq!(coerce_price(Some(&json!("bad"))), Decimal::ZERO);
        assert_eq!(coerce_price(Some(&json!(-4))), Decimal::ZERO);
        assert_eq!(coerce_price(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(coerce_price(None), Decimal::ZERO);
    }

    #[test]
    fn test_quantity_coercion() {
        assert_eq!(coerce_quantity(Some(&json!(4))), 4);
        assert_eq!(coerce_quantity(Some(&json!("2"))), 2);
        assert_eq!(coerce_quantity(Some(&json!(0))), 1);
        assert_eq!(coerce_quantity(Some(&json!(-3))), 1);
        assert_eq!(coerce_quantity(Some(&json!(2.9))), 2);
        assert_eq!(coerce_quantity(Some(&json!("many"))), 1);
        assert_eq!(coerce_quantity(None), 1);
    }

    #[test]
    fn test_numeric_id_coerced_to_string() {
        let items = normalize(vec![raw(json!({"id": 42, "price": 5}))], &usd());
        assert_eq!(items[0].id, ItemId::new("42"));
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let items = normalize(
            vec![
                raw(json!({"id": "bare"})),
                raw(json!({"id": "blank", "name": "   "})),
            ],
            &usd(),
        );
        assert_eq!(items[0].name, "bare");
        assert_eq!(items[1].name, "blank");
    }

    #[test]
    fn test_invalid_currency_falls_back() {
        let fallback = CurrencyCode::new("CAD").expect("valid");
        let items = normalize(
            vec![raw(json!({"id": "a", "currency": "not-a-code"}))],
            &fallback,
        );
        assert_eq!(items[0].currency.as_str(), "CAD");
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let items = normalize(
            vec![
                raw(json!({"id": "dup", "price": 1})),
                raw(json!({"id": "other", "price": 2})),
                raw(json!({"id": "dup", "price": 3})),
            ],
            &usd(),
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::new("dup"));
        assert_eq!(items[0].price, "1".parse().expect("dec"));
        assert_eq!(items[1].id, ItemId::new("other"));
    }

    #[test]
    fn test_order_preserved() {
        let items = normalize(
            vec![
                raw(json!({"id": "x", "price": 1})),
                raw(json!({"price": 99})),
                raw(json!({"id": "y", "price": 2})),
                raw(json!({"id": "z", "price": 3})),
            ],
            &usd(),
        );
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[test]
    fn test_non_object_values_are_dropped() {
        let items = normalize(
            vec![
                raw(json!("garbage")),
                raw(json!(17)),
                raw(json!({"id": "real"})),
            ],
            &usd(),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId::new("real"));
    }

    #[test]
    fn test_snapshot_round_trip_through_normalizer() {
        // Canonical items re-read from a persisted snapshot survive intact
        let original = normalize(
            vec![raw(json!({
                "id": "tk-9",
                "name": "Gala ticket",
                "type": "ticket",
                "price": "75.00",
                "currency": "GBP",
                "quantity": 2
            }))],
            &usd(),
        );

        let serialized = serde_json::to_value(&original).expect("serialize");
        let reread: Vec<RawCartItem> = serde_json::from_value(serialized).expect("deserialize");
        let round_tripped = normalize(reread, &usd());

        assert_eq!(round_tripped, original);
    }
}
