//! Canonical cart types.

pub mod currency;
pub mod id;
pub mod item;

pub use currency::{CurrencyCode, InvalidCurrency};
pub use id::ItemId;
pub use item::{CartItem, ItemType};
