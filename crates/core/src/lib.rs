//! ATLVS Cart Core - shared types and pure cart logic.
//!
//! This crate provides the canonical cart data model and the two pure
//! components every ATLVS cart consumer shares:
//!
//! - [`normalize`] - the Line-Item Normalizer, converting loosely-typed
//!   external records (remote API JSON, persisted local snapshots) into
//!   canonical [`CartItem`]s
//! - [`pricing`] - the Totals Calculator, computing subtotal, tax, and
//!   grand total under a flat [`TaxPolicy`]
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP clients, no filesystem access. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and the canonical `CartItem` shape
//! - [`cart`] - Ordered cart container and its mutation invariants
//! - [`normalize`] - Boundary normalization of raw line items
//! - [`pricing`] - Totals computation and rounding policy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod normalize;
pub mod pricing;
pub mod types;

pub use cart::Cart;
pub use normalize::{RawCartItem, normalize};
pub use pricing::{TaxPolicy, Totals, calculate_totals};
pub use types::*;
