//! Cart session orchestration: load, mutate, persist.

use std::sync::Arc;

use atlvs_core::{Cart, CurrencyCode, ItemId, TaxPolicy, Totals, normalize};
use serde::Serialize;
use tracing::{debug, warn};

use crate::snapshot::SnapshotStore;
use crate::upstream::CartBackend;

/// Where the current cart snapshot came from.
///
/// All three are equally valid ready states with no automatic retry;
/// consumers see which source produced the items, so an empty remote
/// cart and a double failure are distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartSource {
    /// Remote load succeeded with a non-empty cart.
    Remote,
    /// Remote failed or was empty; the local snapshot supplied the items.
    LocalFallback,
    /// Neither source produced items.
    Empty,
}

/// A single-owner cart session.
///
/// One session owns one cart snapshot: there is no cross-instance
/// coordination to do, only the load/mutate/persist cycle. Loads replace
/// the snapshot wholesale; mutations edit it and persist the result
/// before returning.
pub struct CartSession {
    cart: Cart,
    source: CartSource,
    backend: Arc<dyn CartBackend>,
    store: Arc<dyn SnapshotStore>,
    policy: TaxPolicy,
    fallback_currency: CurrencyCode,
}

impl CartSession {
    /// Create a session in the `Empty` ready state.
    #[must_use]
    pub fn new(
        backend: Arc<dyn CartBackend>,
        store: Arc<dyn SnapshotStore>,
        policy: TaxPolicy,
        fallback_currency: CurrencyCode,
    ) -> Self {
        Self {
            cart: Cart::default(),
            source: CartSource::Empty,
            backend,
            store,
            policy,
            fallback_currency,
        }
    }

    /// Load the cart: remote first, local snapshot as fallback.
    ///
    /// State is assigned in a single step after the fetch completes, so
    /// a load whose future is dropped mid-flight (the requester went
    /// away) leaves the previous snapshot untouched.
    pub async fn load(&mut self) -> CartSource {
        let (cart, source) = self.resolve_load().await;
        self.cart = cart;
        self.source = source;
        self.source
    }

    async fn resolve_load(&self) -> (Cart, CartSource) {
        match self.backend.fetch_items().await {
            Ok(raw) => {
                let items = normalize(raw, &self.fallback_currency);
                if items.is_empty() {
                    debug!("Remote cart empty, trying local snapshot");
                    self.load_fallback()
                } else {
                    (Cart::new(items), CartSource::Remote)
                }
            }
            Err(e) => {
                warn!("Remote cart load failed, trying local snapshot: {e}");
                self.load_fallback()
            }
        }
    }

    fn load_fallback(&self) -> (Cart, CartSource) {
        let raw = match self.store.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return (Cart::default(), CartSource::Empty),
            Err(e) => {
                warn!("Local snapshot read failed: {e}");
                return (Cart::default(), CartSource::Empty);
            }
        };

        let items = normalize(raw, &self.fallback_currency);
        if items.is_empty() {
            (Cart::default(), CartSource::Empty)
        } else {
            (Cart::new(items), CartSource::LocalFallback)
        }
    }

    /// Set a line item's quantity and persist the snapshot.
    ///
    /// Returns `false` when the id is unknown or the quantity is below
    /// the floor of 1; the cart is unchanged and nothing is written.
    pub fn update_quantity(&mut self, id: &ItemId, quantity: u32) -> bool {
        let changed = self.cart.update_quantity(id, quantity);
        if changed {
            self.persist();
        }
        changed
    }

    /// Remove a line item and persist the snapshot.
    ///
    /// Returns `false` when the id is unknown.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let changed = self.cart.remove(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Persist the current items to the local slot.
    ///
    /// A persistence failure degrades the next fallback load, not the
    /// mutation that triggered it: logged and swallowed.
    fn persist(&self) {
        if let Err(e) = self.store.write(self.cart.items()) {
            warn!("Failed to persist cart snapshot: {e}");
        }
    }

    /// Current cart snapshot.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Source of the current snapshot.
    #[must_use]
    pub const fn source(&self) -> CartSource {
        self.source
    }

    /// Display totals for the current items.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.cart.totals(&self.policy)
    }
}
