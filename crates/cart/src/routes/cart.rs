//! Cart route handlers.
//!
//! All handlers respond with JSON. Totals are recomputed from the
//! current items on every request and rounded here, at the display
//! boundary - never persisted.

use atlvs_core::{CartItem, ItemId, Totals};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::session::CartSource;
use crate::state::AppState;

/// Cart payload returned to display consumers.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: Totals,
    /// Uniform cart currency; `null` when the cart is empty or mixed.
    pub currency: Option<String>,
    pub item_count: u32,
    pub source: CartSource,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub id: ItemId,
    pub quantity: u32,
}

/// Remove item request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub id: ItemId,
}

/// Item count payload (badge rendering).
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

/// Checkout payload consumed by the downstream checkout flow.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub items: Vec<CartItem>,
    pub totals: Totals,
    pub currency: String,
}

async fn cart_response(state: &AppState) -> CartResponse {
    let session = state.session().read().await;
    CartResponse {
        items: session.cart().items().to_vec(),
        totals: session.totals().rounded(),
        currency: session
            .cart()
            .currency()
            .map(|c| c.as_str().to_string()),
        item_count: session.cart().item_count(),
        source: session.source(),
    }
}

/// Current cart with display totals.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartResponse> {
    Json(cart_response(&state).await)
}

/// Update a line item's quantity.
///
/// Quantities below the floor of 1 and unknown ids leave the cart
/// unchanged; either way the response is the cart a display should now
/// show.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Json<CartResponse> {
    {
        let mut session = state.session().write().await;
        if !session.update_quantity(&body.id, body.quantity) {
            tracing::debug!(id = %body.id, quantity = body.quantity, "Quantity update ignored");
        }
    }
    Json(cart_response(&state).await)
}

/// Remove a line item.
///
/// Unknown ids are a no-op; surviving items keep their order.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveItemRequest>,
) -> Json<CartResponse> {
    {
        let mut session = state.session().write().await;
        if !session.remove_item(&body.id) {
            tracing::debug!(id = %body.id, "Remove ignored, id not in cart");
        }
    }
    Json(cart_response(&state).await)
}

/// Reload the cart from its sources.
///
/// A fresh load supersedes the current snapshot wholesale.
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Json<CartResponse> {
    {
        let mut session = state.session().write().await;
        let source = session.load().await;
        tracing::info!(?source, "Cart reloaded");
    }
    Json(cart_response(&state).await)
}

/// Item count for badge rendering.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountResponse> {
    let session = state.session().read().await;
    Json(CartCountResponse {
        count: session.cart().item_count(),
    })
}

/// Checkout payload for the downstream flow.
///
/// Refuses an empty cart, and refuses to hand over lines that disagree
/// on currency - summing across currencies would misprice the order and
/// conversion is out of scope.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutResponse>> {
    let session = state.session().read().await;

    if session.cart().is_empty() {
        return Err(AppError::Unprocessable("cart is empty".to_string()));
    }
    let Some(currency) = session.cart().currency() else {
        return Err(AppError::Unprocessable(
            "cart mixes currencies".to_string(),
        ));
    };

    Ok(Json(CheckoutResponse {
        items: session.cart().items().to_vec(),
        totals: session.totals().rounded(),
        currency: currency.as_str().to_string(),
    }))
}
