//! HTTP route handlers for the cart service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Liveness check (wired in main)
//!
//! # Cart
//! GET  /cart          - Cart with display totals
//! POST /cart/update   - Update line quantity
//! POST /cart/remove   - Remove line
//! POST /cart/reload   - Reload from remote (snapshot fallback)
//! GET  /cart/count    - Item count badge payload
//!
//! # Checkout
//! GET  /checkout      - Checkout payload for the downstream flow
//! ```

pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/reload", post(cart::reload))
        .route("/count", get(cart::count))
}

/// Create all routes for the cart service.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout payload
        .route("/checkout", get(cart::checkout))
}
