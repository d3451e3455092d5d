//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::CartConfig;
use crate::error::AppError;
use crate::session::CartSession;
use crate::snapshot::FileSnapshotStore;
use crate::upstream::UpstreamClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The cart snapshot is single-owner (one
/// session per process), so a `RwLock` around the session is the only
/// coordination needed.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CartConfig,
    session: RwLock<CartSession>,
}

impl AppState {
    /// Create application state with production collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: CartConfig) -> Result<Self, AppError> {
        let backend = Arc::new(UpstreamClient::new(&config.upstream)?);
        let store = Arc::new(FileSnapshotStore::new(&config.snapshot_dir));
        let session = CartSession::new(
            backend,
            store,
            config.tax_policy.clone(),
            config.fallback_currency.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session: RwLock::new(session),
            }),
        })
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &CartConfig {
        &self.inner.config
    }

    /// Get a reference to the shared cart session.
    #[must_use]
    pub fn session(&self) -> &RwLock<CartSession> {
        &self.inner.session
    }
}
