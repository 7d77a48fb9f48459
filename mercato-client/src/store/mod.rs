//! Client state store
//!
//! Single owner of all client-side state, one slice per resource domain.
//! Async operations are the only mutators: each one calls the resource
//! client, then applies the outcome to its slice under the write lock, so
//! state transitions are serialized per slice. Views take snapshots and
//! never hold references into the store.
//!
//! Operation impl blocks live in the per-slice files, mirroring the resource
//! split of the backend.

mod auth;
mod cart;
mod categories;
mod contact;
mod orders;
mod products;
mod users;

pub use auth::AuthState;
pub use cart::CartState;
pub use categories::CategoriesState;
pub use contact::ContactState;
pub use orders::OrdersState;
pub use products::ProductsState;
pub use users::UsersState;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::notify::EventBus;
use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Client state store
pub struct Store {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    events: EventBus,
    pub(crate) auth: RwLock<AuthState>,
    pub(crate) products: RwLock<ProductsState>,
    pub(crate) cart: RwLock<CartState>,
    pub(crate) orders: RwLock<OrdersState>,
    pub(crate) categories: RwLock<CategoriesState>,
    pub(crate) users: RwLock<UsersState>,
    pub(crate) contact: RwLock<ContactState>,
}

impl Store {
    /// Build a store from configuration.
    ///
    /// Tokens persist to `storage_path` when configured, otherwise they stay
    /// in memory for the process lifetime.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let tokens: Arc<dyn TokenStore> = match &config.storage_path {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_token_store(config, tokens)
    }

    /// Build a store with an externally provided token store.
    pub fn with_token_store(
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> ClientResult<Self> {
        let events = EventBus::new();
        let http = Arc::new(HttpClient::new(config, tokens.clone(), events.clone())?);
        Ok(Self {
            api: ApiClient::new(http),
            tokens,
            events,
            auth: RwLock::new(AuthState::default()),
            products: RwLock::new(ProductsState::default()),
            cart: RwLock::new(CartState::default()),
            orders: RwLock::new(OrdersState::default()),
            categories: RwLock::new(CategoriesState::default()),
            users: RwLock::new(UsersState::default()),
            contact: RwLock::new(ContactState::default()),
        })
    }

    /// Resource client used by the operations.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Token store shared with the HTTP layer.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Event bus for notices and session expiry.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Session bootstrap: hydrate auth state from a persisted token.
    ///
    /// No local expiry check is made; validity is discovered by the profile
    /// call itself (its 401 path refreshes or clears the session). A failure
    /// here is therefore swallowed.
    pub async fn bootstrap(&self) {
        if self.tokens.access().is_none() {
            return;
        }
        tracing::debug!("Bootstrapping session from persisted token");
        if let Err(err) = self.get_profile().await {
            tracing::debug!(%err, "Session bootstrap did not restore a profile");
        }
    }

    // ---- slice snapshots ----------------------------------------------------

    pub async fn auth_state(&self) -> AuthState {
        self.auth.read().await.clone()
    }

    pub async fn products_state(&self) -> ProductsState {
        self.products.read().await.clone()
    }

    pub async fn cart_state(&self) -> CartState {
        self.cart.read().await.clone()
    }

    pub async fn orders_state(&self) -> OrdersState {
        self.orders.read().await.clone()
    }

    pub async fn categories_state(&self) -> CategoriesState {
        self.categories.read().await.clone()
    }

    pub async fn users_state(&self) -> UsersState {
        self.users.read().await.clone()
    }

    pub async fn contact_state(&self) -> ContactState {
        self.contact.read().await.clone()
    }
}

/// Slice-level rejection message: the server's structured message when there
/// is one, otherwise the operation's fixed fallback text.
pub(crate) fn rejection_message(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Api { message, .. } => message.clone(),
        ClientError::SessionExpired(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

/// Unwrap the `data` field of a success envelope.
pub(crate) fn require_data<T>(
    envelope: shared::response::ApiResponse<T>,
    what: &str,
) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::InvalidResponse(format!("{what} response missing data")))
}
