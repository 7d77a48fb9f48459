//! Mercato Client - storefront/admin client for the Mercato backend API
//!
//! A presentation-free client layer: a session-aware HTTP wrapper (bearer
//! injection, one-shot token refresh on 401), typed request builders for
//! each backend resource, and a state store with one slice per resource
//! domain. UIs subscribe to the store and the event bus; all mutation flows
//! through the store's async operations.
//!
//! ```no_run
//! use mercato_client::{ClientConfig, Store};
//! use shared::models::ProductQuery;
//!
//! # async fn run() -> mercato_client::ClientResult<()> {
//! let config = ClientConfig::new("http://localhost:3000/api")
//!     .with_storage_path("/tmp/mercato");
//! let store = Store::new(&config)?;
//!
//! // Restore a persisted session, if any
//! store.bootstrap().await;
//!
//! store.fetch_products(ProductQuery::page(1, 12)).await?;
//! let products = store.products_state().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod store;
pub mod token;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use notify::{ClientEvent, EventBus, NoticeLevel};
pub use store::Store;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

// Re-export shared types for convenience
pub use shared::auth::{LoginRequest, RegisterRequest, TokenPair};
pub use shared::response::{ApiResponse, ListQuery, PageInfo};
