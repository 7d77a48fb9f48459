//! Shared types for the Mercato client
//!
//! Wire-format types consumed by the client library: domain models,
//! auth DTOs and the API response envelopes.

pub mod auth;
pub mod models;
pub mod response;

// Re-exports
pub use auth::{LoginData, LoginRequest, PasswordChange, ProfileUpdate, RefreshRequest, RegisterRequest, TokenPair};
pub use response::{ApiResponse, ListQuery, ListResponse, PageInfo, coerce_list};
pub use serde::{Deserialize, Serialize};
