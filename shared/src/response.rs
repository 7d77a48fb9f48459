//! API response envelopes
//!
//! The backend wraps every response as `{success, message, data}` and adds a
//! `pagination` block on list endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unified API response structure
///
/// ```json
/// {
///     "success": true,
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: Some("Success".to_string()),
            data: Some(data),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Pagination metadata returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page number (1-based)
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Total number of items
    pub total_items: u64,
    /// Whether a next page exists (not sent by every endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
    /// Whether a previous page exists (not sent by every endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_prev_page: Option<bool>,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            has_next_page: None,
            has_prev_page: None,
        }
    }
}

/// List response wrapper
///
/// `data` stays raw JSON here: list endpoints occasionally return a non-array
/// payload and the client coerces that to an empty list via [`coerce_list`]
/// instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub pagination: Option<PageInfo>,
}

impl ListResponse {
    /// Decode the `data` field into a typed list, coercing malformed shapes.
    pub fn items<T: serde::de::DeserializeOwned>(&self) -> Vec<T> {
        coerce_list(self.data.clone())
    }
}

fn skip_empty(value: &Option<String>) -> bool {
    match value {
        Some(s) => s.is_empty(),
        None => true,
    }
}

/// Generic list query: pagination plus the common filter keys.
///
/// `None` and empty-string values are left out of the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "skip_empty")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "skip_empty")]
    pub status: Option<String>,
}

impl ListQuery {
    /// Query for one page.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Coerce a raw JSON payload into a typed list.
///
/// Non-array payloads (objects, strings, null) become an empty list rather
/// than an error. An array whose elements fail to decode is treated the same
/// way: the backend contract makes this a malformed response, and the client
/// contract is that list state is always an array.
pub fn coerce_list<T: serde::de::DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => Vec::new(),
    }
}
