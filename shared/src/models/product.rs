//! Product Model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Discounted price, trusted from the server to be <= price
    pub discount_price: Option<f64>,
    /// Category reference (String ID)
    pub category: String,
    pub brand: String,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub specifications: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub featured: bool,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Product {
    /// Effective unit price after discount.
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }
}

/// Create product payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    pub category: String,
    pub brand: String,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub featured: bool,
}

/// Update product payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn skip_empty(value: &Option<String>) -> bool {
    match value {
        Some(s) => s.is_empty(),
        None => true,
    }
}

/// Catalog filter/sort/pagination query
///
/// Serialized to a query string; `None` and empty-string values are omitted
/// so the backend never sees `?category=`-style keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "skip_empty")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "skip_empty")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "skip_empty")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "skip_empty")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query for one page of the catalog.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }
}
