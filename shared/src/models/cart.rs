//! Cart Model

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One line of a cart
///
/// `product` is the populated product snapshot the backend embeds under the
/// `productId` key; `total` is the server-computed line total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "productId")]
    pub product: Product,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

/// Cart entity, one per authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub total_items: u32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemAdd {
    pub product_id: String,
    pub quantity: u32,
}

/// Update-quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: u32,
}

/// Cart aggregate rule: total item count and total amount.
///
/// This is the one aggregate the client ever derives itself (optimistic item
/// removal); it must match the server's own summation: Σ quantity and
/// Σ line total over the items.
pub fn cart_totals(items: &[CartItem]) -> (u32, f64) {
    let total_items = items.iter().map(|item| item.quantity).sum();
    let total_amount = items.iter().map(|item| item.total).sum();
    (total_items, total_amount)
}

impl Cart {
    /// Remove a product's line and recompute the aggregates locally.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product.id != product_id);
        let (total_items, total_amount) = cart_totals(&self.items);
        self.total_items = total_items;
        self.total_amount = total_amount;
    }
}
