//! Order Model
//!
//! Orders are immutable purchase-time snapshots: item name/price/image are
//! captured at checkout and decoupled from the live catalog. Status
//! transitions are server-enforced; the client only displays and requests
//! them.

use serde::{Deserialize, Serialize};

/// Order lifecycle state machine value
///
/// `pending → confirmed/processing → shipped → delivered`, or `cancelled`
/// at any point before delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// Shipping address captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

/// One ordered line, snapshotted at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub total: f64,
    pub image: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub order_number: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Status transition request (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
}
