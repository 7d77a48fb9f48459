//! Resource client
//!
//! One method per backend operation: constructs the path and verb, delegates
//! the round trip to [`HttpClient`], and returns the response envelope
//! unmodified. No business logic, no retries, no caching.

use serde_json::Value;
use std::sync::Arc;

use shared::auth::{LoginData, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest};
use shared::models::{
    Cart, CartItemAdd, CartItemUpdate, Category, CategoryCreate, CategoryUpdate, ContactMessage,
    Order, OrderCreate, OrderStatusUpdate, Product, ProductCreate, ProductQuery, ProductUpdate,
    User, UserStatus, UserStatusUpdate,
};
use shared::response::{ApiResponse, ListQuery, ListResponse};

use crate::error::ClientResult;
use crate::http::HttpClient;

/// Typed request builders for every backend resource
pub struct ApiClient {
    http: Arc<HttpClient>,
}

impl ApiClient {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Underlying HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    // ---- Authentication -----------------------------------------------------

    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<ApiResponse<LoginData>> {
        self.http.post("auth/login", credentials).await
    }

    pub async fn register(&self, data: &RegisterRequest) -> ClientResult<ApiResponse<LoginData>> {
        self.http.post("auth/register", data).await
    }

    pub async fn logout(&self) -> ClientResult<ApiResponse<Value>> {
        self.http.post_empty("auth/logout").await
    }

    pub async fn get_profile(&self) -> ClientResult<ApiResponse<User>> {
        self.http.get("auth/profile").await
    }

    pub async fn update_profile(&self, data: &ProfileUpdate) -> ClientResult<ApiResponse<User>> {
        self.http.put("auth/profile", data).await
    }

    pub async fn change_password(&self, data: &PasswordChange) -> ClientResult<ApiResponse<Value>> {
        self.http.post("auth/change-password", data).await
    }

    // ---- Products -----------------------------------------------------------

    pub async fn get_products(&self, query: &ProductQuery) -> ClientResult<ListResponse> {
        self.http.get_query("products", query).await
    }

    pub async fn get_featured_products(&self, limit: Option<u32>) -> ClientResult<ListResponse> {
        match limit {
            Some(limit) => {
                self.http
                    .get_query("products/featured", &serde_json::json!({ "limit": limit }))
                    .await
            }
            None => self.http.get("products/featured").await,
        }
    }

    pub async fn get_product(&self, id: &str) -> ClientResult<ApiResponse<Product>> {
        self.http.get(&format!("products/{id}")).await
    }

    pub async fn search_products(&self, query: &ProductQuery) -> ClientResult<ListResponse> {
        self.http.get_query("products/search", query).await
    }

    pub async fn create_product(&self, data: &ProductCreate) -> ClientResult<ApiResponse<Product>> {
        self.http.post("products", data).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        data: &ProductUpdate,
    ) -> ClientResult<ApiResponse<Product>> {
        self.http.put(&format!("products/{id}"), data).await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<ApiResponse<Value>> {
        self.http.delete(&format!("products/{id}")).await
    }

    // ---- Categories ---------------------------------------------------------

    pub async fn get_categories(&self) -> ClientResult<ListResponse> {
        self.http.get("categories").await
    }

    pub async fn create_category(
        &self,
        data: &CategoryCreate,
    ) -> ClientResult<ApiResponse<Category>> {
        self.http.post("categories", data).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        data: &CategoryUpdate,
    ) -> ClientResult<ApiResponse<Category>> {
        self.http.put(&format!("categories/{id}"), data).await
    }

    pub async fn delete_category(&self, id: &str) -> ClientResult<ApiResponse<Value>> {
        self.http.delete(&format!("categories/{id}")).await
    }

    // ---- Cart ---------------------------------------------------------------

    pub async fn get_cart(&self) -> ClientResult<ApiResponse<Cart>> {
        self.http.get("cart").await
    }

    pub async fn add_to_cart(&self, data: &CartItemAdd) -> ClientResult<ApiResponse<Cart>> {
        self.http.post("cart/add", data).await
    }

    pub async fn update_cart_item(
        &self,
        product_id: &str,
        data: &CartItemUpdate,
    ) -> ClientResult<ApiResponse<Cart>> {
        self.http.put(&format!("cart/item/{product_id}"), data).await
    }

    pub async fn remove_from_cart(&self, product_id: &str) -> ClientResult<ApiResponse<Value>> {
        self.http.delete(&format!("cart/item/{product_id}")).await
    }

    pub async fn clear_cart(&self) -> ClientResult<ApiResponse<Value>> {
        self.http.delete("cart/clear").await
    }

    // ---- Orders -------------------------------------------------------------

    pub async fn create_order(&self, data: &OrderCreate) -> ClientResult<ApiResponse<Order>> {
        self.http.post("orders", data).await
    }

    pub async fn get_user_orders(&self, query: &ListQuery) -> ClientResult<ListResponse> {
        self.http.get_query("orders/my-orders", query).await
    }

    pub async fn get_order(&self, id: &str) -> ClientResult<ApiResponse<Order>> {
        self.http.get(&format!("orders/{id}")).await
    }

    pub async fn get_all_orders(&self, query: &ListQuery) -> ClientResult<ListResponse> {
        self.http.get_query("orders", query).await
    }

    pub async fn update_order_status(
        &self,
        id: &str,
        data: &OrderStatusUpdate,
    ) -> ClientResult<ApiResponse<Order>> {
        self.http.put(&format!("orders/{id}/status"), data).await
    }

    // ---- Users (admin) ------------------------------------------------------

    pub async fn get_users(&self, query: &ListQuery) -> ClientResult<ListResponse> {
        self.http.get_query("users", query).await
    }

    pub async fn get_user(&self, id: &str) -> ClientResult<ApiResponse<User>> {
        self.http.get(&format!("users/{id}")).await
    }

    pub async fn update_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> ClientResult<ApiResponse<Value>> {
        let body = UserStatusUpdate { status };
        self.http.put(&format!("users/{id}/status"), &body).await
    }

    // ---- Contact ------------------------------------------------------------

    pub async fn send_contact_message(
        &self,
        data: &ContactMessage,
    ) -> ClientResult<ApiResponse<Value>> {
        self.http.post("contact", data).await
    }
}
