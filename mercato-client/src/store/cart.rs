//! Cart slice
//!
//! The server owns cart totals: fetch/add/update replace the whole cart from
//! the response. Item removal is the one optimistic path, recomputing the
//! aggregates locally with the shared summation rule.

use shared::models::{Cart, CartItemAdd, CartItemUpdate};

use super::{Store, rejection_message, require_data};
use crate::error::ClientResult;

/// Cart slice state
#[derive(Debug, Clone, Default)]
pub struct CartState {
    pub cart: Option<Cart>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Store {
    /// Authoritative refresh of the whole cart.
    pub async fn fetch_cart(&self) -> ClientResult<()> {
        {
            let mut state = self.cart.write().await;
            state.loading = true;
            state.error = None;
        }
        let outcome = self
            .api
            .get_cart()
            .await
            .and_then(|envelope| require_data(envelope, "Cart"));
        let mut state = self.cart.write().await;
        state.loading = false;
        match outcome {
            Ok(cart) => {
                state.cart = Some(cart);
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to fetch cart"));
                Err(err)
            }
        }
    }

    /// Add a product; the server recomputes totals and returns the new cart.
    pub async fn add_to_cart(&self, data: CartItemAdd) -> ClientResult<()> {
        let outcome = self
            .api
            .add_to_cart(&data)
            .await
            .and_then(|envelope| require_data(envelope, "Cart"));
        let mut state = self.cart.write().await;
        match outcome {
            Ok(cart) => {
                state.cart = Some(cart);
                self.events.success("Product added to cart!");
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to add to cart"));
                Err(err)
            }
        }
    }

    /// Change a line's quantity; server response replaces the cart.
    ///
    /// Quantities below 1 are a caller-side guard (the view disables the
    /// control); the slice forwards whatever it is given.
    pub async fn update_cart_item(&self, product_id: &str, quantity: u32) -> ClientResult<()> {
        let data = CartItemUpdate { quantity };
        let outcome = self
            .api
            .update_cart_item(product_id, &data)
            .await
            .and_then(|envelope| require_data(envelope, "Cart"));
        let mut state = self.cart.write().await;
        match outcome {
            Ok(cart) => {
                state.cart = Some(cart);
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to update cart item"));
                Err(err)
            }
        }
    }

    /// Remove a line optimistically: filter it out and recompute totals
    /// locally, without a full re-fetch.
    pub async fn remove_from_cart(&self, product_id: &str) -> ClientResult<()> {
        match self.api.remove_from_cart(product_id).await {
            Ok(_) => {
                let mut state = self.cart.write().await;
                if let Some(cart) = state.cart.as_mut() {
                    cart.remove_item(product_id);
                }
                self.events.success("Product removed from cart!");
                Ok(())
            }
            Err(err) => {
                let mut state = self.cart.write().await;
                state.error = Some(rejection_message(&err, "Failed to remove from cart"));
                Err(err)
            }
        }
    }

    /// Empty the cart.
    pub async fn clear_cart(&self) -> ClientResult<()> {
        match self.api.clear_cart().await {
            Ok(_) => {
                let mut state = self.cart.write().await;
                state.cart = None;
                self.events.success("Cart cleared!");
                Ok(())
            }
            Err(err) => {
                let mut state = self.cart.write().await;
                state.error = Some(rejection_message(&err, "Failed to clear cart"));
                Err(err)
            }
        }
    }

    /// Clear the cart slice's error flag.
    pub async fn clear_cart_error(&self) {
        self.cart.write().await.error = None;
    }
}
