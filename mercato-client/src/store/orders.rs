//! Orders slice: checkout, order history, and the admin order console

use shared::models::{Order, OrderCreate, OrderStatus, OrderStatusUpdate};
use shared::response::{ListQuery, PageInfo};

use super::{Store, rejection_message, require_data};
use crate::error::ClientResult;

/// Orders slice state
#[derive(Debug, Clone, Default)]
pub struct OrdersState {
    pub orders: Vec<Order>,
    pub current: Option<Order>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: PageInfo,
    pub(crate) list_seq: u64,
}

impl Store {
    /// Place an order; the created order becomes `current` and heads the list.
    pub async fn create_order(&self, data: OrderCreate) -> ClientResult<Order> {
        {
            let mut state = self.orders.write().await;
            state.loading = true;
            state.error = None;
        }
        let outcome = self
            .api
            .create_order(&data)
            .await
            .and_then(|envelope| require_data(envelope, "Order"));
        let mut state = self.orders.write().await;
        state.loading = false;
        match outcome {
            Ok(order) => {
                state.current = Some(order.clone());
                state.orders.insert(0, order.clone());
                self.events.success("Order placed successfully!");
                Ok(order)
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to create order"));
                Err(err)
            }
        }
    }

    /// Fetch the signed-in user's order history.
    pub async fn fetch_user_orders(&self, query: ListQuery) -> ClientResult<()> {
        let seq = {
            let mut state = self.orders.write().await;
            state.loading = true;
            state.error = None;
            state.list_seq += 1;
            state.list_seq
        };
        let result = self.api.get_user_orders(&query).await;
        self.apply_order_list(seq, result, "Failed to fetch orders").await
    }

    /// Fetch every order (admin console).
    pub async fn fetch_all_orders(&self, query: ListQuery) -> ClientResult<()> {
        let seq = {
            let mut state = self.orders.write().await;
            state.loading = true;
            state.error = None;
            state.list_seq += 1;
            state.list_seq
        };
        let result = self.api.get_all_orders(&query).await;
        self.apply_order_list(seq, result, "Failed to fetch orders").await
    }

    async fn apply_order_list(
        &self,
        seq: u64,
        result: ClientResult<shared::response::ListResponse>,
        fallback: &str,
    ) -> ClientResult<()> {
        let mut state = self.orders.write().await;
        if seq != state.list_seq {
            tracing::debug!(seq, latest = state.list_seq, "Dropping stale order list response");
            return result.map(|_| ());
        }
        state.loading = false;
        match result {
            Ok(response) => {
                state.orders = response.items();
                if let Some(pagination) = response.pagination {
                    state.pagination = pagination;
                }
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, fallback));
                state.orders = Vec::new();
                Err(err)
            }
        }
    }

    /// Fetch a single order into `current`.
    pub async fn fetch_order(&self, id: &str) -> ClientResult<()> {
        let outcome = self
            .api
            .get_order(id)
            .await
            .and_then(|envelope| require_data(envelope, "Order"));
        let mut state = self.orders.write().await;
        match outcome {
            Ok(order) => {
                state.current = Some(order);
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to fetch order"));
                Err(err)
            }
        }
    }

    /// Request a status transition (admin); the server enforces the state
    /// machine and returns the updated order.
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<()> {
        let data = OrderStatusUpdate { order_status: status };
        let outcome = self
            .api
            .update_order_status(id, &data)
            .await
            .and_then(|envelope| require_data(envelope, "Order"));
        let mut state = self.orders.write().await;
        match outcome {
            Ok(order) => {
                if let Some(slot) = state.orders.iter_mut().find(|o| o.id == order.id) {
                    *slot = order.clone();
                }
                if state.current.as_ref().is_some_and(|o| o.id == order.id) {
                    state.current = Some(order);
                }
                self.events.success("Order status updated successfully!");
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to update order status"));
                Err(err)
            }
        }
    }

    /// Drop the single-order view state.
    pub async fn clear_current_order(&self) {
        self.orders.write().await.current = None;
    }

    /// Clear the orders slice's error flag.
    pub async fn clear_orders_error(&self) {
        self.orders.write().await.error = None;
    }
}
