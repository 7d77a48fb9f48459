//! Products slice: catalog list, featured list, current product, filters

use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate};
use shared::response::PageInfo;

use super::{Store, rejection_message, require_data};
use crate::error::ClientResult;

/// Products slice state
#[derive(Debug, Clone, Default)]
pub struct ProductsState {
    pub products: Vec<Product>,
    pub featured: Vec<Product>,
    pub current: Option<Product>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: PageInfo,
    pub filters: ProductQuery,
    /// Latest issued catalog-list request; stale completions are dropped
    pub(crate) list_seq: u64,
    /// Latest issued featured-list request
    pub(crate) featured_seq: u64,
}

impl Store {
    /// Fetch one page of the catalog.
    pub async fn fetch_products(&self, query: ProductQuery) -> ClientResult<()> {
        let seq = {
            let mut state = self.products.write().await;
            state.loading = true;
            state.error = None;
            state.list_seq += 1;
            state.list_seq
        };
        let result = self.api.get_products(&query).await;
        let mut state = self.products.write().await;
        if seq != state.list_seq {
            tracing::debug!(seq, latest = state.list_seq, "Dropping stale product list response");
            return result.map(|_| ());
        }
        state.loading = false;
        match result {
            Ok(response) => {
                state.products = response.items();
                if let Some(pagination) = response.pagination {
                    state.pagination = pagination;
                }
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to fetch products"));
                state.products = Vec::new();
                Err(err)
            }
        }
    }

    /// Search the catalog; shares list state (and the stale guard) with
    /// [`fetch_products`](Store::fetch_products) because both write it.
    pub async fn search_products(&self, query: ProductQuery) -> ClientResult<()> {
        let seq = {
            let mut state = self.products.write().await;
            state.loading = true;
            state.error = None;
            state.list_seq += 1;
            state.list_seq
        };
        let result = self.api.search_products(&query).await;
        let mut state = self.products.write().await;
        if seq != state.list_seq {
            tracing::debug!(seq, latest = state.list_seq, "Dropping stale search response");
            return result.map(|_| ());
        }
        state.loading = false;
        match result {
            Ok(response) => {
                state.products = response.items();
                if let Some(pagination) = response.pagination {
                    state.pagination = pagination;
                }
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to search products"));
                state.products = Vec::new();
                Err(err)
            }
        }
    }

    /// Fetch the featured products strip.
    pub async fn fetch_featured_products(&self, limit: Option<u32>) -> ClientResult<()> {
        let seq = {
            let mut state = self.products.write().await;
            state.featured_seq += 1;
            state.featured_seq
        };
        let result = self.api.get_featured_products(limit).await;
        let mut state = self.products.write().await;
        if seq != state.featured_seq {
            return result.map(|_| ());
        }
        match result {
            Ok(response) => {
                state.featured = response.items();
                Ok(())
            }
            Err(err) => {
                state.featured = Vec::new();
                Err(err)
            }
        }
    }

    /// Fetch a single product into `current`.
    pub async fn fetch_product(&self, id: &str) -> ClientResult<()> {
        {
            let mut state = self.products.write().await;
            state.loading = true;
            state.error = None;
        }
        let outcome = self
            .api
            .get_product(id)
            .await
            .and_then(|envelope| require_data(envelope, "Product"));
        let mut state = self.products.write().await;
        state.loading = false;
        match outcome {
            Ok(product) => {
                state.current = Some(product);
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to fetch product"));
                Err(err)
            }
        }
    }

    /// Create a product (admin); prepends it to the in-memory list.
    pub async fn create_product(&self, data: ProductCreate) -> ClientResult<Product> {
        let outcome = self
            .api
            .create_product(&data)
            .await
            .and_then(|envelope| require_data(envelope, "Product"));
        let mut state = self.products.write().await;
        match outcome {
            Ok(product) => {
                state.products.insert(0, product.clone());
                self.events.success("Product created successfully!");
                Ok(product)
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to create product"));
                Err(err)
            }
        }
    }

    /// Update a product (admin); replaces it in place by id.
    pub async fn update_product(&self, id: &str, data: ProductUpdate) -> ClientResult<()> {
        let outcome = self
            .api
            .update_product(id, &data)
            .await
            .and_then(|envelope| require_data(envelope, "Product"));
        let mut state = self.products.write().await;
        match outcome {
            Ok(product) => {
                if let Some(slot) = state.products.iter_mut().find(|p| p.id == product.id) {
                    *slot = product.clone();
                }
                if state.current.as_ref().is_some_and(|p| p.id == product.id) {
                    state.current = Some(product);
                }
                self.events.success("Product updated successfully!");
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to update product"));
                Err(err)
            }
        }
    }

    /// Delete a product (admin); filters it out of the in-memory list.
    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        match self.api.delete_product(id).await {
            Ok(_) => {
                let mut state = self.products.write().await;
                state.products.retain(|p| p.id != id);
                self.events.success("Product deleted successfully!");
                Ok(())
            }
            Err(err) => {
                let mut state = self.products.write().await;
                state.error = Some(rejection_message(&err, "Failed to delete product"));
                Err(err)
            }
        }
    }

    /// Remember the active catalog filters.
    pub async fn set_product_filters(&self, filters: ProductQuery) {
        self.products.write().await.filters = filters;
    }

    /// Reset the active catalog filters.
    pub async fn clear_product_filters(&self) {
        self.products.write().await.filters = ProductQuery::default();
    }

    /// Drop the single-product view state.
    pub async fn clear_current_product(&self) {
        self.products.write().await.current = None;
    }

    /// Clear the products slice's error flag.
    pub async fn clear_products_error(&self) {
        self.products.write().await.error = None;
    }
}
