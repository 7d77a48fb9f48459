//! Categories slice: navigation vocabulary plus the admin CRUD flows

use shared::models::{Category, CategoryCreate, CategoryUpdate};

use super::{Store, rejection_message, require_data};
use crate::error::ClientResult;

/// Categories slice state
#[derive(Debug, Clone, Default)]
pub struct CategoriesState {
    pub categories: Vec<Category>,
    pub loading: bool,
    pub error: Option<String>,
    pub(crate) list_seq: u64,
}

impl Store {
    /// Fetch all categories.
    pub async fn fetch_categories(&self) -> ClientResult<()> {
        let seq = {
            let mut state = self.categories.write().await;
            state.loading = true;
            state.error = None;
            state.list_seq += 1;
            state.list_seq
        };
        let result = self.api.get_categories().await;
        let mut state = self.categories.write().await;
        if seq != state.list_seq {
            return result.map(|_| ());
        }
        state.loading = false;
        match result {
            Ok(response) => {
                state.categories = response.items();
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to fetch categories"));
                state.categories = Vec::new();
                Err(err)
            }
        }
    }

    /// Create a category (admin); prepends it to the in-memory list.
    pub async fn create_category(&self, data: CategoryCreate) -> ClientResult<Category> {
        let outcome = self
            .api
            .create_category(&data)
            .await
            .and_then(|envelope| require_data(envelope, "Category"));
        let mut state = self.categories.write().await;
        match outcome {
            Ok(category) => {
                state.categories.insert(0, category.clone());
                self.events.success("Category created successfully!");
                Ok(category)
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to create category"));
                Err(err)
            }
        }
    }

    /// Update a category (admin); replaces it in place by id.
    pub async fn update_category(&self, id: &str, data: CategoryUpdate) -> ClientResult<()> {
        let outcome = self
            .api
            .update_category(id, &data)
            .await
            .and_then(|envelope| require_data(envelope, "Category"));
        let mut state = self.categories.write().await;
        match outcome {
            Ok(category) => {
                if let Some(slot) = state.categories.iter_mut().find(|c| c.id == category.id) {
                    *slot = category;
                }
                self.events.success("Category updated successfully!");
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to update category"));
                Err(err)
            }
        }
    }

    /// Delete a category (admin); filters it out of the in-memory list.
    pub async fn delete_category(&self, id: &str) -> ClientResult<()> {
        match self.api.delete_category(id).await {
            Ok(_) => {
                let mut state = self.categories.write().await;
                state.categories.retain(|c| c.id != id);
                self.events.success("Category deleted successfully!");
                Ok(())
            }
            Err(err) => {
                let mut state = self.categories.write().await;
                state.error = Some(rejection_message(&err, "Failed to delete category"));
                Err(err)
            }
        }
    }

    /// Clear the categories slice's error flag.
    pub async fn clear_categories_error(&self) {
        self.categories.write().await.error = None;
    }
}
