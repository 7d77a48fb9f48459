//! Users slice (admin): account list and status toggles

use shared::models::{User, UserStatus};
use shared::response::{ListQuery, PageInfo};

use super::{Store, rejection_message};
use crate::error::ClientResult;

/// Users slice state
#[derive(Debug, Clone, Default)]
pub struct UsersState {
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: PageInfo,
    pub(crate) list_seq: u64,
}

impl Store {
    /// Fetch one page of accounts.
    pub async fn fetch_users(&self, query: ListQuery) -> ClientResult<()> {
        let seq = {
            let mut state = self.users.write().await;
            state.loading = true;
            state.error = None;
            state.list_seq += 1;
            state.list_seq
        };
        let result = self.api.get_users(&query).await;
        let mut state = self.users.write().await;
        if seq != state.list_seq {
            return result.map(|_| ());
        }
        state.loading = false;
        match result {
            Ok(response) => {
                state.users = response.items();
                if let Some(pagination) = response.pagination {
                    state.pagination = pagination;
                }
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to fetch users"));
                state.users = Vec::new();
                Err(err)
            }
        }
    }

    /// Toggle an account's status; on success the matching list entry is
    /// patched in place.
    pub async fn update_user_status(&self, id: &str, status: UserStatus) -> ClientResult<()> {
        match self.api.update_user_status(id, status).await {
            Ok(_) => {
                let mut state = self.users.write().await;
                if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
                    user.status = status;
                }
                self.events.success("User status updated successfully!");
                Ok(())
            }
            Err(err) => {
                let mut state = self.users.write().await;
                state.error = Some(rejection_message(&err, "Failed to update user status"));
                Err(err)
            }
        }
    }

    /// Clear the users slice's error flag.
    pub async fn clear_users_error(&self) {
        self.users.write().await.error = None;
    }
}
