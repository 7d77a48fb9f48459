//! Auth slice: session lifecycle and the current user's profile

use shared::auth::{LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest, TokenPair};
use shared::models::User;

use super::{Store, rejection_message, require_data};
use crate::error::ClientResult;

/// Auth slice state
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Store {
    /// Log in and persist the issued token pair.
    pub async fn login(&self, credentials: LoginRequest) -> ClientResult<User> {
        {
            let mut state = self.auth.write().await;
            state.loading = true;
            state.error = None;
        }
        let result = self.api.login(&credentials).await;
        self.apply_session_result(result, "Login failed").await
    }

    /// Register a new account; a successful registration also starts a session.
    pub async fn register(&self, data: RegisterRequest) -> ClientResult<User> {
        {
            let mut state = self.auth.write().await;
            state.loading = true;
            state.error = None;
        }
        let result = self.api.register(&data).await;
        self.apply_session_result(result, "Registration failed").await
    }

    async fn apply_session_result(
        &self,
        result: ClientResult<shared::response::ApiResponse<shared::auth::LoginData>>,
        fallback: &str,
    ) -> ClientResult<User> {
        let outcome = match result {
            Ok(envelope) => require_data(envelope, "Auth"),
            Err(err) => Err(err),
        };
        let mut state = self.auth.write().await;
        state.loading = false;
        match outcome {
            Ok(data) => {
                self.tokens.store(data.tokens());
                tracing::debug!(user = %data.user.email, "Session established");
                state.user = Some(data.user.clone());
                state.is_authenticated = true;
                Ok(data.user)
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, fallback));
                Err(err)
            }
        }
    }

    /// Log out: the server call is best-effort, the local session always ends.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::debug!(%err, "Logout request failed, clearing session anyway");
        }
        self.tokens.clear();
        let mut state = self.auth.write().await;
        *state = AuthState::default();
    }

    /// Fetch the current user's profile and hydrate auth state.
    pub async fn get_profile(&self) -> ClientResult<()> {
        {
            let mut state = self.auth.write().await;
            state.loading = true;
            state.error = None;
        }
        let outcome = self
            .api
            .get_profile()
            .await
            .and_then(|envelope| require_data(envelope, "Profile"));
        let mut state = self.auth.write().await;
        state.loading = false;
        match outcome {
            Ok(user) => {
                state.user = Some(user);
                state.is_authenticated = true;
                Ok(())
            }
            Err(err) => {
                state.user = None;
                state.is_authenticated = false;
                state.error = Some(rejection_message(&err, "Failed to fetch profile"));
                Err(err)
            }
        }
    }

    /// Update the current user's profile.
    pub async fn update_profile(&self, data: ProfileUpdate) -> ClientResult<()> {
        let outcome = self
            .api
            .update_profile(&data)
            .await
            .and_then(|envelope| require_data(envelope, "Profile"));
        let mut state = self.auth.write().await;
        match outcome {
            Ok(user) => {
                state.user = Some(user);
                self.events.success("Profile updated successfully!");
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to update profile"));
                Err(err)
            }
        }
    }

    /// Change the current user's password.
    pub async fn change_password(&self, data: PasswordChange) -> ClientResult<()> {
        match self.api.change_password(&data).await {
            Ok(_) => {
                self.events.success("Password changed successfully!");
                Ok(())
            }
            Err(err) => {
                let mut state = self.auth.write().await;
                state.error = Some(rejection_message(&err, "Failed to change password"));
                Err(err)
            }
        }
    }

    /// Clear the auth slice's error flag.
    pub async fn clear_auth_error(&self) {
        self.auth.write().await.error = None;
    }

    /// Seed a session directly (embedder already holds a valid pair).
    pub fn adopt_tokens(&self, pair: TokenPair) {
        self.tokens.store(pair);
    }
}
