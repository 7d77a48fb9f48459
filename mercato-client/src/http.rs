//! HTTP client - network communication
//!
//! Wraps `reqwest` with the session behavior every resource call shares:
//! bearer token injection, envelope-aware error mapping, error notices, and
//! the 401 refresh-and-retry policy.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use shared::auth::{RefreshRequest, TokenPair};
use shared::response::ApiResponse;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::notify::EventBus;
use crate::token::TokenStore;

/// Session-aware HTTP client
///
/// The 401 policy is at-most-one-retry per request: a 401 triggers a token
/// refresh and a single re-issue of the original request; a second 401 on
/// the retried request is surfaced as a final failure. Concurrent 401s
/// serialize on `refresh_gate` so only one refresh call is in flight
/// (single-flight); late arrivals pick up the rotated tokens instead of
/// refreshing again.
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    events: EventBus,
    refresh_gate: Mutex<()>,
}

impl HttpClient {
    pub fn new(
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
        events: EventBus,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            events,
            refresh_gate: Mutex::new(()),
        })
    }

    /// API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- typed verb helpers -------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let query = serde_json::to_value(query)?;
        self.request(Method::GET, path, Some(query), None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::POST, path, None, None).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, None, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::DELETE, path, None, None).await
    }

    // ---- request pipeline ---------------------------------------------------

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<Value>,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let token = self.tokens.access();
        tracing::debug!(%method, path, authenticated = token.is_some(), "API request");

        let response = self
            .build(&method, path, query.as_ref(), body.as_ref(), token.as_deref())
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return self
                .recover_unauthorized(method, path, query, body, token)
                .await;
        }
        self.handle_response(response).await
    }

    fn build(
        &self,
        method: &Method,
        path: &str,
        query: Option<&Value>,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.request(method.clone(), &url);
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        req
    }

    /// One-shot recovery for a 401: refresh the session, then re-issue the
    /// original request exactly once with the new access token.
    async fn recover_unauthorized<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<Value>,
        body: Option<Value>,
        stale_token: Option<String>,
    ) -> ClientResult<T> {
        let _gate = self.refresh_gate.lock().await;

        // Another request may have finished refreshing while we waited for
        // the gate; if the persisted token changed, reuse it directly.
        let current = self.tokens.access();
        let token = match (&current, &stale_token) {
            (Some(fresh), stale) if stale.as_ref() != Some(fresh) => fresh.clone(),
            _ => self.refresh_session().await?,
        };

        tracing::debug!(%method, path, "Retrying request after token refresh");
        let response = self
            .build(&method, path, query.as_ref(), body.as_ref(), Some(&token))
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        // A recurring 401 falls through handle_response as a final error.
        self.handle_response(response).await
    }

    /// Call the refresh endpoint with the persisted refresh token.
    ///
    /// Failure is terminal for the session: both tokens are cleared and
    /// `SessionExpired` is broadcast before the error propagates.
    async fn refresh_session(&self) -> ClientResult<String> {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            return Err(self.expire_session("No refresh token available"));
        };

        let url = format!("{}/auth/refresh-token", self.base_url);
        let request = RefreshRequest { refresh_token };
        let outcome = async {
            let response = self.client.post(&url).json(&request).send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = extract_message(&response.text().await.unwrap_or_default())
                    .unwrap_or_else(|| format!("Token refresh failed ({status})"));
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            let envelope: ApiResponse<TokenPair> = response.json().await?;
            envelope
                .data
                .ok_or_else(|| ClientError::InvalidResponse("Refresh response missing data".into()))
        }
        .await;

        match outcome {
            Ok(pair) => {
                let access = pair.access_token.clone();
                self.tokens.store(pair);
                tracing::debug!("Session tokens rotated");
                Ok(access)
            }
            Err(err) => {
                tracing::warn!(%err, "Token refresh failed, clearing session");
                Err(self.expire_session(err.user_message()))
            }
        }
    }

    fn expire_session(&self, message: impl Into<String>) -> ClientError {
        let message = message.into();
        self.tokens.clear();
        self.events.session_expired();
        ClientError::SessionExpired(message)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        self.events.error(err.to_string());
        ClientError::Http(err)
    }

    /// Map a completed response to parsed JSON or a surfaced error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_message(&text).unwrap_or_else(|| {
                format!(
                    "Request failed ({})",
                    status.canonical_reason().unwrap_or("unknown error")
                )
            });
            // Error notices are a side effect of the error path only.
            self.events.error(message.clone());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|err| self.transport_error(err))
    }
}

/// Pull the server-supplied message out of an error body, if it has one.
fn extract_message(body: &str) -> Option<String> {
    let envelope: ApiResponse<Value> = serde_json::from_str(body).ok()?;
    envelope.message.filter(|m| !m.is_empty())
}
