//! Session renewal behavior of the HTTP layer: bearer injection, the
//! one-shot 401 refresh-and-retry, and terminal refresh failure.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mercato_client::notify::ClientEvent;
use mercato_client::{ClientConfig, MemoryTokenStore, Store, TokenPair, TokenStore};

fn seeded_tokens(access: &str, refresh: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_tokens(TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }))
}

fn store_with(server: &MockServer, tokens: Arc<MemoryTokenStore>) -> Store {
    let config = ClientConfig::new(server.uri());
    Store::with_token_store(&config, tokens).unwrap()
}

fn profile_body() -> serde_json::Value {
    json!({
        "success": true,
        "message": "Success",
        "data": {
            "_id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "role": "customer",
            "status": "active"
        }
    })
}

#[tokio::test]
async fn request_attaches_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(&server, seeded_tokens("access-1", "refresh-1"));
    store.get_profile().await.unwrap();

    let auth = store.auth_state().await;
    assert!(auth.is_authenticated);
    assert_eq!(auth.user.unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() {
    let server = MockServer::start().await;

    // Stale token is rejected, fresh token accepted.
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({ "refreshToken": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": { "accessToken": "fresh", "refreshToken": "refresh-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = seeded_tokens("stale", "refresh-1");
    let store = store_with(&server, tokens.clone());
    store.get_profile().await.unwrap();

    // Rotated pair was persisted.
    assert_eq!(tokens.access().as_deref(), Some("fresh"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("refresh-2"));
    assert!(store.auth_state().await.is_authenticated);
}

#[tokio::test]
async fn recurring_401_after_refresh_is_final() {
    let server = MockServer::start().await;

    // Server rejects both the original and the retried request.
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token invalid"
        })))
        .expect(2)
        .mount(&server)
        .await;
    // Exactly one refresh attempt; a second would overshoot the mock.
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": { "accessToken": "fresh", "refreshToken": "refresh-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(&server, seeded_tokens("stale", "refresh-1"));
    let err = store.get_profile().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn refresh_failure_clears_session_and_signals_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Refresh token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = seeded_tokens("stale", "refresh-1");
    let store = store_with(&server, tokens.clone());
    let mut events = store.events().subscribe();

    store.get_profile().await.unwrap_err();

    assert!(tokens.access().is_none());
    assert!(tokens.refresh_token().is_none());

    // SessionExpired must be on the bus for the UI's redirect.
    let mut saw_expiry = false;
    while let Ok(event) = events.try_recv() {
        if event == ClientEvent::SessionExpired {
            saw_expiry = true;
        }
    }
    assert!(saw_expiry);
}

#[tokio::test]
async fn unauthenticated_401_without_refresh_token_expires_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    // No tokens persisted at all: request goes out without a bearer header
    // and the 401 cannot be recovered.
    let tokens = Arc::new(MemoryTokenStore::new());
    let store = store_with(&server, tokens);
    let mut events = store.events().subscribe();

    let err = store
        .add_to_cart(shared::models::CartItemAdd {
            product_id: "p1".to_string(),
            quantity: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, mercato_client::ClientError::SessionExpired(_)));

    // Cart state untouched by the failed call.
    assert!(store.cart_state().await.cart.is_none());

    let mut saw_expiry = false;
    while let Ok(event) = events.try_recv() {
        if event == ClientEvent::SessionExpired {
            saw_expiry = true;
        }
    }
    assert!(saw_expiry);
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": {
                "_id": "cart1",
                "userId": "u1",
                "items": [],
                "totalAmount": 0.0,
                "totalItems": 0
            }
        })))
        .mount(&server)
        .await;
    // The whole point: only one refresh call despite two 401s.
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": { "accessToken": "fresh", "refreshToken": "refresh-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = seeded_tokens("stale", "refresh-1");
    let store = store_with(&server, tokens.clone());

    let (profile, cart) = tokio::join!(store.get_profile(), store.fetch_cart());
    profile.unwrap();
    cart.unwrap();

    assert_eq!(tokens.access().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn server_error_message_is_broadcast_as_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Database unavailable"
        })))
        .mount(&server)
        .await;

    let store = store_with(&server, seeded_tokens("access-1", "refresh-1"));
    let mut events = store.events().subscribe();

    store.get_profile().await.unwrap_err();

    let event = events.try_recv().unwrap();
    assert_eq!(
        event,
        ClientEvent::Notice {
            level: mercato_client::NoticeLevel::Error,
            message: "Database unavailable".to_string()
        }
    );
}
